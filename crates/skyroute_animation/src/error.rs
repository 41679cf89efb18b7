use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("route {route}: invalid color {value:?}")]
    InvalidColor { route: usize, value: String },

    #[error("invalid default line color {0:?}")]
    InvalidLineColor(String),

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("invalid timing: {0}")]
    InvalidTiming(&'static str),
}
