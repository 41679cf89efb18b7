//! World map scene configuration (TOML)
//!
//! ```toml
//! arc_lift = 50.0
//! line_color = "#3b82f6"
//!
//! [canvas]
//! width = 800.0
//! height = 400.0
//!
//! [timing]
//! stagger_secs = 0.3
//! duration_secs = 2.0
//!
//! [[routes]]
//! start = { lat = 40.7128, lng = -74.006, label = "New York" }
//! end = { lat = 51.5072, lng = -0.1276, label = "London" }
//! ```

use serde::{Deserialize, Serialize};
use skyroute_core::{Color, Point};

use crate::error::ConfigError;
use crate::geo::{GeoPoint, Projection, Route};
use crate::path::DEFAULT_ARC_LIFT;
use crate::scheduler::RouteAnimator;
use crate::timeline::{RouteCycle, RouteTiming};

/// Top-level scene configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Vertical lift of the arc control point, in canvas units
    #[serde(default = "default_arc_lift")]
    pub arc_lift: f32,
    /// Color for routes that do not set their own
    #[serde(default = "default_line_color")]
    pub line_color: String,
    /// Draw city labels above labeled endpoints
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

fn default_arc_lift() -> f32 {
    DEFAULT_ARC_LIFT
}

fn default_line_color() -> String {
    "#0ea5e9".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            arc_lift: default_arc_lift(),
            line_color: default_line_color(),
            show_labels: true,
            timing: TimingConfig::default(),
            routes: Vec::new(),
        }
    }
}

/// Canvas the routes are projected onto
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    800.0
}

fn default_height() -> f32 {
    400.0
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Route draw cycle timing
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct TimingConfig {
    #[serde(default = "default_stagger")]
    pub stagger_secs: f32,
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    #[serde(default = "default_pause")]
    pub pause_secs: f32,
    #[serde(default = "default_true", rename = "loop")]
    pub looping: bool,
}

fn default_stagger() -> f32 {
    0.3
}

fn default_duration() -> f32 {
    2.0
}

fn default_pause() -> f32 {
    2.0
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            stagger_secs: default_stagger(),
            duration_secs: default_duration(),
            pause_secs: default_pause(),
            looping: true,
        }
    }
}

impl From<TimingConfig> for RouteTiming {
    fn from(timing: TimingConfig) -> Self {
        RouteTiming {
            stagger_secs: timing.stagger_secs,
            duration_secs: timing.duration_secs,
            pause_secs: timing.pause_secs,
            looping: timing.looping,
        }
    }
}

/// A city label anchored at its projected endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct MapLabel {
    pub text: String,
    pub anchor: Point,
}

/// One `{start, end}` record
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RouteConfig {
    pub start: GeoPoint,
    pub end: GeoPoint,
    #[serde(default)]
    pub color: Option<String>,
}

impl SceneConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasConfig { width, height } = self.canvas;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidCanvas { width, height });
        }

        let t = &self.timing;
        let finite_non_negative = |v: f32| v.is_finite() && v >= 0.0;
        if !finite_non_negative(t.stagger_secs) {
            return Err(ConfigError::InvalidTiming("stagger_secs must be >= 0"));
        }
        if !(t.duration_secs.is_finite() && t.duration_secs > 0.0) {
            return Err(ConfigError::InvalidTiming("duration_secs must be > 0"));
        }
        if !finite_non_negative(t.pause_secs) {
            return Err(ConfigError::InvalidTiming("pause_secs must be >= 0"));
        }
        if !self.arc_lift.is_finite() {
            return Err(ConfigError::InvalidTiming("arc_lift must be finite"));
        }

        self.routes().map(|_| ())
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.canvas.width, self.canvas.height)
    }

    /// Routes with colors resolved; routes without a color use `line_color`
    pub fn routes(&self) -> Result<Vec<Route>, ConfigError> {
        let fallback = Color::parse_hex(&self.line_color)
            .ok_or_else(|| ConfigError::InvalidLineColor(self.line_color.clone()))?;

        self.routes
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let color = match &entry.color {
                    Some(value) => {
                        Color::parse_hex(value).ok_or_else(|| ConfigError::InvalidColor {
                            route: index,
                            value: value.clone(),
                        })?
                    }
                    None => fallback,
                };
                Ok(Route::new(entry.start.clone(), entry.end.clone()).with_color(color))
            })
            .collect()
    }

    /// Labels for every labeled endpoint, one per city, in route order.
    ///
    /// Empty when `show_labels` is off.
    pub fn labels(&self) -> Vec<MapLabel> {
        if !self.show_labels {
            return Vec::new();
        }
        let projection = self.projection();
        let mut labels: Vec<MapLabel> = Vec::new();
        for entry in &self.routes {
            let route = Route::new(entry.start.clone(), entry.end.clone());
            let (start, end) = projection.project_route(&route);
            for (point, anchor) in [(&entry.start, start), (&entry.end, end)] {
                let Some(text) = point.label.as_deref() else {
                    continue;
                };
                if labels.iter().any(|l| l.text == text) {
                    continue;
                }
                labels.push(MapLabel {
                    text: text.to_string(),
                    anchor,
                });
            }
        }
        labels
    }

    pub fn cycle(&self) -> RouteCycle {
        RouteCycle::new(self.routes.len(), self.timing.into())
    }

    /// Animator with one marker per route, pacing taken from `timing`
    pub fn animator(&self) -> Result<RouteAnimator, ConfigError> {
        let mut animator = RouteAnimator::new(self.routes()?);
        animator.spawn_all(self.timing.duration_secs, self.timing.looping);
        Ok(animator)
    }

    /// The five-leg route set shown on the global delivery section
    pub fn global_delivery() -> Self {
        let new_york = GeoPoint::new(40.7128, -74.006).with_label("New York");
        let london = GeoPoint::new(51.5072, -0.1276).with_label("London");
        let dubai = GeoPoint::new(25.276987, 55.296249).with_label("Dubai");
        let singapore = GeoPoint::new(1.3521, 103.8198).with_label("Singapore");
        let sydney = GeoPoint::new(-33.8688, 151.2093).with_label("Sydney");
        let toronto = GeoPoint::new(43.6532, -79.3832).with_label("Toronto");

        let leg = |start: &GeoPoint, end: &GeoPoint| RouteConfig {
            start: start.clone(),
            end: end.clone(),
            color: None,
        };

        Self {
            line_color: "#3b82f6".to_string(),
            routes: vec![
                leg(&new_york, &london),
                leg(&london, &dubai),
                leg(&dubai, &singapore),
                leg(&singapore, &sydney),
                leg(&toronto, &london),
            ],
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_scene() {
        let source = r##"
            arc_lift = 40.0
            line_color = "#3b82f6"

            [timing]
            duration_secs = 3.0
            loop = false

            [[routes]]
            start = { lat = 40.7128, lng = -74.006, label = "New York" }
            end = { lat = 51.5072, lng = -0.1276, label = "London" }

            [[routes]]
            start = { lat = 1.3521, lng = 103.8198 }
            end = { lat = -33.8688, lng = 151.2093 }
            color = "#ef4444"
        "##;

        let config = SceneConfig::from_toml_str(source).unwrap();
        assert_eq!(config.arc_lift, 40.0);
        assert_eq!(config.canvas.width, 800.0);
        assert_eq!(config.timing.stagger_secs, 0.3);
        assert!(!config.timing.looping);

        let routes = config.routes().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].start.label.as_deref(), Some("New York"));
        assert_eq!(routes[0].color, Color::parse_hex("#3b82f6"));
        assert_eq!(routes[1].color, Color::parse_hex("#ef4444"));
        assert_eq!(routes[1].end.label, None);
    }

    #[test]
    fn test_bad_color_reports_route() {
        let source = r##"
            [[routes]]
            start = { lat = 0.0, lng = 0.0 }
            end = { lat = 1.0, lng = 1.0 }
            color = "teal"
        "##;
        match SceneConfig::from_toml_str(source) {
            Err(ConfigError::InvalidColor { route, value }) => {
                assert_eq!(route, 0);
                assert_eq!(value, "teal");
            }
            other => panic!("expected color error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_line_color_is_not_blamed_on_a_route() {
        let source = r##"
            line_color = "blue-ish"

            [[routes]]
            start = { lat = 0.0, lng = 0.0 }
            end = { lat = 1.0, lng = 1.0 }
            color = "#ef4444"
        "##;
        match SceneConfig::from_toml_str(source) {
            Err(ConfigError::InvalidLineColor(value)) => assert_eq!(value, "blue-ish"),
            other => panic!("expected line color error, got {other:?}"),
        }
    }

    #[test]
    fn test_labels_once_per_city() {
        let mut config = SceneConfig::global_delivery();
        let labels = config.labels();
        let names: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            names,
            ["New York", "London", "Dubai", "Singapore", "Sydney", "Toronto"]
        );
        assert_eq!(labels[0].anchor, config.projection().project(40.7128, -74.006));

        config.show_labels = false;
        assert!(config.labels().is_empty());
    }

    #[test]
    fn test_rejects_zero_duration() {
        let source = "[timing]\nduration_secs = 0.0\n";
        assert!(matches!(
            SceneConfig::from_toml_str(source),
            Err(ConfigError::InvalidTiming(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            SceneConfig::from_toml_str("routes = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_global_delivery_preset() {
        let config = SceneConfig::global_delivery();
        config.validate().unwrap();
        let animator = config.animator().unwrap();
        assert_eq!(animator.len(), 5);
        assert!((config.cycle().cycle_secs() - 5.5).abs() < 1e-4);
    }
}
