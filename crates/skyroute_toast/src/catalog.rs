//! Cities, products and message templates
//!
//! Templates may use `{city}`, `{country}`, `{product}`, `{time}` and
//! `{orderId}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ToastError;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub lat: f32,
    pub lon: f32,
}

impl City {
    fn new(name: &str, country: &str, lat: f32, lon: f32) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            lat,
            lon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    View,
    Cart,
    Delivered,
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VariantKind::View => "view",
            VariantKind::Cart => "cart",
            VariantKind::Delivered => "delivered",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ToastVariant {
    pub kind: VariantKind,
    /// Relative selection weight
    #[serde(default)]
    pub weight: f64,
    pub templates: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ToastCatalog {
    #[serde(default = "default_cities")]
    pub cities: Vec<City>,
    #[serde(default = "default_products")]
    pub products: Vec<String>,
    #[serde(default = "default_variants")]
    pub variants: Vec<ToastVariant>,
}

fn default_cities() -> Vec<City> {
    vec![
        City::new("Toronto", "Canada", 43.65, -79.38),
        City::new("Riyadh", "Saudi Arabia", 24.71, 46.67),
        City::new("Jeddah", "Saudi Arabia", 21.54, 39.17),
        City::new("Ottawa", "Canada", 45.42, -75.69),
        City::new("Montreal", "Canada", 45.50, -73.57),
        City::new("Dubai", "UAE", 25.20, 55.27),
        City::new("London", "UK", 51.51, -0.13),
        City::new("Calgary", "Canada", 51.05, -114.07),
        City::new("Vancouver", "Canada", 49.28, -123.12),
    ]
}

fn default_products() -> Vec<String> {
    [
        "UGREEN Charger Robot",
        "ESR Pencil Pro",
        "GameSir X5 Lite",
        "Anker PowerCore",
        "Belkin USB-C Cable",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn templates(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

fn default_variants() -> Vec<ToastVariant> {
    vec![
        ToastVariant {
            kind: VariantKind::View,
            weight: 0.7,
            templates: templates(&[
                "Just now • Someone in {city} viewed {product}",
                "Now • Browsing from {city}",
            ]),
        },
        ToastVariant {
            kind: VariantKind::Cart,
            weight: 0.3,
            templates: templates(&["{time} ago • {product} added to cart from {city}"]),
        },
        // Shipped but never selected by default
        ToastVariant {
            kind: VariantKind::Delivered,
            weight: 0.0,
            templates: templates(&["Delivered • Order #{orderId} arrived in {city}"]),
        },
    ]
}

impl Default for ToastCatalog {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            products: default_products(),
            variants: default_variants(),
        }
    }
}

impl ToastCatalog {
    pub fn from_toml_str(source: &str) -> Result<Self, ToastError> {
        let catalog: ToastCatalog = toml::from_str(source)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ToastError> {
        if self.cities.is_empty() {
            return Err(ToastError::EmptyCatalog("cities"));
        }
        if self.products.is_empty() {
            return Err(ToastError::EmptyCatalog("products"));
        }
        if self.variants.is_empty() {
            return Err(ToastError::EmptyCatalog("variants"));
        }

        let mut total = 0.0;
        for variant in &self.variants {
            if !(variant.weight.is_finite() && variant.weight >= 0.0) {
                return Err(ToastError::InvalidWeights);
            }
            if variant.weight > 0.0 && variant.templates.is_empty() {
                return Err(ToastError::EmptyVariant(variant.kind.to_string()));
            }
            total += variant.weight;
        }
        if total <= 0.0 {
            return Err(ToastError::InvalidWeights);
        }
        Ok(())
    }

    pub fn variant(&self, kind: VariantKind) -> Option<&ToastVariant> {
        self.variants.iter().find(|v| v.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = ToastCatalog::default();
        catalog.validate().unwrap();
        assert_eq!(catalog.cities.len(), 9);
        assert_eq!(catalog.products.len(), 5);
        assert_eq!(catalog.variant(VariantKind::Delivered).unwrap().weight, 0.0);
    }

    #[test]
    fn test_parse_catalog() {
        let source = r#"
            products = ["Tea Kettle"]

            [[cities]]
            name = "Lisbon"
            country = "Portugal"
            lat = 38.72
            lon = -9.14

            [[variants]]
            kind = "delivered"
            weight = 1.0
            templates = ["Order #{orderId} reached {city}"]
        "#;
        let catalog = ToastCatalog::from_toml_str(source).unwrap();
        assert_eq!(catalog.cities[0].country, "Portugal");
        assert_eq!(catalog.products, vec!["Tea Kettle".to_string()]);
        assert_eq!(catalog.variants[0].kind, VariantKind::Delivered);
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut catalog = ToastCatalog::default();
        for variant in &mut catalog.variants {
            variant.weight = 0.0;
        }
        assert!(matches!(catalog.validate(), Err(ToastError::InvalidWeights)));
    }

    #[test]
    fn test_weighted_variant_needs_templates() {
        let mut catalog = ToastCatalog::default();
        catalog.variants[1].templates.clear();
        assert!(matches!(
            catalog.validate(),
            Err(ToastError::EmptyVariant(kind)) if kind == "cart"
        ));
    }

    #[test]
    fn test_empty_products_rejected() {
        let source = "products = []";
        assert!(matches!(
            ToastCatalog::from_toml_str(source),
            Err(ToastError::EmptyCatalog("products"))
        ));
    }
}
