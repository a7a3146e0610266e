#![forbid(unsafe_code)]

//! The data-lookup capability.
//!
//! Widgets never fetch anything themselves; they resolve bound
//! identifiers through [`DataSource`] and the host environment decides
//! how values are produced. A missing identifier is an expected state,
//! not an error.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an externally-produced data value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A resolved data value.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Free-form text state.
    Text(String),
    /// Numeric state with optional display metadata.
    Number {
        value: f64,
        unit: Option<String>,
        name: Option<String>,
    },
    /// Binary on/off state.
    Binary(bool),
    /// Historical series, oldest first.
    Series(Vec<f64>),
    /// Now-playing metadata.
    Media {
        title: String,
        artist: Option<String>,
        album: Option<String>,
        /// Playback position as a fraction 0.0-1.0, when known.
        position: Option<f32>,
    },
    /// A raw RGB frame (row-major, 3 bytes per pixel).
    Frame {
        width: u16,
        height: u16,
        pixels: Vec<u8>,
    },
}

impl DataValue {
    /// Numeric view of the value, when one makes sense.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Binary(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text view of the value, when one makes sense.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number { value, unit, .. } => {
                let mut s = format_number(*value);
                if let Some(unit) = unit {
                    s.push_str(unit);
                }
                Some(s)
            }
            Self::Binary(b) => Some(if *b { "on" } else { "off" }.to_string()),
            _ => None,
        }
    }
}

/// Format a number the way the display shows values: no trailing `.0`,
/// one decimal otherwise.
#[must_use]
pub fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < 0.05 {
        format!("{:.0}", value.round())
    } else {
        format!("{value:.1}")
    }
}

/// Capability to resolve data identifiers to values.
///
/// Implementations must be cheap to call; the render pipeline resolves
/// every bound identifier once per cycle.
pub trait DataSource: Send + Sync {
    /// Resolve an identifier. `None` means the value is missing, which
    /// widgets render as a placeholder.
    fn resolve(&self, id: &EntityId) -> Option<DataValue>;
}

/// Fixed in-memory data, for previews and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    values: HashMap<EntityId, DataValue>,
}

impl StaticData {
    /// Empty data set (every lookup misses).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder-style.
    #[must_use]
    pub fn with(mut self, id: impl Into<EntityId>, value: DataValue) -> Self {
        self.values.insert(id.into(), value);
        self
    }
}

impl DataSource for StaticData {
    fn resolve(&self, id: &EntityId) -> Option<DataValue> {
        self.values.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_data_hits_and_misses() {
        let data = StaticData::new().with("sensor.cpu", DataValue::Number {
            value: 42.0,
            unit: Some("%".into()),
            name: Some("CPU".into()),
        });
        assert!(data.resolve(&EntityId::new("sensor.cpu")).is_some());
        assert!(data.resolve(&EntityId::new("sensor.other")).is_none());
    }

    #[test]
    fn number_text_includes_unit() {
        let v = DataValue::Number {
            value: 21.5,
            unit: Some("°C".into()),
            name: None,
        };
        assert_eq!(v.as_text().unwrap(), "21.5°C");
    }

    #[test]
    fn text_parses_to_number() {
        assert_eq!(DataValue::Text(" 7.25 ".into()).as_number(), Some(7.25));
        assert_eq!(DataValue::Text("unavailable".into()).as_number(), None);
    }

    #[test]
    fn format_number_drops_integer_fraction() {
        assert_eq!(format_number(22.0), "22");
        assert_eq!(format_number(22.04), "22");
        assert_eq!(format_number(22.5), "22.5");
    }

    #[test]
    fn entity_id_is_transparent_in_json() {
        let id = EntityId::new("sensor.temp");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sensor.temp\"");
    }
}
