use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric engine identifier as used by the plugin parameter map.
///
/// Id 0 is the "None" engine, the bypass sentinel for empty slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(pub u8);

impl EngineId {
    pub const NONE: EngineId = EngineId(0);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    pub fn raw(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for EngineId {
    fn from(value: u8) -> Self {
        EngineId(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineCategory {
    Dynamics,
    Eq,
    Filter,
    Distortion,
    Modulation,
    Delay,
    Reverb,
    Spatial,
    Pitch,
    Utility,
    Special,
}

impl EngineCategory {
    pub const ALL: [EngineCategory; 11] = [
        EngineCategory::Dynamics,
        EngineCategory::Eq,
        EngineCategory::Filter,
        EngineCategory::Distortion,
        EngineCategory::Modulation,
        EngineCategory::Delay,
        EngineCategory::Reverb,
        EngineCategory::Spatial,
        EngineCategory::Pitch,
        EngineCategory::Utility,
        EngineCategory::Special,
    ];

    /// Stable position of this category in feature vectors and metrics labels.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EngineCategory::Dynamics => "dynamics",
            EngineCategory::Eq => "eq",
            EngineCategory::Filter => "filter",
            EngineCategory::Distortion => "distortion",
            EngineCategory::Modulation => "modulation",
            EngineCategory::Delay => "delay",
            EngineCategory::Reverb => "reverb",
            EngineCategory::Spatial => "spatial",
            EngineCategory::Pitch => "pitch",
            EngineCategory::Utility => "utility",
            EngineCategory::Special => "special",
        }
    }
}

impl fmt::Display for EngineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One normalized parameter of an engine. All values live in [0.0, 1.0];
/// `skew` is an optional exponent hint for hosts that map the normalized
/// value onto a musical range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub default: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skew: Option<f32>,
}

impl ParameterDescriptor {
    pub fn new(name: &str, default: f32) -> Self {
        Self {
            name: name.to_owned(),
            default,
            units: None,
            skew: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    pub id: EngineId,
    pub name: String,
    pub category: EngineCategory,
    /// One-line character description, embedded into generation prompts.
    pub hint: String,
    pub parameters: Vec<ParameterDescriptor>,
}

impl EngineDescriptor {
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    /// Case-insensitive lookup of a parameter index by name.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Index of the "Mix" parameter, if the engine has one.
    pub fn mix_index(&self) -> Option<usize> {
        self.param_index("Mix")
    }

    pub fn default_params(&self) -> Vec<f32> {
        self.parameters.iter().map(|p| p.default).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parameter_descriptor() {
        let s = r#"
        {
            "name": "Feedback",
            "default": 0.35,
            "units": "%"
        }
        "#;
        let expected = ParameterDescriptor {
            name: "Feedback".to_owned(),
            default: 0.35,
            units: Some("%".to_owned()),
            skew: None,
        };
        match serde_json::from_str::<ParameterDescriptor>(s) {
            Ok(x) => assert_eq!(x, expected),
            Err(_) => assert!(false, "Did not parse json string."),
        }
    }

    #[test]
    fn parses_engine_descriptor() {
        let s = r#"
        {
            "id": 40,
            "name": "Spring Reverb",
            "category": "Reverb",
            "hint": "boingy vintage amp-style spring tank",
            "parameters": [
                { "name": "Tension", "default": 0.5 },
                { "name": "Mix", "default": 0.3 }
            ]
        }
        "#;
        match serde_json::from_str::<EngineDescriptor>(s) {
            Ok(x) => {
                assert_eq!(x.id, EngineId(40));
                assert_eq!(x.category, EngineCategory::Reverb);
                assert_eq!(x.param_count(), 2);
                assert_eq!(x.mix_index(), Some(1));
            }
            Err(_) => assert!(false, "Did not parse json string."),
        }
    }

    #[test]
    fn param_index_is_case_insensitive() {
        let engine = EngineDescriptor {
            id: EngineId(34),
            name: "Tape Echo".to_owned(),
            category: EngineCategory::Delay,
            hint: String::new(),
            parameters: vec![
                ParameterDescriptor::new("Time", 0.45),
                ParameterDescriptor::new("Feedback", 0.35),
            ],
        };
        assert_eq!(engine.param_index("feedback"), Some(1));
        assert_eq!(engine.param_index("TIME"), Some(0));
        assert_eq!(engine.param_index("Ratio"), None);
    }

    #[test]
    fn category_indexes_are_stable() {
        assert_eq!(EngineCategory::Dynamics.index(), 0);
        assert_eq!(EngineCategory::Special.index(), 10);
        for (i, c) in EngineCategory::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
