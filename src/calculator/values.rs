//! Explicit quantity extraction.
//!
//! Prompts sometimes carry exact numbers ("35% feedback", "4:1 ratio",
//! "1/8 dotted delay"). Those beat any keyword-derived tendency, so they
//! are collected here and applied after the nudge blend as hard sets.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::EngineCategory;

lazy_static! {
    // "35% feedback" and "feedback at 35%".
    static ref PERCENT_BEFORE: Regex = Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*%\s*(feedback|mix|wet|drive|depth|width)"
    )
    .expect("Invalid regex, this should be fixed at compile time.");
    static ref PERCENT_AFTER: Regex = Regex::new(
        r"(?i)(feedback|mix|wet|drive|depth|width)\s*(?:at|of|to|around)?\s*(\d+(?:\.\d+)?)\s*%"
    )
    .expect("Invalid regex, this should be fixed at compile time.");
    // Compression ratios like "4:1" or "2.5:1". The trailing boundary
    // keeps clock-style text such as "3:15" from matching.
    static ref RATIO: Regex = Regex::new(r"(\d+(?:\.\d+)?)\s*:\s*1\b")
        .expect("Invalid regex, this should be fixed at compile time.");
    // Note subdivisions, with the modifier on either side.
    static ref SUBDIVISION: Regex = Regex::new(
        r"(?i)\b(?:(dotted|triplet)\s+)?1/(4|8|16|32)\b(?:\s+(dotted|triplet))?"
    )
    .expect("Invalid regex, this should be fixed at compile time.");
}

/// A parameter assignment extracted from explicit prompt numbers. When
/// `category` is set the hint only applies to engines of that category.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueHint {
    pub param: &'static str,
    pub value: f32,
    pub category: Option<EngineCategory>,
}

pub fn extract_values(prompt: &str) -> Vec<ValueHint> {
    let mut hints = Vec::new();

    for captures in PERCENT_BEFORE.captures_iter(prompt) {
        if let Some(hint) = percent_hint(&captures[2], &captures[1]) {
            hints.push(hint);
        }
    }
    for captures in PERCENT_AFTER.captures_iter(prompt) {
        if let Some(hint) = percent_hint(&captures[1], &captures[2]) {
            hints.push(hint);
        }
    }

    if let Some(captures) = RATIO.captures(prompt) {
        if let Ok(ratio) = captures[1].parse::<f32>() {
            if ratio >= 1.0 {
                hints.push(ValueHint {
                    param: "Ratio",
                    value: ((ratio - 1.0) / 19.0).clamp(0.0, 1.0),
                    category: Some(EngineCategory::Dynamics),
                });
            }
        }
    }

    if let Some(captures) = SUBDIVISION.captures(prompt) {
        let modifier = captures
            .get(1)
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().to_lowercase());
        if let Some(value) = subdivision_time(&captures[2], modifier.as_deref()) {
            hints.push(ValueHint {
                param: "Time",
                value,
                category: Some(EngineCategory::Delay),
            });
        }
    }

    hints
}

fn percent_hint(name: &str, number: &str) -> Option<ValueHint> {
    let value = number.parse::<f32>().ok()?;
    let param = match name.to_lowercase().as_str() {
        "feedback" => "Feedback",
        "mix" | "wet" => "Mix",
        "drive" => "Drive",
        "depth" => "Depth",
        "width" => "Width",
        _ => return None,
    };
    Some(ValueHint {
        param,
        value: (value / 100.0).clamp(0.0, 1.0),
        category: None,
    })
}

/// Normalized delay times for musical subdivisions. Values line up with
/// the plugin's tempo-free time scale, dotted lands between the plain
/// value and the next longer one, triplet just below the plain value.
fn subdivision_time(denominator: &str, modifier: Option<&str>) -> Option<f32> {
    let value = match (denominator, modifier) {
        ("4", None) => 0.50,
        ("4", Some("dotted")) => 0.58,
        ("4", Some("triplet")) => 0.44,
        ("8", None) => 0.35,
        ("8", Some("dotted")) => 0.42,
        ("8", Some("triplet")) => 0.30,
        ("16", None) => 0.22,
        ("16", Some("dotted")) => 0.28,
        ("16", Some("triplet")) => 0.18,
        ("32", None) => 0.12,
        ("32", Some("dotted")) => 0.16,
        ("32", Some("triplet")) => 0.10,
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_before_and_after() {
        let hints = extract_values("run it with 35% feedback and mix at 60%");
        assert!(hints.contains(&ValueHint {
            param: "Feedback",
            value: 0.35,
            category: None,
        }));
        assert!(hints.contains(&ValueHint {
            param: "Mix",
            value: 0.6,
            category: None,
        }));
    }

    #[test]
    fn wet_is_an_alias_for_mix() {
        let hints = extract_values("about 40% wet");
        assert_eq!(hints[0].param, "Mix");
        assert!((hints[0].value - 0.4).abs() < 1e-6);
    }

    #[test]
    fn over_100_percent_clamps() {
        let hints = extract_values("150% drive");
        assert_eq!(hints[0].value, 1.0);
    }

    #[test]
    fn compression_ratio_maps_onto_unit_range() {
        let hints = extract_values("squash it 4:1");
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].param, "Ratio");
        assert_eq!(hints[0].category, Some(EngineCategory::Dynamics));
        assert!((hints[0].value - 3.0 / 19.0).abs() < 1e-6);
        assert_eq!(extract_values("20:1 limiting")[0].value, 1.0);
    }

    #[test]
    fn subdivisions_with_modifiers_on_either_side() {
        let dotted = extract_values("a 1/8 dotted delay");
        assert_eq!(dotted[0].param, "Time");
        assert_eq!(dotted[0].value, 0.42);
        let dotted_prefix = extract_values("dotted 1/8 delay");
        assert_eq!(dotted_prefix[0].value, 0.42);
        let plain = extract_values("standard 1/16 repeats");
        assert_eq!(plain[0].value, 0.22);
        let triplet = extract_values("1/4 triplet bounce");
        assert_eq!(triplet[0].value, 0.44);
    }

    #[test]
    fn no_numbers_no_hints() {
        assert!(extract_values("just a big warm wash").is_empty());
    }
}
