mod calculator;
mod nudges;
mod values;

pub use calculator::{Calculator, CalculatorConfig};
pub use nudges::{matching_rules, NudgeRule, NUDGE_RULES};
pub use values::{extract_values, ValueHint};
