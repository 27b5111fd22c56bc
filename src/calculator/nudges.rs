//! Keyword-driven parameter tendencies.
//!
//! Each rule ties a prompt keyword to target values on one engine. The
//! Calculator blends current values toward the target instead of setting
//! them outright, so several keywords touching the same parameter settle
//! somewhere between their targets rather than fighting.

use crate::catalog::{self, EngineId};

pub struct NudgeRule {
    /// Single words match whole tokens, phrases match as substrings.
    pub keyword: &'static str,
    pub engine: EngineId,
    pub params: &'static [(&'static str, f32)],
}

const fn rule(
    keyword: &'static str,
    engine: EngineId,
    params: &'static [(&'static str, f32)],
) -> NudgeRule {
    NudgeRule {
        keyword,
        engine,
        params,
    }
}

pub static NUDGE_RULES: &[NudgeRule] = &[
    // Tone color
    rule("dark", catalog::LADDER_FILTER, &[("Cutoff", 0.25)]),
    rule("dark", catalog::STATE_VARIABLE_FILTER, &[("Cutoff", 0.3)]),
    rule("dark", catalog::PARAMETRIC_EQ, &[("High Gain", 0.3), ("Tilt", 0.35)]),
    rule("dark", catalog::TAPE_ECHO, &[("Tone", 0.3)]),
    rule("dark", catalog::PLATE_REVERB, &[("Damping", 0.7), ("High Cut", 0.55)]),
    rule("dark", catalog::DIGITAL_DELAY, &[("High Cut", 0.5)]),
    rule("bright", catalog::LADDER_FILTER, &[("Cutoff", 0.8)]),
    rule("bright", catalog::PARAMETRIC_EQ, &[("High Gain", 0.7), ("Tilt", 0.65)]),
    rule("bright", catalog::HARMONIC_EXCITER, &[("Amount", 0.5), ("Air", 0.6)]),
    rule("bright", catalog::PLATE_REVERB, &[("Damping", 0.3), ("High Cut", 0.95)]),
    rule("warm", catalog::VINTAGE_TUBE_PREAMP, &[("Warmth", 0.75), ("Drive", 0.45)]),
    rule("warm", catalog::VINTAGE_CONSOLE_EQ, &[("Low Shelf", 0.6), ("Drive", 0.3)]),
    rule("warm", catalog::TAPE_ECHO, &[("Saturation", 0.45), ("Tone", 0.4)]),
    rule("warm", catalog::VINTAGE_OPTO_COMPRESSOR, &[("Harmonics", 0.4)]),
    // Dynamics feel
    rule("aggressive", catalog::RODENT_DISTORTION, &[("Gain", 0.75), ("Presence", 0.6)]),
    rule("aggressive", catalog::MUFF_FUZZ, &[("Sustain", 0.75)]),
    rule("aggressive", catalog::K_STYLE_OVERDRIVE, &[("Drive", 0.7)]),
    rule("aggressive", catalog::CLASSIC_COMPRESSOR, &[("Ratio", 0.7), ("Attack", 0.15)]),
    rule("punchy", catalog::CLASSIC_COMPRESSOR, &[("Attack", 0.55), ("Release", 0.3), ("Ratio", 0.5)]),
    rule("punchy", catalog::TRANSIENT_SHAPER, &[("Attack", 0.7)]),
    rule("smooth", catalog::VINTAGE_OPTO_COMPRESSOR, &[("Peak Reduction", 0.5), ("Knee", 0.7)]),
    rule("smooth", catalog::CLASSIC_COMPRESSOR, &[("Knee", 0.7), ("Attack", 0.5)]),
    rule("tight", catalog::NOISE_GATE, &[("Threshold", 0.55), ("Release", 0.3)]),
    rule("tight", catalog::CLASSIC_COMPRESSOR, &[("Attack", 0.2)]),
    rule("tight", catalog::RODENT_DISTORTION, &[("Tightness", 0.7)]),
    // Space
    rule("wide", catalog::STEREO_CHORUS, &[("Spread", 0.85)]),
    rule("wide", catalog::STEREO_WIDENER, &[("Width", 0.8)]),
    rule("wide", catalog::DETUNE_DOUBLER, &[("Spread", 0.85), ("Width", 0.8)]),
    rule("wide", catalog::DIMENSION_EXPANDER, &[("Amount", 0.7)]),
    rule("huge", catalog::PLATE_REVERB, &[("Size", 0.8), ("Decay", 0.75)]),
    rule("huge", catalog::SHIMMER_REVERB, &[("Size", 0.85), ("Decay", 0.8)]),
    rule("huge", catalog::CONVOLUTION_REVERB, &[("Size", 0.8)]),
    rule("spacious", catalog::PLATE_REVERB, &[("Size", 0.75), ("Predelay", 0.3)]),
    rule("spacious", catalog::SHIMMER_REVERB, &[("Size", 0.8)]),
    rule("intimate", catalog::PLATE_REVERB, &[("Size", 0.25), ("Decay", 0.3), ("Mix", 0.2)]),
    rule("intimate", catalog::CONVOLUTION_REVERB, &[("Size", 0.3), ("Decay", 0.3)]),
    // Movement and echo character
    rule("slapback", catalog::TAPE_ECHO, &[("Time", 0.15), ("Feedback", 0.15)]),
    rule("slapback", catalog::DIGITAL_DELAY, &[("Time", 0.12), ("Feedback", 0.12)]),
    rule("dreamy", catalog::SHIMMER_REVERB, &[("Shimmer", 0.7), ("Decay", 0.75)]),
    rule("dreamy", catalog::STEREO_CHORUS, &[("Depth", 0.6), ("Rate", 0.25)]),
    rule("wobbly", catalog::TAPE_ECHO, &[("Wow", 0.5), ("Flutter", 0.4)]),
    rule("wobbly", catalog::BUCKET_BRIGADE_DELAY, &[("Modulation", 0.5)]),
    rule("lo-fi", catalog::BIT_CRUSHER, &[("Bits", 0.45), ("Downsample", 0.55)]),
    rule("lo-fi", catalog::TAPE_ECHO, &[("Age", 0.6), ("Saturation", 0.5)]),
    rule("lofi", catalog::BIT_CRUSHER, &[("Bits", 0.45), ("Downsample", 0.55)]),
    rule("lofi", catalog::TAPE_ECHO, &[("Age", 0.6), ("Saturation", 0.5)]),
    rule("fast", catalog::CLASSIC_TREMOLO, &[("Rate", 0.7)]),
    rule("fast", catalog::ANALOG_PHASER, &[("Rate", 0.65)]),
    rule("slow", catalog::CLASSIC_TREMOLO, &[("Rate", 0.2)]),
    rule("slow", catalog::ANALOG_PHASER, &[("Rate", 0.2)]),
    rule("slow", catalog::ROTARY_SPEAKER, &[("Speed", 0.2)]),
];

/// Rules whose keyword occurs in the prompt, in table order.
pub fn matching_rules(prompt: &str) -> Vec<&'static NudgeRule> {
    let normalized = prompt.to_lowercase();
    let words: Vec<&str> = normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    NUDGE_RULES
        .iter()
        .filter(|rule| {
            if rule.keyword.chars().all(char::is_alphanumeric) {
                words.contains(&rule.keyword)
            } else {
                normalized.contains(rule.keyword)
            }
        })
        .collect()
}
