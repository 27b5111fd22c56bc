use super::engine::{EngineCategory, EngineDescriptor, EngineId, ParameterDescriptor};
use std::collections::HashMap;

use EngineCategory::*;

// The authoritative id map. Routing, safety and required-engine rules
// reference engines through these names.
pub const VINTAGE_OPTO_COMPRESSOR: EngineId = EngineId(1);
pub const CLASSIC_COMPRESSOR: EngineId = EngineId(2);
pub const TRANSIENT_SHAPER: EngineId = EngineId(3);
pub const NOISE_GATE: EngineId = EngineId(4);
pub const MASTERING_LIMITER: EngineId = EngineId(5);
pub const DYNAMIC_EQ: EngineId = EngineId(6);
pub const PARAMETRIC_EQ: EngineId = EngineId(7);
pub const VINTAGE_CONSOLE_EQ: EngineId = EngineId(8);
pub const LADDER_FILTER: EngineId = EngineId(9);
pub const STATE_VARIABLE_FILTER: EngineId = EngineId(10);
pub const FORMANT_FILTER: EngineId = EngineId(11);
pub const ENVELOPE_FILTER: EngineId = EngineId(12);
pub const COMB_RESONATOR: EngineId = EngineId(13);
pub const VOCAL_FORMANT_FILTER: EngineId = EngineId(14);
pub const VINTAGE_TUBE_PREAMP: EngineId = EngineId(15);
pub const WAVE_FOLDER: EngineId = EngineId(16);
pub const HARMONIC_EXCITER: EngineId = EngineId(17);
pub const BIT_CRUSHER: EngineId = EngineId(18);
pub const MULTIBAND_SATURATOR: EngineId = EngineId(19);
pub const MUFF_FUZZ: EngineId = EngineId(20);
pub const RODENT_DISTORTION: EngineId = EngineId(21);
pub const K_STYLE_OVERDRIVE: EngineId = EngineId(22);
pub const STEREO_CHORUS: EngineId = EngineId(23);
pub const RESONANT_CHORUS: EngineId = EngineId(24);
pub const ANALOG_PHASER: EngineId = EngineId(25);
pub const RING_MODULATOR: EngineId = EngineId(26);
pub const FREQUENCY_SHIFTER: EngineId = EngineId(27);
pub const HARMONIC_TREMOLO: EngineId = EngineId(28);
pub const CLASSIC_TREMOLO: EngineId = EngineId(29);
pub const ROTARY_SPEAKER: EngineId = EngineId(30);
pub const PITCH_SHIFTER: EngineId = EngineId(31);
pub const DETUNE_DOUBLER: EngineId = EngineId(32);
pub const INTELLIGENT_HARMONIZER: EngineId = EngineId(33);
pub const TAPE_ECHO: EngineId = EngineId(34);
pub const DIGITAL_DELAY: EngineId = EngineId(35);
pub const MAGNETIC_DRUM_ECHO: EngineId = EngineId(36);
pub const BUCKET_BRIGADE_DELAY: EngineId = EngineId(37);
pub const BUFFER_REPEAT: EngineId = EngineId(38);
pub const PLATE_REVERB: EngineId = EngineId(39);
pub const SPRING_REVERB: EngineId = EngineId(40);
pub const CONVOLUTION_REVERB: EngineId = EngineId(41);
pub const SHIMMER_REVERB: EngineId = EngineId(42);
pub const GATED_REVERB: EngineId = EngineId(43);
pub const STEREO_WIDENER: EngineId = EngineId(44);
pub const STEREO_IMAGER: EngineId = EngineId(45);
pub const DIMENSION_EXPANDER: EngineId = EngineId(46);
pub const SPECTRAL_FREEZE: EngineId = EngineId(47);
pub const SPECTRAL_GATE: EngineId = EngineId(48);
pub const PHASED_VOCODER: EngineId = EngineId(49);
pub const GRANULAR_CLOUD: EngineId = EngineId(50);
pub const CHAOS_GENERATOR: EngineId = EngineId(51);
pub const FEEDBACK_NETWORK: EngineId = EngineId(52);
pub const MID_SIDE_PROCESSOR: EngineId = EngineId(53);
pub const GAIN_UTILITY: EngineId = EngineId(54);
pub const MONO_MAKER: EngineId = EngineId(55);
pub const PHASE_ALIGN: EngineId = EngineId(56);

/// Immutable engine catalog. Built once at startup, shared behind an Arc.
#[derive(Clone, Debug)]
pub struct EngineCatalog {
    engines: Vec<EngineDescriptor>,
    by_id: HashMap<EngineId, usize>,
    by_name: HashMap<String, usize>,
}

impl EngineCatalog {
    pub fn from_engines(engines: Vec<EngineDescriptor>) -> Self {
        let mut engines = engines;
        engines.sort_by_key(|e| e.id);
        let by_id = engines.iter().enumerate().map(|(i, e)| (e.id, i)).collect();
        let by_name = engines
            .iter()
            .enumerate()
            .map(|(i, e)| (normalize_name(&e.name), i))
            .collect();
        Self {
            engines,
            by_id,
            by_name,
        }
    }

    pub fn get(&self, id: EngineId) -> Option<&EngineDescriptor> {
        self.by_id.get(&id).map(|i| &self.engines[*i])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&EngineDescriptor> {
        self.by_name
            .get(&normalize_name(name))
            .map(|i| &self.engines[*i])
    }

    pub fn contains(&self, id: EngineId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All engines in ascending id order, the bypass engine included.
    pub fn iter(&self) -> impl Iterator<Item = &EngineDescriptor> {
        self.engines.iter()
    }

    /// All engines of a category, id order.
    pub fn in_category(&self, category: EngineCategory) -> Vec<&EngineDescriptor> {
        self.engines
            .iter()
            .filter(|e| e.category == category && !e.id.is_none())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn max_id(&self) -> EngineId {
        self.engines.last().map(|e| e.id).unwrap_or(EngineId::NONE)
    }

    pub fn category_of(&self, id: EngineId) -> Option<EngineCategory> {
        self.get(id).map(|e| e.category)
    }

    pub fn name_of(&self, id: EngineId) -> &str {
        self.get(id).map(|e| e.name.as_str()).unwrap_or("Unknown")
    }

    /// The full built-in catalog: the bypass engine plus 56 processing
    /// engines across 11 categories. Ids are contractual, they match the
    /// plugin's dropdown data and must never be renumbered.
    pub fn builtin() -> Self {
        let mut engines = Vec::with_capacity(57);
        let mut e = |id: u8, name: &str, category: EngineCategory, hint: &str, params: &[(&str, f32)]| {
            engines.push(EngineDescriptor {
                id: EngineId(id),
                name: name.to_owned(),
                category,
                hint: hint.to_owned(),
                parameters: params
                    .iter()
                    .map(|(n, d)| ParameterDescriptor::new(n, *d))
                    .collect(),
            });
        };

        e(0, "None", Utility, "empty slot, audio passes through untouched", &[]);

        // Dynamics
        e(1, "Vintage Opto Compressor", Dynamics, "smooth program-dependent optical compression", &[
            ("Gain", 0.5), ("Peak Reduction", 0.4), ("Emphasis", 0.3), ("Attack", 0.4),
            ("Release", 0.5), ("Knee", 0.6), ("Harmonics", 0.25), ("Stereo Link", 1.0),
            ("Makeup", 0.5), ("Mix", 1.0),
        ]);
        e(2, "Classic Compressor", Dynamics, "clean VCA compressor with full control", &[
            ("Threshold", 0.55), ("Ratio", 0.35), ("Attack", 0.3), ("Release", 0.45),
            ("Knee", 0.4), ("Lookahead", 0.0), ("Auto Release", 0.0), ("Sidechain Filter", 0.2),
            ("Range", 1.0), ("Makeup", 0.5), ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(3, "Transient Shaper", Dynamics, "attack and sustain sculpting without thresholds", &[
            ("Attack", 0.5), ("Sustain", 0.5), ("Speed", 0.5), ("Detect", 0.5),
            ("Smoothing", 0.4), ("Clip Guard", 0.7), ("Low Cut", 0.1), ("High Cut", 0.9),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(4, "Noise Gate", Dynamics, "tight expander gate for cleaning up noise and bleed", &[
            ("Threshold", 0.4), ("Range", 0.8), ("Attack", 0.2), ("Hold", 0.3),
            ("Release", 0.4), ("Hysteresis", 0.3), ("Sidechain Filter", 0.2), ("Lookahead", 0.0),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(5, "Mastering Limiter", Dynamics, "transparent brickwall limiting for final level", &[
            ("Ceiling", 0.95), ("Threshold", 0.7), ("Release", 0.4), ("Lookahead", 0.5),
            ("Knee", 0.3), ("Saturation", 0.1), ("Stereo Link", 1.0), ("True Peak", 1.0),
            ("Dither", 0.0), ("Character", 0.3), ("Output", 0.5), ("Mix", 1.0),
        ]);

        // EQ
        e(6, "Dynamic EQ", Eq, "three-band EQ that reacts to the signal level", &[
            ("Low Freq", 0.25), ("Low Gain", 0.5), ("Low Threshold", 0.6),
            ("Mid Freq", 0.5), ("Mid Gain", 0.5), ("Mid Threshold", 0.6),
            ("High Freq", 0.75), ("High Gain", 0.5), ("High Threshold", 0.6),
            ("Attack", 0.3), ("Release", 0.5), ("Range", 0.5), ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(7, "Parametric EQ", Eq, "surgical three-band parametric with cut filters", &[
            ("Low Freq", 0.25), ("Low Gain", 0.5), ("Low Q", 0.4),
            ("Mid Freq", 0.5), ("Mid Gain", 0.5), ("Mid Q", 0.4),
            ("High Freq", 0.75), ("High Gain", 0.5), ("High Q", 0.4),
            ("Low Cut", 0.0), ("High Cut", 1.0), ("Tilt", 0.5), ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(8, "Vintage Console EQ", Eq, "broad musical strokes with console channel color", &[
            ("Low Shelf", 0.5), ("Low Mid", 0.5), ("High Mid", 0.5), ("High Shelf", 0.5),
            ("Low Freq", 0.3), ("Mid Freq", 0.5), ("High Freq", 0.7), ("Drive", 0.2),
            ("Output", 0.5), ("Mix", 1.0),
        ]);

        // Filter
        e(9, "Ladder Filter", Filter, "fat resonant four-pole lowpass, synth style", &[
            ("Cutoff", 0.6), ("Resonance", 0.3), ("Drive", 0.2), ("Slope", 0.75),
            ("Env Amount", 0.0), ("Env Attack", 0.2), ("Env Release", 0.4), ("Keytrack", 0.0),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(10, "State Variable Filter", Filter, "clean multimode filter, lowpass to highpass morph", &[
            ("Cutoff", 0.5), ("Resonance", 0.25), ("Mode", 0.0), ("Drive", 0.1),
            ("Spread", 0.0), ("Env Amount", 0.0), ("LFO Rate", 0.3), ("LFO Depth", 0.0),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(11, "Formant Filter", Filter, "vowel-shaped resonances for talking textures", &[
            ("Vowel", 0.3), ("Morph", 0.4), ("Resonance", 0.5), ("Shift", 0.5),
            ("Size", 0.5), ("LFO Rate", 0.25), ("LFO Depth", 0.2), ("Drive", 0.15),
            ("Output", 0.5), ("Mix", 0.8),
        ]);
        e(12, "Envelope Filter", Filter, "funky auto-wah following the playing dynamics", &[
            ("Sensitivity", 0.55), ("Range", 0.6), ("Resonance", 0.5), ("Attack", 0.25),
            ("Release", 0.4), ("Mode", 0.0), ("Direction", 0.0), ("Drive", 0.1),
            ("Output", 0.5), ("Mix", 0.9),
        ]);
        e(13, "Comb Resonator", Filter, "tuned comb resonances, metallic and plucky", &[
            ("Frequency", 0.45), ("Resonance", 0.55), ("Detune", 0.1), ("Spread", 0.3),
            ("Damping", 0.4), ("Polarity", 0.0), ("Decay", 0.5), ("Drive", 0.1),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(14, "Vocal Formant Filter", Filter, "morphing vocal tract model with gender shift", &[
            ("Vowel A", 0.2), ("Vowel B", 0.6), ("Morph", 0.5), ("Resonance", 0.5),
            ("Brightness", 0.55), ("Gender", 0.5), ("LFO Rate", 0.25), ("LFO Depth", 0.15),
            ("Output", 0.5), ("Mix", 0.8),
        ]);

        // Distortion
        e(15, "Vintage Tube Preamp", Distortion, "warm tube stage from clean glow to saturated growl", &[
            ("Drive", 0.35), ("Bias", 0.5), ("Sag", 0.3), ("Low", 0.5),
            ("Mid", 0.5), ("High", 0.5), ("Presence", 0.5), ("Warmth", 0.6),
            ("Headroom", 0.6), ("Noise", 0.0), ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(16, "Wave Folder", Distortion, "west-coast folding for buzzy synthetic harmonics", &[
            ("Fold", 0.3), ("Symmetry", 0.5), ("Bias", 0.5), ("Smoothing", 0.3),
            ("Stages", 0.4), ("DC Filter", 1.0), ("Tone", 0.5), ("Drive", 0.3),
            ("Output", 0.5), ("Mix", 0.8),
        ]);
        e(17, "Harmonic Exciter", Distortion, "adds sheen and presence with synthesized harmonics", &[
            ("Amount", 0.35), ("Frequency", 0.65), ("Harmonics", 0.5), ("Warmth", 0.4),
            ("Clarity", 0.5), ("Air", 0.45), ("Focus", 0.5), ("Blend", 0.6),
            ("Output", 0.5), ("Mix", 0.7),
        ]);
        e(18, "Bit Crusher", Distortion, "lo-fi bit depth and sample rate destruction", &[
            ("Bits", 0.7), ("Downsample", 0.3), ("Jitter", 0.1), ("Dither", 0.2),
            ("Anti Alias", 0.5), ("Gate", 0.1), ("Tone", 0.5), ("Drive", 0.3),
            ("Output", 0.5), ("Mix", 0.8),
        ]);
        e(19, "Multiband Saturator", Distortion, "per-band saturation from glue to grit", &[
            ("Crossover Low", 0.3), ("Crossover High", 0.7), ("Low Drive", 0.3),
            ("Mid Drive", 0.3), ("High Drive", 0.25), ("Low Character", 0.5),
            ("Mid Character", 0.5), ("High Character", 0.5), ("Harmonics", 0.4),
            ("Compensation", 1.0), ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(20, "Muff Fuzz", Distortion, "thick sustaining fuzz wall with scooped mids", &[
            ("Sustain", 0.55), ("Tone", 0.5), ("Gate", 0.2), ("Bias", 0.5),
            ("Scoop", 0.6), ("Clip Mode", 0.0), ("Gain Stage", 0.5), ("Sag", 0.3),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(21, "Rodent Distortion", Distortion, "aggressive clipping distortion with filter bite", &[
            ("Gain", 0.55), ("Filter", 0.5), ("Clipping", 0.5), ("Presence", 0.5),
            ("Low End", 0.5), ("Character", 0.5), ("Gate", 0.1), ("Tightness", 0.5),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(22, "K-Style Overdrive", Distortion, "smooth mid-forward tube screamer overdrive", &[
            ("Drive", 0.4), ("Tone", 0.55), ("Level", 0.5), ("Clipping", 0.4),
            ("Bass", 0.5), ("Presence", 0.5), ("Voicing", 0.5), ("Sag", 0.2),
            ("Output", 0.5), ("Mix", 1.0),
        ]);

        // Modulation
        e(23, "Stereo Chorus", Modulation, "lush widening chorus, classic analog voicing", &[
            ("Rate", 0.3), ("Depth", 0.45), ("Delay", 0.4), ("Voices", 0.5),
            ("Spread", 0.7), ("Feedback", 0.15), ("Low Cut", 0.1), ("High Cut", 0.9),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(24, "Resonant Chorus", Modulation, "chorus through resonant filters, hollow and vocal", &[
            ("Rate", 0.3), ("Depth", 0.5), ("Resonance", 0.45), ("Frequency", 0.5),
            ("Voices", 0.5), ("Spread", 0.6), ("Feedback", 0.2), ("Tone", 0.5),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(25, "Analog Phaser", Modulation, "swirling allpass stages with juicy feedback", &[
            ("Rate", 0.3), ("Depth", 0.6), ("Stages", 0.5), ("Feedback", 0.4),
            ("Center", 0.5), ("Spread", 0.5), ("Stereo", 0.6), ("Waveform", 0.0),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(26, "Ring Modulator", Modulation, "metallic inharmonic sidebands, bells to robots", &[
            ("Frequency", 0.4), ("Fine Tune", 0.5), ("Waveform", 0.0), ("Tracking", 0.0),
            ("LFO Rate", 0.25), ("LFO Depth", 0.1), ("Tone", 0.5), ("Drive", 0.1),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(27, "Frequency Shifter", Modulation, "linear shifting for dissonant barberpole motion", &[
            ("Shift", 0.5), ("Fine", 0.5), ("Direction", 0.0), ("Feedback", 0.2),
            ("Spread", 0.4), ("LFO Rate", 0.2), ("LFO Depth", 0.0), ("Tone", 0.5),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(28, "Harmonic Tremolo", Modulation, "vintage brownface trem splitting highs and lows", &[
            ("Rate", 0.4), ("Depth", 0.6), ("Crossover", 0.5), ("Harmonics", 0.5),
            ("Phase", 0.5), ("Waveform", 0.0), ("Sync", 0.0), ("Stereo", 0.5),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(29, "Classic Tremolo", Modulation, "straight amplitude tremolo, smooth to choppy", &[
            ("Rate", 0.45), ("Depth", 0.5), ("Waveform", 0.0), ("Symmetry", 0.5),
            ("Phase", 0.5), ("Stereo", 0.3), ("Sync", 0.0), ("Smoothing", 0.5),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(30, "Rotary Speaker", Modulation, "doppler swirl of a spinning horn and drum cabinet", &[
            ("Speed", 0.5), ("Acceleration", 0.5), ("Horn Level", 0.6), ("Drum Level", 0.5),
            ("Distance", 0.5), ("Drive", 0.3), ("Doppler", 0.6), ("Stereo Width", 0.7),
            ("Cabinet", 0.5), ("Slow Fast", 0.0), ("Output", 0.5), ("Mix", 1.0),
        ]);

        // Pitch
        e(31, "Pitch Shifter", Pitch, "clean transposition up or down with formant control", &[
            ("Pitch", 0.5), ("Fine", 0.5), ("Formant", 0.5), ("Window", 0.5),
            ("Glide", 0.1), ("Spread", 0.2), ("Tone", 0.5), ("Quality", 0.7),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(32, "Detune Doubler", Pitch, "micro-detuned doubling for instant width", &[
            ("Detune", 0.3), ("Delay", 0.25), ("Spread", 0.7), ("Drift", 0.2),
            ("Voices", 0.5), ("Tone", 0.5), ("Humanize", 0.3), ("Width", 0.7),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(33, "Intelligent Harmonizer", Pitch, "scale-aware harmony voices over the input", &[
            ("Interval", 0.58), ("Key", 0.0), ("Scale", 0.0), ("Voices", 0.3),
            ("Spread", 0.5), ("Humanize", 0.3), ("Formant", 0.5), ("Glide", 0.1),
            ("Tone", 0.5), ("Level", 0.6), ("Output", 0.5), ("Mix", 0.5),
        ]);

        // Delay
        e(34, "Tape Echo", Delay, "warm wobbly tape delay with age and saturation", &[
            ("Time", 0.45), ("Feedback", 0.35), ("Wow", 0.2), ("Flutter", 0.15),
            ("Saturation", 0.3), ("Age", 0.25), ("Tone", 0.5), ("Head Spacing", 0.4),
            ("Spread", 0.4), ("Sync", 0.0), ("Output", 0.5), ("Mix", 0.35),
        ]);
        e(35, "Digital Delay", Delay, "pristine repeats with ping-pong and ducking", &[
            ("Time", 0.4), ("Feedback", 0.35), ("Ping Pong", 0.0), ("Spread", 0.5),
            ("High Cut", 0.8), ("Low Cut", 0.1), ("Modulation", 0.1), ("Ducking", 0.0),
            ("Sync", 0.0), ("Freeze", 0.0), ("Output", 0.5), ("Mix", 0.35),
        ]);
        e(36, "Magnetic Drum Echo", Delay, "dark vintage drum echo with multiple heads", &[
            ("Time", 0.5), ("Feedback", 0.4), ("Heads", 0.5), ("Drum Age", 0.4),
            ("Saturation", 0.35), ("Wobble", 0.25), ("Tone", 0.45), ("Spread", 0.4),
            ("Output", 0.5), ("Mix", 0.35),
        ]);
        e(37, "Bucket Brigade Delay", Delay, "murky analog BBD repeats that degrade and bloom", &[
            ("Time", 0.4), ("Feedback", 0.4), ("Clock Noise", 0.2), ("Companding", 0.5),
            ("Modulation", 0.25), ("Tone", 0.4), ("Age", 0.3), ("Spread", 0.3),
            ("Output", 0.5), ("Mix", 0.35),
        ]);
        e(38, "Buffer Repeat", Delay, "glitchy sliced buffer stutters and rolls", &[
            ("Size", 0.4), ("Rate", 0.5), ("Pitch", 0.5), ("Reverse", 0.0),
            ("Stutter", 0.3), ("Probability", 0.5), ("Sync", 1.0), ("Feedback", 0.2),
            ("Output", 0.5), ("Mix", 0.5),
        ]);

        // Reverb
        e(39, "Plate Reverb", Reverb, "dense smooth studio plate shimmer", &[
            ("Size", 0.5), ("Decay", 0.5), ("Damping", 0.5), ("Predelay", 0.2),
            ("Diffusion", 0.7), ("Modulation", 0.2), ("Low Cut", 0.15), ("High Cut", 0.8),
            ("Output", 0.5), ("Mix", 0.3),
        ]);
        e(40, "Spring Reverb", Reverb, "boingy vintage amp-style spring tank", &[
            ("Tension", 0.5), ("Decay", 0.5), ("Boing", 0.4), ("Damping", 0.4),
            ("Predelay", 0.1), ("Drip", 0.45), ("Tone", 0.5), ("Drive", 0.2),
            ("Output", 0.5), ("Mix", 0.3),
        ]);
        e(41, "Convolution Reverb", Reverb, "sampled real spaces from rooms to cathedrals", &[
            ("Space", 0.5), ("Size", 0.5), ("Decay", 0.5), ("Predelay", 0.15),
            ("Damping", 0.4), ("Stretch", 0.5), ("Reverse", 0.0), ("Low Cut", 0.15),
            ("Output", 0.5), ("Mix", 0.3),
        ]);
        e(42, "Shimmer Reverb", Reverb, "ethereal octave-up regenerating reverb wash", &[
            ("Size", 0.65), ("Decay", 0.6), ("Shimmer", 0.5), ("Pitch", 0.75),
            ("Damping", 0.35), ("Predelay", 0.2), ("Diffusion", 0.7), ("Modulation", 0.3),
            ("Feedback", 0.4), ("High Cut", 0.8), ("Output", 0.5), ("Mix", 0.35),
        ]);
        e(43, "Gated Reverb", Reverb, "explosive 80s reverb cut dead by a gate", &[
            ("Size", 0.6), ("Decay", 0.5), ("Gate Time", 0.35), ("Threshold", 0.5),
            ("Damping", 0.4), ("Predelay", 0.1), ("Diffusion", 0.65), ("Shape", 0.5),
            ("Output", 0.5), ("Mix", 0.4),
        ]);

        // Spatial
        e(44, "Stereo Widener", Spatial, "wider image with mono-safe bass", &[
            ("Width", 0.6), ("Bass Mono", 0.5), ("Crossover", 0.3), ("Haas Delay", 0.2),
            ("Phase", 0.0), ("Tone", 0.5), ("Safety", 1.0), ("Balance", 0.5),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(45, "Stereo Imager", Spatial, "per-band width, rotation and asymmetry control", &[
            ("Low Width", 0.4), ("Mid Width", 0.55), ("High Width", 0.65),
            ("Crossover Low", 0.3), ("Crossover High", 0.7), ("Rotation", 0.5),
            ("Asymmetry", 0.5), ("Center Level", 0.5), ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(46, "Dimension Expander", Spatial, "diffuse 3D space without obvious reverb tail", &[
            ("Size", 0.5), ("Amount", 0.5), ("Depth", 0.5), ("Movement", 0.3),
            ("Brightness", 0.5), ("Crossfeed", 0.4), ("Density", 0.6), ("Tone", 0.5),
            ("Output", 0.5), ("Mix", 0.6),
        ]);

        // Special
        e(47, "Spectral Freeze", Special, "freezes the spectrum into an endless pad", &[
            ("Freeze", 0.0), ("Blend", 0.5), ("Smear", 0.5), ("Spectral Shift", 0.5),
            ("Tilt", 0.5), ("Resolution", 0.6), ("Decay", 0.7), ("Gate", 0.0),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(48, "Spectral Gate", Special, "per-bin gating for ghostly filtered textures", &[
            ("Threshold", 0.5), ("Ratio", 0.6), ("Attack", 0.3), ("Release", 0.5),
            ("Resolution", 0.6), ("Tilt", 0.5), ("Range", 0.7), ("Smoothing", 0.4),
            ("Output", 0.5), ("Mix", 0.8),
        ]);
        e(49, "Phased Vocoder", Special, "robotic resynthesis with time smear and pitch", &[
            ("Bands", 0.6), ("Formant", 0.5), ("Pitch", 0.5), ("Stretch", 0.5),
            ("Smear", 0.3), ("Attack", 0.3), ("Release", 0.4), ("Unvoiced", 0.4),
            ("Output", 0.5), ("Mix", 0.7),
        ]);
        e(50, "Granular Cloud", Special, "clouds of micro grains, from texture to chaos", &[
            ("Grain Size", 0.4), ("Density", 0.5), ("Position", 0.5), ("Spray", 0.3),
            ("Pitch", 0.5), ("Pitch Spray", 0.2), ("Reverse", 0.2), ("Stretch", 0.5),
            ("Texture", 0.5), ("Feedback", 0.25), ("Spread", 0.6), ("Freeze", 0.0),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(51, "Chaos Generator", Special, "unpredictable modulation chaos injected anywhere", &[
            ("Rate", 0.4), ("Depth", 0.4), ("Type", 0.0), ("Smoothing", 0.5),
            ("Target", 0.0), ("Seed", 0.5), ("Sync", 0.0), ("Spread", 0.5),
            ("Output", 0.5), ("Mix", 0.5),
        ]);
        e(52, "Feedback Network", Special, "self-oscillating delay lattice on the edge of control", &[
            ("Feedback", 0.45), ("Spread", 0.5), ("Diffusion", 0.5), ("Modulation", 0.3),
            ("Damping", 0.5), ("Pitch", 0.5), ("Freeze", 0.0), ("Tone", 0.5),
            ("Output", 0.5), ("Mix", 0.4),
        ]);

        // Utility
        e(53, "Mid-Side Processor", Utility, "independent mid and side shaping", &[
            ("Mid Level", 0.5), ("Side Level", 0.5), ("Mid EQ", 0.5), ("Side EQ", 0.5),
            ("Width", 0.5), ("Bass Mono", 0.3), ("Solo Mode", 0.0), ("Balance", 0.5),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(54, "Gain Utility", Utility, "clean gain, balance and phase housekeeping", &[
            ("Gain", 0.5), ("Left Gain", 0.5), ("Right Gain", 0.5), ("Mid Gain", 0.5),
            ("Side Gain", 0.5), ("Phase L", 0.0), ("Phase R", 0.0), ("Channel Mode", 0.0),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(55, "Mono Maker", Utility, "folds the low end to mono below a set frequency", &[
            ("Frequency", 0.3), ("Slope", 0.5), ("Mode", 0.0), ("Bass Focus", 0.5),
            ("Width Above", 0.6), ("Low Rotate", 0.5), ("Balance", 0.5), ("Tone", 0.5),
            ("Output", 0.5), ("Mix", 1.0),
        ]);
        e(56, "Phase Align", Utility, "per-band phase rotation to line up sources", &[
            ("Low Phase", 0.5), ("Low Mid Phase", 0.5), ("High Mid Phase", 0.5),
            ("High Phase", 0.5), ("Crossover Low", 0.25), ("Crossover Mid", 0.5),
            ("Crossover High", 0.75), ("Reference", 0.0), ("Output", 0.5), ("Mix", 1.0),
        ]);

        Self::from_engines(engines)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
