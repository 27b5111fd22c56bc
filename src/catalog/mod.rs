mod catalog;
mod choice_map;
mod engine;
mod load;

pub use catalog::EngineCatalog;
pub use catalog::{
    ANALOG_PHASER, BIT_CRUSHER, BUCKET_BRIGADE_DELAY, BUFFER_REPEAT, CHAOS_GENERATOR,
    CLASSIC_COMPRESSOR, CLASSIC_TREMOLO, COMB_RESONATOR, CONVOLUTION_REVERB, DETUNE_DOUBLER,
    DIGITAL_DELAY, DIMENSION_EXPANDER, DYNAMIC_EQ, ENVELOPE_FILTER, FEEDBACK_NETWORK,
    FORMANT_FILTER, FREQUENCY_SHIFTER, GAIN_UTILITY, GATED_REVERB, GRANULAR_CLOUD,
    HARMONIC_EXCITER, HARMONIC_TREMOLO, INTELLIGENT_HARMONIZER, K_STYLE_OVERDRIVE,
    LADDER_FILTER, MAGNETIC_DRUM_ECHO, MASTERING_LIMITER, MID_SIDE_PROCESSOR, MONO_MAKER,
    MUFF_FUZZ, MULTIBAND_SATURATOR, NOISE_GATE, PARAMETRIC_EQ, PHASED_VOCODER, PHASE_ALIGN,
    PITCH_SHIFTER, PLATE_REVERB, RESONANT_CHORUS, RING_MODULATOR, RODENT_DISTORTION,
    ROTARY_SPEAKER, SHIMMER_REVERB, SPECTRAL_FREEZE, SPECTRAL_GATE, SPRING_REVERB,
    STATE_VARIABLE_FILTER, STEREO_CHORUS, STEREO_IMAGER, STEREO_WIDENER, TAPE_ECHO,
    TRANSIENT_SHAPER, VINTAGE_CONSOLE_EQ, VINTAGE_OPTO_COMPRESSOR, VINTAGE_TUBE_PREAMP,
    VOCAL_FORMANT_FILTER, WAVE_FOLDER,
};
pub use choice_map::{choice_index_for, engine_id_for, CHOICE_ORDER};
pub use engine::{EngineCategory, EngineDescriptor, EngineId, ParameterDescriptor};
#[allow(unused_imports)] // Used by main.rs and cli-corpus
pub use load::load_catalog;
