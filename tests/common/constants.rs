//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When test data changes (corpus entry ids, canned prompts, etc.),
//! update only this file.

// ============================================================================
// Timeouts
// ============================================================================

/// Per-request timeout for the test HTTP client
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How long TestServer::spawn waits for the server to answer
pub const READY_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Test Corpus Entries
// ============================================================================

/// Corpus entry built around tape echo and tube saturation
pub const CORPUS_WARM_TAPE_ID: &str = "corpus-warm-tape";

/// Corpus entry built around shimmer reverb and chorus
pub const CORPUS_SHIMMER_PAD_ID: &str = "corpus-shimmer-pad";

/// Corpus entry built around gated drums processing
pub const CORPUS_GATED_DRUMS_ID: &str = "corpus-gated-drums";

/// A parameter value planted in every fixture corpus preset. Far enough
/// from the 0.5 default-synthesis midpoint that a response carrying it
/// proves the preset was adapted from the corpus, not synthesized.
pub const CORPUS_MARKER_VALUE: f32 = 0.42;

// ============================================================================
// Canned Prompts
// ============================================================================

/// Short prompt (under the refinement word threshold) with no character
/// triggers and no engine mentions
pub const PLAIN_PROMPT: &str = "nostalgic evening keys";

/// Prompt naming two engines outright
pub const TWO_REVERBS_PROMPT: &str = "ambient pad with shimmer reverb and spring reverb";

/// Prompt that routes to the "molten" character profile
pub const HOT_COALS_PROMPT: &str = "the sound of glowing hot coals";
