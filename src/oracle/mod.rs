mod corpus;
mod features;
mod index;
mod oracle;

pub use corpus::{CorpusEntry, CorpusFile, PresetCorpus, Problem as CorpusProblem};
pub use features::{blueprint_features, feature_vector, FEATURE_DIM};
pub use index::{FlatIndex, IndexError};
pub use oracle::{BlendError, Oracle, OracleConfig, ScoredPreset};
