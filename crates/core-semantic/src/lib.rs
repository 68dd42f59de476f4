//! Semantic layer: region classification, text-to-region spatial
//! association, and BOQ-description-to-label-text fuzzy matching.

pub mod classifier;
pub mod semantic_matcher;
pub mod text_associator;

pub use classifier::{classify, DEFAULT_MIN_CONFIDENCE};
pub use semantic_matcher::{match_labels, normalize, LabelCandidate, DEFAULT_THRESHOLD};
pub use text_associator::{associate_texts, DEFAULT_MAX_DISTANCE};
