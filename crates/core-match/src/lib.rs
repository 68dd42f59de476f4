//! BOQ-to-drawing matching: spatial strategy resolution, quantity
//! computation, sanity checks, and confidence scoring, built on top of
//! `core-region`'s extracted regions and `core-semantic`'s text matching.

mod confidence;
mod fallback_estimator;
mod height;
mod matcher;
mod quantity;
mod sanity;
mod strategy;

pub use confidence::{score as confidence_score, ConfidenceInput};
pub use matcher::match_boq_items;
pub use quantity::{compute_quantity, QuantityResult};
pub use sanity::{run_all as run_sanity_checks, Finding, Severity};
