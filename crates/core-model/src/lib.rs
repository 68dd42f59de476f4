//! Shared data model for the drawing-to-bill-of-quantities pipeline.
//!
//! Every other crate in the workspace depends on this one for its vocabulary
//! of points, segments, regions, matches and the run-level error/deadline
//! types; it has no dependency on geometry or spatial crates itself so that
//! it stays cheap to pull into `core-config` and the binary crate alike.

pub mod block;
pub mod boq;
pub mod deadline;
pub mod error;
pub mod geometry;
pub mod hatch;
pub mod matching;
pub mod options;
pub mod region;
pub mod result;
pub mod text;

pub use block::{BlockAreaSource, BlockMetadata, BlockReference, Transform};
pub use boq::{BOQItem, UnitFamily};
pub use deadline::{CancellationToken, Deadline};
pub use error::PipelineError;
pub use geometry::{EntityType, Point, Segment};
pub use hatch::HatchRegion;
pub use matching::{Match, SpatialStrategy, UnmatchedItem};
pub use options::{Options, UnitHint};
pub use region::{Region, RegionKind, Resolution, SemanticClass};
pub use result::{AnalysisResult, LayerMetadata, LayerOrientation, UnitConfidence};
pub use text::{AssociatedText, TextBlock, TextRelationship};
