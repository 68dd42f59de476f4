//! DXF entity extraction (spec.md §4.1): parses the file, explodes block
//! references with full transform composition, flattens to primitive
//! records, infers the drawing's unit, and scales everything into meters.

mod block_metadata;
mod blocks;
mod chords;
mod convert;
mod hatch_boundary;
mod layer_stats;
mod raw;
mod units;

use std::io::Cursor;

use dxf::Drawing;

use core_model::{
    BlockMetadata, BlockReference, HatchRegion, LayerMetadata, PipelineError, Segment, TextBlock,
    UnitConfidence, UnitHint,
};

pub use units::HeaderUnitCode;

/// Axis-aligned drawing bounds, in whatever unit `bounds` is expressed in at
/// the call site (meters, post-scaling, in `ExtractionOutput`).
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn touch(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn is_valid(&self) -> bool {
        self.min_x.is_finite() && self.max_x.is_finite()
    }

    fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Default bounds spec.md §4.1 specifies when no geometry was found.
    fn default_empty_bounds() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        }
    }
}

#[derive(Debug)]
pub struct ExtractionOutput {
    pub segments: Vec<Segment>,
    pub texts: Vec<TextBlock>,
    pub block_refs: Vec<BlockReference>,
    pub hatch_regions: Vec<HatchRegion>,
    pub layer_set: Vec<String>,
    pub bounds: Bounds,
    pub layer_metadata: Vec<LayerMetadata>,
    pub block_metadata: Vec<BlockMetadata>,
    pub unit_factor: f64,
    pub detected_unit: String,
    pub unit_confidence: UnitConfidence,
    pub warnings: Vec<String>,
}

/// Parse `dxf_bytes`, explode blocks, infer units and return every
/// primitive scaled into meters. `is_whitelisted_layer` lets the caller
/// (the layer filter, spec.md §4.2) report which layers survive without
/// this crate depending on `core-config`'s keyword tables.
pub fn extract(
    dxf_bytes: &[u8],
    hint_unit: Option<UnitHint>,
    is_whitelisted_layer: impl Fn(&str) -> bool,
) -> Result<ExtractionOutput, PipelineError> {
    let drawing = Drawing::load(&mut Cursor::new(dxf_bytes))
        .map_err(|e| PipelineError::InvalidCad(e.to_string()))?;

    let block_defs = blocks::collect_block_defs(&drawing);
    let mut raw = raw::RawExtraction::default();
    blocks::explode_entities(drawing.entities(), &block_defs, &mut raw);

    let mut warnings = Vec::new();
    if !raw.unsupported_entities.is_empty() {
        tracing::debug!(count = raw.unsupported_entities.len(), "entities skipped during extraction");
    }

    let mut raw_bounds = Bounds::empty();
    for s in &raw.segments {
        raw_bounds.touch(s.start.x, s.start.y);
        raw_bounds.touch(s.end.x, s.end.y);
    }
    for t in &raw.texts {
        raw_bounds.touch(t.position.x, t.position.y);
    }
    for h in &raw.hatch_regions {
        for p in &h.boundary {
            raw_bounds.touch(p.x, p.y);
        }
    }

    let header_code = units::HeaderUnitCode::from_insunits(drawing.header.default_drawing_units as i16);
    let raw_extents_size = raw_bounds.is_valid().then(|| (raw_bounds.width(), raw_bounds.height()));
    let decision = units::infer_unit(header_code, hint_unit, raw_extents_size);

    tracing::info!(
        factor = decision.factor,
        label = %decision.label,
        "unit inference complete"
    );

    if decision.confidence == UnitConfidence::Low {
        warnings.push(format!("unit inference is low-confidence: {}", decision.label));
    }

    let factor = decision.factor;
    let segments: Vec<Segment> = raw
        .segments
        .into_iter()
        .map(|s| Segment::new(scale_point(s.start, factor), scale_point(s.end, factor), s.layer, s.entity_type))
        .collect();

    let texts: Vec<TextBlock> = raw
        .texts
        .into_iter()
        .map(|t| TextBlock::new(t.content, scale_point(t.position, factor), t.layer, t.height * factor))
        .collect();

    let block_refs: Vec<BlockReference> = raw
        .block_refs
        .into_iter()
        .map(|mut r| {
            r.transform.translation = scale_point(r.transform.translation, factor);
            r
        })
        .collect();

    let hatch_regions: Vec<HatchRegion> = raw
        .hatch_regions
        .into_iter()
        .map(|h| HatchRegion {
            boundary: h.boundary.into_iter().map(|p| scale_point(p, factor)).collect(),
            layer: h.layer,
            area: h.area * factor * factor,
            area_is_shoelace_fallback: h.area_is_shoelace_fallback,
        })
        .collect();

    let mut scaled_bounds = Bounds::empty();
    for s in &segments {
        scaled_bounds.touch(s.start.x, s.start.y);
        scaled_bounds.touch(s.end.x, s.end.y);
    }
    for t in &texts {
        scaled_bounds.touch(t.position.x, t.position.y);
    }
    let bounds = if scaled_bounds.is_valid() {
        scaled_bounds
    } else {
        Bounds::default_empty_bounds()
    };

    let mut layer_set: Vec<String> = raw.layer_entity_counts.keys().cloned().collect();
    layer_set.sort();

    let layer_metadata = layer_stats::build_layer_metadata(&raw, &is_whitelisted_layer);
    let block_metadata = block_metadata::build_block_metadata(&block_defs, &block_refs);

    Ok(ExtractionOutput {
        segments,
        texts,
        block_refs,
        hatch_regions,
        layer_set,
        bounds,
        layer_metadata,
        block_metadata,
        unit_factor: factor,
        detected_unit: decision.label,
        unit_confidence: decision.confidence,
        warnings,
    })
}

fn scale_point(p: core_model::Point, factor: f64) -> core_model::Point {
    core_model::Point::new(p.x * factor, p.y * factor)
}
