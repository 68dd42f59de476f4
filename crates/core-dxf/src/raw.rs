//! Pre-scale primitive records: the output of entity conversion and block
//! explosion, before unit conversion is applied (spec.md §4.1).

use core_model::{BlockReference, HatchRegion, Segment, TextBlock};

/// Everything extracted from the drawing before coordinates are scaled into
/// meters. `z_deltas` records, per layer, the entity Z-extent seen so the
/// layer-orientation pass can classify HORIZONTAL vs VERTICAL without a
/// second traversal.
#[derive(Debug, Default)]
pub struct RawExtraction {
    pub segments: Vec<Segment>,
    pub texts: Vec<TextBlock>,
    pub block_refs: Vec<BlockReference>,
    pub hatch_regions: Vec<HatchRegion>,
    pub layer_entity_counts: std::collections::HashMap<String, usize>,
    pub layer_z_signal: std::collections::HashMap<String, LayerZSignal>,
    pub unsupported_entities: Vec<String>,
}

/// Per-layer accumulator feeding the HORIZONTAL/VERTICAL/MIXED/UNKNOWN
/// orientation classification (spec.md §4.1, "Layer metadata").
#[derive(Debug, Default, Clone, Copy)]
pub struct LayerZSignal {
    pub horizontal_entities: usize,
    pub vertical_entities: usize,
}

impl RawExtraction {
    pub fn record_layer_entity(&mut self, layer: &str) {
        *self.layer_entity_counts.entry(layer.to_string()).or_insert(0) += 1;
    }

    pub fn record_orientation(&mut self, layer: &str, is_vertical: bool) {
        let signal = self.layer_z_signal.entry(layer.to_string()).or_default();
        if is_vertical {
            signal.vertical_entities += 1;
        } else {
            signal.horizontal_entities += 1;
        }
    }
}
