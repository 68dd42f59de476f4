//! Per-layer orientation classification (spec.md §4.1, "Layer metadata"):
//! VERTICAL if any vertical entity is present, HORIZONTAL if >=80% of the
//! layer's entities are horizontal, otherwise MIXED; UNKNOWN when no entity
//! on the layer carried an orientation signal at all.

use core_model::{LayerMetadata, LayerOrientation};

use crate::raw::{LayerZSignal, RawExtraction};

pub fn build_layer_metadata(raw: &RawExtraction, is_included: impl Fn(&str) -> bool) -> Vec<LayerMetadata> {
    let mut names: Vec<&String> = raw.layer_entity_counts.keys().collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let entity_count = raw.layer_entity_counts.get(name).copied().unwrap_or(0);
            let signal = raw.layer_z_signal.get(name).copied().unwrap_or_default();
            LayerMetadata {
                name: name.clone(),
                entity_count,
                orientation: classify(signal, entity_count),
                included: is_included(name),
            }
        })
        .collect()
}

fn classify(signal: LayerZSignal, entity_count: usize) -> LayerOrientation {
    let classified = signal.horizontal_entities + signal.vertical_entities;
    if classified == 0 {
        return LayerOrientation::Unknown;
    }
    if signal.vertical_entities > 0 {
        return LayerOrientation::Vertical;
    }
    let denominator = entity_count.max(classified) as f64;
    if signal.horizontal_entities as f64 / denominator >= 0.8 {
        LayerOrientation::Horizontal
    } else {
        LayerOrientation::Mixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_vertical_entity_makes_the_layer_vertical() {
        let signal = LayerZSignal {
            horizontal_entities: 9,
            vertical_entities: 1,
        };
        assert_eq!(classify(signal, 10), LayerOrientation::Vertical);
    }

    #[test]
    fn mostly_horizontal_is_horizontal() {
        let signal = LayerZSignal {
            horizontal_entities: 9,
            vertical_entities: 0,
        };
        assert_eq!(classify(signal, 10), LayerOrientation::Horizontal);
    }

    #[test]
    fn minority_horizontal_among_unclassified_entities_is_mixed() {
        let signal = LayerZSignal {
            horizontal_entities: 3,
            vertical_entities: 0,
        };
        assert_eq!(classify(signal, 10), LayerOrientation::Mixed);
    }

    #[test]
    fn no_signal_is_unknown() {
        assert_eq!(classify(LayerZSignal::default(), 5), LayerOrientation::Unknown);
    }
}
