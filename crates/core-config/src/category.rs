//! Semantic category keyword tables used by the region classifier.
//!
//! Grounded in `semantic_classifier.py`'s `SemanticCategory` class: each
//! category carries vocabulary keywords (for text scoring), layer-name
//! prefixes (strong signal) and layer-name substrings (medium signal).

use core_model::SemanticClass;

#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub class: SemanticClass,
    pub keywords: Vec<&'static str>,
    pub layer_prefixes: Vec<&'static str>,
    pub layer_contains: Vec<&'static str>,
}

/// The five scorable categories, in the original's declaration order.
/// `SemanticClass::Unknown` has no spec: it is the default when every
/// category scores below the confidence floor.
pub fn all_categories() -> Vec<CategorySpec> {
    vec![
        CategorySpec {
            class: SemanticClass::Floor,
            keywords: vec![
                "losa", "sobrelosa", "piso", "pavimento", "floor", "slab", "mortero",
                "radier", "contrapiso", "carpet", "tile",
            ],
            layer_prefixes: vec!["FA_0", "FLOOR", "PISO", "LOSA"],
            layer_contains: vec!["pavimento", "piso", "losa"],
        },
        CategorySpec {
            class: SemanticClass::Wall,
            keywords: vec![
                "muro", "muros", "wall", "walls", "tabique", "sobretabique",
                "partition", "divisor", "panel", "mamposteria",
            ],
            layer_prefixes: vec!["FA_MURO", "WALL", "MURO", "TAB"],
            layer_contains: vec!["muro", "tabique", "wall"],
        },
        CategorySpec {
            class: SemanticClass::Ceiling,
            keywords: vec![
                "cielo", "cielos", "ceiling", "raso", "plafon", "volcanita", "soffit",
                "cenefa", "falso cielo",
            ],
            layer_prefixes: vec!["FA_CIELO", "CEILING", "CIELO"],
            layer_contains: vec!["cielo", "raso", "ceiling", "volcanita"],
        },
        CategorySpec {
            class: SemanticClass::Fixture,
            keywords: vec![
                "puerta", "door", "ventana", "window", "mobiliario", "furniture",
                "sanitario", "fixture", "luminaria", "outlet", "enchufe",
            ],
            layer_prefixes: vec!["DOOR", "WINDOW", "FURNITURE", "FIXTURE"],
            layer_contains: vec!["puerta", "ventana", "mobiliario"],
        },
        CategorySpec {
            class: SemanticClass::Annotation,
            keywords: vec![
                "text", "dim", "dimension", "cota", "nota", "note", "label", "seccion",
                "section", "corte", "reference", "grid",
            ],
            layer_prefixes: vec!["DIM", "TEXT", "NOTE", "ANNO"],
            layer_contains: vec!["text", "dim", "cota", "nota", "seccion"],
        },
    ]
}
