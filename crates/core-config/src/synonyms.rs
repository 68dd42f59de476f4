//! Construction-term synonym table for the BOQ description semantic matcher.
//!
//! Grounded in `semantic_matcher.py`'s `SYNONYMS` dict: a canonical Spanish
//! construction term mapped to its common synonyms (Spanish and English,
//! including common English-language CAD layer abbreviations).

/// `(canonical, synonyms)` pairs. Looking a term up returns the canonical
/// plus every synonym, matching `SemanticMatcher.get_synonyms`.
pub fn synonym_table() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![
        ("muro", vec!["tabique", "murete", "wall", "pantalla", "hormigon"]),
        ("losa", vec!["radier", "sobrelosa", "slab", "floor", "piso", "pavimento"]),
        ("cielo", vec!["ceiling", "falso", "volcanita", "yeso"]),
        ("puerta", vec!["door", "acceso", "porton"]),
        ("ventana", vec!["window", "vidrio", "cristal"]),
        ("impermeabilizacion", vec!["membrana", "waterproof", "aislacion"]),
        ("estuco", vec!["revestimiento", "mortero", "plaster"]),
        ("ceramica", vec!["porcelanato", "baldoza", "tile"]),
    ]
}

/// All terms (canonical and synonym) that belong to the same family as
/// `term`, including `term`'s canonical form, or empty if unknown.
pub fn synonyms_of(term: &str) -> Vec<&'static str> {
    let normalized = term.trim().to_lowercase();
    for (canonical, syns) in synonym_table() {
        if normalized == canonical || syns.iter().any(|s| *s == normalized) {
            let mut out = vec![canonical];
            out.extend(syns);
            return out;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonym_lookup_is_bidirectional() {
        assert!(synonyms_of("tabique").contains(&"muro"));
        assert!(synonyms_of("muro").contains(&"tabique"));
    }

    #[test]
    fn unknown_term_has_no_synonyms() {
        assert!(synonyms_of("escalera").is_empty());
    }
}
