//! Maps a BOQ description to candidate label texts via exact, synonym, and
//! fuzzy (sequence-similarity) strategies, tried in that order.

use core_config::synonyms_of;
use regex::Regex;
use std::sync::OnceLock;
use strsim::normalized_levenshtein;

pub const EXACT_SCORE: f64 = 1.0;
pub const SYNONYM_SCORE: f64 = 0.95;
pub const DEFAULT_THRESHOLD: f64 = 0.5;
const WORD_OVERLAP_BONUS_CAP: f64 = 0.3;

fn non_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

/// Lowercase, strip non-word characters, collapse whitespace.
pub fn normalize(raw: &str) -> String {
    let stripped = non_word_re().replace_all(&raw.to_lowercase(), "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
pub struct LabelCandidate {
    pub label: String,
    pub score: f64,
}

/// Score `description` against every candidate `label`, returning matches
/// with score >= `threshold`, sorted descending.
pub fn match_labels(description: &str, labels: &[String], threshold: f64) -> Vec<LabelCandidate> {
    let normalized_description = normalize(description);
    let mut out = Vec::new();

    for label in labels {
        let normalized_label = normalize(label);
        if normalized_label.is_empty() {
            continue;
        }

        let score = if normalized_label == normalized_description {
            EXACT_SCORE
        } else if is_synonym_match(&normalized_description, &normalized_label) {
            SYNONYM_SCORE
        } else {
            fuzzy_score(&normalized_description, &normalized_label)
        };

        if score >= threshold {
            out.push(LabelCandidate { label: label.clone(), score });
        }
    }

    out.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());
    out
}

fn is_synonym_match(description: &str, label: &str) -> bool {
    description.split_whitespace().any(|word| {
        let family = synonyms_of(word);
        !family.is_empty() && label.split_whitespace().any(|label_word| family.contains(&label_word))
    })
}

fn fuzzy_score(description: &str, label: &str) -> f64 {
    let base = normalized_levenshtein(description, label);
    let bonus = word_overlap_bonus(description, label);
    (base + bonus).min(1.0)
}

fn word_overlap_bonus(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let shared = words_a.intersection(&words_b).count();
    let ratio = shared as f64 / words_a.len().max(words_b.len()) as f64;
    ratio * WORD_OVERLAP_BONUS_CAP
}
