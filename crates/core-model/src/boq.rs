//! Bill-of-quantities line items and the unit families they are measured in.

/// The physical quantity a unit string represents, used to decide which
/// region property (area, perimeter/length, count) satisfies a BOQ item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Area,
    Linear,
    Count,
}

impl UnitFamily {
    /// Best-effort classification of a raw unit string (e.g. "m2", "ml",
    /// "un", "pcs"). Falls back to `Count` when unrecognized, matching the
    /// original's conservative default.
    pub fn from_unit_str(raw: &str) -> UnitFamily {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "m2" | "m²" | "sqm" | "sq.m" | "sq m" => UnitFamily::Area,
            "m" | "ml" | "lm" | "linear m" | "m.l." => UnitFamily::Linear,
            "un" | "und" | "unid" | "unit" | "units" | "pcs" | "ea" => UnitFamily::Count,
            _ => UnitFamily::Count,
        }
    }
}

/// A single row from the bill of quantities to be resolved against the
/// drawing.
#[derive(Debug, Clone)]
pub struct BOQItem {
    pub id: u64,
    pub description: String,
    pub unit: String,
    pub unit_family: UnitFamily,
    pub expected_qty: Option<f64>,
}

impl BOQItem {
    pub fn normalized_description(&self) -> String {
        self.description.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_family_recognizes_area_units() {
        assert_eq!(UnitFamily::from_unit_str("M2"), UnitFamily::Area);
        assert_eq!(UnitFamily::from_unit_str(" m² "), UnitFamily::Area);
    }

    #[test]
    fn unit_family_defaults_to_count() {
        assert_eq!(UnitFamily::from_unit_str("widget"), UnitFamily::Count);
    }
}
