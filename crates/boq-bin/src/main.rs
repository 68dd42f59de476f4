//! `boq` entrypoint: run one drawing against one bill of quantities and
//! print the resolved matches.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use core_config::MatcherConfig;
use core_model::{BOQItem, CancellationToken, UnitFamily};
use serde::Deserialize;
use serde_json::json;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "boq", version, about = "DXF-to-bill-of-quantities analyzer")]
struct Args {
    /// Path to the DXF drawing to analyze.
    dxf: PathBuf,

    /// Path to a JSON array of bill-of-quantities line items.
    boq: PathBuf,

    /// Optional TOML file overriding `Options` defaults.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Directory the run log is written to.
    #[arg(long = "log-dir", default_value = ".")]
    log_dir: PathBuf,

    /// Emit compact single-line JSON instead of pretty-printed JSON.
    #[arg(long)]
    compact: bool,
}

/// On-disk shape of one bill-of-quantities row. `core_model::BOQItem` has
/// no `Deserialize` impl of its own since it carries a derived
/// `unit_family` field that the file format doesn't supply directly.
#[derive(Debug, Deserialize)]
struct BoqItemDto {
    id: u64,
    description: String,
    unit: String,
    #[serde(default)]
    expected_qty: Option<f64>,
}

impl From<BoqItemDto> for BOQItem {
    fn from(dto: BoqItemDto) -> Self {
        let unit_family = UnitFamily::from_unit_str(&dto.unit);
        BOQItem {
            id: dto.id,
            description: dto.description,
            unit: dto.unit,
            unit_family,
            expected_qty: dto.expected_qty,
        }
    }
}

fn configure_logging(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(log_dir, "boq.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
        .ok();
    Ok(guard)
}

fn load_boq_items(path: &Path) -> Result<Vec<BOQItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading bill of quantities {}", path.display()))?;
    let dtos: Vec<BoqItemDto> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing bill of quantities {}", path.display()))?;
    Ok(dtos.into_iter().map(BOQItem::from).collect())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args.log_dir)?;

    tracing::info!(
        target: "runtime",
        dxf = %args.dxf.display(),
        boq = %args.boq.display(),
        "startup"
    );

    let dxf_bytes = std::fs::read(&args.dxf)
        .with_context(|| format!("reading drawing {}", args.dxf.display()))?;
    let boq_items = load_boq_items(&args.boq)?;

    let config = match &args.config {
        Some(path) => MatcherConfig::load_overrides(path)?,
        None => MatcherConfig::default(),
    };

    let started_at = Instant::now();
    let result = core_pipeline::analyze(&dxf_bytes, &boq_items, &config, CancellationToken::new())
        .map_err(|e| {
            tracing::error!(target: "runtime", error = %e, "analysis_failed");
            anyhow::anyhow!("analysis failed: {e}")
        })?;

    tracing::info!(
        target: "runtime",
        regions = result.regions.len(),
        matches = result.matches.len(),
        unmatched = result.unmatched.len(),
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        "analysis_complete"
    );

    let output = render_result(&result);
    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Builds the JSON payload printed to stdout. Assembled by hand (rather
/// than deriving `Serialize` on the model types) since `core-model` is
/// shared by crates with no interest in a wire format.
fn render_result(result: &core_model::AnalysisResult) -> serde_json::Value {
    json!({
        "detected_unit": result.detected_unit,
        "unit_confidence": result.unit_confidence.as_str(),
        "unit_factor": result.unit_factor,
        "processing_time_ms": result.processing_time_ms,
        "layer_metadata": result.layer_metadata.iter().map(|l| json!({
            "name": l.name,
            "entity_count": l.entity_count,
            "orientation": format!("{:?}", l.orientation),
            "included": l.included,
        })).collect::<Vec<_>>(),
        "block_metadata": result.block_metadata.iter().map(|b| json!({
            "block_name": b.block_name,
            "area": b.area,
            "width": b.width,
            "height": b.height,
            "area_source": format!("{:?}", b.area_source),
            "reference_count": b.reference_count,
        })).collect::<Vec<_>>(),
        "regions": result.regions.iter().map(|r| json!({
            "id": r.id,
            "area": r.area,
            "perimeter": r.perimeter,
            "centroid": [r.centroid.x, r.centroid.y],
            "kind": format!("{:?}", r.kind),
            "resolution": format!("{:?}", r.resolution),
            "source_layers": r.source_layers,
            "semantic_class": r.semantic_class.as_str(),
        })).collect::<Vec<_>>(),
        "matches": result.matches.iter().map(|m| json!({
            "boq_item_id": m.boq_item_id,
            "region_ids": m.region_ids,
            "strategy": m.strategy.as_str(),
            "qty_calculated": m.qty_calculated,
            "text_match_score": m.text_match_score,
            "spatial_score": m.spatial_score,
            "confidence": m.confidence,
            "confidence_label": m.confidence_label(),
            "requires_review": m.requires_review(),
            "match_reason": m.match_reason,
            "warnings": m.warnings,
        })).collect::<Vec<_>>(),
        "unmatched": result.unmatched.iter().map(|u| json!({
            "boq_item_id": u.boq_item_id,
            "reason": u.reason,
        })).collect::<Vec<_>>(),
        "warnings": result.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boq_item_dto_infers_unit_family() {
        let dto = BoqItemDto {
            id: 1,
            description: "Pavimento Sala de Ventas".to_string(),
            unit: "m2".to_string(),
            expected_qty: Some(100.0),
        };
        let item: BOQItem = dto.into();
        assert_eq!(item.unit_family, UnitFamily::Area);
        assert_eq!(item.expected_qty, Some(100.0));
    }

    #[test]
    fn load_boq_items_parses_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boq.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "description": "Muro divisorio", "unit": "ml"}]"#,
        )
        .unwrap();

        let items = load_boq_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_family, UnitFamily::Linear);
        assert_eq!(items[0].expected_qty, None);
    }

    #[test]
    fn args_parse_required_positionals() {
        let args = Args::parse_from(["boq", "plan.dxf", "items.json"]);
        assert_eq!(args.dxf, PathBuf::from("plan.dxf"));
        assert_eq!(args.boq, PathBuf::from("items.json"));
        assert!(!args.compact);
    }
}
