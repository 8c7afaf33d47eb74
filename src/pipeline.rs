//! Fetch, extract and per-target generation.
//!
//! Stations are extracted once per run and shared read-only by every
//! target. Targets are rendered and written one at a time in configuration
//! order; a failed write stops the run but leaves earlier targets on disk.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::{PipelineConfig, TargetSpec};
use crate::error::Result;
use crate::fetch::{HttpClient, load_source};
use crate::kml::{KmlDocument, project};
use crate::output::DocumentSink;
use crate::parser::extract_stations;
use crate::station::StationRecord;

/// Outcome of one written target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub name: String,
    pub path: PathBuf,
    pub placemarks: usize,
    /// Stations left out for lacking coordinates.
    pub suppressed: usize,
}

/// Builds the document for `target` from `records`.
pub fn render_target(records: &[StationRecord], target: &TargetSpec) -> KmlDocument {
    let mut document = KmlDocument::new(&target.name);
    for placemark in records
        .iter()
        .filter_map(|record| project(record, &target.fields))
    {
        document.append_placemark(placemark);
    }
    document
}

/// Renders and writes every target in order.
///
/// # Errors
///
/// Stops at the first serialization or write failure. Targets written before
/// the failure are not rolled back.
pub fn generate<S: DocumentSink>(
    records: &[StationRecord],
    targets: &[TargetSpec],
    sink: &S,
) -> Result<Vec<TargetReport>> {
    let mut reports = Vec::with_capacity(targets.len());

    for target in targets {
        let span = tracing::info_span!("target", name = %target.name);
        let _enter = span.enter();

        let document = render_target(records, target);
        let text = document.serialize()?;
        sink.write(&target.path, &text)?;

        let placemarks = document.placemarks().len();
        let report = TargetReport {
            name: target.name.clone(),
            path: target.path.clone(),
            placemarks,
            suppressed: records.len() - placemarks,
        };
        debug!(
            path = %report.path.display(),
            placemarks = report.placemarks,
            suppressed = report.suppressed,
            "Target written"
        );
        reports.push(report);
    }

    Ok(reports)
}

/// Runs the whole pipeline for `config`: one fetch, one extraction, then
/// every target.
#[tracing::instrument(skip_all, fields(source = %config.source_url, targets = config.targets.len()))]
pub async fn run<C: HttpClient, S: DocumentSink>(
    config: &PipelineConfig,
    client: &C,
    sink: &S,
) -> Result<Vec<TargetReport>> {
    let bytes = load_source(client, &config.source_url).await?;
    let records = extract_stations(&bytes, &config.station_selector, &config.fields)?;
    info!(stations = records.len(), "Stations extracted");

    let reports = generate(&records, &config.targets, sink)?;
    for report in &reports {
        info!(
            target_name = %report.name,
            path = %report.path.display(),
            placemarks = report.placemarks,
            suppressed = report.suppressed,
            "Target generated"
        );
    }
    Ok(reports)
}
