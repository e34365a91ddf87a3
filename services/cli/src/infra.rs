use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use owner_fit::error::AppError;
use owner_fit::workflows::form_export::FormExportImporter;
use owner_fit::workflows::owner_applications::{
    ApplicationRecord, FitBand, Registry, RegistryDefinition,
};
use tracing::info;

/// One `--band` selection; `None` selects applications that were not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BandFilter(pub(crate) Option<FitBand>);

pub(crate) fn parse_band(raw: &str) -> Result<BandFilter, String> {
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    if matches!(normalized.as_str(), "not_evaluated" | "none") {
        return Ok(BandFilter(None));
    }

    FitBand::parse(&normalized)
        .map(|band| BandFilter(Some(band)))
        .ok_or_else(|| {
            format!("unknown band '{raw}' (expected perfect, great, issues, bad, or not-evaluated)")
        })
}

pub(crate) fn load_registry(path: &Path) -> Result<Registry, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let definition: RegistryDefinition = serde_json::from_reader(reader)?;
    Ok(Registry::from_definition(definition)?)
}

/// Reads a CSV form export or a JSON array of records, chosen by extension.
pub(crate) fn load_records(
    path: &Path,
    registry: &Registry,
) -> Result<Vec<ApplicationRecord>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let records = if is_csv {
        FormExportImporter::from_path(path, registry)?
    } else {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader::<_, Vec<ApplicationRecord>>(reader)?
    };

    info!(path = %path.display(), applications = records.len(), "loaded application records");
    Ok(records)
}
