//! Catalog CSV ingest.
//!
//! Fixed schema, SI units, one object per row:
//!
//! ```text
//! id,mass_kg,radius_m,v_mps,v_los_mps,z_obs
//! ```
//!
//! `id`, `mass_kg` and `radius_m` are required; the rest are optional and an
//! empty cell means "absent". Rows that cannot be parsed are reported as
//! [`RowError`]s and skipped. Physically invalid values (e.g. a negative mass)
//! are *not* filtered here: they reach the evaluator and fail there with an
//! explicit per-record error.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::ObjectRecord;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 3] = ["id", "mass_kg", "radius_m"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed records plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedCatalog {
    pub records: Vec<ObjectRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a catalog CSV from disk.
pub fn load_catalog(path: &Path) -> Result<IngestedCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let catalog = read_catalog(file)?;
    tracing::info!(
        path = %path.display(),
        rows = catalog.rows_read,
        records = catalog.records.len(),
        row_errors = catalog.row_errors.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse a catalog from any reader.
pub fn read_catalog<R: Read>(input: R) -> Result<IngestedCatalog, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &header_map) {
            Ok(record) => records.push(record),
            Err(message) => {
                let id = get_optional(&row, &header_map, "id").map(str::to_string);
                tracing::debug!(line, ?id, "row rejected: {message}");
                row_errors.push(RowError { line, id, message });
            }
        }
    }

    if records.is_empty() {
        return Err(AppError::new(3, "No valid rows in catalog CSV."));
    }

    Ok(IngestedCatalog {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn parse_row(row: &StringRecord, header_map: &HashMap<String, usize>) -> Result<ObjectRecord, String> {
    let id = get_required(row, header_map, "id")?.to_string();
    let mass_kg = parse_f64("mass_kg", get_required(row, header_map, "mass_kg")?)?;
    let radius_m = parse_f64("radius_m", get_required(row, header_map, "radius_m")?)?;

    let v_mps = parse_optional(row, header_map, "v_mps")?;
    let v_los_mps = parse_optional(row, header_map, "v_los_mps")?;
    let z_obs = parse_optional(row, header_map, "z_obs")?;

    Ok(ObjectRecord {
        id,
        mass_kg,
        radius_m,
        v_mps,
        v_los_mps,
        z_obs,
    })
}

fn get_required<'a>(
    row: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(row, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(row: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    row.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Empty cell → `None`; a present but malformed cell is an error, never silently dropped.
fn parse_optional(
    row: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<Option<f64>, String> {
    get_optional(row, header_map, name)
        .map(|s| parse_f64(name, s))
        .transpose()
}

fn parse_f64(name: &str, s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for `{name}`: '{s}'"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite value for `{name}`: '{s}'"))
    }
}
