//! Customer dataset loading from CSV

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{CustomerId, DomainError, FeatureTable};

/// Columns that are not model features
#[derive(Debug, Clone)]
pub struct DatasetColumns {
    pub id_column: String,
    pub target_column: String,
}

impl Default for DatasetColumns {
    fn default() -> Self {
        Self {
            id_column: "SK_ID_CURR".to_string(),
            target_column: "TARGET".to_string(),
        }
    }
}

/// Load the customer table from a CSV file with a header row
pub fn load_csv(path: &Path, columns: &DatasetColumns) -> Result<FeatureTable, DomainError> {
    let file = std::fs::File::open(path).map_err(|e| {
        DomainError::configuration(format!("cannot open dataset '{}': {}", path.display(), e))
    })?;

    let table = read_csv(file, columns)?;
    info!(
        path = %path.display(),
        customers = table.len(),
        features = table.feature_names().len(),
        "Customer dataset loaded"
    );

    Ok(table)
}

/// Parse CSV content, dropping the id and target columns from the features
pub fn read_csv<R: Read>(reader: R, columns: &DatasetColumns) -> Result<FeatureTable, DomainError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DomainError::configuration(format!("cannot read dataset header: {}", e)))?
        .clone();

    let id_index = headers
        .iter()
        .position(|h| h == columns.id_column)
        .ok_or_else(|| {
            DomainError::configuration(format!("dataset has no '{}' column", columns.id_column))
        })?;

    let feature_indices: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| *h != columns.id_column && *h != columns.target_column)
        .map(|(i, _)| i)
        .collect();

    if headers.iter().any(|h| h == columns.target_column) {
        debug!(column = %columns.target_column, "Dropping target column");
    }

    let feature_names = feature_indices.iter().map(|i| headers[*i].to_string()).collect();
    let mut ids = Vec::new();
    let mut rows = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| DomainError::configuration(format!("invalid dataset row: {}", e)))?;
        // header is line 1
        let line = line + 2;

        let id = record[id_index].parse::<i64>().map_err(|e| {
            DomainError::configuration(format!(
                "line {}: invalid customer id '{}': {}",
                line, &record[id_index], e
            ))
        })?;

        let row = feature_indices
            .iter()
            .map(|i| parse_value(&record[*i]).map_err(|e| {
                DomainError::configuration(format!(
                    "line {}: column '{}': {}",
                    line, &headers[*i], e
                ))
            }))
            .collect::<Result<Vec<f64>, _>>()?;

        ids.push(CustomerId::new(id));
        rows.push(row);
    }

    FeatureTable::new(feature_names, ids, rows)
}

/// Empty cells and NaN spellings are missing values
fn parse_value(cell: &str) -> Result<f64, String> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }

    match cell {
        "True" | "true" => return Ok(1.0),
        "False" | "false" => return Ok(0.0),
        _ => {}
    }

    cell.parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", cell))
}
