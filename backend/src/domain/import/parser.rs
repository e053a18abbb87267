//! CSV parsing for the bulk product import.
//!
//! Structural problems such as bad quoting or ragged rows abort the whole
//! upload; everything row-shaped is handed to the validator, which decides
//! per row.

use std::collections::HashMap;

/// A structural CSV failure. Fails the entire request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CSV could not be parsed: {message}")]
pub struct CsvParseError {
    pub message: String,
}

/// One data row keyed by normalised header names.
///
/// Row numbers are spreadsheet-style: the header is row 1, so the first data
/// row is row 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub number: usize,
    fields: HashMap<String, String>,
}

impl ParsedRow {
    /// The raw cell for a normalised column name. Missing columns read as
    /// the empty string.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map_or("", String::as_str)
    }

    #[cfg(test)]
    pub fn from_pairs(number: usize, pairs: &[(&str, &str)]) -> Self {
        Self {
            number,
            fields: pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }
}

/// Lowercase a header and replace spaces with underscores, so that
/// `Product Type` and `product_type` address the same column.
fn normalise_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Parse the uploaded bytes into rows.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<ParsedRow>, CsvParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| CsvParseError {
            message: err.to_string(),
        })?
        .iter()
        .map(normalise_header)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| CsvParseError {
            message: err.to_string(),
        })?;
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell.to_owned()))
            .collect();
        rows.push(ParsedRow {
            number: index + 2,
            fields,
        });
    }
    Ok(rows)
}
