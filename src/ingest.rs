use crate::errors::AppError;
use crate::models::{ContactRecord, ContactTable};
use std::io::Read;

/// Fixed input schema: the uploaded report's column labels.
pub const COL_NAME: &str = "Primary Addressee Name";
pub const COL_ADDRESS_ID: &str = "Address ID";
pub const COL_ZIP: &str = "ZIP Code";
pub const COL_LINE_ONE: &str = "Formatted Address Line One";
pub const COL_LINE_TWO: &str = "Address Line Two";
/// Some report exports spell out "Two", others use the digit.
pub const COL_LINE_TWO_ALT: &str = "Address Line 2";
pub const COL_CITY: &str = "City";
pub const COL_STATE: &str = "State";

/// Positions of the required columns inside the uploaded header row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnIndex {
    pub name: usize,
    pub address_id: usize,
    pub zip: usize,
    pub line_one: usize,
    pub line_two: Option<usize>,
    pub city: usize,
    pub state: usize,
}

impl ColumnIndex {
    /// Resolves the fixed schema against an uploaded header row, failing with
    /// a clear error naming the first missing required column.
    pub fn resolve(headers: &[String]) -> Result<Self, AppError> {
        let find = |label: &str| headers.iter().position(|header| header == label);

        let required = |label: &'static str| {
            find(label).ok_or_else(|| AppError::MissingColumn(label.to_string()))
        };

        Ok(Self {
            name: required(COL_NAME)?,
            address_id: required(COL_ADDRESS_ID)?,
            zip: required(COL_ZIP)?,
            line_one: required(COL_LINE_ONE)?,
            line_two: find(COL_LINE_TWO),
            city: required(COL_CITY)?,
            state: required(COL_STATE)?,
        })
    }
}

/// Parses an uploaded CSV into a [`ContactTable`].
///
/// Validates the required column set up front, normalizes the alternate
/// secondary-address-line label to the canonical spelling, and coerces the
/// address-identifier and zip columns integer-then-string so spreadsheet
/// float artifacts ("62704.0") do not leak into lookups.
pub fn parse_contacts<R: Read>(reader: R) -> Result<ContactTable, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    // Pure header rename, not a data transformation.
    for header in headers.iter_mut() {
        if header == COL_LINE_TWO_ALT {
            *header = COL_LINE_TWO.to_string();
        }
    }

    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut fields: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        // Short rows pad out so positional access stays in bounds.
        fields.resize(headers.len(), String::new());

        fields[columns.address_id] = coerce_integer_string(&fields[columns.address_id])?;
        fields[columns.zip] = coerce_integer_string(&fields[columns.zip])?;

        rows.push(ContactRecord { fields });
    }

    tracing::debug!("Parsed {} contact rows", rows.len());

    Ok(ContactTable { headers, rows })
}

/// Integer-then-string coercion for numeric identifier columns.
///
/// "62704" and "62704.0" both become "62704". Blank cells stay blank; a
/// value that is not integer-coercible is a data error in the upload.
pub fn coerce_integer_string(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    if let Ok(whole) = trimmed.parse::<i64>() {
        return Ok(whole.to_string());
    }

    trimmed
        .parse::<f64>()
        .map(|parsed| (parsed.trunc() as i64).to_string())
        .map_err(|_| {
            AppError::BadRequest(format!(
                "value '{}' in a numeric column is not integer-coercible",
                raw
            ))
        })
}
