//! Row extraction from decoded spreadsheet records.
use super::{Record, Row, HEADER_ROW_OFFSET};
use serde_json::Value;

/// Derive the rows that reference an image, keyed by spreadsheet row number.
///
/// `columns` lists accepted spellings of the reference column; the first one
/// holding a non-null value wins. Malformed values degrade to "no reference".
pub fn extract<S: AsRef<str>>(records: &[Record], columns: &[S]) -> Vec<Row> {
    records
        .iter()
        .enumerate()
        .filter_map(|(position, record)| {
            let reference = reference_value(record, columns);
            if reference.is_empty() {
                return None;
            }
            let row_index = u32::try_from(position)
                .ok()
                .and_then(|position| position.checked_add(HEADER_ROW_OFFSET))?;
            Some(Row::new(row_index, reference))
        })
        .collect()
}

fn reference_value<S: AsRef<str>>(record: &Record, columns: &[S]) -> String {
    columns
        .iter()
        .filter_map(|column| record.get(column.as_ref()))
        .find(|value| !value.is_null())
        .map(coerce_text)
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

#[cfg(test)]
#[path = "rows_tests.rs"]
mod tests;
