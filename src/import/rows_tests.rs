use super::extract;
use crate::import::{Record, Row, DEFAULT_REFERENCE_COLUMNS};
use serde_json::json;

fn record(value: serde_json::Value) -> Record {
    value.as_object().cloned().expect("record object")
}

#[test]
fn extract_numbers_rows_from_spreadsheet_line_two() {
    let records = vec![
        record(json!({ "name": "Squat", "imageFileName": "squat.png" })),
        record(json!({ "name": "Plank", "imageFileName": "" })),
        record(json!({ "name": "Lunge", "imageFileName": "  lunge.jpg " })),
    ];

    let rows = extract(&records, &DEFAULT_REFERENCE_COLUMNS);

    assert_eq!(
        rows,
        vec![Row::new(2, "squat.png"), Row::new(4, "lunge.jpg")]
    );
}

#[test]
fn extract_accepts_alternate_column_spellings() {
    let records = vec![
        record(json!({ "imagefilename": "a.png" })),
        record(json!({ "ImageFileName": "b.png" })),
        record(json!({ "IMAGEFILENAME": "ignored.png" })),
    ];

    let rows = extract(&records, &DEFAULT_REFERENCE_COLUMNS);

    assert_eq!(rows, vec![Row::new(2, "a.png"), Row::new(3, "b.png")]);
}

#[test]
fn extract_skips_null_spelling_but_stops_at_present_empty_value() {
    let records = vec![
        record(json!({ "imageFileName": null, "ImageFileName": "fallback.png" })),
        record(json!({ "imageFileName": "", "ImageFileName": "shadowed.png" })),
    ];

    let rows = extract(&records, &DEFAULT_REFERENCE_COLUMNS);

    assert_eq!(rows, vec![Row::new(2, "fallback.png")]);
}

#[test]
fn extract_coerces_scalars_and_degrades_structured_values() {
    let records = vec![
        record(json!({ "imageFileName": 42 })),
        record(json!({ "imageFileName": true })),
        record(json!({ "imageFileName": ["x.png"] })),
        record(json!({ "imageFileName": { "name": "y.png" } })),
        record(json!({})),
    ];

    let rows = extract(&records, &DEFAULT_REFERENCE_COLUMNS);

    assert_eq!(rows, vec![Row::new(2, "42"), Row::new(3, "true")]);
}

#[test]
fn extract_honors_configured_columns() {
    let records = vec![record(json!({ "photo": "custom.webp", "imageFileName": "x.png" }))];
    let columns = vec!["photo".to_string()];

    let rows = extract(&records, &columns);

    assert_eq!(rows, vec![Row::new(2, "custom.webp")]);
}
