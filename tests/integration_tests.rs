//! Integration tests
//!
//! Full end-to-end flow: JSON file on disk → schema inference →
//! columnar file → conforming reader back to JSON records.

use parqlite::format::{EncodingKind, FileReader, PageHeader, MAGIC};
use parqlite::{Compression, Converter, ConverterConfig, Error, FieldType};
use serde_json::{json, Value};
use tempfile::tempdir;

// ============================================================================
// End-to-End Conversion Tests
// ============================================================================

#[test]
fn test_convert_array_file_round_trip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("users.json");
    let output = dir.path().join("users.col");

    std::fs::write(
        &input,
        r#"[
            {"id": 1, "name": "alice", "score": 9.5, "active": true},
            {"id": 2, "name": "bob", "score": 3, "active": false},
            {"id": 3, "name": null, "score": null, "active": true}
        ]"#,
    )
    .unwrap();

    let report = Converter::new().convert_file(&input, &output).unwrap();
    assert_eq!(report.rows, 3);

    let reader = FileReader::open(&output).unwrap();
    assert_eq!(reader.total_rows(), 3);

    let records = reader.read_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["name"], json!("alice"));
    assert_eq!(records[1]["score"], json!(3.0));
    assert_eq!(records[2]["name"], Value::Null);
    assert_eq!(records[2]["active"], json!(true));
}

#[test]
fn test_convert_ndjson_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("events.ndjson");
    let output = dir.path().join("events.col");

    std::fs::write(
        &input,
        "{\"event\": \"login\", \"user\": {\"id\": 1}}\n\
         {\"event\": \"click\", \"user\": {\"id\": 2, \"plan\": \"pro\"}}\n\
         {\"event\": \"logout\"}\n",
    )
    .unwrap();

    let report = Converter::new().convert_file(&input, &output).unwrap();
    assert_eq!(report.rows, 3);

    let user = report.schema.field("user").unwrap();
    assert!(user.nullable);
    let FieldType::Struct(fields) = &user.field_type else {
        panic!("expected struct");
    };
    assert_eq!(fields.len(), 2);

    let records = FileReader::open(&output).unwrap().read_all().unwrap();
    assert_eq!(records[1]["user"]["plan"], json!("pro"));
    assert_eq!(records[2]["user"], Value::Null);
}

#[test]
fn test_heterogeneous_records_widen_not_fail() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("mixed.json");
    let output = dir.path().join("mixed.col");

    // Same field holding ints, floats, bools and objects across records
    std::fs::write(
        &input,
        r#"[
            {"v": 1},
            {"v": 2.5},
            {"v": true},
            {"v": {"nested": [1, 2]}}
        ]"#,
    )
    .unwrap();

    let report = Converter::new().convert_file(&input, &output).unwrap();
    assert_eq!(report.schema.field("v").unwrap().field_type, FieldType::Utf8);

    let records = FileReader::open(&output).unwrap().read_all().unwrap();
    assert_eq!(records[0]["v"], json!("1"));
    assert_eq!(records[2]["v"], json!("true"));
    assert_eq!(records[3]["v"], json!("{\"nested\":[1,2]}"));
}

#[test]
fn test_deeply_nested_lists_round_trip() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("nested.col");

    let records = vec![
        json!({"matrix": [[1, 2], [3]], "tags": ["a"]}),
        json!({"matrix": [], "tags": []}),
        json!({"matrix": null, "tags": ["b", "c"]}),
    ];

    Converter::new().convert_records(&records, &output).unwrap();

    let decoded = FileReader::open(&output).unwrap().read_all().unwrap();
    assert_eq!(decoded[0]["matrix"], json!([[1, 2], [3]]));
    assert_eq!(decoded[1]["matrix"], json!([]));
    assert_eq!(decoded[2]["matrix"], Value::Null);
    assert_eq!(decoded[2]["tags"], json!(["b", "c"]));
}

// ============================================================================
// Input Shape Tests
// ============================================================================

#[test]
fn test_single_object_input_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("object.json");
    let output = dir.path().join("object.col");
    std::fs::write(&input, r#"{"a": 1, "b": 2}"#).unwrap();

    let err = Converter::new().convert_file(&input, &output).unwrap_err();
    assert!(matches!(err, Error::InputShape { .. }));
    assert!(!output.exists());
}

#[test]
fn test_top_level_scalar_rejected() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scalar.json");
    std::fs::write(&input, "\"just a string\"").unwrap();

    let err = Converter::new()
        .convert_file(&input, dir.path().join("out.col"))
        .unwrap_err();
    assert!(matches!(err, Error::InputShape { .. }));
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = tempdir().unwrap();
    let err = Converter::new()
        .convert_file(dir.path().join("nope.json"), dir.path().join("out.col"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

// ============================================================================
// File Layout Tests
// ============================================================================

#[test]
fn test_magic_markers_open_and_close_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("magic.col");
    Converter::new()
        .convert_records(&[json!({"a": 1})], &output)
        .unwrap();

    let data = std::fs::read(&output).unwrap();
    assert_eq!(&data[..4], &MAGIC);
    assert_eq!(&data[data.len() - 4..], &MAGIC);
}

#[test]
fn test_first_page_header_is_parseable() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("page.col");
    Converter::new()
        .convert_records(&[json!({"a": 1}), json!({"a": 1})], &output)
        .unwrap();

    let data = std::fs::read(&output).unwrap();
    let header = PageHeader::read_from(&data[4..]).unwrap();
    assert_eq!(header.row_count, 2);
}

#[test]
fn test_dictionary_kicks_in_for_repetitive_data() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("dict.col");

    let records: Vec<Value> = (0..100)
        .map(|i| json!({"status": if i % 2 == 0 { "ok" } else { "err" }}))
        .collect();
    let config = ConverterConfig::new().with_compression(Compression::None);
    Converter::with_config(config)
        .convert_records(&records, &output)
        .unwrap();

    let data = std::fs::read(&output).unwrap();
    let header = PageHeader::read_from(&data[4..]).unwrap();
    assert_eq!(header.encoding, EncodingKind::Dictionary);

    let reader = FileReader::open(&output).unwrap();
    let stats = &reader.footer().row_groups[0].columns[0].stats;
    assert_eq!(stats.distinct_count, Some(2));

    let decoded = reader.read_all().unwrap();
    assert_eq!(decoded[0]["status"], json!("ok"));
    assert_eq!(decoded[1]["status"], json!("err"));
}

#[test]
fn test_deterministic_output_bytes() {
    let dir = tempdir().unwrap();
    let records: Vec<Value> = (0..50)
        .map(|i| json!({"i": i, "label": format!("row-{}", i % 7)}))
        .collect();

    let first = dir.path().join("a.col");
    let second = dir.path().join("b.col");
    Converter::new().convert_records(&records, &first).unwrap();
    Converter::new().convert_records(&records, &second).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

#[test]
fn test_truncated_output_detected_by_reader() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("trunc.col");
    Converter::new()
        .convert_records(&[json!({"a": 1})], &output)
        .unwrap();

    let data = std::fs::read(&output).unwrap();
    let cut = data[..data.len() - 3].to_vec();
    assert!(matches!(
        FileReader::from_bytes(cut),
        Err(Error::CorruptFile { .. })
    ));
}
