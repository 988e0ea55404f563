//! Columnar builder tests

use super::*;
use crate::error::Error;
use crate::schema::{infer_schema, Field, FieldType, Schema};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn as_object(value: &Value) -> &Map<String, Value> {
    value.as_object().expect("test record must be an object")
}

fn build(records: &[Value]) -> RowGroup {
    let schema = infer_schema(records).unwrap();
    build_with_schema(&schema, records).unwrap()
}

fn build_with_schema(schema: &Schema, records: &[Value]) -> crate::error::Result<RowGroup> {
    let mut builder = RowGroupBuilder::new(schema);
    for (idx, record) in records.iter().enumerate() {
        builder.append_record(as_object(record), idx)?;
    }
    Ok(builder.take())
}

#[test]
fn test_build_simple_columns() {
    let group = build(&[
        json!({"id": 1, "name": "a", "active": true}),
        json!({"id": 2, "name": "b", "active": false}),
    ]);

    assert_eq!(group.rows, 2);
    assert_eq!(group.columns.len(), 3);

    let ColumnData::Int64(ids) = &group.columns[0].data else {
        panic!("expected int64 column");
    };
    assert_eq!(ids, &vec![1, 2]);
    assert_eq!(group.columns[0].null_count(), 0);
}

#[test]
fn test_rows_align_across_columns() {
    let group = build(&[
        json!({"a": 1}),
        json!({"b": "x"}),
        json!({"a": 2, "b": "y"}),
    ]);

    for column in &group.columns {
        assert_eq!(column.len(), group.rows);
    }
}

#[test]
fn test_int_widens_to_double_exactly() {
    // Mixed int/float field becomes a double column
    let group = build(&[json!({"a": 1}), json!({"a": 2.5})]);

    let ColumnData::Double(values) = &group.columns[0].data else {
        panic!("expected double column");
    };
    assert_eq!(values, &vec![1.0, 2.5]);
}

#[test]
fn test_absent_and_null_both_clear_validity() {
    let group = build(&[
        json!({"a": 1, "b": "x"}),
        json!({"a": null}),
        json!({"b": "y"}),
    ]);

    let a = &group.columns[0];
    assert!(a.validity.get(0));
    assert!(!a.validity.get(1)); // explicit null
    assert!(!a.validity.get(2)); // absent
    assert_eq!(a.null_count(), 2);

    let b = &group.columns[1];
    assert!(b.validity.get(0));
    assert!(!b.validity.get(1));
    assert!(b.validity.get(2));
}

#[test]
fn test_present_value_is_never_null() {
    let records = vec![
        json!({"v": 0}),
        json!({"v": -1}),
        json!({"v": 42}),
    ];
    let group = build(&records);
    assert_eq!(group.columns[0].null_count(), 0);
}

#[test]
fn test_empty_list_is_not_null() {
    let group = build(&[json!({"a": [1, 2]}), json!({"a": []})]);

    let column = &group.columns[0];
    let ColumnData::List { offsets, items } = &column.data else {
        panic!("expected list column");
    };

    assert_eq!(offsets, &vec![0, 2, 2]);
    assert_eq!(items.len(), 2);
    // Row 2 holds an empty list, not a null
    assert!(column.validity.get(1));
}

#[test]
fn test_null_list_vs_empty_list() {
    let group = build(&[json!({"a": null}), json!({"a": []})]);

    let column = &group.columns[0];
    assert!(!column.validity.get(0));
    assert!(column.validity.get(1));
}

#[test]
fn test_list_with_null_elements() {
    let group = build(&[json!({"a": [1, null, 3]})]);

    let ColumnData::List { items, .. } = &group.columns[0].data else {
        panic!("expected list column");
    };
    assert_eq!(items.len(), 3);
    assert!(!items.validity.get(1));
}

#[test]
fn test_struct_column_children_stay_aligned() {
    let group = build(&[
        json!({"user": {"id": 1, "name": "a"}}),
        json!({"user": null}),
        json!({"user": {"id": 3}}),
    ]);

    let column = &group.columns[0];
    let ColumnData::Struct { children } = &column.data else {
        panic!("expected struct column");
    };

    assert!(!column.validity.get(1));
    for child in children {
        assert_eq!(child.len(), 3);
    }

    let id = &children[0];
    let ColumnData::Int64(values) = &id.data else {
        panic!("expected int64 child");
    };
    assert_eq!(values, &vec![1, 0, 3]);
    assert!(!id.validity.get(1));
}

#[test]
fn test_utf8_column_stringifies_any_shape() {
    // bool vs string unifies to utf8; every value stringifies
    let group = build(&[
        json!({"v": "plain"}),
        json!({"v": true}),
        json!({"v": 7}),
        json!({"v": {"nested": 1}}),
    ]);

    let ColumnData::Utf8(values) = &group.columns[0].data else {
        panic!("expected utf8 column");
    };
    assert_eq!(
        values,
        &vec![
            "plain".to_string(),
            "true".to_string(),
            "7".to_string(),
            "{\"nested\":1}".to_string()
        ]
    );
}

#[test]
fn test_type_mismatch_against_sampled_schema() {
    // Schema inferred from a sample that did not anticipate an object
    let schema = Schema::new(vec![Field::new("v", FieldType::Int64, true)]);
    let err = build_with_schema(&schema, &[json!({"v": {"x": 1}})]).unwrap_err();

    match err {
        Error::TypeMismatch { field, record, .. } => {
            assert_eq!(field, "v");
            assert_eq!(record, 0);
        }
        other => panic!("expected TypeMismatch, got {other}"),
    }
}

#[test]
fn test_fields_not_in_schema_are_ignored() {
    let schema = Schema::new(vec![Field::new("a", FieldType::Int64, true)]);
    let group = build_with_schema(&schema, &[json!({"a": 1, "extra": true})]).unwrap();
    assert_eq!(group.columns.len(), 1);
    assert_eq!(group.rows, 1);
}

#[test]
fn test_builder_take_resets() {
    let schema = infer_schema(&[json!({"a": 1})]).unwrap();
    let mut builder = RowGroupBuilder::new(&schema);
    builder
        .append_record(as_object(&json!({"a": 1})), 0)
        .unwrap();

    let group = builder.take();
    assert_eq!(group.rows, 1);
    assert!(builder.is_empty());
    assert_eq!(builder.estimated_bytes(), 0);

    builder
        .append_record(as_object(&json!({"a": 2})), 1)
        .unwrap();
    assert_eq!(builder.rows(), 1);
}

#[test]
fn test_should_flush_row_threshold() {
    let config = crate::ConverterConfig::new().with_row_group_max_rows(2);
    let schema = infer_schema(&[json!({"a": 1})]).unwrap();
    let mut builder = RowGroupBuilder::new(&schema);

    builder
        .append_record(as_object(&json!({"a": 1})), 0)
        .unwrap();
    assert!(!builder.should_flush(&config));

    builder
        .append_record(as_object(&json!({"a": 2})), 1)
        .unwrap();
    assert!(builder.should_flush(&config));
}
