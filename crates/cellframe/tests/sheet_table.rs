//! End-to-end tests: sheet XML -> cell records -> table -> host frame

use cellframe::prelude::*;
use cellframe::{read_host_table, read_table_with, HostEncoding, HostString};
use pretty_assertions::assert_eq;

const SHEET: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1">
      <c r="A1"><v>42</v></c>
      <c r="B1" t="str"><v>Hello</v></c>
      <c r="C1"><f t="shared" ref="C1:C2" si="0">A1+B1</f><v>42</v></c>
    </row>
    <row r="2">
      <c r="A2" s="3" t="inlineStr"><is><t>Grüße</t></is></c>
      <c r="B2" t="b"><v>1</v></c>
      <c r="C2"><f t="shared" si="0"/><v>43</v></c>
    </row>
  </sheetData>
</worksheet>"#;

fn token(s: &str) -> TableCell {
    TableCell::Token(s.to_string())
}

fn text(s: &str) -> TableCell {
    TableCell::Text(s.to_string())
}

#[test]
fn test_row_count_and_columns() {
    let table = read_table(SHEET.as_bytes()).unwrap();
    assert_eq!(table.row_count(), 6);
    assert_eq!(table.column_count(), 12);
    for column in table.columns() {
        assert_eq!(column.len(), 6, "column {}", column.name());
    }
}

#[test]
fn test_numeric_value_is_token() {
    let table = read_table(SHEET.as_bytes()).unwrap();
    assert_eq!(table.cell(0, CellField::CellName), Some(&token("A1")));
    assert_eq!(table.cell(0, CellField::RowName), Some(&token("1")));
    assert_eq!(table.cell(0, CellField::ColName), Some(&token("A")));
    assert_eq!(table.cell(0, CellField::Value), Some(&token("42")));
    assert_eq!(table.cell(0, CellField::DataType), Some(&TableCell::Missing));
    assert_eq!(table.cell(0, CellField::Formula), Some(&TableCell::Missing));
}

#[test]
fn test_typed_value_is_text() {
    let table = read_table(SHEET.as_bytes()).unwrap();
    assert_eq!(table.cell(1, CellField::Value), Some(&text("Hello")));
    assert_eq!(table.cell(4, CellField::Value), Some(&text("1")));
}

#[test]
fn test_formula_value_is_text() {
    let table = read_table(SHEET.as_bytes()).unwrap();
    assert_eq!(table.cell(2, CellField::Value), Some(&text("42")));
    assert_eq!(table.cell(2, CellField::Formula), Some(&text("A1+B1")));
    assert_eq!(
        table.cell(2, CellField::FormulaAttrs),
        Some(&token(r#"t="shared" ref="C1:C2" si="0""#))
    );

    // Shared formula child: empty <f/> collapses to missing, attributes stay
    assert_eq!(table.cell(5, CellField::Formula), Some(&TableCell::Missing));
    assert_eq!(table.cell(5, CellField::Value), Some(&text("43")));
}

#[test]
fn test_inline_string() {
    let table = read_table(SHEET.as_bytes()).unwrap();
    assert_eq!(
        table.cell(3, CellField::InlineString),
        Some(&text("<is><t>Grüße</t></is>"))
    );
    assert_eq!(table.cell(3, CellField::StyleIndex), Some(&token("3")));
    assert_eq!(table.cell(3, CellField::Value), Some(&TableCell::Missing));
}

#[test]
fn test_empty_sheet_gives_full_empty_table() {
    let table = read_table(b"<worksheet><sheetData/></worksheet>").unwrap();
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_names().len(), 12);
}

#[test]
fn test_preserve_empty_policy() {
    let xml = br#"<worksheet><sheetData><row r="1"><c r="A1" t=""><f t="shared" si="1"/><v/></c></row></sheetData></worksheet>"#;

    let collapsed = read_table(xml).unwrap();
    assert_eq!(collapsed.cell(0, CellField::DataType), Some(&TableCell::Missing));
    assert_eq!(collapsed.cell(0, CellField::Value), Some(&TableCell::Missing));

    let preserved = read_table_with(
        xml,
        &ReadOptions::default(),
        &MaterializeOptions::preserving_empty(),
    )
    .unwrap();
    assert_eq!(preserved.cell(0, CellField::DataType), Some(&token("")));
    assert_eq!(preserved.cell(0, CellField::Formula), Some(&text("")));
    // Formula attributes are present, so even the empty value is text
    assert_eq!(preserved.cell(0, CellField::Value), Some(&text("")));
}

#[test]
fn test_materializing_twice_is_equal() {
    let records = cellframe::read_cell_records(SHEET.as_bytes(), &ReadOptions::default()).unwrap();
    assert_eq!(materialize(&records), materialize(&records));
}

#[test]
fn test_host_frame() {
    let host = read_host_table(SHEET.as_bytes()).unwrap();
    assert_eq!(
        host.names,
        vec!["r", "row_r", "c_r", "c_s", "c_t", "c_cm", "c_ph", "c_vm", "v", "f", "f_attr", "is"]
    );
    assert_eq!(host.row_count, 6);

    let v = host.column("v").unwrap();
    assert_eq!(v[0], HostString::native("42"));
    assert_eq!(v[1].encoding, HostEncoding::Ascii);
    assert!(v[3].is_na());

    let is = host.column("is").unwrap();
    assert_eq!(is[3].encoding, HostEncoding::Utf8);
}

#[test]
fn test_malformed_sheet_fails() {
    let err = read_table(b"<worksheet><sheetData><row></sheetData></worksheet>").unwrap_err();
    assert!(err.is_parse());
}
