//! Columnar table materializer
//!
//! Turns a row-oriented [`CellRecordStore`] into twelve parallel columns,
//! one per [`CellField`], consulting the encoding policy for every present
//! value.

use crate::encoding::{encoding_for, FieldEncoding};
use crate::record::{CellField, CellRecord, CellRecordStore};

/// One output cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TableCell {
    /// Sentinel for an attribute that was not present
    #[default]
    Missing,
    /// Plain ASCII-safe token
    Token(String),
    /// Declared-encoding text
    Text(String),
}

impl TableCell {
    /// Check for the missing sentinel
    pub fn is_missing(&self) -> bool {
        matches!(self, TableCell::Missing)
    }

    /// The cell's string content, if any
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TableCell::Missing => None,
            TableCell::Token(s) | TableCell::Text(s) => Some(s),
        }
    }

    /// The representation chosen for a present value
    pub fn encoding(&self) -> Option<FieldEncoding> {
        match self {
            TableCell::Missing => None,
            TableCell::Token(_) => Some(FieldEncoding::Token),
            TableCell::Text(_) => Some(FieldEncoding::Text),
        }
    }

    fn encoded(value: &str, encoding: FieldEncoding) -> Self {
        match encoding {
            FieldEncoding::Token => TableCell::Token(value.to_string()),
            FieldEncoding::Text => TableCell::Text(value.to_string()),
        }
    }
}

/// How present-but-empty attributes are materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPolicy {
    /// Empty values become the missing sentinel, same as absent ones
    #[default]
    Collapse,
    /// Empty values are kept as empty tokens or text
    Preserve,
}

/// Options for [`materialize_with`]
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    /// Treatment of present-but-empty values (default: collapse)
    pub empty: EmptyPolicy,
}

impl MaterializeOptions {
    /// Options that keep present-but-empty values distinct from missing ones
    pub fn preserving_empty() -> Self {
        Self {
            empty: EmptyPolicy::Preserve,
        }
    }
}

/// A single named column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    field: CellField,
    cells: Vec<TableCell>,
}

impl Column {
    fn with_capacity(field: CellField, capacity: usize) -> Self {
        Self {
            field,
            cells: Vec::with_capacity(capacity),
        }
    }

    /// The record field this column was built from
    pub fn field(&self) -> CellField {
        self.field
    }

    /// Column name (`r`, `row_r`, ..., `is`)
    pub fn name(&self) -> &'static str {
        self.field.column_name()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in row order
    pub fn cells(&self) -> &[TableCell] {
        &self.cells
    }

    /// Cell at `row`
    pub fn get(&self, row: usize) -> Option<&TableCell> {
        self.cells.get(row)
    }

    /// Number of missing cells
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }
}

/// Materialized table: twelve equal-length columns in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    fn with_capacity(rows: usize) -> Self {
        Self {
            columns: CellField::ALL
                .iter()
                .map(|&field| Column::with_capacity(field, rows))
                .collect(),
            row_count: 0,
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns (always twelve)
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns in schema order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column for a field
    pub fn column(&self, field: CellField) -> &Column {
        &self.columns[field.position()]
    }

    /// Column by name
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        CellField::from_column_name(name).map(|f| self.column(f))
    }

    /// Cell at (`row`, `field`)
    pub fn cell(&self, row: usize, field: CellField) -> Option<&TableCell> {
        self.column(field).get(row)
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::name).collect()
    }

    fn push_record(&mut self, record: &CellRecord, options: &MaterializeOptions) {
        for column in &mut self.columns {
            let cell = match record.get(column.field) {
                None => TableCell::Missing,
                Some("") if options.empty == EmptyPolicy::Collapse => TableCell::Missing,
                Some(value) => TableCell::encoded(value, encoding_for(column.field, record)),
            };
            column.cells.push(cell);
        }
        self.row_count += 1;
    }
}

/// Materialize a record store with default options.
///
/// ```
/// use cellframe_core::{materialize, CellField, CellRecord, CellRecordStore, TableCell};
///
/// let store = CellRecordStore::from(vec![
///     CellRecord::with_reference("A1").with(CellField::Value, "42"),
/// ]);
/// let table = materialize(&store);
/// assert_eq!(table.row_count(), 1);
/// assert_eq!(table.cell(0, CellField::Value), Some(&TableCell::Token("42".into())));
/// ```
pub fn materialize(records: &CellRecordStore) -> Table {
    materialize_with(records, &MaterializeOptions::default())
}

/// Materialize a record store.
///
/// Single pass over the records. The input is never modified and the output
/// always has the full column set, even for an empty store.
pub fn materialize_with(records: &CellRecordStore, options: &MaterializeOptions) -> Table {
    let mut table = Table::with_capacity(records.len());
    for record in records {
        table.push_record(record, options);
    }
    log::debug!(
        "materialized {} cell records into {} columns",
        table.row_count,
        table.columns.len()
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn token(s: &str) -> TableCell {
        TableCell::Token(s.to_string())
    }

    fn text(s: &str) -> TableCell {
        TableCell::Text(s.to_string())
    }

    #[test]
    fn test_empty_store_has_full_column_set() {
        let table = materialize(&CellRecordStore::new());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 12);
        assert_eq!(
            table.column_names(),
            vec!["r", "row_r", "c_r", "c_s", "c_t", "c_cm", "c_ph", "c_vm", "v", "f", "f_attr", "is"]
        );
        assert!(table.columns().iter().all(Column::is_empty));
    }

    #[test]
    fn test_numeric_value_row() {
        let store = CellRecordStore::from(vec![CellRecord::new()
            .with(CellField::CellName, "A1")
            .with(CellField::Value, "42")
            .with(CellField::DataType, "")
            .with(CellField::FormulaAttrs, "")]);
        let table = materialize(&store);

        assert_eq!(table.cell(0, CellField::CellName), Some(&token("A1")));
        assert_eq!(table.cell(0, CellField::Value), Some(&token("42")));
        for field in CellField::ALL {
            if field != CellField::CellName && field != CellField::Value {
                assert_eq!(table.cell(0, field), Some(&TableCell::Missing), "{field}");
            }
        }
    }

    #[test]
    fn test_string_typed_value_row() {
        let store = CellRecordStore::from(vec![CellRecord::new()
            .with(CellField::CellName, "B2")
            .with(CellField::Value, "Hello")
            .with(CellField::DataType, "str")]);
        let table = materialize(&store);

        assert_eq!(table.cell(0, CellField::Value), Some(&text("Hello")));
        assert_eq!(table.cell(0, CellField::DataType), Some(&token("str")));
    }

    #[test]
    fn test_formula_row_forces_text_value() {
        let store = CellRecordStore::from(vec![CellRecord::new()
            .with(CellField::CellName, "C3")
            .with(CellField::Formula, "=A1+B2")
            .with(CellField::Value, "42")
            .with(CellField::FormulaAttrs, "shared")]);
        let table = materialize(&store);

        assert_eq!(table.cell(0, CellField::Value), Some(&text("42")));
        assert_eq!(table.cell(0, CellField::Formula), Some(&text("=A1+B2")));
        assert_eq!(table.cell(0, CellField::FormulaAttrs), Some(&token("shared")));
    }

    #[test]
    fn test_default_cell_is_missing() {
        assert_eq!(TableCell::default(), TableCell::Missing);
        assert_eq!(TableCell::default().encoding(), None);
    }

    #[test]
    fn test_empty_policy() {
        let store = CellRecordStore::from(vec![CellRecord::new()
            .with(CellField::CellName, "D4")
            .with(CellField::ShowPhonetic, "")]);

        let collapsed = materialize(&store);
        assert_eq!(collapsed.cell(0, CellField::ShowPhonetic), Some(&TableCell::Missing));

        let preserved = materialize_with(&store, &MaterializeOptions::preserving_empty());
        assert_eq!(preserved.cell(0, CellField::ShowPhonetic), Some(&text("")));
        assert_eq!(preserved.cell(0, CellField::Formula), Some(&TableCell::Missing));
    }

    #[test]
    fn test_rows_keep_document_order() {
        let store: CellRecordStore = ["B1", "A1", "A2"]
            .iter()
            .map(|r| CellRecord::with_reference(r))
            .collect();
        let table = materialize(&store);
        let names: Vec<_> = table
            .column(CellField::CellName)
            .cells()
            .iter()
            .map(|c| c.as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["B1", "A1", "A2"]);
        assert_eq!(table.column_by_name("row_r").unwrap().missing_count(), 0);
    }

    fn arb_record() -> impl Strategy<Value = CellRecord> {
        prop::collection::vec(proptest::option::of("[a-z0-9é\"=]{0,4}"), CellField::COUNT).prop_map(
            |values| {
                let mut record = CellRecord::new();
                for (field, value) in CellField::ALL.iter().zip(values) {
                    record.set(*field, value);
                }
                record
            },
        )
    }

    proptest! {
        #[test]
        fn prop_row_count_matches_input(records in prop::collection::vec(arb_record(), 0..40)) {
            let store = CellRecordStore::from(records);
            let table = materialize(&store);
            prop_assert_eq!(table.row_count(), store.len());
            for column in table.columns() {
                prop_assert_eq!(column.len(), store.len());
            }
        }

        #[test]
        fn prop_materialize_is_idempotent(records in prop::collection::vec(arb_record(), 0..20)) {
            let store = CellRecordStore::from(records);
            prop_assert_eq!(materialize(&store), materialize(&store));
        }

        #[test]
        fn prop_value_encoding_follows_context(record in arb_record()) {
            let table = materialize(&CellRecordStore::from(vec![record.clone()]));
            let cell = table.cell(0, CellField::Value).unwrap();
            if record.has(CellField::Value) {
                let typed = record.has(CellField::DataType) || record.has(CellField::FormulaAttrs);
                prop_assert_eq!(cell.encoding().unwrap().is_text(), typed);
            } else {
                prop_assert!(cell.is_missing());
            }
        }
    }
}
