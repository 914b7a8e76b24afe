//! Cell records and the record store
//!
//! A [`CellRecord`] is the raw attribute/text bundle of one `<c>` element.
//! Every field is optional: `None` means the attribute or child element was
//! not present, `Some("")` means it was present but empty.

use std::fmt;
use std::slice;

/// The twelve positional fields of a [`CellRecord`], in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellField {
    /// Full cell reference (`A1`)
    CellName,
    /// Row component of the reference (`1`)
    RowName,
    /// Column component of the reference (`A`)
    ColName,
    /// Style index (`c/@s`)
    StyleIndex,
    /// Declared data type (`c/@t`)
    DataType,
    /// Cell metadata index (`c/@cm`)
    CellMetaIndex,
    /// Show phonetic flag (`c/@ph`)
    ShowPhonetic,
    /// Value metadata index (`c/@vm`)
    ValueMetaIndex,
    /// `<v>` content
    Value,
    /// `<f>` content
    Formula,
    /// Serialized `<f>` attributes
    FormulaAttrs,
    /// `<is>` markup
    InlineString,
}

impl CellField {
    /// All fields in schema order
    pub const ALL: [CellField; 12] = [
        CellField::CellName,
        CellField::RowName,
        CellField::ColName,
        CellField::StyleIndex,
        CellField::DataType,
        CellField::CellMetaIndex,
        CellField::ShowPhonetic,
        CellField::ValueMetaIndex,
        CellField::Value,
        CellField::Formula,
        CellField::FormulaAttrs,
        CellField::InlineString,
    ];

    /// Number of fields in the schema
    pub const COUNT: usize = Self::ALL.len();

    /// Column name used in the materialized table
    pub fn column_name(self) -> &'static str {
        match self {
            CellField::CellName => "r",
            CellField::RowName => "row_r",
            CellField::ColName => "c_r",
            CellField::StyleIndex => "c_s",
            CellField::DataType => "c_t",
            CellField::CellMetaIndex => "c_cm",
            CellField::ShowPhonetic => "c_ph",
            CellField::ValueMetaIndex => "c_vm",
            CellField::Value => "v",
            CellField::Formula => "f",
            CellField::FormulaAttrs => "f_attr",
            CellField::InlineString => "is",
        }
    }

    /// Look up a field by its column name
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.column_name() == name)
    }

    /// Position of the field in the schema
    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CellField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One cell's raw XML-derived attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellRecord {
    pub cell_name: Option<String>,
    pub row_name: Option<String>,
    pub col_name: Option<String>,
    pub style_index: Option<String>,
    pub data_type: Option<String>,
    pub cell_meta_index: Option<String>,
    pub show_phonetic: Option<String>,
    pub value_meta_index: Option<String>,
    pub value: Option<String>,
    pub formula: Option<String>,
    pub formula_attrs: Option<String>,
    pub inline_string: Option<String>,
}

impl CellRecord {
    /// Create an empty record (every field absent)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record for a cell reference such as `B7`.
    ///
    /// The row and column components are split out of the reference when it
    /// is well formed.
    pub fn with_reference(reference: &str) -> Self {
        let mut record = Self {
            cell_name: Some(reference.to_string()),
            ..Self::default()
        };
        if let Some((col, row)) = crate::reference::split_reference(reference) {
            record.col_name = Some(col.to_string());
            record.row_name = Some(row.to_string());
        }
        record
    }

    /// Builder-style setter for any field
    pub fn with(mut self, field: CellField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Get a field by position
    pub fn get(&self, field: CellField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Set or clear a field
    pub fn set(&mut self, field: CellField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// True when the field is present and non-empty
    pub fn has(&self, field: CellField) -> bool {
        self.get(field).map_or(false, |s| !s.is_empty())
    }

    fn slot(&self, field: CellField) -> &Option<String> {
        match field {
            CellField::CellName => &self.cell_name,
            CellField::RowName => &self.row_name,
            CellField::ColName => &self.col_name,
            CellField::StyleIndex => &self.style_index,
            CellField::DataType => &self.data_type,
            CellField::CellMetaIndex => &self.cell_meta_index,
            CellField::ShowPhonetic => &self.show_phonetic,
            CellField::ValueMetaIndex => &self.value_meta_index,
            CellField::Value => &self.value,
            CellField::Formula => &self.formula,
            CellField::FormulaAttrs => &self.formula_attrs,
            CellField::InlineString => &self.inline_string,
        }
    }

    fn slot_mut(&mut self, field: CellField) -> &mut Option<String> {
        match field {
            CellField::CellName => &mut self.cell_name,
            CellField::RowName => &mut self.row_name,
            CellField::ColName => &mut self.col_name,
            CellField::StyleIndex => &mut self.style_index,
            CellField::DataType => &mut self.data_type,
            CellField::CellMetaIndex => &mut self.cell_meta_index,
            CellField::ShowPhonetic => &mut self.show_phonetic,
            CellField::ValueMetaIndex => &mut self.value_meta_index,
            CellField::Value => &mut self.value,
            CellField::Formula => &mut self.formula,
            CellField::FormulaAttrs => &mut self.formula_attrs,
            CellField::InlineString => &mut self.inline_string,
        }
    }
}

/// Ordered, read-only sequence of [`CellRecord`]s in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellRecordStore {
    records: Vec<CellRecord>,
}

impl CellRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records in document order
    pub fn iter(&self) -> slice::Iter<'_, CellRecord> {
        self.records.iter()
    }

    /// Borrow the records as a slice
    pub fn as_slice(&self) -> &[CellRecord] {
        &self.records
    }
}

impl From<Vec<CellRecord>> for CellRecordStore {
    fn from(records: Vec<CellRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<CellRecord> for CellRecordStore {
    fn from_iter<I: IntoIterator<Item = CellRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CellRecordStore {
    type Item = &'a CellRecord;
    type IntoIter = slice::Iter<'a, CellRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for CellRecordStore {
    type Item = CellRecord;
    type IntoIter = std::vec::IntoIter<CellRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_positions() {
        for (i, field) in CellField::ALL.iter().enumerate() {
            assert_eq!(field.position(), i);
        }
        assert_eq!(CellField::COUNT, 12);
    }

    #[test]
    fn test_column_name_lookup() {
        assert_eq!(CellField::from_column_name("f_attr"), Some(CellField::FormulaAttrs));
        assert_eq!(CellField::from_column_name("is"), Some(CellField::InlineString));
        assert_eq!(CellField::from_column_name("nope"), None);
        assert_eq!(CellField::Value.to_string(), "v");
    }

    #[test]
    fn test_with_reference_splits_components() {
        let record = CellRecord::with_reference("AB12");
        assert_eq!(record.get(CellField::CellName), Some("AB12"));
        assert_eq!(record.get(CellField::ColName), Some("AB"));
        assert_eq!(record.get(CellField::RowName), Some("12"));
    }

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let record = CellRecord::new().with(CellField::DataType, "");
        assert_eq!(record.get(CellField::DataType), Some(""));
        assert!(!record.has(CellField::DataType));
        assert_eq!(record.get(CellField::Value), None);
        assert!(!record.has(CellField::Value));
    }

    #[test]
    fn test_store_preserves_order() {
        let store: CellRecordStore = ["A1", "B1", "A2"]
            .iter()
            .map(|r| CellRecord::with_reference(r))
            .collect();
        let names: Vec<_> = store
            .iter()
            .map(|r| r.get(CellField::CellName).unwrap())
            .collect();
        assert_eq!(names, vec!["A1", "B1", "A2"]);
        assert_eq!(store.len(), 3);
        assert!(!store.is_empty());
    }
}
