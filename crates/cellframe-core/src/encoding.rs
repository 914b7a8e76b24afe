//! Encoding policy
//!
//! Decides, per field and per record, whether a value must be handed to the
//! host as declared-encoding text or may be copied as a plain token. Hosts
//! running without native multi-byte support have to tag or convert text
//! values; structural identifiers and raw numeric literals never need it.

use crate::record::{CellField, CellRecord};

/// How a present field value is represented in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEncoding {
    /// ASCII-safe token copied byte for byte
    Token,
    /// Free-form text carrying its declared (UTF-8) encoding
    Text,
}

impl FieldEncoding {
    /// Check if this is declared-encoding text
    pub fn is_text(self) -> bool {
        matches!(self, FieldEncoding::Text)
    }
}

/// Select the representation of `field` within `record`.
///
/// `<v>` holds a raw number unless the cell declares a type (`t="s"`,
/// `t="str"`, `t="b"`, ...) or its formula carries attributes, in which case
/// the cached value may echo arbitrary text.
pub fn encoding_for(field: CellField, record: &CellRecord) -> FieldEncoding {
    match field {
        CellField::CellName
        | CellField::RowName
        | CellField::ColName
        | CellField::StyleIndex
        | CellField::DataType
        | CellField::CellMetaIndex
        | CellField::ValueMetaIndex
        | CellField::FormulaAttrs => FieldEncoding::Token,
        CellField::ShowPhonetic | CellField::Formula | CellField::InlineString => {
            FieldEncoding::Text
        }
        CellField::Value => {
            if record.has(CellField::DataType) || record.has(CellField::FormulaAttrs) {
                FieldEncoding::Text
            } else {
                FieldEncoding::Token
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_fields_are_tokens() {
        let record = CellRecord::new().with(CellField::DataType, "str");
        for field in [
            CellField::CellName,
            CellField::RowName,
            CellField::ColName,
            CellField::StyleIndex,
            CellField::DataType,
            CellField::CellMetaIndex,
            CellField::ValueMetaIndex,
            CellField::FormulaAttrs,
        ] {
            assert_eq!(encoding_for(field, &record), FieldEncoding::Token, "{field}");
        }
    }

    #[test]
    fn test_free_text_fields_are_text() {
        let record = CellRecord::new();
        assert!(encoding_for(CellField::ShowPhonetic, &record).is_text());
        assert!(encoding_for(CellField::Formula, &record).is_text());
        assert!(encoding_for(CellField::InlineString, &record).is_text());
    }

    #[test]
    fn test_numeric_value_is_token() {
        let record = CellRecord::new()
            .with(CellField::Value, "42")
            .with(CellField::DataType, "")
            .with(CellField::FormulaAttrs, "");
        assert_eq!(encoding_for(CellField::Value, &record), FieldEncoding::Token);
    }

    #[test]
    fn test_typed_value_is_text() {
        for t in ["str", "s", "b", "e", "inlineStr"] {
            let record = CellRecord::new()
                .with(CellField::Value, "x")
                .with(CellField::DataType, t);
            assert_eq!(encoding_for(CellField::Value, &record), FieldEncoding::Text, "{t}");
        }
    }

    #[test]
    fn test_formula_attrs_force_text_value() {
        let record = CellRecord::new()
            .with(CellField::Value, "42")
            .with(CellField::FormulaAttrs, "t=\"shared\" si=\"0\"");
        assert_eq!(encoding_for(CellField::Value, &record), FieldEncoding::Text);
    }
}
