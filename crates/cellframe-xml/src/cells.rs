//! Sheet cell records
//!
//! Reads every `<c>` element of a worksheet into a [`CellRecord`], either
//! straight from XML bytes or from an already parsed [`XmlDocument`]. Both
//! paths produce identical stores for the same input.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use cellframe_core::reference::split_reference;
use cellframe_core::{CellRecord, CellRecordStore, CellReference, MAX_COLS, MAX_ROWS};

use crate::document::{collect_attributes, TreeBuilder, XmlDocument, XmlElement};
use crate::error::{XmlError, XmlResult};

/// Options for reading cell records
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Fill in references for `<c>` elements without an `r` attribute,
    /// continuing from the previous cell in the row (default: true)
    pub infer_references: bool,
    /// Decode Excel `_xHHHH_` escapes in `<v>` text (default: false)
    pub decode_escapes: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            infer_references: true,
            decode_escapes: false,
        }
    }
}

/// Read cell records from worksheet XML without keeping the tree
pub fn read_cell_records(bytes: &[u8], options: &ReadOptions) -> XmlResult<CellRecordStore> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut cursor = RowCursor::default();
    let mut records = Vec::new();

    let mut depth = 0usize;
    // xml:space="preserve" in scope, per open element outside <is>
    let mut spaces: Vec<bool> = Vec::new();
    let mut current: Option<CellRecord> = None;
    let mut target: Option<TextTarget> = None;
    let mut inline: Option<TreeBuilder> = None;

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => return Err(XmlError::parse(reader.buffer_position(), e)),
        };
        let position = reader.buffer_position();

        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }

        // Inside <is>: capture the subtree verbatim
        if let Some(builder) = inline.as_mut() {
            let done = match event {
                Event::Start(e) => {
                    builder.start(&e, position)?;
                    None
                }
                Event::Empty(e) => builder.empty(&e, position)?,
                Event::End(e) => builder.end(e.name().as_ref(), position)?,
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| XmlError::parse(position, err))?;
                    builder.text(&text, position)?;
                    None
                }
                Event::CData(e) => {
                    let text = String::from_utf8(e.into_inner().into_owned())
                        .map_err(|err| XmlError::parse(position, err))?;
                    builder.cdata(&text, position)?;
                    None
                }
                Event::Eof => {
                    builder.finish(position)?;
                    None
                }
                _ => None,
            };
            if let Some(element) = done {
                if let Some(record) = current.as_mut() {
                    record.inline_string = Some(element.to_xml_string()?);
                }
                inline = None;
                spaces.pop();
            }
            buf.clear();
            continue;
        }

        match event {
            Event::Start(e) => {
                let inherited = spaces.last().copied().unwrap_or(false);
                spaces.push(space_preserve(&e, position)?.unwrap_or(inherited));
                match local_name(&e) {
                    b"row" => cursor.start_row(&collect_attributes(&e, position)?),
                    b"c" => {
                        let attributes = collect_attributes(&e, position)?;
                        current = Some(cursor.cell(&attributes, options));
                    }
                    b"v" if current.is_some() => {
                        if let Some(record) = current.as_mut() {
                            record.value = Some(String::new());
                        }
                        target = Some(TextTarget::Value);
                    }
                    b"f" if current.is_some() => {
                        let attributes = collect_attributes(&e, position)?;
                        if let Some(record) = current.as_mut() {
                            record.formula = Some(String::new());
                            record.formula_attrs = format_attributes(&attributes);
                        }
                        target = Some(TextTarget::Formula);
                    }
                    b"is" if current.is_some() => {
                        let mut builder = TreeBuilder::inheriting(inherited);
                        builder.start(&e, position)?;
                        inline = Some(builder);
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match local_name(&e) {
                b"row" => cursor.start_row(&collect_attributes(&e, position)?),
                b"c" => {
                    let attributes = collect_attributes(&e, position)?;
                    records.push(finish_cell(cursor.cell(&attributes, options), options));
                }
                b"v" => {
                    if let Some(record) = current.as_mut() {
                        record.value = Some(String::new());
                    }
                }
                b"f" => {
                    let attributes = collect_attributes(&e, position)?;
                    if let Some(record) = current.as_mut() {
                        record.formula = Some(String::new());
                        record.formula_attrs = format_attributes(&attributes);
                    }
                }
                b"is" => {
                    if let (Some(record), Some(element)) =
                        (current.as_mut(), TreeBuilder::new().empty(&e, position)?)
                    {
                        record.inline_string = Some(element.to_xml_string()?);
                    }
                }
                _ => {}
            },
            Event::End(e) => {
                spaces.pop();
                match local_part_bytes(e.name().as_ref()) {
                    b"c" => {
                        if let Some(record) = current.take() {
                            records.push(finish_cell(record, options));
                        }
                        target = None;
                    }
                    b"v" | b"f" => target = None,
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let (Some(field), Some(record)) = (target, current.as_mut()) {
                    let text = e.unescape().map_err(|err| XmlError::parse(position, err))?;
                    field.append(record, &text);
                }
            }
            Event::CData(e) => {
                if let (Some(field), Some(record)) = (target, current.as_mut()) {
                    let text = String::from_utf8(e.into_inner().into_owned())
                        .map_err(|err| XmlError::parse(position, err))?;
                    field.append(record, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(XmlError::parse(
            reader.buffer_position(),
            "unexpected end of input inside an element",
        ));
    }

    log::debug!("read {} cell records", records.len());
    Ok(CellRecordStore::from(records))
}

/// Read cell records from a parsed document
pub fn cell_records(document: &XmlDocument, options: &ReadOptions) -> XmlResult<CellRecordStore> {
    let mut cursor = RowCursor::default();
    let mut records = Vec::new();
    visit(document.root(), &mut cursor, options, &mut records)?;
    log::debug!("collected {} cell records from document", records.len());
    Ok(CellRecordStore::from(records))
}

fn visit(
    element: &XmlElement,
    cursor: &mut RowCursor,
    options: &ReadOptions,
    records: &mut Vec<CellRecord>,
) -> XmlResult<()> {
    match element.local_name() {
        "c" => {
            records.push(cell_from_element(element, cursor, options)?);
            return Ok(());
        }
        "row" => cursor.start_row(element.attributes()),
        _ => {}
    }
    for child in element.child_elements() {
        visit(child, cursor, options, records)?;
    }
    Ok(())
}

fn cell_from_element(
    element: &XmlElement,
    cursor: &mut RowCursor,
    options: &ReadOptions,
) -> XmlResult<CellRecord> {
    let mut record = cursor.cell(element.attributes(), options);
    for child in element.child_elements() {
        match child.local_name() {
            "v" => record.value = Some(child.text()),
            "f" => {
                record.formula = Some(child.text());
                record.formula_attrs = format_attributes(child.attributes());
            }
            "is" => record.inline_string = Some(child.to_xml_string()?),
            _ => {}
        }
    }
    Ok(finish_cell(record, options))
}

fn finish_cell(mut record: CellRecord, options: &ReadOptions) -> CellRecord {
    if options.decode_escapes {
        if let Some(value) = record.value.as_mut() {
            *value = decode_excel_escapes(value);
        }
    }
    record
}

#[derive(Debug, Clone, Copy)]
enum TextTarget {
    Value,
    Formula,
}

impl TextTarget {
    fn append(self, record: &mut CellRecord, text: &str) {
        let slot = match self {
            TextTarget::Value => &mut record.value,
            TextTarget::Formula => &mut record.formula,
        };
        slot.get_or_insert_with(String::new).push_str(text);
    }
}

/// Tracks the current row and column so missing references can be inferred
#[derive(Debug, Default)]
struct RowCursor {
    row: u32,
    last_col: u32,
}

impl RowCursor {
    fn start_row(&mut self, attributes: &[(String, String)]) {
        let explicit = attribute(attributes, "r").and_then(|r| r.parse::<u32>().ok());
        let row = explicit.unwrap_or_else(|| self.row.saturating_add(1));
        if row > MAX_ROWS {
            log::warn!("row {row} is beyond the sheet limit of {MAX_ROWS} rows");
        }
        self.row = row;
        self.last_col = 0;
    }

    fn cell(&mut self, attributes: &[(String, String)], options: &ReadOptions) -> CellRecord {
        let mut record = CellRecord::new();
        for (key, value) in attributes {
            match key.as_str() {
                "r" => record.cell_name = Some(value.clone()),
                "s" => record.style_index = Some(value.clone()),
                "t" => record.data_type = Some(value.clone()),
                "cm" => record.cell_meta_index = Some(value.clone()),
                "ph" => record.show_phonetic = Some(value.clone()),
                "vm" => record.value_meta_index = Some(value.clone()),
                _ => {}
            }
        }

        match record.cell_name.as_deref() {
            Some(reference) => {
                if let Some((letters, digits)) = split_reference(reference) {
                    record.col_name = Some(letters.to_string());
                    record.row_name = Some(digits.to_string());
                }
                match CellReference::parse(reference) {
                    Ok(parsed) => {
                        self.row = parsed.row;
                        self.last_col = parsed.col;
                    }
                    Err(e) => log::warn!("unparseable cell reference {reference:?}: {e}"),
                }
            }
            None if options.infer_references => {
                let row = self.row.max(1);
                let inferred = CellReference::new(row, self.last_col.saturating_add(1));
                if inferred.col > MAX_COLS {
                    log::warn!("inferred column {} is beyond the sheet limit", inferred.col);
                }
                log::trace!("inferred cell reference {inferred}");
                self.row = row;
                self.last_col = inferred.col;
                record.cell_name = Some(inferred.to_string());
                record.col_name = Some(inferred.column_letters());
                record.row_name = Some(inferred.row.to_string());
            }
            None => {}
        }

        record
    }
}

/// `Some(true)` for `xml:space="preserve"`, `Some(false)` for any other value
fn space_preserve(e: &BytesStart<'_>, position: usize) -> XmlResult<Option<bool>> {
    let attr = e
        .try_get_attribute("xml:space")
        .map_err(|err| XmlError::parse(position, err))?;
    Ok(attr.map(|a| a.value.as_ref() == b"preserve"))
}

fn attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// `t="shared" ref="B2:B9" si="0"`; `None` when there are no attributes
fn format_attributes(attributes: &[(String, String)]) -> Option<String> {
    if attributes.is_empty() {
        return None;
    }
    let parts: Vec<String> = attributes
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"", escape(value.as_str())))
        .collect();
    Some(parts.join(" "))
}

fn local_name<'a>(e: &'a BytesStart<'_>) -> &'a [u8] {
    local_part_bytes(e.name().into_inner())
}

fn local_part_bytes(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Decode Excel's `_xHHHH_` escapes (`_x000d_` = CR, `_x005f_` = `_`).
///
/// Anything that is not exactly `_x` + four hex digits + `_` is kept as is.
fn decode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(idx) = rest.find("_x") {
        result.push_str(&rest[..idx]);
        let candidate = &rest[idx..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push('_');
                rest = &candidate[1..];
            }
        }
    }
    result.push_str(rest);
    result
}
