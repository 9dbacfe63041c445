//! XML record schema parser.
//!
//! This module turns schema documents of the form
//!
//! ```xml
//! <schema>
//!   <record name="Person">
//!     <field name="name" type="string"/>
//!     <field name="nickname" type="string" presence="optional"/>
//!     <field name="id" type="int64" mutability="immutable" default="0"/>
//!   </record>
//! </schema>
//! ```
//!
//! into a [`SchemaSet`]. The parser checks syntax and attribute values only;
//! cross-record consistency is checked by [`crate::validation`].

use crate::error::ParseError;
use crate::ir::{Field, Record, SchemaSet};
use crate::types::{FieldType, Literal, Mutability, Optionality};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::events::attributes::Attribute;
use std::borrow::Cow;
use std::path::Path;

/// Parses a record schema from a string.
///
/// # Arguments
/// * `xml` - XML schema content
/// * `source` - Label recorded on every record (usually the file name)
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or contains invalid schema elements.
pub fn parse_schema(xml: &str, source: &str) -> Result<SchemaSet, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut set: Option<SchemaSet> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "schema" if set.is_none() => set = Some(SchemaSet::new()),
                    "record" => {
                        let set = set.as_mut().ok_or_else(|| outside_schema("record"))?;
                        let mut record = parse_record_header(e, source)?;
                        parse_record_fields(&mut reader, &mut record)?;
                        set.add_record(record);
                    }
                    other => return Err(ParseError::unknown_element(other, "schema")),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_bytes)?;
                match name {
                    "schema" if set.is_none() => set = Some(SchemaSet::new()),
                    "record" => {
                        let set = set.as_mut().ok_or_else(|| outside_schema("record"))?;
                        set.add_record(parse_record_header(e, source)?);
                    }
                    other => return Err(ParseError::unknown_element(other, "schema")),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    set.ok_or_else(|| ParseError::InvalidStructure {
        message: "No schema element found".to_string(),
    })
}

/// Parses a record schema file.
///
/// Records are labelled with the file name.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_schema_file(path: &Path) -> Result<SchemaSet, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    let source = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    parse_schema(&xml, &source)
}

fn outside_schema(element: &str) -> ParseError {
    ParseError::InvalidStructure {
        message: format!("<{element}> must appear inside <schema>"),
    }
}

/// Reads an attribute value, resolving XML escapes.
fn attr_value<'a>(
    attr: &'a Attribute<'_>,
    element: &str,
) -> Result<(&'a str, Cow<'a, str>), ParseError> {
    let key = std::str::from_utf8(attr.key.as_ref())?;
    let raw = std::str::from_utf8(&attr.value)?;
    let value = quick_xml::escape::unescape(raw)
        .map_err(|_| ParseError::invalid_attr(element, key, raw))?;
    Ok((key, value))
}

/// Parses the record element attributes.
fn parse_record_header(e: &BytesStart<'_>, source: &str) -> Result<Record, ParseError> {
    let mut name = None;

    for attr in e.attributes().flatten() {
        let (key, value) = attr_value(&attr, "record")?;
        if key == "name" {
            name = Some(value.into_owned());
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("record", "name"))?;
    Ok(Record::new(name, source))
}

/// Parses the fields of a record up to its end tag.
fn parse_record_fields(reader: &mut Reader<&[u8]>, record: &mut Record) -> Result<(), ParseError> {
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                if tag_name != "field" {
                    return Err(ParseError::unknown_element(tag_name, "record"));
                }
                record.add_field(parse_field(e)?);
                skip_to_end(reader)?;
            }
            Ok(Event::Empty(ref e)) => {
                let name_bytes = e.name().as_ref().to_vec();
                let tag_name = std::str::from_utf8(&name_bytes)?;
                if tag_name != "field" {
                    return Err(ParseError::unknown_element(tag_name, "record"));
                }
                record.add_field(parse_field(e)?);
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(ParseError::InvalidStructure {
                    message: format!("record '{}' is not closed", record.name),
                });
            }
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

/// Parses a field element.
fn parse_field(e: &BytesStart<'_>) -> Result<Field, ParseError> {
    let mut name = None;
    let mut type_name = None;
    let mut optionality = Optionality::Required;
    let mut mutability = Mutability::Mutable;
    let mut default = None;

    for attr in e.attributes().flatten() {
        let (key, value) = attr_value(&attr, "field")?;

        match key {
            "name" => name = Some(value.into_owned()),
            "type" => type_name = Some(value.into_owned()),
            "presence" => {
                optionality = Optionality::parse(&value)
                    .ok_or_else(|| ParseError::invalid_attr("field", "presence", &*value))?
            }
            "mutability" => {
                mutability = Mutability::parse(&value)
                    .ok_or_else(|| ParseError::invalid_attr("field", "mutability", &*value))?
            }
            "default" => default = Some(value.into_owned()),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ParseError::missing_attr("field", "name"))?;
    let type_name = type_name.ok_or_else(|| ParseError::missing_attr("field", "type"))?;

    let mut field = Field::new(name, FieldType::parse(&type_name));
    if optionality == Optionality::Optional {
        field = field.optional();
    }
    field.mutability = mutability;

    if let Some(text) = default {
        let literal = Literal::parse(&text, &field.ty)
            .ok_or_else(|| ParseError::invalid_attr("field", "default", text.as_str()))?;
        field = field.with_default(literal);
    }

    Ok(field)
}

/// Skips to the end of the current element.
fn skip_to_end(reader: &mut Reader<&[u8]>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}
