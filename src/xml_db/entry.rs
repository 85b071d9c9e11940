//! Projection of `<Entry>` elements and their `<String>` fields.
//!
//! A `<Value Protected="True">` attribute is checked at parse time and
//! substituted with a placeholder immediately, since inner-stream
//! decryption is out of scope for this reader.

use std::iter::Peekable;

use crate::db::entry::{Entry, Fields};
use crate::error::XmlParseError;
use crate::xml_db::{expect_start, skip_subtree, FromXml, SimpleTag, SimpleXmlEvent};

impl FromXml for Entry {
    type Parses = Self;

    fn from_xml<I: Iterator<Item = SimpleXmlEvent>>(iterator: &mut Peekable<I>) -> Result<Self::Parses, XmlParseError> {
        let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
        expect_start(&open_tag, "Entry")?;

        let mut uuid = String::new();
        let mut fields = Fields::default();

        while let Some(event) = iterator.peek() {
            match event {
                SimpleXmlEvent::Start(name, _) => match name.as_str() {
                    "UUID" => uuid = SimpleTag::<String>::from_xml(iterator)?.value,
                    "String" => {
                        let (key, value, protected) = parse_string_field(iterator)?;
                        fields.push(key, value, protected);
                    }
                    _ => skip_subtree(iterator)?,
                },
                SimpleXmlEvent::End(name) if name == "Entry" => break,
                _ => {
                    return Err(XmlParseError::BadEvent {
                        expected: "start tag or close Entry",
                        event: event.clone(),
                    })
                }
            }
        }

        let _close_tag = iterator.next().ok_or(XmlParseError::Eof)?;
        Ok(Entry { uuid, fields })
    }
}

/// Parses `<String><Key>K</Key><Value Protected="True|False">V</Value></String>`,
/// substituting the literal `"Protected"` placeholder when the `Protected`
/// attribute is `"True"`.
fn parse_string_field<I: Iterator<Item = SimpleXmlEvent>>(
    iterator: &mut Peekable<I>,
) -> Result<(String, String, bool), XmlParseError> {
    let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    expect_start(&open_tag, "String")?;

    let mut key = String::new();
    let mut value = String::new();
    let mut protected = false;

    while let Some(event) = iterator.peek() {
        match event {
            SimpleXmlEvent::Start(name, _) if name == "Key" => {
                key = SimpleTag::<String>::from_xml(iterator)?.value;
            }
            SimpleXmlEvent::Start(name, attrs) if name == "Value" => {
                protected = attrs.get("Protected").map(|v| v == "True").unwrap_or(false);
                let raw = SimpleTag::<String>::from_xml(iterator)?.value;
                value = if protected { "Protected".to_string() } else { raw };
            }
            SimpleXmlEvent::Start(_, _) => skip_subtree(iterator)?,
            SimpleXmlEvent::End(name) if name == "String" => break,
            _ => {
                return Err(XmlParseError::BadEvent {
                    expected: "start tag or close String",
                    event: event.clone(),
                })
            }
        }
    }

    let _close_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    Ok((key, value, protected))
}
