//! XML projection: a hand-rolled recursive-descent parser over a flattened
//! event stream, built on `quick_xml::Reader`.
//!
//! `FromXml::from_xml` takes no inner-stream cipher parameter: `Protected`
//! values are never decrypted here, so `xml_db::entry` substitutes a literal
//! placeholder directly at parse time instead of carrying a cipher handle
//! through every parser.

pub(crate) mod entry;
pub(crate) mod group;
pub(crate) mod meta;

use std::collections::HashMap;
use std::io::{BufReader, Read};
use std::iter::Peekable;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::db::{Group, Meta};
use crate::error::XmlParseError;

/// A flattened, owned view of the XML events this parser cares about.
/// Self-closing tags (`<Foo/>`) are expanded into a `Start` immediately
/// followed by an `End`, matching how `xml-rs`-style readers present them,
/// so parsers never need to special-case empty elements.
#[derive(Debug, Clone)]
pub(crate) enum SimpleXmlEvent {
    Start(String, HashMap<String, String>),
    End(String),
    Characters(String),
}

/// Trait implemented by every piece of the domain tree that can be built
/// from a run of XML events between (and including) its own start and end
/// tags.
pub(crate) trait FromXml {
    type Parses;

    fn from_xml<I: Iterator<Item = SimpleXmlEvent>>(
        iterator: &mut Peekable<I>,
    ) -> Result<Self::Parses, XmlParseError>;
}

/// Parses the whole `<KeePassFile>` document from `source`, returning the
/// projected `Meta` record and the ordered list of top-level groups found
/// directly under `<Root>`. Unrecognized tags accumulate in `warnings`
/// rather than aborting the parse.
pub(crate) fn parse<R: Read>(source: R, warnings: &mut Vec<String>) -> Result<(Meta, Vec<Group>), XmlParseError> {
    let events = read_events(source)?;
    let mut iterator = events.into_iter().peekable();

    let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    expect_start(&open_tag, "KeePassFile")?;

    let mut meta = Meta::default();
    let mut groups = Vec::new();

    while let Some(event) = iterator.peek() {
        match event {
            SimpleXmlEvent::Start(name, _) => match name.as_str() {
                "Meta" => meta = crate::xml_db::meta::parse(&mut iterator, warnings)?,
                "Root" => groups = parse_root(&mut iterator, warnings)?,
                other => {
                    warnings.push(format!("ignoring unknown KeePassFile child <{other}>"));
                    skip_subtree(&mut iterator)?;
                }
            },
            SimpleXmlEvent::End(name) if name == "KeePassFile" => break,
            _ => {
                return Err(XmlParseError::BadEvent {
                    expected: "start tag or close KeePassFile",
                    event: event.clone(),
                })
            }
        }
    }

    let _close_tag = iterator.next().ok_or(XmlParseError::Eof)?;

    Ok((meta, groups))
}

fn parse_root<I: Iterator<Item = SimpleXmlEvent>>(
    iterator: &mut Peekable<I>,
    warnings: &mut Vec<String>,
) -> Result<Vec<Group>, XmlParseError> {
    let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    expect_start(&open_tag, "Root")?;

    let mut groups = Vec::new();

    while let Some(event) = iterator.peek() {
        match event {
            SimpleXmlEvent::Start(name, _) => match name.as_str() {
                "Group" => groups.push(Group::from_xml(iterator)?),
                "DeletedObjects" => skip_subtree(iterator)?,
                other => {
                    warnings.push(format!("ignoring unknown Root child <{other}>"));
                    skip_subtree(iterator)?;
                }
            },
            SimpleXmlEvent::End(name) if name == "Root" => break,
            _ => {
                return Err(XmlParseError::BadEvent {
                    expected: "start tag or close Root",
                    event: event.clone(),
                })
            }
        }
    }

    let _close_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    Ok(groups)
}

/// Consumes and discards events from the upcoming start tag through its
/// matching end tag. Used for subtrees this spec doesn't project (e.g.
/// `<DeletedObjects>`) and for unrecognized tags tolerated per the
/// diagnostic channel.
pub(crate) fn skip_subtree<I: Iterator<Item = SimpleXmlEvent>>(iterator: &mut Peekable<I>) -> Result<(), XmlParseError> {
    let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    let name = match open_tag {
        SimpleXmlEvent::Start(name, _) => name,
        other => {
            return Err(XmlParseError::BadEvent {
                expected: "start tag",
                event: other,
            })
        }
    };

    let mut depth = 1usize;
    loop {
        match iterator.next().ok_or(XmlParseError::Eof)? {
            SimpleXmlEvent::Start(n, _) if n == name => depth += 1,
            SimpleXmlEvent::End(n) if n == name => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            SimpleXmlEvent::Start(_, _) | SimpleXmlEvent::End(_) | SimpleXmlEvent::Characters(_) => {}
        }
    }
}

pub(crate) fn expect_start(event: &SimpleXmlEvent, tag: &'static str) -> Result<(), XmlParseError> {
    match event {
        SimpleXmlEvent::Start(name, _) if name == tag => Ok(()),
        other => Err(XmlParseError::BadEvent {
            expected: tag,
            event: other.clone(),
        }),
    }
}

/// Helper type denoting a leaf tag whose text content parses into `V`.
#[derive(Debug)]
pub(crate) struct SimpleTag<V> {
    pub(crate) value: V,
}

impl<V: FromXmlCharacters> FromXml for SimpleTag<V> {
    type Parses = SimpleTag<V>;

    fn from_xml<I: Iterator<Item = SimpleXmlEvent>>(iterator: &mut Peekable<I>) -> Result<Self::Parses, XmlParseError> {
        let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
        let name = match open_tag {
            SimpleXmlEvent::Start(name, _) => name,
            other => {
                return Err(XmlParseError::BadEvent {
                    expected: "open tag",
                    event: other,
                })
            }
        };

        // An empty element (`<Foo></Foo>` with no text, or the `<Foo/>` form
        // already expanded by `read_events`) parses as the empty string.
        let text = match iterator.peek() {
            Some(SimpleXmlEvent::Characters(_)) => {
                if let Some(SimpleXmlEvent::Characters(text)) = iterator.next() {
                    text
                } else {
                    unreachable!()
                }
            }
            _ => String::new(),
        };

        let close_tag = iterator.next().ok_or(XmlParseError::Eof)?;
        if !matches!(&close_tag, SimpleXmlEvent::End(n) if n == &name) {
            return Err(XmlParseError::BadEvent {
                expected: "close tag",
                event: close_tag,
            });
        }

        Ok(SimpleTag { value: V::from_xml_characters(&text)? })
    }
}

/// Conversions from a leaf tag's text body into a concrete type. Kept
/// separate from `FromXml` since the text-to-value mapping needs per-type
/// customization (e.g. KeePass's `"True"`/`"False"` booleans) that `FromStr`
/// can't express for foreign types like `bool`.
pub(crate) trait FromXmlCharacters: Sized {
    fn from_xml_characters(s: &str) -> Result<Self, XmlParseError>;
}

impl FromXmlCharacters for String {
    fn from_xml_characters(s: &str) -> Result<Self, XmlParseError> {
        Ok(s.to_string())
    }
}

impl FromXmlCharacters for bool {
    fn from_xml_characters(s: &str) -> Result<Self, XmlParseError> {
        Ok(s == "True")
    }
}

impl FromXmlCharacters for i64 {
    fn from_xml_characters(s: &str) -> Result<Self, XmlParseError> {
        Ok(s.parse()?)
    }
}

fn read_events<R: Read>(source: R) -> Result<Vec<SimpleXmlEvent>, XmlParseError> {
    let mut reader = Reader::from_reader(BufReader::new(source));
    let config = reader.config_mut();
    config.trim_text(true);

    let mut buf = Vec::new();
    let mut events = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                events.push(SimpleXmlEvent::Start(name, read_attributes(&e)?));
            }
            Event::Empty(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                let attrs = read_attributes(&e)?;
                events.push(SimpleXmlEvent::Start(name.clone(), attrs));
                events.push(SimpleXmlEvent::End(name));
            }
            Event::End(e) => {
                let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                events.push(SimpleXmlEvent::End(name));
            }
            Event::Text(e) => {
                let text = e.unescape()?.into_owned();
                if !text.is_empty() {
                    events.push(SimpleXmlEvent::Characters(text));
                }
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e.into_inner())?.to_string();
                events.push(SimpleXmlEvent::Characters(text));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(events)
}

fn read_attributes(tag: &quick_xml::events::BytesStart<'_>) -> Result<HashMap<String, String>, XmlParseError> {
    let mut attrs = HashMap::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| XmlParseError::Syntax(quick_xml::Error::InvalidAttr(e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}
