//! Projection of `<Group>` elements.
//!
//! Walks `uuid`, `name`, `icon_id`, `is_expanded`, and child entries, and
//! recurses into nested `<Group>` children to build the full group tree.

use std::iter::Peekable;

use crate::db::Group;
use crate::error::XmlParseError;
use crate::xml_db::{expect_start, skip_subtree, FromXml, SimpleTag, SimpleXmlEvent};

impl FromXml for Group {
    type Parses = Self;

    fn from_xml<I: Iterator<Item = SimpleXmlEvent>>(iterator: &mut Peekable<I>) -> Result<Self::Parses, XmlParseError> {
        let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
        expect_start(&open_tag, "Group")?;

        let mut group = Group::default();

        while let Some(event) = iterator.peek() {
            match event {
                SimpleXmlEvent::Start(name, _) => match name.as_str() {
                    "UUID" => group.uuid = tag::<String>(iterator)?,
                    "Name" => group.name = tag::<String>(iterator)?,
                    "Notes" => group.notes = Some(tag::<String>(iterator)?),
                    "IconId" => group.icon_id = tag::<i64>(iterator)?,
                    "IsExpanded" => group.is_expanded = tag::<bool>(iterator)?,
                    "EnableAutoType" => group.enable_auto_type = Some(tag::<String>(iterator)?),
                    "EnableSearching" => group.enable_searching = Some(tag::<String>(iterator)?),
                    "LastTopVisibleEntry" => group.last_top_visible_entry = Some(tag::<String>(iterator)?),
                    "Entry" => group.entries.push(crate::db::Entry::from_xml(iterator)?),
                    "Group" => group.groups.push(Group::from_xml(iterator)?),
                    _ => skip_subtree(iterator)?,
                },
                SimpleXmlEvent::End(name) if name == "Group" => break,
                _ => {
                    return Err(XmlParseError::BadEvent {
                        expected: "start tag or close Group",
                        event: event.clone(),
                    })
                }
            }
        }

        let _close_tag = iterator.next().ok_or(XmlParseError::Eof)?;
        Ok(group)
    }
}

fn tag<V: crate::xml_db::FromXmlCharacters>(
    iterator: &mut Peekable<impl Iterator<Item = SimpleXmlEvent>>,
) -> Result<V, XmlParseError> {
    Ok(SimpleTag::<V>::from_xml(iterator)?.value)
}
