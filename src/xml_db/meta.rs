//! Projection of `<KeePassFile><Meta>`.
//!
//! Tag dispatch is a lookup-by-name that tolerates unrecognized tags rather
//! than failing the parse, covering the tag set a KDBX2/3 database actually
//! writes (KDBX4-era fields like the binary pool and custom-icon list are
//! not part of this reader's `Meta` record).

use std::iter::Peekable;

use crate::db::Meta;
use crate::error::XmlParseError;
use crate::xml_db::{expect_start, skip_subtree, FromXmlCharacters, SimpleTag, SimpleXmlEvent};

/// Parses `<Meta>...</Meta>`, pushing a warning for every tag this reader
/// doesn't recognize instead of failing the load.
pub(crate) fn parse<I: Iterator<Item = SimpleXmlEvent>>(
    iterator: &mut Peekable<I>,
    warnings: &mut Vec<String>,
) -> Result<Meta, XmlParseError> {
    let open_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    expect_start(&open_tag, "Meta")?;

    let mut meta = Meta::default();

    while let Some(event) = iterator.peek() {
        match event {
            SimpleXmlEvent::Start(name, _) => match name.as_str() {
                "Generator" => meta.generator = Some(tag::<String>(iterator)?),
                "HeaderHash" => meta.header_hash = Some(tag::<String>(iterator)?),
                "DatabaseName" => meta.database_name = Some(tag::<String>(iterator)?),
                "DatabaseNameChanged" => meta.database_name_changed = Some(tag::<String>(iterator)?),
                "DatabaseDescription" => meta.database_description = Some(tag::<String>(iterator)?),
                "DatabaseDescriptionChanged" => meta.database_description_changed = Some(tag::<String>(iterator)?),
                "DefaultUserName" => meta.default_username = Some(tag::<String>(iterator)?),
                "DefaultUserNameChanged" => meta.default_username_changed = Some(tag::<String>(iterator)?),
                "MaintenanceHistoryDays" => meta.maintenance_history_days = Some(tag::<String>(iterator)?),
                "Color" => meta.color = Some(tag::<String>(iterator)?),
                "MasterKeyChanged" => meta.master_key_changed = Some(tag::<String>(iterator)?),
                "MasterKeyChangeRec" => meta.master_key_change_rec = Some(tag::<i64>(iterator)?),
                "MasterKeyChangeForce" => meta.master_key_change_force = Some(tag::<i64>(iterator)?),
                "RecycleBinEnabled" => meta.recycle_bin_enabled = tag::<bool>(iterator)?,
                "RecycleBinUUID" => meta.recycle_bin_uuid = Some(tag::<String>(iterator)?),
                "RecycleBinChanged" => meta.recycle_bin_changed = Some(tag::<String>(iterator)?),
                "EntryTemplatesGroup" => meta.entry_templates_group = Some(tag::<String>(iterator)?),
                "EntryTemplatesGroupChanged" => meta.entry_templates_group_changed = Some(tag::<String>(iterator)?),
                "HistoryMaxItems" => meta.history_max_items = Some(tag::<i64>(iterator)?),
                "HistoryMaxSize" => meta.history_max_size = Some(tag::<i64>(iterator)?),
                "LastSelectedGroup" => meta.last_selected_group = Some(tag::<String>(iterator)?),
                "LastTopVisibleGroup" => meta.last_top_visible_group = Some(tag::<String>(iterator)?),
                other => {
                    warnings.push(format!("ignoring unknown Meta tag <{other}>"));
                    skip_subtree(iterator)?;
                }
            },
            SimpleXmlEvent::End(name) if name == "Meta" => break,
            _ => {
                return Err(XmlParseError::BadEvent {
                    expected: "start tag or close Meta",
                    event: event.clone(),
                })
            }
        }
    }

    let _close_tag = iterator.next().ok_or(XmlParseError::Eof)?;
    Ok(meta)
}

fn tag<V: FromXmlCharacters>(iterator: &mut Peekable<impl Iterator<Item = SimpleXmlEvent>>) -> Result<V, XmlParseError> {
    use crate::xml_db::FromXml;
    Ok(SimpleTag::<V>::from_xml(iterator)?.value)
}
