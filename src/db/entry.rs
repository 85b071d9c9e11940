//! Entry record: a key-value bag preserving XML document order.
//!
//! Fields need an insertion-ordered string-keyed map rather than
//! `std::collections::HashMap`: the access pattern (append during parse,
//! linear lookup by key afterward) does not benefit from a hash index at the
//! sizes KDBX entries reach, so fields live in a small `Vec`-backed type
//! instead of pulling in an additional ordered-map crate.

/// `(key, value, protected)` triples in the order their `<String>` elements
/// appeared in the XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Fields(Vec<(String, String, bool)>);

impl Fields {
    pub(crate) fn push(&mut self, key: String, value: String, protected: bool) {
        self.0.push((key, value, protected));
    }

    fn get(&self, key: &str) -> Option<&(String, String, bool)> {
        self.0.iter().find(|(k, _, _)| k == key)
    }
}

/// A single entry in the group/entry tree.
///
/// `uuid` holds the raw `<UUID>` text exactly as stored (base64 of 16 raw
/// bytes), not parsed into an RFC 4122 value — nothing here needs UUID
/// equality beyond string comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub(crate) uuid: String,
    pub(crate) fields: Fields,
}

impl Entry {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Looks up a field by key. A field whose `<Value Protected="True">`
    /// attribute was set returns the literal placeholder `"Protected"`
    /// instead of its decoded content, since inner-stream decryption of
    /// `Protected` values is out of scope for this reader.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|(_, value, _)| value.as_str())
    }

    /// Whether `key` was stored with `Protected="True"`.
    pub fn is_protected(&self, key: &str) -> Option<bool> {
        self.fields.get(key).map(|(_, _, protected)| *protected)
    }

    /// Iterates `(key, value, protected)` in XML document order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.fields.0.iter().map(|(k, v, p)| (k.as_str(), v.as_str(), *p))
    }
}
