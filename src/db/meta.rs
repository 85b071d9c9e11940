//! Database metadata: the projected `<KeePassFile><Meta>` record.
//!
//! Covers the `<Meta>` tags a KDBX2/3 database actually writes. KDBX4-era
//! fields (a binary pool, a memory-protection config, a custom-icon list) do
//! not apply to this reader and are left out entirely.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Meta {
    pub(crate) generator: Option<String>,
    pub(crate) header_hash: Option<String>,
    pub(crate) database_name: Option<String>,
    pub(crate) database_name_changed: Option<String>,
    pub(crate) database_description: Option<String>,
    pub(crate) database_description_changed: Option<String>,
    pub(crate) default_username: Option<String>,
    pub(crate) default_username_changed: Option<String>,
    pub(crate) maintenance_history_days: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) master_key_changed: Option<String>,
    pub(crate) master_key_change_rec: Option<i64>,
    pub(crate) master_key_change_force: Option<i64>,
    pub(crate) recycle_bin_enabled: bool,
    pub(crate) recycle_bin_uuid: Option<String>,
    pub(crate) recycle_bin_changed: Option<String>,
    pub(crate) entry_templates_group: Option<String>,
    pub(crate) entry_templates_group_changed: Option<String>,
    pub(crate) history_max_items: Option<i64>,
    pub(crate) history_max_size: Option<i64>,
    pub(crate) last_selected_group: Option<String>,
    pub(crate) last_top_visible_group: Option<String>,
}

macro_rules! string_accessor {
    ($name:ident) => {
        pub fn $name(&self) -> Option<&str> {
            self.$name.as_deref()
        }
    };
}

macro_rules! int_accessor {
    ($name:ident) => {
        pub fn $name(&self) -> Option<i64> {
            self.$name
        }
    };
}

impl Meta {
    string_accessor!(generator);
    string_accessor!(header_hash);
    string_accessor!(database_name);
    string_accessor!(database_name_changed);
    string_accessor!(database_description);
    string_accessor!(database_description_changed);
    string_accessor!(default_username);
    string_accessor!(default_username_changed);
    string_accessor!(maintenance_history_days);
    string_accessor!(color);
    string_accessor!(master_key_changed);
    int_accessor!(master_key_change_rec);
    int_accessor!(master_key_change_force);
    string_accessor!(recycle_bin_uuid);
    string_accessor!(recycle_bin_changed);
    string_accessor!(entry_templates_group);
    string_accessor!(entry_templates_group_changed);
    int_accessor!(history_max_items);
    int_accessor!(history_max_size);
    string_accessor!(last_selected_group);
    string_accessor!(last_top_visible_group);

    pub fn recycle_bin_enabled(&self) -> bool {
        self.recycle_bin_enabled
    }
}
