#![doc = include_str!("../README.md")]
#![recursion_limit = "1024"]

mod compression;
mod config;
pub(crate) mod crypt;
mod db;
pub mod error;
pub(crate) mod format;
pub(crate) mod io;
mod key;
pub(crate) mod xml_db;

pub use self::db::*;
pub use self::format::header::Header;
pub use self::key::Key;

// see https://gist.github.com/msmuenchen/9318327 for file format details
