//! Domain model and the top-level `Database` type that owns the whole load
//! pipeline: header parse, master-key derivation, body decryption, hashed-
//! block validation, and XML projection.
//!
//! There is exactly one load path here rather than a dispatch over
//! `DatabaseVersion`s, since this crate only reads KDBX2/3.

pub(crate) mod entry;
pub mod fields;
pub(crate) mod group;
pub(crate) mod meta;

pub use entry::Entry;
pub use group::Group;
pub use meta::Meta;

use std::io::Read;

use crate::config::Compression;
use crate::crypt::cipher_body::aes256_cbc_decrypt;
use crate::crypt::{calculate_sha256, kdf::AesKdf};
use crate::error::{DatabaseKeyError, DatabaseOpenError, XmlParseError};
use crate::format::header::{self, Header};
use crate::hashed_block_stream::HashedBlockReader;
use crate::key::Key;

/// A KeePass KDBX2/3 database: owns its header, metadata, and group/entry
/// tree for its entire lifetime once [`Database::load`] succeeds.
///
/// Lifecycle: constructed empty, zero or more [`Database::push_key`] calls
/// accumulate key material in caller order, then a single [`Database::load`]
/// call consumes a byte source and populates every other field. The
/// instance cannot be reloaded.
pub struct Database {
    key: Key,
    header: Option<Header>,
    meta: Meta,
    groups: Vec<Group>,
    warnings: Vec<String>,
    loaded: bool,
}

impl Default for Database {
    fn default() -> Self {
        Database {
            key: Key::new(),
            header: None,
            meta: Meta::default(),
            groups: Vec::new(),
            warnings: Vec::new(),
            loaded: false,
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("loaded", &self.loaded)
            .field("groups", &self.groups)
            .field("meta", &self.meta)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Constructs an empty, unloaded database with no key material.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `material` into the composite key. Order across calls is
    /// significant and is the caller's responsibility.
    pub fn push_key(&mut self, material: &[u8]) {
        self.key.push_key(material);
    }

    /// Discards all previously pushed key material.
    pub fn clear_keys(&mut self) {
        self.key.clear_keys();
    }

    /// Convenience constructor: pushes a single passphrase and loads
    /// immediately, matching the single-password path the CLI driver uses.
    pub fn open(source: impl Read, passphrase: &[u8]) -> Result<Self, DatabaseOpenError> {
        let mut db = Self::new();
        db.push_key(passphrase);
        db.load(source)?;
        Ok(db)
    }

    /// Runs the full load pipeline: header parse, master-key derivation,
    /// body decryption and sentinel check, hashed-block validation, and XML
    /// projection.
    pub fn load(&mut self, mut source: impl Read) -> Result<(), DatabaseOpenError> {
        if self.loaded {
            return Err(DatabaseOpenError::AlreadyLoaded);
        }

        let mut data = Vec::new();
        source.read_to_end(&mut data)?;

        let (header, body_start) = header::parse(&data)?;

        let composite_key = self.key.composite_key()?;
        let kdf = AesKdf {
            seed: header.transform_seed.clone(),
            rounds: header.transform_rounds,
        };
        let transformed = kdf.transform_key(&composite_key);
        let master_key = calculate_sha256(&[header.master_seed.as_slice(), transformed.as_slice()]);

        let ciphertext = &data[body_start..];
        let mut plaintext = aes256_cbc_decrypt(&master_key, &header.encryption_iv, ciphertext)?;

        let sentinel_len = header.stream_start_bytes.len();
        if plaintext.len() < sentinel_len || plaintext[..sentinel_len] != header.stream_start_bytes[..sentinel_len] {
            plaintext.zeroize_and_drop();
            return Err(DatabaseKeyError::IncorrectKey.into());
        }
        let body = &plaintext[sentinel_len..];

        // Validate the whole hashed-block stream into one buffer before ever
        // handing bytes to the XML parser. Driving `HashedBlockReader`
        // incrementally from inside `quick_xml::Reader::from_reader` would
        // let its I/O errors get reinterpreted as XML syntax errors instead
        // of surfacing as the block-stream integrity failure they are.
        let mut block_data = Vec::new();
        HashedBlockReader::new(body)
            .read_to_end(&mut block_data)
            .map_err(block_stream_error_from_io)?;

        let mut warnings = Vec::new();
        let (meta, groups) = match header.compression {
            Compression::None => crate::xml_db::parse(block_data.as_slice(), &mut warnings)?,
            Compression::GZip => {
                let decompressed =
                    crate::compression::decompress(Compression::GZip, &block_data).map_err(XmlParseError::Decompression)?;
                crate::xml_db::parse(decompressed.as_slice(), &mut warnings)?
            }
        };

        plaintext.zeroize_and_drop();

        self.header = Some(header);
        self.meta = meta;
        self.groups = groups;
        self.warnings = warnings;
        self.loaded = true;

        Ok(())
    }

    /// The parsed fixed + TLV header, once [`Database::load`] has succeeded.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The projected `<Meta>` record.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Top-level groups directly under the synthetic `<Root>`, in document order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Non-fatal diagnostics accumulated during `load`, e.g. for tags this
    /// reader doesn't recognize.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Recovers a [`crate::error::BlockStreamError`] that was boxed into a plain
/// `std::io::Error` by [`HashedBlockReader`], so a corrupt block surfaces as
/// a distinct integrity failure rather than a generic I/O error.
fn block_stream_error_from_io(e: std::io::Error) -> DatabaseOpenError {
    match e.into_inner() {
        Some(boxed) => match boxed.downcast::<crate::error::BlockStreamError>() {
            Ok(bse) => DatabaseOpenError::BlockStream(*bse),
            Err(other) => DatabaseOpenError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, other)),
        },
        None => DatabaseOpenError::Io(e),
    }
}

trait ZeroizeAndDrop {
    fn zeroize_and_drop(&mut self);
}

impl ZeroizeAndDrop for Vec<u8> {
    fn zeroize_and_drop(&mut self) {
        use zeroize::Zeroize;
        self.zeroize();
    }
}
