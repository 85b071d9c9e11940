//! Binary file format: fixed signature, TLV header, and the master-key/
//! body-cipher pipeline that turns raw bytes into plaintext.
//!
//! This crate only reads KDBX2/3, which all share one fixed signature and
//! accept a file-version major of 1, 2, or 3, so `format::header` checks the
//! signature and major version directly rather than carrying a
//! `DatabaseVersion`-style enum disambiguating further format generations.

pub(crate) mod header;

pub(crate) const SIGNATURE1: u32 = 0x9AA2_D903;
pub(crate) const SIGNATURE2: u32 = 0xB54B_FB67;
