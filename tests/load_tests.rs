//! End-to-end load scenarios, built against in-process KDBX3 buffers rather
//! than binary fixtures: each test assembles a minimal valid (or deliberately
//! broken) file with the same primitives the library itself uses, the
//! inverse of its own load pipeline.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use aes::Aes256;
use byteorder::{LittleEndian, WriteBytesExt};
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit as _};
use sha2::{Digest, Sha256};
use std::io::Write;

use kdbx_reader::error::{DatabaseKeyError, DatabaseOpenError, HeaderError};
use kdbx_reader::Database;

const AES256_CIPHER_UUID: [u8; 16] = [
    0x31, 0xc1, 0xf2, 0xe6, 0xbf, 0x71, 0x43, 0x50, 0xbe, 0x58, 0x05, 0x21, 0x6a, 0xfc, 0x5a, 0xff,
];

const PASSWORD: &[u8] = b"correct horse battery staple";
const ROUNDS: u64 = 4;

fn write_field(buf: &mut Vec<u8>, field_id: u8, data: &[u8]) {
    buf.push(field_id);
    buf.write_u16::<LittleEndian>(data.len() as u16).unwrap();
    buf.extend_from_slice(data);
}

fn hashed_block(index: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(index).unwrap();
    if data.is_empty() {
        out.extend_from_slice(&[0u8; 32]);
    } else {
        let mut digest = Sha256::new();
        digest.update(data);
        out.extend_from_slice(digest.finalize().as_slice());
    }
    out.write_u32::<LittleEndian>(data.len() as u32).unwrap();
    out.extend_from_slice(data);
    out
}

fn hashed_block_stream(body: &[u8]) -> Vec<u8> {
    let mut out = hashed_block(0, body);
    out.extend_from_slice(&hashed_block(1, &[]));
    out
}

fn composite_key(password: &[u8]) -> [u8; 32] {
    let mut digest = Sha256::new();
    digest.update(password);
    let inner: [u8; 32] = digest.finalize().into();

    let mut digest = Sha256::new();
    digest.update(inner);
    digest.finalize().into()
}

fn transform_key(composite: &[u8; 32], seed: &[u8; 32], rounds: u64) -> [u8; 32] {
    let cipher = Aes256::new(GenericArray::from_slice(seed));
    let mut block1 = *GenericArray::from_slice(&composite[..16]);
    let mut block2 = *GenericArray::from_slice(&composite[16..]);
    for _ in 0..rounds {
        cipher.encrypt_block(&mut block1);
        cipher.encrypt_block(&mut block2);
    }
    let mut digest = Sha256::new();
    digest.update(block1);
    digest.update(block2);
    digest.finalize().into()
}

struct GoldenFile {
    bytes: Vec<u8>,
}

/// Builds a complete, valid KDBX3 file whose `<Root>` holds `xml_body`
/// (everything between `<KeePassFile>` and `</KeePassFile>`'s `<Meta>`/
/// `<Root>` children), encrypted under [`PASSWORD`].
fn build_golden(xml_body: &[u8], compress: bool) -> GoldenFile {
    let master_seed = [0x11u8; 32];
    let transform_seed = [0x22u8; 32];
    let encryption_iv = [0x33u8; 16];
    let stream_start_bytes = [0x44u8; 32];

    let composite = composite_key(PASSWORD);
    let transformed = transform_key(&composite, &transform_seed, ROUNDS);

    let mut digest = Sha256::new();
    digest.update(master_seed);
    digest.update(transformed);
    let master_key: [u8; 32] = digest.finalize().into();

    let block_payload = if compress {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(xml_body).unwrap();
        encoder.finish().unwrap()
    } else {
        xml_body.to_vec()
    };

    let mut plaintext = stream_start_bytes.to_vec();
    plaintext.extend_from_slice(&hashed_block_stream(&block_payload));

    let encryptor = cbc::Encryptor::<Aes256>::new_from_slices(&master_key, &encryption_iv).unwrap();
    let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(&plaintext);

    let mut header = Vec::new();
    header.write_u32::<LittleEndian>(0x9AA2_D903).unwrap();
    header.write_u32::<LittleEndian>(0xB54B_FB67).unwrap();
    header.write_u32::<LittleEndian>((3u32 << 16) | 1).unwrap();

    write_field(&mut header, 2, &AES256_CIPHER_UUID);
    write_field(&mut header, 3, &(compress as u32).to_le_bytes());
    write_field(&mut header, 4, &master_seed);
    write_field(&mut header, 5, &transform_seed);
    write_field(&mut header, 6, &ROUNDS.to_le_bytes());
    write_field(&mut header, 7, &encryption_iv);
    write_field(&mut header, 9, &stream_start_bytes);
    write_field(&mut header, 0, &[]);

    header.extend_from_slice(&ciphertext);
    GoldenFile { bytes: header }
}

fn minimal_xml() -> Vec<u8> {
    br#"<KeePassFile>
        <Meta><DatabaseName>Example</DatabaseName></Meta>
        <Root>
            <Group>
                <UUID>cm9vdC1ncm91cA==</UUID>
                <Name>General</Name>
                <Entry>
                    <UUID>ZW50cnktdXVpZC0x</UUID>
                    <String><Key>Title</Key><Value>example.com</Value></String>
                    <String><Key>UserName</Key><Value>alice</Value></String>
                    <String><Key>Password</Key><Value Protected="True">a1b2c3</Value></String>
                </Entry>
            </Group>
        </Root>
    </KeePassFile>"#
        .to_vec()
}

#[test]
fn loads_a_well_formed_database_with_the_correct_password() {
    let file = build_golden(&minimal_xml(), false);
    let db = Database::open(file.bytes.as_slice(), PASSWORD).expect("should load");

    assert_eq!(db.meta().database_name(), Some("Example"));
    assert_eq!(db.groups().len(), 1);

    let group = &db.groups()[0];
    assert_eq!(group.name(), "General");
    assert_eq!(group.entries().len(), 1);

    let entry = &group.entries()[0];
    assert_eq!(entry.get_string("UserName"), Some("alice"));
    assert_eq!(entry.get_string("Title"), Some("example.com"));
    // Protected values are never decrypted; the placeholder stands in.
    assert_eq!(entry.get_string("Password"), Some("Protected"));
    assert!(db.warnings().is_empty());
}

#[test]
fn loads_a_gzip_compressed_database() {
    let file = build_golden(&minimal_xml(), true);
    let db = Database::open(file.bytes.as_slice(), PASSWORD).expect("should load");
    assert_eq!(db.groups()[0].entries()[0].get_string("Title"), Some("example.com"));
}

#[test]
fn wrong_password_is_reported_as_incorrect_key() {
    let file = build_golden(&minimal_xml(), false);
    let err = Database::open(file.bytes.as_slice(), b"not the password").unwrap_err();
    assert!(matches!(err, DatabaseOpenError::Key(DatabaseKeyError::IncorrectKey)));
    assert!(err.to_string().contains("password"), "message should mention password: {err}");
}

#[test]
fn corrupted_block_payload_is_an_integrity_failure() {
    let mut file = build_golden(&minimal_xml(), false);
    // The fixed-size header is always 176 bytes; flipping a byte at
    // ciphertext offset 96 lands inside the first hashed block's payload
    // (past the 32-byte sentinel and the block's own 40-byte index/hash/len
    // prefix), well short of the final padding block, so only the SHA-256
    // over that block's payload is affected.
    let corrupt_at = 176 + 96;
    file.bytes[corrupt_at] ^= 0xFF;

    let err = Database::open(file.bytes.as_slice(), PASSWORD).unwrap_err();
    assert!(matches!(err, DatabaseOpenError::BlockStream(_)), "expected a block-stream error, got {err:?}");
}

#[test]
fn truncated_header_is_rejected() {
    let file = build_golden(&minimal_xml(), false);
    let truncated = &file.bytes[..16];
    let err = Database::open(truncated, PASSWORD).unwrap_err();
    assert!(matches!(err, DatabaseOpenError::Header(_)));
}

#[test]
fn bad_signature_is_rejected() {
    let mut file = build_golden(&minimal_xml(), false);
    file.bytes[0] = 0x00;
    let err = Database::open(file.bytes.as_slice(), PASSWORD).unwrap_err();
    assert!(matches!(err, DatabaseOpenError::Header(HeaderError::InvalidSignature)));
}

#[test]
fn unknown_meta_tag_is_a_non_fatal_warning() {
    let xml = br#"<KeePassFile>
        <Meta>
            <DatabaseName>Example</DatabaseName>
            <SomeFutureMetaTag>x</SomeFutureMetaTag>
        </Meta>
        <Root>
            <Group>
                <UUID>cm9vdC1ncm91cA==</UUID>
                <Name>General</Name>
            </Group>
        </Root>
    </KeePassFile>"#;

    let file = build_golden(xml, false);
    let db = Database::open(file.bytes.as_slice(), PASSWORD).expect("should load");
    assert_eq!(db.warnings().len(), 1);
    assert!(db.warnings()[0].contains("SomeFutureMetaTag"));
}

#[test]
fn a_database_cannot_be_loaded_twice() {
    let file = build_golden(&minimal_xml(), false);
    let mut db = Database::new();
    db.push_key(PASSWORD);
    db.load(file.bytes.as_slice()).unwrap();

    let err = db.load(file.bytes.as_slice()).unwrap_err();
    assert!(matches!(err, DatabaseOpenError::AlreadyLoaded));
}
