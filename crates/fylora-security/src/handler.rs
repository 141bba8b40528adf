// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standard security handler over in-memory lopdf documents: encrypt every
// string and stream with per-object RC4 keys and install the /Encrypt
// dictionary, or authenticate a password and strip encryption again.

use fylora_core::error::{FyloraError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use tracing::{debug, info, instrument, warn};

use crate::algorithms::{
    authenticate_owner, authenticate_user, compute_file_key, compute_o_entry, compute_u_entry,
    object_key, rc4_apply,
};

/// Permission bits granting everything the revision-3 handler can grant
/// (only the two reserved low bits are clear).
const ALL_PERMISSIONS: i32 = -4;

/// Writer parameters for this handler: RC4, revision 3, 128-bit keys.
const VERSION: i64 = 2;
const REVISION: u8 = 3;
const KEY_BITS: i64 = 128;
const KEY_LEN: usize = 16;

/// Encrypt `document` in place with the standard security handler, using
/// `password` as both the user and the owner credential.
///
/// All strings and stream payloads are RC4-encrypted with per-object keys;
/// cross-reference and object-stream containers stay clear as required.
#[instrument(skip_all, fields(objects = document.objects.len()))]
pub fn encrypt_document(document: &mut Document, password: &str) -> Result<()> {
    if document.trailer.get(b"Encrypt").is_ok() {
        return Err(FyloraError::Encryption(
            "document is already encrypted".into(),
        ));
    }

    let document_id = ensure_document_id(document);
    let password_bytes = password.as_bytes();

    let o_entry = compute_o_entry(password_bytes, password_bytes, REVISION, KEY_LEN)?;
    let file_key = compute_file_key(
        password_bytes,
        &o_entry,
        ALL_PERMISSIONS,
        &document_id,
        REVISION,
        KEY_LEN,
    );
    let u_entry = compute_u_entry(&file_key, &document_id, REVISION)?;

    crypt_all_objects(document, &file_key, None)?;

    let encrypt_id = document.add_object(Dictionary::from_iter([
        ("Filter", Object::Name(b"Standard".to_vec())),
        ("V", Object::Integer(VERSION)),
        ("R", Object::Integer(REVISION as i64)),
        ("Length", Object::Integer(KEY_BITS)),
        ("P", Object::Integer(ALL_PERMISSIONS as i64)),
        (
            "O",
            Object::String(o_entry.to_vec(), StringFormat::Hexadecimal),
        ),
        (
            "U",
            Object::String(u_entry.to_vec(), StringFormat::Hexadecimal),
        ),
    ]));
    document.trailer.set("Encrypt", Object::Reference(encrypt_id));

    info!("Document encrypted (RC4-128, revision 3)");
    Ok(())
}

/// Authenticate `password` against the document's /Encrypt dictionary,
/// decrypt every string and stream in place, and strip the encryption
/// dictionary.
///
/// Fails with [`FyloraError::IncorrectPassword`] when neither the user nor
/// the owner credential matches, and with [`FyloraError::Encryption`] for
/// schemes this handler does not speak (non-Standard filters, AES).
#[instrument(skip_all)]
pub fn decrypt_document(document: &mut Document, password: &str) -> Result<()> {
    let encrypt_id = match document.trailer.get(b"Encrypt") {
        Ok(Object::Reference(id)) => Some(*id),
        Ok(_) => None,
        Err(_) => {
            return Err(FyloraError::Encryption("document is not encrypted".into()));
        }
    };

    let encrypt_dict = match encrypt_id {
        Some(id) => document
            .get_object(id)
            .ok()
            .and_then(|obj| obj.as_dict().ok())
            .cloned(),
        None => document
            .trailer
            .get(b"Encrypt")
            .ok()
            .and_then(|obj| obj.as_dict().ok())
            .cloned(),
    }
    .ok_or_else(|| FyloraError::Encryption("malformed /Encrypt dictionary".into()))?;

    let filter = encrypt_dict
        .get(b"Filter")
        .ok()
        .and_then(|obj| obj.as_name().ok())
        .unwrap_or(b"");
    if filter != b"Standard" {
        return Err(FyloraError::Encryption(format!(
            "unsupported security handler: {}",
            String::from_utf8_lossy(filter)
        )));
    }

    let version = integer_entry(&encrypt_dict, b"V").unwrap_or(0);
    let revision = integer_entry(&encrypt_dict, b"R").unwrap_or(2) as u8;
    if version > 2 || revision > 3 {
        return Err(FyloraError::Encryption(format!(
            "unsupported encryption scheme (V {version}, R {revision})"
        )));
    }
    let key_len = if revision == 2 {
        5
    } else {
        (integer_entry(&encrypt_dict, b"Length").unwrap_or(40) as usize) / 8
    };

    let o_entry = string_entry_32(&encrypt_dict, b"O")?;
    let u_entry = string_entry_32(&encrypt_dict, b"U")?;
    let permissions = integer_entry(&encrypt_dict, b"P").unwrap_or(ALL_PERMISSIONS as i64) as i32;
    let document_id = first_document_id(document);

    let password_bytes = password.as_bytes();
    let mut file_key = authenticate_user(
        password_bytes,
        &o_entry,
        &u_entry,
        permissions,
        &document_id,
        revision,
        key_len,
    )?;
    if file_key.is_none() {
        file_key = authenticate_owner(
            password_bytes,
            &o_entry,
            &u_entry,
            permissions,
            &document_id,
            revision,
            key_len,
        )?;
    }

    let Some(file_key) = file_key else {
        debug!("Password rejected by both user and owner checks");
        return Err(FyloraError::IncorrectPassword);
    };

    crypt_all_objects(document, &file_key, encrypt_id)?;

    document.trailer.remove(b"Encrypt");
    if let Some(id) = encrypt_id {
        document.objects.remove(&id);
    }

    info!("Document decrypted and encryption stripped");
    Ok(())
}

/// RC4 is symmetric, so the same pass encrypts and decrypts: every string
/// and stream payload of every object is transformed with its per-object
/// key. `skip` names the /Encrypt dictionary, which stays clear.
fn crypt_all_objects(
    document: &mut Document,
    file_key: &[u8],
    skip: Option<ObjectId>,
) -> Result<()> {
    let ids: Vec<ObjectId> = document.objects.keys().copied().collect();
    for id in ids {
        if Some(id) == skip {
            continue;
        }
        let key = object_key(file_key, id.0, id.1);
        if let Some(object) = document.objects.get_mut(&id) {
            crypt_object(object, &key)?;
        }
    }
    Ok(())
}

fn crypt_object(object: &mut Object, key: &[u8]) -> Result<()> {
    match object {
        Object::String(bytes, format) => {
            rc4_apply(key, bytes)?;
            // Ciphertext is arbitrary binary; hex serialisation round-trips
            // it losslessly where literal strings would normalise EOL bytes.
            *format = StringFormat::Hexadecimal;
            Ok(())
        }
        Object::Array(items) => {
            for item in items {
                crypt_object(item, key)?;
            }
            Ok(())
        }
        Object::Dictionary(dict) => crypt_dictionary(dict, key),
        Object::Stream(stream) => {
            // Cross-reference and object-stream containers are never
            // encrypted; everything else is.
            let stream_type = stream
                .dict
                .get(b"Type")
                .ok()
                .and_then(|obj| obj.as_name().ok())
                .unwrap_or(b"");
            if stream_type == b"XRef" || stream_type == b"ObjStm" {
                warn!("skipping container stream during encryption pass");
                return Ok(());
            }
            crypt_dictionary(&mut stream.dict, key)?;
            rc4_apply(key, &mut stream.content)
        }
        _ => Ok(()),
    }
}

fn crypt_dictionary(dict: &mut Dictionary, key: &[u8]) -> Result<()> {
    let keys: Vec<Vec<u8>> = dict.iter().map(|(name, _)| name.clone()).collect();
    for name in keys {
        if let Ok(value) = dict.get_mut(&name) {
            crypt_object(value, key)?;
        }
    }
    Ok(())
}

/// First half of the trailer /ID pair, used as key-derivation salt. Creates
/// a deterministic ID when the document has none.
fn ensure_document_id(document: &mut Document) -> Vec<u8> {
    if let Some(existing) = first_existing_id(document) {
        return existing;
    }

    // Derive an ID from the object table layout; good enough as salt and
    // reproducible for the same input document.
    let mut seed = Vec::new();
    seed.extend_from_slice(b"fylora-id");
    seed.extend_from_slice(&(document.objects.len() as u32).to_le_bytes());
    for id in document.objects.keys().take(64) {
        seed.extend_from_slice(&id.0.to_le_bytes());
    }
    let digest = md5::compute(&seed);
    let id_bytes = digest.to_vec();

    document.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id_bytes.clone(), StringFormat::Hexadecimal),
            Object::String(id_bytes.clone(), StringFormat::Hexadecimal),
        ]),
    );
    id_bytes
}

fn first_existing_id(document: &Document) -> Option<Vec<u8>> {
    match document.trailer.get(b"ID").ok()? {
        Object::Array(items) => match items.first()? {
            Object::String(bytes, _) => Some(bytes.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn first_document_id(document: &Document) -> Vec<u8> {
    first_existing_id(document).unwrap_or_default()
}

fn integer_entry(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    dict.get(key).ok().and_then(|obj| obj.as_i64().ok())
}

fn string_entry_32(dict: &Dictionary, key: &[u8]) -> Result<[u8; 32]> {
    let bytes = match dict.get(key) {
        Ok(Object::String(bytes, _)) => bytes,
        _ => {
            return Err(FyloraError::Encryption(format!(
                "/Encrypt is missing the {} entry",
                String::from_utf8_lossy(key)
            )));
        }
    };
    if bytes.len() < 32 {
        return Err(FyloraError::Encryption(format!(
            "/Encrypt {} entry is too short",
            String::from_utf8_lossy(key)
        )));
    }
    let mut entry = [0u8; 32];
    entry.copy_from_slice(&bytes[..32]);
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::Stream;

    fn fixture() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal("confidential")]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            ),
        ]));

        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
            ])),
        );
        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    fn content_bytes(doc: &Document) -> Vec<u8> {
        let pages = doc.get_pages();
        let page_id = *pages.values().next().unwrap();
        doc.get_page_content(page_id).unwrap()
    }

    #[test]
    fn encrypt_installs_encrypt_dictionary() {
        let mut doc = fixture();
        encrypt_document(&mut doc, "pw").unwrap();
        assert!(doc.trailer.get(b"Encrypt").is_ok());
        assert!(doc.trailer.get(b"ID").is_ok());
    }

    #[test]
    fn round_trip_restores_content() {
        let mut doc = fixture();
        let original = content_bytes(&doc);

        encrypt_document(&mut doc, "pw").unwrap();
        let scrambled = content_bytes(&doc);
        assert_ne!(original, scrambled);

        decrypt_document(&mut doc, "pw").unwrap();
        assert_eq!(content_bytes(&doc), original);
        assert!(doc.trailer.get(b"Encrypt").is_err());
    }

    #[test]
    fn wrong_password_is_incorrect_not_corrupt() {
        let mut doc = fixture();
        encrypt_document(&mut doc, "right").unwrap();

        let err = decrypt_document(&mut doc, "wrong").unwrap_err();
        assert!(matches!(err, FyloraError::IncorrectPassword));
    }

    #[test]
    fn double_encryption_is_rejected() {
        let mut doc = fixture();
        encrypt_document(&mut doc, "pw").unwrap();
        let err = encrypt_document(&mut doc, "pw").unwrap_err();
        assert!(matches!(err, FyloraError::Encryption(_)));
    }

    #[test]
    fn decrypting_plain_document_fails_cleanly() {
        let mut doc = fixture();
        let err = decrypt_document(&mut doc, "pw").unwrap_err();
        assert!(matches!(err, FyloraError::Encryption(_)));
    }

    #[test]
    fn survives_serialisation_round_trip() {
        let mut doc = fixture();
        let original = content_bytes(&doc);
        encrypt_document(&mut doc, "pw").unwrap();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();

        let mut reloaded = Document::load_mem(&bytes).unwrap();
        decrypt_document(&mut reloaded, "pw").unwrap();
        assert_eq!(content_bytes(&reloaded), original);
    }
}
