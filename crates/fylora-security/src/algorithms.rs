// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Key-derivation algorithms of the PDF standard security handler
// (PDF 1.7 §7.6.3): password padding, owner and user entries, the file
// encryption key, and per-object keys. RC4 is the only cipher class here;
// revisions 2 (40-bit) and 3 (up to 128-bit) are supported.

use fylora_core::error::{FyloraError, Result};
use rc4::consts::{U5, U6, U7, U8, U9, U10, U11, U12, U13, U14, U15, U16};
use rc4::{KeyInit, Rc4, StreamCipher};

/// The 32-byte padding string from the PDF specification.
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01,
    0x08, 0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53,
    0x69, 0x7A,
];

/// Key-derivation iterations for revision 3.
const R3_ITERATIONS: usize = 50;

/// RC4 passes (beyond the first) applied to the O and U entries at R3.
const R3_XOR_ROUNDS: u8 = 19;

/// Apply RC4 in place with a key of 5..=16 bytes.
pub fn rc4_apply(key: &[u8], data: &mut [u8]) -> Result<()> {
    macro_rules! run {
        ($size:ty) => {{
            let mut cipher = Rc4::<$size>::new_from_slice(key)
                .map_err(|_| FyloraError::Encryption("invalid RC4 key length".into()))?;
            cipher.apply_keystream(data);
            Ok(())
        }};
    }
    match key.len() {
        5 => run!(U5),
        6 => run!(U6),
        7 => run!(U7),
        8 => run!(U8),
        9 => run!(U9),
        10 => run!(U10),
        11 => run!(U11),
        12 => run!(U12),
        13 => run!(U13),
        14 => run!(U14),
        15 => run!(U15),
        16 => run!(U16),
        other => Err(FyloraError::Encryption(format!(
            "unsupported RC4 key length: {other} bytes"
        ))),
    }
}

/// Algorithm 2 step (a): truncate or pad a password to exactly 32 bytes.
pub fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = [0u8; 32];
    let take = password.len().min(32);
    padded[..take].copy_from_slice(&password[..take]);
    padded[take..].copy_from_slice(&PASSWORD_PAD[..32 - take]);
    padded
}

/// The RC4 key derived from the owner password (Algorithm 3 steps a-d).
fn owner_rc4_key(owner_password: &[u8], revision: u8, key_len: usize) -> Vec<u8> {
    let mut digest = md5::compute(pad_password(owner_password));
    if revision >= 3 {
        for _ in 0..R3_ITERATIONS {
            digest = md5::compute(&digest[..key_len]);
        }
    }
    digest[..key_len].to_vec()
}

/// Algorithm 3: compute the /O entry from the owner and user passwords.
pub fn compute_o_entry(
    owner_password: &[u8],
    user_password: &[u8],
    revision: u8,
    key_len: usize,
) -> Result<[u8; 32]> {
    let key = owner_rc4_key(owner_password, revision, key_len);
    let mut data = pad_password(user_password);
    rc4_apply(&key, &mut data)?;
    if revision >= 3 {
        for round in 1..=R3_XOR_ROUNDS {
            let round_key: Vec<u8> = key.iter().map(|byte| byte ^ round).collect();
            rc4_apply(&round_key, &mut data)?;
        }
    }
    Ok(data)
}

/// Algorithm 2: derive the file encryption key from the user password.
pub fn compute_file_key(
    user_password: &[u8],
    o_entry: &[u8; 32],
    permissions: i32,
    document_id: &[u8],
    revision: u8,
    key_len: usize,
) -> Vec<u8> {
    let mut input = Vec::with_capacity(32 + 32 + 4 + document_id.len());
    input.extend_from_slice(&pad_password(user_password));
    input.extend_from_slice(o_entry);
    input.extend_from_slice(&permissions.to_le_bytes());
    input.extend_from_slice(document_id);

    let mut digest = md5::compute(&input);
    if revision >= 3 {
        for _ in 0..R3_ITERATIONS {
            digest = md5::compute(&digest[..key_len]);
        }
    }
    digest[..key_len].to_vec()
}

/// Algorithms 4 and 5: compute the /U entry for the given file key.
///
/// Revision 2 encrypts the padding string directly; revision 3 hashes the
/// padding string with the document ID, encrypts the digest, applies the 19
/// XOR rounds, and pads the result to 32 bytes.
pub fn compute_u_entry(file_key: &[u8], document_id: &[u8], revision: u8) -> Result<[u8; 32]> {
    if revision < 3 {
        let mut data = PASSWORD_PAD;
        rc4_apply(file_key, &mut data)?;
        return Ok(data);
    }

    let mut input = Vec::with_capacity(32 + document_id.len());
    input.extend_from_slice(&PASSWORD_PAD);
    input.extend_from_slice(document_id);
    let digest = md5::compute(&input);

    let mut data = [0u8; 16];
    data.copy_from_slice(&digest[..16]);
    rc4_apply(file_key, &mut data)?;
    for round in 1..=R3_XOR_ROUNDS {
        let round_key: Vec<u8> = file_key.iter().map(|byte| byte ^ round).collect();
        rc4_apply(&round_key, &mut data)?;
    }

    let mut entry = [0u8; 32];
    entry[..16].copy_from_slice(&data);
    Ok(entry)
}

/// Algorithm 6: check a user password. Returns the file key on success.
#[allow(clippy::too_many_arguments)]
pub fn authenticate_user(
    password: &[u8],
    o_entry: &[u8; 32],
    u_entry: &[u8; 32],
    permissions: i32,
    document_id: &[u8],
    revision: u8,
    key_len: usize,
) -> Result<Option<Vec<u8>>> {
    let file_key = compute_file_key(password, o_entry, permissions, document_id, revision, key_len);
    let expected = compute_u_entry(&file_key, document_id, revision)?;
    // Revision 3 compares only the first 16 bytes; the rest is arbitrary pad.
    let comparison_len = if revision >= 3 { 16 } else { 32 };
    if expected[..comparison_len] == u_entry[..comparison_len] {
        Ok(Some(file_key))
    } else {
        Ok(None)
    }
}

/// Algorithm 7: check an owner password by recovering the user password from
/// the /O entry. Returns the file key on success.
#[allow(clippy::too_many_arguments)]
pub fn authenticate_owner(
    password: &[u8],
    o_entry: &[u8; 32],
    u_entry: &[u8; 32],
    permissions: i32,
    document_id: &[u8],
    revision: u8,
    key_len: usize,
) -> Result<Option<Vec<u8>>> {
    let key = owner_rc4_key(password, revision, key_len);
    let mut recovered = *o_entry;
    if revision >= 3 {
        for round in (1..=R3_XOR_ROUNDS).rev() {
            let round_key: Vec<u8> = key.iter().map(|byte| byte ^ round).collect();
            rc4_apply(&round_key, &mut recovered)?;
        }
    }
    rc4_apply(&key, &mut recovered)?;

    authenticate_user(
        &recovered,
        o_entry,
        u_entry,
        permissions,
        document_id,
        revision,
        key_len,
    )
}

/// Per-object encryption key: MD5 of the file key, the low 3 bytes of the
/// object number, and the low 2 bytes of the generation number, truncated to
/// `min(key_len + 5, 16)` bytes.
pub fn object_key(file_key: &[u8], object_number: u32, generation: u16) -> Vec<u8> {
    let mut input = Vec::with_capacity(file_key.len() + 5);
    input.extend_from_slice(file_key);
    input.extend_from_slice(&object_number.to_le_bytes()[..3]);
    input.extend_from_slice(&generation.to_le_bytes());
    let digest = md5::compute(&input);
    let len = (file_key.len() + 5).min(16);
    digest[..len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_fills_to_32_bytes() {
        let padded = pad_password(b"secret");
        assert_eq!(&padded[..6], b"secret");
        assert_eq!(padded[6], PASSWORD_PAD[0]);
        assert_eq!(padded.len(), 32);

        let long = pad_password(&[b'x'; 64]);
        assert_eq!(long, [b'x'; 32]);
    }

    #[test]
    fn rc4_is_symmetric() {
        let key = [7u8; 16];
        let mut data = b"round trip payload".to_vec();
        rc4_apply(&key, &mut data).unwrap();
        assert_ne!(data, b"round trip payload");
        rc4_apply(&key, &mut data).unwrap();
        assert_eq!(data, b"round trip payload");
    }

    #[test]
    fn rc4_rejects_bad_key_lengths() {
        let mut data = vec![0u8; 4];
        assert!(rc4_apply(&[1u8; 3], &mut data).is_err());
        assert!(rc4_apply(&[1u8; 20], &mut data).is_err());
    }

    #[test]
    fn correct_user_password_authenticates() {
        let doc_id = b"0123456789abcdef";
        let o_entry = compute_o_entry(b"hunter2", b"hunter2", 3, 16).unwrap();
        let file_key = compute_file_key(b"hunter2", &o_entry, -4, doc_id, 3, 16);
        let u_entry = compute_u_entry(&file_key, doc_id, 3).unwrap();

        let accepted =
            authenticate_user(b"hunter2", &o_entry, &u_entry, -4, doc_id, 3, 16).unwrap();
        assert_eq!(accepted, Some(file_key));

        let rejected =
            authenticate_user(b"wrong", &o_entry, &u_entry, -4, doc_id, 3, 16).unwrap();
        assert_eq!(rejected, None);
    }

    #[test]
    fn owner_password_recovers_file_key() {
        let doc_id = b"fedcba9876543210";
        let o_entry = compute_o_entry(b"owner-pass", b"user-pass", 3, 16).unwrap();
        let file_key = compute_file_key(b"user-pass", &o_entry, -4, doc_id, 3, 16);
        let u_entry = compute_u_entry(&file_key, doc_id, 3).unwrap();

        let via_owner =
            authenticate_owner(b"owner-pass", &o_entry, &u_entry, -4, doc_id, 3, 16).unwrap();
        assert_eq!(via_owner, Some(file_key));

        let rejected =
            authenticate_owner(b"not-owner", &o_entry, &u_entry, -4, doc_id, 3, 16).unwrap();
        assert_eq!(rejected, None);
    }

    #[test]
    fn object_keys_differ_per_object() {
        let file_key = [9u8; 16];
        let first = object_key(&file_key, 1, 0);
        let second = object_key(&file_key, 2, 0);
        assert_ne!(first, second);
        assert_eq!(first.len(), 16);
    }
}
