//! Cryptographic primitives for the vault format
//!
//! This module implements the fixed cipher suite of the format:
//! - PBKDF2-HMAC-SHA256 key derivation from the password
//! - AES-256-CTR for the payload
//! - HMAC-SHA256 over the raw ciphertext for integrity
//! - PKCS7 padding of the plaintext to the AES block size
//!
//! Everything here operates on raw byte sequences and knows nothing about
//! the textual envelope.

use aes::Aes256;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{ErrorCategory, ErrorKind, Result, VaultboxError};

/// Length of the salt in bytes
pub const SALT_LEN: usize = 32;

/// Length of the cipher key and the HMAC key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the AES initialization vector in bytes
pub const IV_LEN: usize = 16;

/// AES block size in bytes; padding always aligns to this
pub const BLOCK_SIZE: usize = 16;

/// PBKDF2 iteration count fixed by the format
pub const KDF_ITERATIONS: u32 = 10_000;

type Aes256Ctr = Ctr128BE<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Key material derived from (password, salt).
///
/// Recomputed on every encrypt/decrypt call and never persisted. The same
/// (password, salt) pair always produces the same triple.
pub struct DerivedKeys {
    pub cipher_key: Zeroizing<[u8; KEY_LEN]>,
    pub hmac_key: Zeroizing<[u8; KEY_LEN]>,
    pub iv: [u8; IV_LEN],
}

/// Derive the cipher key, HMAC key, and IV from a password and salt
///
/// Runs PBKDF2-HMAC-SHA256 for [`KDF_ITERATIONS`] rounds, producing 80 bytes
/// split sequentially: cipher key, HMAC key, IV. The split offsets are part
/// of the wire format and must not change.
pub fn derive_keys(password: &[u8], salt: &[u8]) -> DerivedKeys {
    let mut okm = Zeroizing::new([0u8; 2 * KEY_LEN + IV_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, KDF_ITERATIONS, &mut *okm);

    let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
    cipher_key.copy_from_slice(&okm[..KEY_LEN]);
    let mut hmac_key = Zeroizing::new([0u8; KEY_LEN]);
    hmac_key.copy_from_slice(&okm[KEY_LEN..2 * KEY_LEN]);
    let mut iv = [0u8; IV_LEN];
    iv.copy_from_slice(&okm[2 * KEY_LEN..]);

    DerivedKeys {
        cipher_key,
        hmac_key,
        iv,
    }
}

/// Compute HMAC-SHA256 over the ciphertext, rendered as lowercase hex
pub fn compute_hmac(ciphertext: &[u8], hmac_key: &[u8; KEY_LEN]) -> String {
    let mut mac = HmacSha256::new_from_slice(hmac_key).expect("HMAC accepts keys of any length");
    mac.update(ciphertext);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify the stored HMAC against the ciphertext in constant time
///
/// Returns `Ok(false)` on mismatch rather than an error so that the caller
/// can report integrity failure as a distinct outcome. Malformed hex in the
/// stored value is a format error, not an integrity failure.
pub fn verify_hmac(ciphertext: &[u8], hmac_key: &[u8; KEY_LEN], stored_hex: &str) -> Result<bool> {
    let stored = hex::decode(stored_hex).map_err(|e| {
        VaultboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::HexDecode,
            "stored HMAC is not valid hex",
            e,
        )
    })?;
    let mut mac = HmacSha256::new_from_slice(hmac_key).expect("HMAC accepts keys of any length");
    mac.update(ciphertext);
    // verify_slice performs a constant-time comparison internally.
    Ok(mac.verify_slice(&stored).is_ok())
}

/// Apply the AES-256-CTR keystream to `data`
///
/// CTR mode is an XOR with the keystream, so the same transform both
/// encrypts and decrypts and the output length always equals the input
/// length.
pub fn aes_ctr(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], data: &[u8]) -> Vec<u8> {
    let mut cipher = Aes256Ctr::new(key.into(), iv.into());
    let mut buf = data.to_vec();
    cipher.apply_keystream(&mut buf);
    buf
}

/// PKCS7-pad the plaintext to a multiple of the AES block size
///
/// Always appends between 1 and 16 bytes, each carrying the pad length;
/// block-aligned input gains a full extra block.
pub fn pad(plaintext: &[u8]) -> Vec<u8> {
    let n = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(plaintext.len() + n);
    padded.extend_from_slice(plaintext);
    padded.extend(std::iter::repeat_n(n as u8, n));
    padded
}

/// Strip and validate PKCS7 padding
///
/// All `n` trailing bytes must equal `n`; anything else means the final
/// block was corrupted and is rejected rather than silently mis-stripped.
pub fn unpad(padded: &[u8]) -> Result<Vec<u8>> {
    let Some(&last) = padded.last() else {
        return Err(VaultboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PaddingInvalid,
            "decrypted payload is empty",
        ));
    };
    let n = last as usize;
    if n == 0 || n > BLOCK_SIZE || n > padded.len() {
        return Err(VaultboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PaddingInvalid,
            format!("padding length {} is out of range", n),
        ));
    }
    if !padded[padded.len() - n..].iter().all(|&b| b == last) {
        return Err(VaultboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::PaddingInvalid,
            "padding bytes are inconsistent",
        ));
    }
    Ok(padded[..padded.len() - n].to_vec())
}
