//! Encryption and decryption of whole vault envelopes
//!
//! Orchestrates the primitives in [`crate::vaultcrypt`] and the framing in
//! [`crate::envelope`]. The original tool signalled "nothing was produced"
//! with an empty string, which is ambiguous with a genuinely empty
//! plaintext; here each no-op condition is a distinct outcome variant and
//! malformed input is a propagated error.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::envelope::{self, VaultHeader};
use crate::error::{ErrorCategory, ErrorKind, Result, VaultboxError};
use crate::vaultcrypt::{self, SALT_LEN};

/// Result of an encryption attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptOutcome {
    /// The input was encrypted into this envelope text.
    Encrypted(String),
    /// The input already carried a vault header; nothing was produced.
    AlreadyEncrypted,
}

impl EncryptOutcome {
    /// The envelope text, if encryption produced one.
    pub fn envelope(&self) -> Option<&str> {
        match self {
            EncryptOutcome::Encrypted(text) => Some(text),
            EncryptOutcome::AlreadyEncrypted => None,
        }
    }

    pub fn into_envelope(self) -> Option<String> {
        match self {
            EncryptOutcome::Encrypted(text) => Some(text),
            EncryptOutcome::AlreadyEncrypted => None,
        }
    }
}

/// Result of a decryption attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// The envelope verified and decrypted to this plaintext.
    Decrypted(Vec<u8>),
    /// The input carried no vault header; nothing was produced.
    NotEncrypted,
    /// The stored HMAC did not match: wrong password or corrupted data.
    IntegrityMismatch,
}

impl DecryptOutcome {
    /// The recovered plaintext, if decryption succeeded.
    pub fn plaintext(&self) -> Option<&[u8]> {
        match self {
            DecryptOutcome::Decrypted(plaintext) => Some(plaintext),
            _ => None,
        }
    }

    pub fn into_plaintext(self) -> Option<Vec<u8>> {
        match self {
            DecryptOutcome::Decrypted(plaintext) => Some(plaintext),
            _ => None,
        }
    }
}

/// Encrypt a plaintext under a password into envelope text
///
/// A present `label` selects the 1.2 header; otherwise the 1.1 header is
/// used. `salt` may be supplied for reproducible output (it travels in the
/// envelope and is not secret) and must then be exactly [`SALT_LEN`] bytes;
/// otherwise a fresh random salt is drawn from the OS generator.
///
/// Input that already starts with a vault header is left alone and reported
/// as [`EncryptOutcome::AlreadyEncrypted`].
pub fn encrypt(
    plaintext: &[u8],
    password: &[u8],
    label: Option<&str>,
    salt: Option<&[u8]>,
) -> Result<EncryptOutcome> {
    if envelope::is_encrypted(plaintext) {
        return Ok(EncryptOutcome::AlreadyEncrypted);
    }

    let header = VaultHeader::from_label(label);

    let salt: [u8; SALT_LEN] = match salt {
        Some(salt) => salt.try_into().map_err(|_| {
            VaultboxError::with_kind(
                ErrorCategory::User,
                ErrorKind::EnvelopeFormat,
                format!("salt must be exactly {} bytes, got {}", SALT_LEN, salt.len()),
            )
        })?,
        None => {
            let mut salt = [0u8; SALT_LEN];
            OsRng.fill_bytes(&mut salt);
            salt
        }
    };

    let keys = vaultcrypt::derive_keys(password, &salt);
    let padded = vaultcrypt::pad(plaintext);
    let ciphertext = vaultcrypt::aes_ctr(&keys.cipher_key, &keys.iv, &padded);
    let hmac_hex = vaultcrypt::compute_hmac(&ciphertext, &keys.hmac_key);

    Ok(EncryptOutcome::Encrypted(envelope::wrap(
        &header,
        &salt,
        &hmac_hex,
        &ciphertext,
    )))
}

/// Decrypt envelope text back into the original plaintext
///
/// Input without a vault header is reported as
/// [`DecryptOutcome::NotEncrypted`]; an HMAC mismatch (wrong password or
/// tampering) as [`DecryptOutcome::IntegrityMismatch`]. A recognized but
/// malformed envelope is an error, since that indicates corruption rather
/// than a wrong password.
pub fn decrypt(envelope_text: &str, password: &[u8]) -> Result<DecryptOutcome> {
    if !envelope::is_encrypted(envelope_text.as_bytes()) {
        return Ok(DecryptOutcome::NotEncrypted);
    }

    let parsed = envelope::parse(envelope_text)?;
    let keys = vaultcrypt::derive_keys(password, &parsed.salt);

    if !vaultcrypt::verify_hmac(&parsed.ciphertext, &keys.hmac_key, &parsed.hmac_hex)? {
        return Ok(DecryptOutcome::IntegrityMismatch);
    }

    let padded = vaultcrypt::aes_ctr(&keys.cipher_key, &keys.iv, &parsed.ciphertext);
    let plaintext = vaultcrypt::unpad(&padded)?;
    Ok(DecryptOutcome::Decrypted(plaintext))
}

/// Extract the salt from envelope text without deriving keys or checking
/// integrity. Useful for re-encrypting with a matching salt.
pub fn read_salt(envelope_text: &str) -> Result<Vec<u8>> {
    Ok(envelope::parse(envelope_text)?.salt)
}
