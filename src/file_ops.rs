//! File encryption/decryption operations
//!
//! This module provides high-level file operations around the vault codec.
//! The destination file is only written when the codec produced new output;
//! a no-op outcome (already encrypted, not a vault, integrity mismatch)
//! leaves the destination untouched and reports a diagnostic on stderr.

use crate::codec::{self, DecryptOutcome, EncryptOutcome};
use crate::error::{ErrorCategory, ErrorKind, Result, VaultboxError};
use crate::passphrase::PassphraseReader;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Encrypt a file with a password
///
/// Reads plaintext from `input_path`, encrypts it using a password from
/// `passphrase_reader`, and writes the envelope text to `output_path`.
/// `label` selects the 1.2 header; `salt` forces a fixed salt (test
/// fixtures and re-encryption). The outcome is returned so callers can
/// distinguish "written" from "skipped".
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
    label: Option<&str>,
    salt: Option<&[u8]>,
) -> Result<EncryptOutcome> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let password = passphrase_reader.read_passphrase()?;
    let outcome = codec::encrypt(&plaintext, &password, label, salt)
        .map_err(|e| e.with_context("encryption failed"))?;

    match &outcome {
        EncryptOutcome::Encrypted(envelope) => {
            write_file_secure(output_path, envelope.as_bytes()).map_err(|e| {
                e.with_context(format!("failed to write to {}", output_path.display()))
            })?;
        }
        EncryptOutcome::AlreadyEncrypted => {
            eprintln!(
                "{} is already vault encrypted; not writing {}",
                input_path.display(),
                output_path.display()
            );
        }
    }

    Ok(outcome)
}

/// Decrypt a file with a password
///
/// Reads envelope text from `input_path`, decrypts it using a password from
/// `passphrase_reader`, and writes the plaintext to `output_path`. Inputs
/// that are not vault encrypted or fail the integrity check are skipped
/// with a diagnostic; a recognized but malformed envelope is an error.
///
/// The output file is created with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<DecryptOutcome> {
    let envelope_bytes = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let envelope = String::from_utf8(envelope_bytes).map_err(|e| {
        VaultboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::Io,
            "input file is not valid UTF-8",
            e,
        )
    })?;
    let password = passphrase_reader.read_passphrase()?;
    let outcome = codec::decrypt(&envelope, &password)
        .map_err(|e| e.with_context("decryption failed"))?;

    match &outcome {
        DecryptOutcome::Decrypted(plaintext) => {
            write_file_secure(output_path, plaintext).map_err(|e| {
                e.with_context(format!("failed to write to {}", output_path.display()))
            })?;
        }
        DecryptOutcome::NotEncrypted => {
            eprintln!(
                "{} is not vault encrypted; not writing {}",
                input_path.display(),
                output_path.display()
            );
        }
        DecryptOutcome::IntegrityMismatch => {
            eprintln!(
                "HMAC mismatch for {} (wrong password or corrupted data); not writing {}",
                input_path.display(),
                output_path.display()
            );
        }
    }

    Ok(outcome)
}

/// Write file with secure permissions (0o600 on Unix)
fn write_file_secure(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::fs::OpenOptions;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(|e| {
                VaultboxError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::Io,
                    format!("failed to open {}", path.display()),
                    e,
                )
            })?;

        file.write_all(contents).map_err(|e| {
            VaultboxError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(|e| {
            VaultboxError::with_kind_and_source(
                ErrorCategory::User,
                ErrorKind::Io,
                format!("failed to write {}", path.display()),
                e,
            )
        })?;
        Ok(())
    }
}

fn read_error(path: &Path, err: io::Error) -> VaultboxError {
    let category = if err.kind() == io::ErrorKind::NotFound {
        ErrorCategory::User
    } else {
        ErrorCategory::Internal
    };
    VaultboxError::with_kind_and_source(
        category,
        ErrorKind::Io,
        format!("failed to read from {}", path.display()),
        err,
    )
}
