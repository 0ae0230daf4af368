//! Vaultbox - codec for the Ansible Vault 1.1/1.2 encrypted file format
//!
//! Produces and consumes the versioned, hex-armored, HMAC-protected text
//! envelopes used by the upstream configuration-management tooling,
//! byte-for-byte compatible with it.

#![forbid(unsafe_code)]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod file_ops;
pub mod passphrase;
pub mod vaultcrypt;

pub use codec::{DecryptOutcome, EncryptOutcome, decrypt, encrypt, read_salt};
pub use error::{ErrorCategory, ErrorKind, Result, VaultboxError};
