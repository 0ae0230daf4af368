//! Versioned envelope framing for vault data
//!
//! Builds and parses the textual artifact that travels on disk:
//! - A header line naming the format version and cipher, optionally
//!   carrying a vault-id label (format 1.2)
//! - A body of `hex(salt) + "\n" + hmac_hex + "\n" + hex(ciphertext)`,
//!   hex-encoded a second time as a whole and wrapped into 80-column lines
//!
//! The double hex encoding is an artifact of the wire format and is
//! reproduced literally for compatibility.

use crate::error::{ErrorCategory, ErrorKind, Result, VaultboxError};

/// Header line of the 1.1 format (no label)
pub const HEADER_1_1: &str = "$ANSIBLE_VAULT;1.1;AES256";

/// Header prefix of the 1.2 format; the label follows with no separator
pub const HEADER_1_2_PREFIX: &str = "$ANSIBLE_VAULT;1.2;AES256;";

/// Maximum characters per body line
const LINE_WIDTH: usize = 80;

/// Header variant, chosen at encode time and discriminated at decode time
/// by matching the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultHeader {
    /// Format 1.1: `$ANSIBLE_VAULT;1.1;AES256`
    NoLabel,
    /// Format 1.2: `$ANSIBLE_VAULT;1.2;AES256;<label>`
    Label(String),
}

impl VaultHeader {
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(label) => VaultHeader::Label(label.to_string()),
            None => VaultHeader::NoLabel,
        }
    }

    /// Render the exact header line.
    pub fn line(&self) -> String {
        match self {
            VaultHeader::NoLabel => HEADER_1_1.to_string(),
            VaultHeader::Label(label) => format!("{}{}", HEADER_1_2_PREFIX, label),
        }
    }

    /// Match a header line against the known variants, 1.2 before 1.1.
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(label) = line.strip_prefix(HEADER_1_2_PREFIX) {
            Some(VaultHeader::Label(label.to_string()))
        } else if line == HEADER_1_1 {
            Some(VaultHeader::NoLabel)
        } else {
            None
        }
    }

    /// The vault-id label, if this is a 1.2 header.
    pub fn label(&self) -> Option<&str> {
        match self {
            VaultHeader::NoLabel => None,
            VaultHeader::Label(label) => Some(label),
        }
    }
}

/// Loose recognition check: does this data already look vault encrypted?
///
/// Matches `$ANSIBLE_VAULT;1.<digit>;AES` at the very start of the input,
/// which is the pattern `$ANSIBLE_VAULT;1.<digit>;AES(256)?(;<anything>)?`
/// with the optional parts unanchored. Deliberately looser than
/// [`VaultHeader::parse`] so that close-but-unsupported headers are not
/// mistaken for plaintext.
pub fn is_encrypted(data: &[u8]) -> bool {
    let Some(rest) = data.strip_prefix(b"$ANSIBLE_VAULT;1.") else {
        return false;
    };
    matches!(rest, [version, b';', b'A', b'E', b'S', ..] if version.is_ascii_digit())
}

/// An envelope disassembled into its fields. The HMAC stays in its hex
/// form since that is what the integrity check compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope {
    pub header: VaultHeader,
    pub salt: Vec<u8>,
    pub hmac_hex: String,
    pub ciphertext: Vec<u8>,
}

/// Assemble the envelope text from its fields
///
/// The inner body joins `hex(salt)`, the HMAC hex, and `hex(ciphertext)`
/// with newlines; the whole body is then hex-encoded again and wrapped at
/// [`LINE_WIDTH`] characters. An exact multiple of the width produces no
/// trailing empty line.
pub fn wrap(header: &VaultHeader, salt: &[u8], hmac_hex: &str, ciphertext: &[u8]) -> String {
    let raw_body = format!(
        "{}\n{}\n{}",
        hex::encode(salt),
        hmac_hex,
        hex::encode(ciphertext)
    );
    let doubly_encoded = hex::encode(raw_body.as_bytes());

    let mut out = header.line();
    let mut rest = doubly_encoded.as_str();
    while !rest.is_empty() {
        // hex output is pure ASCII, so byte-position splits are safe
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        out.push('\n');
        out.push_str(line);
        rest = tail;
    }
    out
}

/// Disassemble an envelope into header, salt, HMAC, and ciphertext
///
/// The first line must be a recognized header; the remaining lines are
/// rejoined with no separator and hex-decoded once, and the result is split
/// on its first two newlines into exactly three fields. Any malformed hex
/// or a missing field is a hard error, distinct from a wrong password.
pub fn parse(text: &str) -> Result<ParsedEnvelope> {
    let mut lines = text.lines();
    let header_line = lines.next().ok_or_else(|| {
        VaultboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::EnvelopeFormat,
            "input is empty",
        )
    })?;
    let header = VaultHeader::parse(header_line).ok_or_else(|| {
        VaultboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::EnvelopeFormat,
            "first line is not a recognized vault header",
        )
    })?;

    let body: String = lines.collect();
    let raw_body = hex::decode(&body).map_err(|e| {
        VaultboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::HexDecode,
            "envelope body is not valid hex",
            e,
        )
    })?;

    // Split on the first two newlines only; the third field is everything
    // that remains.
    let mut fields = raw_body.splitn(3, |&b| b == b'\n');
    let (Some(salt_hex), Some(hmac), Some(ciphertext_hex)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(VaultboxError::with_kind(
            ErrorCategory::User,
            ErrorKind::EnvelopeFormat,
            "envelope body must contain salt, HMAC, and ciphertext fields",
        ));
    };

    let salt = hex::decode(salt_hex).map_err(|e| {
        VaultboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::HexDecode,
            "salt field is not valid hex",
            e,
        )
    })?;
    let hmac_hex = String::from_utf8(hmac.to_vec()).map_err(|e| {
        VaultboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::EnvelopeFormat,
            "HMAC field is not valid UTF-8",
            e,
        )
    })?;
    let ciphertext = hex::decode(ciphertext_hex).map_err(|e| {
        VaultboxError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::HexDecode,
            "ciphertext field is not valid hex",
            e,
        )
    })?;

    Ok(ParsedEnvelope {
        header,
        salt,
        hmac_hex,
        ciphertext,
    })
}
