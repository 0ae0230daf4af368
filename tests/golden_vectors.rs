//! Golden test vector validation
//!
//! Each vector pins the exact envelope text produced for a fixed
//! (plaintext, password, salt, label) tuple. Any drift in key derivation,
//! padding, ciphering, HMAC, or framing shows up as a byte-level mismatch
//! against envelopes the upstream tooling accepts.

use serde::Deserialize;

use vaultbox::{DecryptOutcome, decrypt, encrypt, read_salt};

#[derive(Debug, Deserialize)]
struct GoldenVector {
    /// Hex-encoded plaintext bytes
    plaintext: String,
    /// Hex-encoded password bytes
    password: String,
    /// Hex-encoded 32-byte salt
    salt: String,
    /// Vault-id label; absent selects the 1.1 header
    label: Option<String>,
    /// Expected envelope text, byte for byte
    envelope: String,
    comment: String,
}

fn load_golden_vectors() -> Vec<GoldenVector> {
    let json_data = include_str!("../testdata/golden-vectors.json");
    serde_json::from_str(json_data).expect("failed to parse golden vectors")
}

#[test]
fn test_golden_vectors() {
    let vectors = load_golden_vectors();
    assert!(!vectors.is_empty(), "no golden vectors loaded");

    let mut failed = 0;

    for (i, vector) in vectors.iter().enumerate() {
        let plaintext = hex::decode(&vector.plaintext).expect("failed to decode plaintext");
        let password = hex::decode(&vector.password).expect("failed to decode password");
        let salt = hex::decode(&vector.salt).expect("failed to decode salt");

        if salt.len() != 32 {
            eprintln!(
                "Vector {}: FAILED - salt must be 32 bytes, got {}",
                i,
                salt.len()
            );
            eprintln!("  Comment: {}", vector.comment);
            failed += 1;
            continue;
        }

        // Deterministic encryption must reproduce the envelope exactly.
        let encrypted = match encrypt(&plaintext, &password, vector.label.as_deref(), Some(&salt))
        {
            Ok(outcome) => outcome.into_envelope().expect("vector input must encrypt"),
            Err(e) => {
                eprintln!("Vector {}: FAILED to encrypt - {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        };
        if encrypted != vector.envelope {
            eprintln!("Vector {}: FAILED - envelope mismatch", i);
            eprintln!("  Comment: {}", vector.comment);
            eprintln!("  Expected: {}", vector.envelope);
            eprintln!("  Actual:   {}", encrypted);
            failed += 1;
            continue;
        }

        // The stored salt must be recoverable without keys.
        match read_salt(&vector.envelope) {
            Ok(parsed_salt) if parsed_salt == salt => {}
            Ok(_) => {
                eprintln!("Vector {}: FAILED - salt mismatch", i);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
            Err(e) => {
                eprintln!("Vector {}: FAILED to read salt - {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        }

        // Round-trip validation against the stored envelope text.
        match decrypt(&vector.envelope, &password) {
            Ok(DecryptOutcome::Decrypted(decrypted)) if decrypted == plaintext => {}
            Ok(outcome) => {
                eprintln!("Vector {}: FAILED to decrypt - outcome {:?}", i, outcome);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
            Err(e) => {
                eprintln!("Vector {}: FAILED to decrypt - {}", i, e);
                eprintln!("  Comment: {}", vector.comment);
                failed += 1;
                continue;
            }
        }
    }

    assert_eq!(failed, 0, "Some golden vectors failed validation");
}

/// The labeled and unlabeled reference vectors share (plaintext, password,
/// salt), so their bodies must be identical and only the header may differ.
#[test]
fn test_label_vector_shares_body_with_unlabeled() {
    let vectors = load_golden_vectors();
    let unlabeled = vectors
        .iter()
        .find(|v| v.label.is_none() && v.comment.contains("reference"))
        .expect("unlabeled reference vector present");
    let labeled = vectors
        .iter()
        .find(|v| v.label.is_some() && v.comment.contains("reference"))
        .expect("labeled reference vector present");

    let unlabeled_body = unlabeled.envelope.split_once('\n').unwrap().1;
    let labeled_body = labeled.envelope.split_once('\n').unwrap().1;
    assert_eq!(unlabeled_body, labeled_body);
    assert!(
        labeled
            .envelope
            .starts_with("$ANSIBLE_VAULT;1.2;AES256;label_test\n")
    );
}
