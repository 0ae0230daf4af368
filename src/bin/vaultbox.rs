//! Vaultbox CLI - encrypt and decrypt Ansible Vault files
//!
//! Thin wrapper around the library's file operations. The destination file
//! is only written when the codec produced output; skipped operations exit
//! non-zero so scripts can tell the difference.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use vaultbox::file_ops;
use vaultbox::passphrase::{PassphraseReader, ReaderPassphraseReader, TerminalPassphraseReader};
use vaultbox::{DecryptOutcome, EncryptOutcome};

#[derive(Parser)]
#[command(name = "vaultbox")]
#[command(version)]
#[command(about = "Ansible Vault compatible file encryption.", long_about = None)]
struct Cli {
    /// Read password from stdin instead of from terminal
    #[arg(long, global = true)]
    passphrase_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the envelope text to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Vault-id label to embed in the header (selects the 1.2 format)
        #[arg(long, value_name = "LABEL")]
        vault_id: Option<String>,
    },

    /// Decrypt a file
    #[command(alias = "d")]
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to the file to write the plaintext to
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let wrote_output = match cli.command {
        Commands::Encrypt {
            input,
            output,
            vault_id,
        } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::encrypt_file(&input, &output, &mut *reader, vault_id.as_deref(), None)
                .map(|outcome| matches!(outcome, EncryptOutcome::Encrypted(_)))
        }
        Commands::Decrypt { input, output } => {
            let mut reader = get_passphrase_reader(cli.passphrase_stdin);
            file_ops::decrypt_file(&input, &output, &mut *reader)
                .map(|outcome| matches!(outcome, DecryptOutcome::Decrypted(_)))
        }
    };

    match wrote_output {
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        // Skipped operations already reported a diagnostic on stderr.
        Ok(false) => process::exit(1),
        Ok(true) => {}
    }
}

fn get_passphrase_reader(use_stdin: bool) -> Box<dyn PassphraseReader> {
    if use_stdin {
        Box::new(ReaderPassphraseReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPassphraseReader)
    }
}
