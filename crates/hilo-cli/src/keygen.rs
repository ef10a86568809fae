//! # Keygen Subcommand
//!
//! Generates a fresh ES256 (P-256) key pair and writes it as PEM:
//!
//! ```text
//! {prefix}_private.pem   PKCS#8, BEGIN PRIVATE KEY
//! {prefix}_public.pem    SPKI,   BEGIN PUBLIC KEY
//! ```
//!
//! The private file is created with mode 0600 on Unix. Existing files are
//! never overwritten.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use hilo_crypto::SigningKeyPair;

/// Arguments for `hilo keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// Prefix for the key filenames.
    #[arg(long, default_value = "es256")]
    pub prefix: String,
}

/// Execute the keygen subcommand.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let (private_path, public_path) = cmd_keygen(&args.output, &args.prefix)?;
    println!("OK: generated ES256 key pair");
    println!("  Private key: {}", private_path.display());
    println!("  Public key:  {}", public_path.display());
    Ok(0)
}

fn cmd_keygen(output_dir: &Path, prefix: &str) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let private_path = output_dir.join(format!("{prefix}_private.pem"));
    let public_path = output_dir.join(format!("{prefix}_public.pem"));
    for path in [&private_path, &public_path] {
        if path.exists() {
            bail!("refusing to overwrite existing file: {}", path.display());
        }
    }

    let pair = SigningKeyPair::generate().context("failed to generate key pair")?;
    let private_pem = pair.to_pkcs8_pem()?;
    let public_pem = pair.public_key_pem()?;

    write_private(&private_path, private_pem.as_bytes())
        .with_context(|| format!("failed to write private key: {}", private_path.display()))?;
    std::fs::write(&public_path, public_pem)
        .with_context(|| format!("failed to write public key: {}", public_path.display()))?;

    tracing::debug!(private = %private_path.display(), "key pair written");
    Ok((private_path, public_path))
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(contents)
}
