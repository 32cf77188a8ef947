//! Threshold ECDSA Party CLI
//!
//! Command-line driver for the dealer-based threshold scheme:
//! - In-process demo (key generation, signing, combination, verification)
//! - Verification of a combined signature
//! - Parameter audit

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::OsRng;
use std::io::Read;
use std::path::PathBuf;
use tecdsa_core::verify::Verifier;
use tecdsa_core::{
    audit, CombinedSignature, Party, PartyId, SchemeParameters, Secp256k1, SigningNonce,
    ThresholdEcdsa, ThresholdScheme, DEFAULT_PARTIES, DEFAULT_THRESHOLD,
};
use tracing::{info, Level};

/// Threshold ECDSA party driver
#[derive(Parser)]
#[command(name = "tecdsa-party")]
#[command(about = "Dealer-based t-of-n threshold ECDSA")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate keys, sign with a subset of parties, combine and verify
    Demo {
        /// Threshold (t-of-n)
        #[arg(short, long, env = "TECDSA_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
        threshold: usize,

        /// Number of parties
        #[arg(short = 'n', long, env = "TECDSA_PARTIES", default_value_t = DEFAULT_PARTIES)]
        parties: usize,

        /// Signing party IDs (comma-separated, 1-based)
        #[arg(short, long, default_value = "1,2")]
        signers: String,

        /// Message to sign
        #[arg(short, long)]
        message: String,

        /// Session identifier (random when omitted)
        #[arg(long, env = "TECDSA_SESSION_ID")]
        session_id: Option<String>,
    },

    /// Verify a combined signature
    Verify {
        /// SEC1 public key (hex)
        #[arg(short, long)]
        public_key: String,

        /// Combined signature JSON file, or `-` for stdin
        #[arg(short, long)]
        signature: PathBuf,
    },

    /// Check scheme parameters
    Audit {
        /// Threshold (t-of-n)
        #[arg(short, long, env = "TECDSA_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
        threshold: usize,

        /// Number of parties
        #[arg(short = 'n', long, env = "TECDSA_PARTIES", default_value_t = DEFAULT_PARTIES)]
        parties: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            threshold,
            parties,
            ref signers,
            ref message,
            ref session_id,
        } => {
            run_demo(threshold, parties, signers, message, session_id.clone())?;
        }
        Commands::Verify {
            ref public_key,
            ref signature,
        } => {
            run_verify(public_key, signature)?;
        }
        Commands::Audit { threshold, parties } => {
            run_audit(threshold, parties)?;
        }
    }

    Ok(())
}

fn run_demo(
    threshold: usize,
    parties: usize,
    signers_str: &str,
    message: &str,
    session_id: Option<String>,
) -> Result<()> {
    let params = SchemeParameters::new(threshold, parties)?;
    audit(&params)?;

    let signers = parse_signers(signers_str)?;
    let session_id = session_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    info!(
        threshold,
        n_parties = parties,
        signers = ?signers,
        session_id = %session_id,
        "Starting demo"
    );

    let scheme = ThresholdEcdsa::new(params)?;
    let keys = scheme.generate_keys(&mut OsRng)?;
    let public_key = keys.encoded_public_key();

    // One nonce for the whole session, handed to every signer
    let nonce = SigningNonce::random(&mut OsRng)?;

    let signing_parties = signers
        .iter()
        .map(|&id| {
            keys.party(id)
                .with_context(|| format!("No party with id {} in a {}-party key set", id, parties))
        })
        .collect::<Result<Vec<&Party>>>()?;

    let partials = scheme.sign_many(message.as_bytes(), &signing_parties, &session_id, &nonce)?;
    let signature = scheme.combine(message.as_bytes(), &partials)?;
    let outcome = scheme.verify(&signature, &public_key);

    info!(
        r = %hex::encode(signature.r.to_bytes()),
        s = %hex::encode(signature.s.to_bytes()),
        valid = outcome.valid,
        "Signature generated"
    );

    println!("Public Key: {}", hex::encode(&public_key));
    println!("Signature:");
    println!("  DER: {}", hex::encode(signature.to_der()?));
    println!("{}", serde_json::to_string_pretty(&signature)?);

    if !outcome.valid {
        bail!("combined signature failed verification");
    }

    Ok(())
}

fn run_verify(public_key: &str, signature_path: &PathBuf) -> Result<()> {
    let public_key = hex::decode(public_key).context("Public key must be hex")?;

    let json = if signature_path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(signature_path)
            .with_context(|| format!("Reading {}", signature_path.display()))?
    };
    let signature: CombinedSignature = serde_json::from_str(&json)?;

    // verification needs no shares or threshold, only the public key
    let outcome = Verifier::new(&Secp256k1).verify(&signature, &public_key);

    info!(valid = outcome.valid, session_id = %outcome.session_id, "Verification finished");
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(reason) = outcome.reason {
        bail!("signature rejected: {}", reason);
    }

    Ok(())
}

fn run_audit(threshold: usize, parties: usize) -> Result<()> {
    let params = SchemeParameters {
        threshold,
        total_parties: parties,
    };
    let report = audit(&params)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_signers(signers: &str) -> Result<Vec<PartyId>> {
    let ids = signers
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<PartyId>)
        .collect::<std::result::Result<Vec<PartyId>, _>>()
        .context("Signers must be comma-separated party IDs")?;
    if ids.is_empty() {
        bail!("At least one signer is required");
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_file(name: &str, message: &[u8]) -> (Vec<u8>, PathBuf) {
        let scheme = ThresholdEcdsa::new(SchemeParameters::new(2, 3).unwrap()).unwrap();
        let keys = scheme.generate_keys(&mut OsRng).unwrap();
        let nonce = SigningNonce::random(&mut OsRng).unwrap();
        let parties: Vec<&Party> = keys.parties().iter().take(2).collect();
        let partials = scheme.sign_many(message, &parties, "cli", &nonce).unwrap();
        let signature = scheme.combine(message, &partials).unwrap();

        let file_name = format!("tecdsa-{}-{}.json", name, std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, serde_json::to_string(&signature).unwrap()).unwrap();
        (keys.encoded_public_key(), path)
    }

    #[test]
    fn test_verify_accepts_valid_signature() {
        let (public_key, path) = signed_file("valid", b"release v1");
        let result = run_verify(&hex::encode(&public_key), &path);
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_verify_fails_on_rejected_signature() {
        let (_, path) = signed_file("rejected", b"release v1");
        let (other_key, other_path) = signed_file("other", b"release v1");
        let result = run_verify(&hex::encode(&other_key), &path);
        std::fs::remove_file(&path).unwrap();
        std::fs::remove_file(&other_path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_signers() {
        assert_eq!(parse_signers("1, 3,4").unwrap(), vec![1, 3, 4]);
        assert_eq!(parse_signers("2,").unwrap(), vec![2]);
        assert!(parse_signers("1,x").is_err());
    }

    #[test]
    fn test_parse_signers_requires_one_id() {
        let err = parse_signers(" , ").unwrap_err();
        assert_eq!(err.to_string(), "At least one signer is required");
        assert!(parse_signers("").is_err());
    }
}
