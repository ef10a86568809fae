//! # Token Subcommand
//!
//! Issue, verify, and refresh ES256 tokens with a local private key. The
//! service itself never issues tokens; this is how operators mint system
//! tokens and inspect tokens reported by clients.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context, Result};
use chrono::Duration;
use clap::{Args, Subcommand};

use hilo_core::{check_expiry, Claims, ClaimsBuilder, TokenState};
use hilo_crypto::{TokenCodec, TokenError};

/// Arguments for `hilo token`.
#[derive(Args, Debug)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands.
#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Sign a new token and print it.
    Issue(IssueArgs),

    /// Verify a token's signature and print its claims and expiry state.
    Verify {
        /// Path to the PEM private key.
        #[arg(long)]
        key: PathBuf,
        /// The token to verify.
        #[arg(value_name = "TOKEN")]
        token: String,
    },

    /// Renew an expired token; a still-valid token is printed unchanged.
    Refresh {
        /// Path to the PEM private key.
        #[arg(long)]
        key: PathBuf,
        /// Seconds to extend the expiry by, measured from now.
        #[arg(long, default_value_t = 3600)]
        renew: i64,
        /// The token to refresh.
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

/// Claims for `hilo token issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Path to the PEM private key.
    #[arg(long)]
    pub key: PathBuf,
    #[arg(long)]
    pub user_id: Option<String>,
    #[arg(long)]
    pub subject: Option<String>,
    #[arg(long)]
    pub issuer: Option<String>,
    /// Intended audience; repeatable.
    #[arg(long)]
    pub audience: Vec<String>,
    /// Explicit token identifier.
    #[arg(long, conflicts_with = "generate_jti")]
    pub jti: Option<String>,
    /// Use a random UUID as the token identifier.
    #[arg(long)]
    pub generate_jti: bool,
    /// Path prefix the token may access; repeatable.
    #[arg(long = "permission")]
    pub permissions: Vec<String>,
    /// Lifetime in seconds. Negative values issue an already expired
    /// token. Omit for a token that never expires.
    #[arg(long, allow_negative_numbers = true)]
    pub expires_in: Option<i64>,
}

/// A whole-second duration, or an error naming `flag` when the value is
/// beyond what a timestamp can hold.
fn seconds(flag: &str, secs: i64) -> Result<Duration> {
    Duration::try_seconds(secs).ok_or_else(|| anyhow!("{flag} {secs} is out of range"))
}

impl IssueArgs {
    fn to_claims(&self) -> Result<Claims> {
        ensure!(
            self.permissions.iter().all(|p| !p.is_empty()),
            "--permission must not be empty (an empty prefix grants every path)"
        );
        let mut builder = ClaimsBuilder::new()
            .audience(self.audience.iter().cloned())
            .permissions(self.permissions.iter().cloned());
        if let Some(user_id) = &self.user_id {
            builder = builder.user_id(user_id.clone());
        }
        if let Some(subject) = &self.subject {
            builder = builder.subject(subject.clone());
        }
        if let Some(issuer) = &self.issuer {
            builder = builder.issuer(issuer.clone());
        }
        if let Some(jti) = &self.jti {
            builder = builder.token_id(jti.clone());
        } else if self.generate_jti {
            builder = builder.token_id(uuid::Uuid::new_v4().to_string());
        }
        if let Some(secs) = self.expires_in {
            builder = builder.expires_after(seconds("--expires-in", secs)?);
        }
        Ok(builder.build())
    }
}

/// Execute the token subcommand.
pub fn run_token(args: &TokenArgs) -> Result<u8> {
    match &args.command {
        TokenCommand::Issue(issue) => {
            let codec = codec(&issue.key)?;
            println!("{}", cmd_issue(&codec, issue)?);
            Ok(0)
        }
        TokenCommand::Verify { key, token } => cmd_verify(&codec(key)?, token),
        TokenCommand::Refresh { key, renew, token } => {
            let refreshed = cmd_refresh(&codec(key)?, token, *renew)?;
            println!("{refreshed}");
            Ok(0)
        }
    }
}

fn codec(key: &Path) -> Result<TokenCodec> {
    Ok(TokenCodec::new(crate::load_key(key)?))
}

fn cmd_issue(codec: &TokenCodec, args: &IssueArgs) -> Result<String> {
    if args.expires_in.is_none() {
        tracing::warn!("issuing a token without expiry");
    }
    let token = codec
        .sign(&args.to_claims()?)
        .context("failed to sign token")?;
    Ok(token.into_string())
}

/// Exit code 0 for a valid token, 1 for a bad signature or an expired token.
fn cmd_verify(codec: &TokenCodec, token: &str) -> Result<u8> {
    let claims = match codec.verify(token.trim()) {
        Ok(claims) => claims,
        Err(TokenError::VerificationFailed(reason)) => {
            println!("FAIL: token verification failed ({reason})");
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&claims)?);
    match check_expiry(&claims) {
        TokenState::Valid => {
            println!("OK: valid");
            Ok(0)
        }
        TokenState::Expired => {
            println!("FAIL: expired");
            Ok(1)
        }
    }
}

fn cmd_refresh(codec: &TokenCodec, token: &str, renew_secs: i64) -> Result<String> {
    ensure!(renew_secs > 0, "--renew must be a positive number of seconds");
    let renewal = seconds("--renew", renew_secs)?;
    let token = codec
        .refresh(token.trim(), renewal)
        .context("token could not be refreshed")?;
    Ok(token.into_string())
}
