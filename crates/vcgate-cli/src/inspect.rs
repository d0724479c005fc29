//! # Inspect Subcommand
//!
//! `vcgate inspect <token>` decodes a credential, request or presentation
//! token and prints its header and claims as JSON. The signature is **not**
//! checked. Pass `-` to read the token from stdin.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{json, Value};
use vcgate_crypto::jws;

/// Arguments for `vcgate inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Compact JWS token, or `-` for stdin.
    pub token: String,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let token = if args.token == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read token from stdin")?;
        buf
    } else {
        args.token.clone()
    };
    let stdout = std::io::stdout();
    inspect(token.trim(), &mut stdout.lock())?;
    Ok(0)
}

/// Write the decoded header and claims of `token` to `out`.
pub fn inspect<W: Write>(token: &str, out: &mut W) -> Result<()> {
    let decoded = jws::decode_unverified::<Value>(token).context("not a decodable token")?;
    let document = json!({
        "header": decoded.header,
        "claims": decoded.claims,
    });
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}
