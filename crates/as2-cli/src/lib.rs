//! # as2-cli: Command-Line AS2 Sender
//!
//! Provides the `as2` binary.
//!
//! ## Subcommands
//!
//! - `as2 send FILE`: sign/encrypt as configured and POST to the partner.
//!   `--dry-run --out DIR` writes `body.bin` and `headers.json` instead.
//! - `as2 extract FILE --content-type CT`: pull the first part out of a
//!   multipart body (structural only, no signature check).
//! - `as2 open FILE --content-type CT --cert C`: decrypt and extract a
//!   received message.
//!
//! Configuration comes from `AS2_*` environment variables; flags
//! override them:
//!
//! ```bash
//! AS2_FROM=ACME AS2_TO=GLOBEX as2 send invoice.xml --url https://partner.example/as2
//! as2 send orders.edi --sign-cert me.pem --recipient-cert globex.pem --cipher RC2 --dry-run --out ./out
//! ```

pub mod extract;
pub mod open;
pub mod send;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

/// Write `bytes` to `out`, or to stdout when no path is given.
pub fn write_output(out: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("failed to write to stdout")?;
            stdout.flush().context("failed to flush stdout")
        }
    }
}
