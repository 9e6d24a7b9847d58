//! Diagnostic tracing for the binary.
//!
//! Output goes to stderr so it never mixes with the chat on stdout. The
//! filter comes from `PHYSBOT_LOG` (same syntax as `RUST_LOG`) and stays at
//! `error` otherwise, which keeps the REPL quiet.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PHYSBOT_LOG";
const DEFAULT_DIRECTIVE: &str = "error";

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // A second init (tests, embedding) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
