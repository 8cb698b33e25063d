//! # nextcloud-cli
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ```text
//! nextcloud-cli --url https://cloud.example.com --username john \
//!     --password secret upload --path Reports q1.pdf q2.pdf
//! ```
//!
//! Connection flags fall back to `NEXTCLOUD_URL`, `NEXTCLOUD_USERNAME` and
//! `NEXTCLOUD_PASSWORD`. Logging goes to stderr through `env_logger`
//! (`-v` for debug output, `RUST_LOG` to override).

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
