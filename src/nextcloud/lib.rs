//! # Nextcloud Client Architecture
//!
//! This crate is a **UI-agnostic Nextcloud client library** with a small CLI on
//! top. Everything that talks to the server lives in the library; the binary
//! only parses arguments, prints results and chooses the exit code.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Upload strategies, share and group-folder workflows      │
//! │  - Collects user-facing messages, never prints them         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract Storage trait                                   │
//! │  - NextcloudClient (WebDAV + OCS), InMemoryStorage (tests)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns
//! `Result<CmdResult>` or typed store results. It never writes to the
//! terminal and never exits. Diagnostics go through the `log` facade; the
//! binary decides where they end up.
//!
//! ## Explicit Context
//!
//! There is no global client. Callers build a [`config::ClientConfig`],
//! turn it into a [`store::client::NextcloudClient`] and pass that (usually
//! wrapped in [`api::CloudApi`]) to whatever needs it.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** and the store's provided methods run against
//!    [`store::memory::InMemoryStorage`].
//! 2. **The HTTP client** runs against a scripted transport (`test_utils`),
//!    which records every request for inspection.
//! 3. **The binary** is exercised with `assert_cmd` in `tests/`; tests that
//!    need a live server are ignored unless asked for.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Upload, file, share and group-folder workflows
//! - [`store`]: Storage abstraction, HTTP client and in-memory backend
//! - [`model`]: Share results, permission bits and share types
//! - [`xml`]: Decoding of OCS envelopes and Sabre error documents
//! - [`config`]: Connection settings and validation
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod xml;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
