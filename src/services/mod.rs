//! Service layer containing the check pipeline and its side-effect helpers.
//!
//! ## Service map
//! - `monitor.rs`: runs the pipeline for every configured address and settles the outcome.
//! - `transport.rs`: HTTP GET seam, reqwest implementation, transport-only retry policy.
//! - `redirect.rs`: manual, hop-bounded 3xx resolution.
//! - `verifier.rs`: status/canonical/content pillars for HTML pages.
//! - `listing.rs`: JSON listing profile (record parsing + title matching).
//! - `text_match.rs`: phrase normalization and variant sets.
//! - `markup.rs`: canonical/title/visible-text extraction.
//! - `decision.rs`: previous-vs-current diff, flag artifact, exit codes.
//! - `storage.rs`: persisted state record + flag file.
//! - `config.rs`: flag/env/TOML resolution into `Settings`.
//! - `clock.rs`: injectable time source.
//! - `logging.rs`: tracing subscriber setup.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible (`verifier`, `text_match`, `listing` do no I/O).
//! - Side effects should be explicit and localized (`transport`, `storage`).
//! - Keep command handlers thin; delegate to services.

pub mod clock;
pub mod config;
pub mod decision;
pub mod listing;
pub mod logging;
pub mod markup;
pub mod monitor;
pub mod output;
pub mod redirect;
pub mod storage;
pub mod text_match;
pub mod transport;
pub mod verifier;
