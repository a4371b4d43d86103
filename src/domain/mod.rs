//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep fetch/verdict/state structs in one place.
//! - Avoid cyclic imports between the pipeline services.
//! - Make JSON output and on-disk schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs`: fetch results, verdicts, persisted state, run report.
//! - `constants.rs`: defaults, request headers, exit codes.
//! - `errors.rs`: classified failure taxonomy.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! `PersistedState` is read by external automation that commits it back to the
//! repository. Keep it synchronized with `docs/contracts/state.schema.json`.

pub mod constants;
pub mod errors;
pub mod models;
