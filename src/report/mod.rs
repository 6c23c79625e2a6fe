//! Bump progress engine: fetch, evaluate, cache.
//!
//! This module answers one question per configured release: has the target
//! Go toolchain version reached every tile that consumes the release?
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ ReleaseSource│────▶│   Provider   │◀────│  Evaluator   │
//! │  (github)    │     │ (fetch+cache)│     │ (tile bumps) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!                             │                     │
//!                             ▼                     ▼
//!                      ┌──────────────┐     ┌──────────────┐
//!                      │   Snapshot   │     │ TileVersions │
//!                      │ (report rows)│     │  (manifest)  │
//!                      └──────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`provider`]: one fetch pass across all releases, memoized for a bounded interval
//! - [`evaluator`]: per-release, per-tile bump status decisions
//! - [`semver`]: version parsing and ordering helpers
//! - [`types`]: report rows, snapshots, tile statuses
//! - [`error`]: fetch error taxonomy

pub mod error;
pub mod evaluator;
pub mod provider;
pub mod semver;
pub mod types;
