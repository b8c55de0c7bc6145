//! Client-side core for a remote file manager.
//!
//! The crate centers on the directory controller: a path-indexed cache of
//! remote listings with non-blocking fetches, local mutation applied only
//! after positive remote acknowledgment, and observer-based change
//! notification. Around it sit the canonical path utilities, the
//! File/Directory domain model, filtering, search, the bounded warning
//! queue and the REST transport adapter.

pub mod api;
pub mod controllers;
pub mod domain;
pub mod time;
