//! Shared utilities for stagehand.
//!
//! This crate provides cross-cutting concerns used by all other stagehand
//! crates: the unified error type, filesystem helpers, streaming content
//! digests, and terminal progress indicators.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod progress;
