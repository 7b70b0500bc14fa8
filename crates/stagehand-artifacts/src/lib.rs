//! Artifact preparation for staging uploads.
//!
//! Every publishable file is written to a Maven-layout scratch tree together
//! with three sidecars: `.md5`, a detached `.asc` signature, and the `.asc.md5`
//! checksum of that signature. Sidecars shipped next to the source file are
//! reused whenever the published bytes are unchanged, because signatures are
//! not reproducible across runs.

pub mod pom;
pub mod prepare;
pub mod sidecar;
pub mod signing;
