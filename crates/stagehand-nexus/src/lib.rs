//! Nexus staging protocol: typed bulk REST client, file deploy transport,
//! profile resolution, and the staging repository lifecycle.
//!
//! The wire contract follows the Nexus 2 staging plugin used by OSSRH; see
//! <https://support.sonatype.com/hc/en-us/articles/213465868>.

pub mod api;
pub mod auth;
pub mod client;
pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod profile;
pub mod upload;
