//! Repository manager authentication.
//!
//! Nexus staging endpoints only accept HTTP Basic auth. For OSSRH the
//! username and password are the Sonatype account (or user token) values.

use reqwest::RequestBuilder;

use stagehand_core::settings::Credentials;

/// Apply Basic authentication to a request.
pub fn apply_auth(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    request.basic_auth(&credentials.username, Some(&credentials.password))
}
