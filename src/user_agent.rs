//! Shared User-Agent string for outgoing requests and the desktop host.
//!
//! Single source for the project URL and UA format.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/qrsave";

/// Default User-Agent (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("qrsave/{version} (+{PROJECT_UA_URL})")
}
