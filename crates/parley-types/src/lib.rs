//! Shared types for the Parley voice-agent demo platform.
//!
//! This crate provides the wire and domain types used across all Parley
//! crates: the tenant configuration resolved per call, the agent language
//! codes, and the web-call response shape shared between the server (which
//! serializes it) and the browser-side backend client (which parses it).
//!
//! No crate in the workspace depends on anything *except* `parley-types` for
//! cross-cutting type definitions. This keeps the dependency graph clean and
//! prevents circular dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Agent language codes supported by the tenant table.
///
/// The wire form is the lowercase two-letter code (`"en"`, `"ru"`). Tenant
/// rows carrying any other code are treated as malformed and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Russian.
    Ru,
}

impl Language {
    /// Returns the lowercase wire code for this language.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language code: {}", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Per-tenant voice-agent configuration.
///
/// Immutable once resolved for a request. Keyed by the external tenant
/// (company) id in the tenant table; uniqueness of that id is enforced by
/// the source table, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// The telephony provider's agent identity the tenant's calls route to.
    pub agent_id: String,
    /// Language the agent speaks for this tenant.
    pub language: Language,
    /// Human-readable company name shown in the UI and passed to the agent.
    pub display_name: String,
}

/// Metadata attached to a web-call response, mirrored into the provider
/// request so the agent knows who it is speaking for.
///
/// Wire field names follow the original HTTP contract (`company_name`,
/// `valid_company`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub language: Language,
    pub company_name: String,
    /// `false` when the request named a tenant id that is not in the table;
    /// the defaults were used and the UI should show a transient notice.
    pub valid_company: bool,
}

/// Response body of `POST /api/create-web-call`.
///
/// Serialized by `parley-server` and deserialized by the browser-side
/// [`HttpCallBackend`](https://docs.rs/parley-voice) client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebCallSession {
    /// Short-lived credential authorizing exactly one call session.
    pub access_token: String,
    /// Provider-assigned call identifier, when the provider returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    pub metadata: CallMetadata,
}
