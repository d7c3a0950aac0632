//! Tenant resolution for the Parley platform.
//!
//! Maps an external tenant (company) id to its voice-agent configuration:
//! which provider agent answers the call, in which language, and under which
//! display name. The full tenant table is fetched wholesale from a remote
//! spreadsheet-style source (or taken from a static in-memory map) and held
//! behind a TTL cache so request handlers never fetch more than once per
//! cache window.
//!
//! An unknown tenant id is a normal outcome, not an error: resolution falls
//! back to the configured defaults and flags the request as invalid so the
//! UI can surface a notice.

pub mod error;
pub mod resolver;
pub mod sheet;
pub mod store;

pub use error::TenantError;
pub use resolver::{Resolution, TenantDirectory};
pub use sheet::{SheetClient, SheetConfig};
pub use store::{TenantSource, TenantStore, TenantTable, DEFAULT_TENANT_TTL};
