//! Tenant-id to agent-config resolution with default fallback.

use crate::error::TenantError;
use crate::store::TenantStore;
use parley_types::TenantConfig;

/// Outcome of resolving a tenant id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: TenantConfig,
    /// `false` when a tenant id was supplied but is not in the table and the
    /// defaults were substituted. Absence of an id is not invalid: the demo
    /// path intentionally runs on the defaults.
    pub valid_tenant: bool,
}

/// Resolves tenant ids against the cached table, falling back to defaults.
#[derive(Debug)]
pub struct TenantDirectory {
    store: TenantStore,
    defaults: TenantConfig,
}

impl TenantDirectory {
    pub fn new(store: TenantStore, defaults: TenantConfig) -> Self {
        Self { store, defaults }
    }

    pub fn defaults(&self) -> &TenantConfig {
        &self.defaults
    }

    /// Resolves an optional tenant id to an agent configuration.
    ///
    /// A missing id skips the table entirely and uses the defaults. An
    /// unknown id resolves to the defaults with `valid_tenant = false`; only
    /// an unreachable tenant source is an error.
    pub async fn resolve(&self, tenant_id: Option<&str>) -> Result<Resolution, TenantError> {
        let Some(id) = tenant_id else {
            return Ok(Resolution {
                config: self.defaults.clone(),
                valid_tenant: true,
            });
        };

        match self.lookup(id).await? {
            Some(config) => Ok(Resolution {
                config,
                valid_tenant: true,
            }),
            None => {
                tracing::info!(tenant_id = id, "unknown tenant id, using defaults");
                Ok(Resolution {
                    config: self.defaults.clone(),
                    valid_tenant: false,
                })
            }
        }
    }

    /// Looks up a single tenant without default substitution.
    pub async fn lookup(&self, tenant_id: &str) -> Result<Option<TenantConfig>, TenantError> {
        let table = self.store.table().await?;
        Ok(table.get(tenant_id).cloned())
    }
}
