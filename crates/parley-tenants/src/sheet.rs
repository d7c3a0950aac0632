//! Read-only client for the remote spreadsheet holding the tenant table.
//!
//! The source exposes the Sheets `values.get` shape: a GET on
//! `/v4/spreadsheets/{id}/values/{range}` returning `{"values": [[..], ..]}`
//! where each row is `(tenant_id, agent_id, language, display_name)`.
//! Malformed rows (short, empty fields, unknown language code) are discarded
//! with a warning rather than failing the whole table.

use crate::error::TenantError;
use crate::store::TenantTable;
use parley_types::TenantConfig;
use serde::Deserialize;
use std::fmt;

/// Default API host for the spreadsheet source.
pub const DEFAULT_SHEET_BASE_URL: &str = "https://sheets.googleapis.com";

/// Default cell range: headers in row 1, data from row 2, four columns.
pub const DEFAULT_SHEET_RANGE: &str = "Companies!A2:D";

#[derive(Clone, Deserialize)]
pub struct SheetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub spreadsheet_id: String,
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default)]
    pub api_key: String,
}

fn default_base_url() -> String {
    DEFAULT_SHEET_BASE_URL.to_string()
}

fn default_range() -> String {
    DEFAULT_SHEET_RANGE.to_string()
}

impl fmt::Debug for SheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetConfig")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("range", &self.range)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Wire shape of the `values.get` response.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    config: SheetConfig,
}

impl SheetClient {
    pub fn new(config: SheetConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fetches the full tenant table from the spreadsheet.
    ///
    /// Fails with [`TenantError::EmptyTable`] when the range holds no rows,
    /// matching the source contract that an empty sheet is a deployment
    /// mistake rather than an empty tenant set.
    pub async fn fetch_table(&self) -> Result<TenantTable, TenantError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.config.base_url, self.config.spreadsheet_id, self.config.range
        );

        let mut request = self.http.get(&url);
        if !self.config.api_key.is_empty() {
            request = request.query(&[("key", self.config.api_key.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TenantError::UpstreamStatus(status));
        }

        let body: ValueRange = response.json().await?;
        if body.values.is_empty() {
            return Err(TenantError::EmptyTable);
        }

        Ok(parse_rows(&body.values))
    }
}

/// Parses raw sheet rows into a tenant table, discarding malformed rows.
///
/// A row is malformed when it has fewer than four cells, any required cell
/// is empty, or the language code is unknown. Later rows win on duplicate
/// tenant ids, mirroring a last-write scan of the sheet.
pub fn parse_rows(rows: &[Vec<String>]) -> TenantTable {
    let mut table = TenantTable::new();
    for (index, row) in rows.iter().enumerate() {
        let [tenant_id, agent_id, language, display_name] = match row.as_slice() {
            [a, b, c, d, ..] => [a, b, c, d],
            _ => {
                tracing::warn!(row = index, "discarding short tenant row");
                continue;
            }
        };
        if tenant_id.is_empty() || agent_id.is_empty() || display_name.is_empty() {
            tracing::warn!(row = index, "discarding tenant row with empty fields");
            continue;
        }
        let language = match language.parse() {
            Ok(language) => language,
            Err(e) => {
                tracing::warn!(row = index, error = %e, "discarding tenant row");
                continue;
            }
        };
        table.insert(
            tenant_id.clone(),
            TenantConfig {
                agent_id: agent_id.clone(),
                language,
                display_name: display_name.clone(),
            },
        );
    }
    table
}
