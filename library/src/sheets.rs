use serde_json::Value;
use tracing::{debug, info};

use crate::{fetch_access_token, status_from_rows, Config, EnvSource, Error, Result, StatusMap};

/// Header row plus one row per roster slot; name in A, lock flag in B.
pub const STATUS_RANGE: &str = "A1:B25";
/// Small read used to check that the credentials reach the sheet.
pub const PROBE_RANGE: &str = "A1:B5";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    /// Trailing empty rows and cells are omitted by the API.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsClient {
    /// Signs in with the configured service account. Tokens are not cached;
    /// every client authenticates afresh.
    pub async fn connect(config: &Config) -> Result<Self> {
        let http = reqwest::Client::new();
        let token = fetch_access_token(&http, &config.credentials.key).await?;

        Ok(SheetsClient {
            http,
            base_url: config.sheets_api_base.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            access_token: token.access_token,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{base}/spreadsheets/{id}/values/{range}",
            base = self.base_url,
            id = urlencoding::encode(&self.spreadsheet_id),
            range = urlencoding::encode(range),
        )
    }

    pub async fn read_range(&self, range: &str) -> Result<ValueRange> {
        debug!(spreadsheet_id = %self.spreadsheet_id, range, "Reading spreadsheet range");

        let response = self
            .http
            .get(self.values_url(range))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Sheets {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

pub async fn load_status(env: &impl EnvSource) -> Result<StatusMap> {
    let config = Config::from_env(env)?;
    let client = SheetsClient::connect(&config).await?;
    let values = client.read_range(STATUS_RANGE).await?;

    let status = status_from_rows(&values.values);
    info!(
        rows = values.values.len(),
        locked = ?status,
        "Character status loaded"
    );
    Ok(status)
}
