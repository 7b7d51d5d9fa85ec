mod auth;
mod config;
mod error;
mod sheets;
mod status;

pub use auth::{fetch_access_token, sign_assertion, AccessToken, SHEETS_READONLY_SCOPE};
pub use config::{
    Config, CredentialSource, Credentials, EnvSource, ProcessEnv, ServiceAccountKey,
    CREDENTIAL_VARS,
};
pub use error::{Error, Result};
pub use sheets::{load_status, SheetsClient, ValueRange, PROBE_RANGE, STATUS_RANGE};
pub use status::{
    character_key, is_checked, status_from_rows, ErrorResponse, StatusMap, StatusResponse,
};
