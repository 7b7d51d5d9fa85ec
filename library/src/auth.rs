//! Service account sign-in: a self-signed RS256 assertion exchanged at the
//! key's token endpoint for a short-lived bearer token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::debug;

use crate::{Error, Result, ServiceAccountKey};

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

pub fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let claims = Claims {
        iss: key.client_email.clone(),
        scope: SHEETS_READONLY_SCOPE.to_owned(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    };

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(encode(&header, &claims, &signing_key)?)
}

pub async fn fetch_access_token(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
) -> Result<AccessToken> {
    let assertion = sign_assertion(key, Utc::now())?;

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!("token endpoint returned {status}: {body}")));
    }

    let token: AccessToken = response.json().await?;
    debug!(expires_in = ?token.expires_in, "Obtained access token");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::TimeZone;

    const TEST_KEY: &str = include_str!("../tests/fixtures/test_key.pem");

    fn key(private_key: &str) -> ServiceAccountKey {
        serde_json::from_value(serde_json::json!({
            "private_key_id": "kid-1",
            "private_key": private_key,
            "client_email": "svc@lock-board.iam.gserviceaccount.com",
        }))
        .unwrap()
    }

    fn decode_segment(segment: &str) -> serde_json::Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
    }

    #[test]
    fn assertion_carries_issuer_scope_and_audience() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let jwt = sign_assertion(&key(TEST_KEY), now).unwrap();

        let segments: Vec<&str> = jwt.split('.').collect();
        assert_eq!(segments.len(), 3);

        let header = decode_segment(segments[0]);
        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["kid"], "kid-1");

        let claims = decode_segment(segments[1]);
        assert_eq!(claims["iss"], "svc@lock-board.iam.gserviceaccount.com");
        assert_eq!(claims["scope"], SHEETS_READONLY_SCOPE);
        assert_eq!(claims["aud"], "https://oauth2.googleapis.com/token");
        assert_eq!(claims["iat"], now.timestamp());
        assert_eq!(claims["exp"], now.timestamp() + 3600);
    }

    #[test]
    fn malformed_private_key_is_rejected() {
        let err = sign_assertion(&key("not a pem"), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::Jwt(_)));
    }
}
