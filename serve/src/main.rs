mod diagnostics;
mod placeholder;

#[cfg(test)]
use std::collections::HashMap;

use lambda_http::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        Method, StatusCode,
    },
    service_fn, Error, Request, RequestExt, Response,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

use banpick_library::{load_status, EnvSource, ErrorResponse, ProcessEnv, StatusResponse};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    init_tracing();

    lambda_http::run(service_fn(|request| banpick(request, &ProcessEnv))).await?;

    Ok(())
}

// CloudWatch stamps each line itself.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .init();
}

async fn banpick(request: Request, env: &impl EnvSource) -> Result<Response<String>, Error> {
    if request.method() != Method::GET {
        return Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .body("".to_owned())?);
    }

    let path = request.uri().path().trim_end_matches('/');
    match path {
        "/api/character-status" => character_status(env).await,
        "/api/debug-env" => diagnostics::debug_env(env),
        "/api/test-auth" => diagnostics::test_auth(env).await,
        _ => match path.strip_prefix("/api/placeholder/") {
            Some(dimensions) => {
                let params = request.query_string_parameters();
                placeholder::placeholder(dimensions, params.first("text"))
            }
            None => Ok(Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body("".to_owned())?),
        },
    }
}

async fn character_status(env: &impl EnvSource) -> Result<Response<String>, Error> {
    match load_status(env).await {
        Ok(status) => json_response(StatusCode::OK, &StatusResponse { status }),
        Err(err) => {
            error!(error = %err, "Failed to load character status");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse {
                    error: "Failed to fetch character status".to_owned(),
                    details: err.to_string(),
                },
            )
        }
    }
}

pub(crate) fn json_response<T: serde::Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<String>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .header(CACHE_CONTROL, "no-store")
        .body(serde_json::to_string(body)?)?)
}

#[cfg(test)]
fn no_env() -> HashMap<String, String> {
    HashMap::new()
}

#[cfg(test)]
fn get(uri: &str) -> Request {
    lambda_http::http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(lambda_http::Body::Empty)
        .unwrap()
}

#[tokio::test]
async fn test_missing_credentials_yield_500() {
    let response = banpick(get("/api/character-status"), &no_env())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_str(response.body()).unwrap();
    assert_eq!(body.error, "Failed to fetch character status");
    assert!(body.details.contains("No authentication credentials found"));
}

// Stands in for both the token endpoint and the Sheets API. Only a bearer
// token issued by `/token` may read `lock-sheet`.
#[cfg(test)]
async fn spawn_fake_google(rows: serde_json::Value) -> String {
    use axum::{
        extract::Path,
        http::{header::AUTHORIZATION, HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;

    let app = Router::new()
        .route(
            "/token",
            post(|| async {
                Json(json!({
                    "access_token": "test-token",
                    "token_type": "Bearer",
                    "expires_in": 3599
                }))
            }),
        )
        .route(
            "/v4/spreadsheets/{id}/values/{range}",
            get(
                move |Path((id, range)): Path<(String, String)>, headers: HeaderMap| {
                    let rows = rows.clone();
                    async move {
                        let authorized = headers
                            .get(AUTHORIZATION)
                            .is_some_and(|value| value == "Bearer test-token");
                        if !authorized || id != "lock-sheet" || range != "A1:B25" {
                            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "denied"})));
                        }
                        (
                            StatusCode::OK,
                            Json(json!({
                                "range": "Sheet1!A1:B25",
                                "majorDimension": "ROWS",
                                "values": rows
                            })),
                        )
                    }
                },
            ),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[cfg(test)]
fn fake_google_env(base: &str, spreadsheet_id: &str) -> HashMap<String, String> {
    let key = serde_json::json!({
        "private_key_id": "kid-1",
        "private_key": include_str!("../../library/tests/fixtures/test_key.pem"),
        "client_email": "svc@lock-board.iam.gserviceaccount.com",
        "token_uri": format!("{base}/token"),
    });

    [
        ("GOOGLE_SERVICE_ACCOUNT_KEY", key.to_string()),
        ("SPREADSHEET_ID", spreadsheet_id.to_owned()),
        ("SHEETS_API_BASE", format!("{base}/v4")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect()
}

#[tokio::test]
async fn test_character_status_success() {
    let mut rows = vec![serde_json::json!(["Name", "Banned"])];
    rows.extend((1..=26).map(|i| {
        let flag = if matches!(i, 2 | 24 | 25 | 26) { "TRUE" } else { "FALSE" };
        serde_json::json!([format!("Character {i}"), flag])
    }));
    let base = spawn_fake_google(serde_json::Value::Array(rows)).await;

    let response = banpick(
        get("/api/character-status"),
        &fake_google_env(&base, "lock-sheet"),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

    let body: StatusResponse = serde_json::from_str(response.body()).unwrap();
    assert_eq!(body.status.checked_ids().collect::<Vec<_>>(), vec![2, 24]);
}

#[tokio::test]
async fn test_sheets_rejection_yields_500() {
    let base = spawn_fake_google(serde_json::json!([])).await;

    let response = banpick(
        get("/api/character-status"),
        &fake_google_env(&base, "someone-elses-sheet"),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_str(response.body()).unwrap();
    assert!(body.details.contains("Sheets API returned 401"));
}

#[tokio::test]
async fn test_missing_spreadsheet_id_yields_500() {
    let env: HashMap<String, String> = [(
        "GOOGLE_SERVICE_ACCOUNT_KEY".to_owned(),
        r#"{"private_key": "pem", "client_email": "svc@example.com"}"#.to_owned(),
    )]
    .into_iter()
    .collect();

    let response = banpick(get("/api/character-status"), &env).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = serde_json::from_str(response.body()).unwrap();
    assert!(body.details.contains("SPREADSHEET_ID"));
}

#[tokio::test]
async fn test_non_get_is_rejected() {
    let request = lambda_http::http::Request::builder()
        .method(Method::POST)
        .uri("/api/character-status")
        .body(lambda_http::Body::Empty)
        .unwrap();

    let response = banpick(request, &no_env()).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_path() {
    let response = banpick(get("/api/characters"), &no_env())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_placeholder_route() {
    let mut hash = HashMap::new();
    hash.insert("text".to_owned(), vec!["Chara 7".to_owned()]);
    let request = get("/api/placeholder/120/90").with_query_string_parameters(hash);

    let response = banpick(request, &no_env()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/svg+xml");
    assert!(response.body().contains(r#"width="120" height="90""#));
    assert!(response.body().contains(">Chara 7</text>"));
}
