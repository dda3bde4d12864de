//! Route handlers and CORS middleware.

use accessionkit_catalog::CatalogError;
use accessionkit_io_fs::{Dataset, Record};
use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::info;

use crate::AppState;
use crate::error::ApiError;

const C_MSG_READ_FAILED: &str = "Failed to read data file";
const C_MSG_MERGE_FAILED: &str = "Failed to build merged view";
const C_MSG_EXPORT_FAILED: &str = "Failed to generate file";
const C_MSG_SAVE_FAILED: &str = "Failed to save data";
const C_MSG_SAVE_OK: &str = "Data saved successfully!";

/// Run catalog work on the blocking pool.
async fn run_blocking<T, F>(message: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ApiError::from_catalog(err, message)),
        Err(err) => Err(ApiError::internal(message, err)),
    }
}

pub(crate) async fn data_handler(
    State(state): State<AppState>,
) -> Result<Json<Dataset>, ApiError> {
    let service = state.service.clone();
    let dataset = run_blocking(C_MSG_READ_FAILED, move || service.read_primary()).await?;
    Ok(Json(dataset))
}

pub(crate) async fn merged_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let service = state.service.clone();
    let records = run_blocking(C_MSG_MERGE_FAILED, move || service.read_merged_view()).await?;
    Ok(Json(records))
}

pub(crate) async fn download_handler(
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let service = state.service.clone();
    let artifact = run_blocking(C_MSG_EXPORT_FAILED, move || service.export_to_buffer()).await?;
    let disposition = HeaderValue::from_str(&artifact.content_disposition())
        .map_err(|e| ApiError::internal(C_MSG_EXPORT_FAILED, e))?;
    info!(
        file = %artifact.file_name,
        rows = artifact.report.n_rows_written,
        bytes = artifact.bytes.len(),
        "download served"
    );
    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(artifact.content_type),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response())
}

pub(crate) async fn save_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))?;
    let service = state.service.clone();
    run_blocking(C_MSG_SAVE_FAILED, move || service.replace_primary(payload)).await?;
    Ok(Json(json!({ "success": true, "message": C_MSG_SAVE_OK })))
}

pub(crate) async fn healthz_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut resp = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    apply_cors_headers(
        resp.headers_mut(),
        &state.cors_allowed_origins,
        origin.as_deref(),
    );
    resp
}

fn apply_cors_headers(headers: &mut HeaderMap, allowed: &[String], origin: Option<&str>) {
    let value_origin = if allowed.iter().any(|x| x == "*") {
        Some(HeaderValue::from_static("*"))
    } else {
        origin
            .filter(|o| allowed.iter().any(|x| x == o))
            .and_then(|o| HeaderValue::from_str(o).ok())
    };
    let Some(value_origin) = value_origin else {
        return;
    };
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value_origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    if !allowed.iter().any(|x| x == "*") {
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_allows_any_origin() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, &["*".to_string()], None);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET,POST");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[test]
    fn allow_list_echoes_matching_origin_only() {
        let allowed = vec!["https://library.example".to_string()];

        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, &allowed, Some("https://library.example"));
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://library.example"
        );

        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers, &allowed, Some("https://other.example"));
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
