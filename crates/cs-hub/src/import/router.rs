use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::{error, info, warn};

use super::schema::expected_labels;
use super::{CompanyImporter, ImportError};
use crate::accounts::AccountRepository;
use crate::auth::TokenVerifier;

const UPLOAD_FIELD: &str = "file";
const TEMPLATE_FILENAME: &str = "modelo-importacao-empresas.csv";
const MULTIPART_HEADROOM: usize = 64 * 1024;

/// Shared handles for the company routes.
pub struct CompanyRoutesState<R: ?Sized> {
    pub importer: Arc<CompanyImporter<R>>,
    pub verifier: Arc<TokenVerifier>,
}

impl<R: ?Sized> Clone for CompanyRoutesState<R> {
    fn clone(&self) -> Self {
        Self {
            importer: Arc::clone(&self.importer),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

/// Router exposing company listing, the import template and the bulk import.
///
/// The request body cap leaves room above the file ceiling so that slightly
/// oversized files reach the importer and get a readable rejection.
pub fn company_router<R>(state: CompanyRoutesState<R>) -> Router
where
    R: AccountRepository + ?Sized + 'static,
{
    let body_limit = state
        .importer
        .limits()
        .max_bytes
        .saturating_mul(2)
        .saturating_add(MULTIPART_HEADROOM);

    Router::new()
        .route("/api/v1/companies", get(list_handler::<R>))
        .route("/api/v1/companies/import", post(import_handler::<R>))
        .route(
            "/api/v1/companies/import/template",
            get(template_handler::<R>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

pub(crate) async fn import_handler<R>(
    State(state): State<CompanyRoutesState<R>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    R: AccountRepository + ?Sized + 'static,
{
    let caller = match state.verifier.authorize_import(&headers) {
        Ok(caller) => caller,
        Err(err) => {
            warn!(error = %err, "company import rejected");
            return err.into_response();
        }
    };

    info!(
        caller = %caller.subject,
        role = caller.role.label(),
        "company import requested"
    );

    let upload = match multipart {
        Ok(multipart) => read_upload(multipart, state.importer.limits().max_bytes).await,
        Err(rejection) => {
            warn!(error = %rejection, "company import without multipart body");
            Err(ImportError::FileMissing)
        }
    };

    let result = match upload {
        Ok(bytes) => state.importer.import_bytes(&bytes).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Returns the first `file` part that carries a file name.
async fn read_upload(mut multipart: Multipart, limit_bytes: usize) -> Result<Bytes, ImportError> {
    let to_import_error = |err| upload_error(err, limit_bytes);

    while let Some(field) = multipart.next_field().await.map_err(to_import_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if field.file_name().is_none() {
            return Err(ImportError::FileMissing);
        }
        return field.bytes().await.map_err(to_import_error);
    }

    Err(ImportError::FileMissing)
}

/// A body cut off at the request limit is reported like any other oversized file.
fn upload_error(err: MultipartError, limit_bytes: usize) -> ImportError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImportError::FileTooLarge { limit_bytes }
    } else {
        ImportError::Upload(err)
    }
}

pub(crate) async fn list_handler<R>(
    State(state): State<CompanyRoutesState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: AccountRepository + ?Sized + 'static,
{
    if let Err(err) = state.verifier.authenticate(&headers) {
        return err.into_response();
    }

    match state.importer.repository().companies().await {
        Ok(companies) => (StatusCode::OK, Json(companies)).into_response(),
        Err(err) => {
            error!(error = %err, "listing companies failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn template_handler<R>(
    State(state): State<CompanyRoutesState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: AccountRepository + ?Sized + 'static,
{
    if let Err(err) = state.verifier.authenticate(&headers) {
        return err.into_response();
    }

    match template_csv() {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{TEMPLATE_FILENAME}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "building import template failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Header-only CSV matching the columns the importer expects.
pub fn template_csv() -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(expected_labels())?;
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
