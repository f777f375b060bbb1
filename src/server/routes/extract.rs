//! Upload endpoints.
//!
//! Each route reads the multipart field `file`, runs the matching pipeline
//! and answers with the extracted text as a `text/plain` attachment.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::artifact::TextArtifact;
use crate::document::{DocumentFormat, SourceDocument};
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// POST /extract/pdf
pub async fn extract_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    extract_upload(state, multipart, DocumentFormat::Pdf).await
}

/// POST /extract/image
pub async fn extract_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    extract_upload(state, multipart, DocumentFormat::Image).await
}

/// POST /extract/docx
pub async fn extract_docx(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    extract_upload(state, multipart, DocumentFormat::Docx).await
}

async fn extract_upload(
    state: AppState,
    multipart: Result<Multipart, MultipartRejection>,
    format: DocumentFormat,
) -> ApiResult<Response> {
    let mut multipart = multipart?;
    let bytes = read_file_field(&mut multipart).await?;
    debug!("Received {} upload: {} bytes", format, bytes.len());

    let artifact = state
        .pipeline
        .extract_to_artifact(SourceDocument::new(bytes, format))
        .await?;

    Ok(artifact_response(artifact))
}

/// Return the bytes of the first `file` field, skipping any others.
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(FILE_FIELD) {
            return Ok(field.bytes().await?.to_vec());
        }
    }
    Err(ApiError::bad_request(format!(
        "missing multipart field '{FILE_FIELD}'"
    )))
}

fn artifact_response(artifact: TextArtifact) -> Response {
    let headers = [
        (header::CONTENT_TYPE, artifact.content_type().to_string()),
        (header::CONTENT_DISPOSITION, artifact.content_disposition()),
    ];
    (headers, artifact.into_content()).into_response()
}
