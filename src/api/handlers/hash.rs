use crate::AppState;
use crate::api::error::AppError;
use crate::api::middleware::request_id::RequestId;
use crate::models::{DigestResult, HashAlgorithm, UnsupportedAlgorithm};
use crate::services::staging::{StagedUpload, multipart_error};
use crate::utils::validation::{loggable_filename, user_agent_or_unknown};
use axum::{
    Extension, Json,
    extract::{ConnectInfo, Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode, header},
};
use std::net::SocketAddr;
use tracing::{info, warn};

/// The `file` part as received. `staged` is `None` when nothing was written
/// to disk (empty filename, or an algorithm already known to be invalid).
struct FilePart {
    filename: String,
    staged: Option<StagedUpload>,
}

#[utoipa::path(
    post,
    path = "/hash-file",
    request_body(content = crate::models::HashFileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Digest computed", body = DigestResult),
        (status = 400, description = "Missing file, empty filename or unsupported algorithm", body = crate::models::ErrorResponse),
        (status = 413, description = "Upload exceeds the configured size limit", body = crate::models::ErrorResponse),
        (status = 500, description = "Internal server error during hashing", body = crate::models::ErrorResponse)
    ),
    tag = "hashing"
)]
pub async fn hash_file(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request_id: Option<Extension<RequestId>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DigestResult>, AppError> {
    let user_agent = user_agent_or_unknown(
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    )
    .to_string();
    let client = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let request_id = request_id
        .map(|Extension(RequestId(id))| id)
        .unwrap_or_default();

    info!(
        request_id = %request_id,
        "Received hash request from IP: {}, Agent: {}",
        client,
        user_agent
    );

    let result = process_upload(&state, multipart).await;
    match &result {
        Ok(digest) => info!(
            request_id = %request_id,
            "Request successful (Agent: {}): {} hash calculated for '{}'.",
            user_agent,
            digest.algorithm,
            loggable_filename(&digest.filename)
        ),
        Err(e) if e.status().is_client_error() => {
            warn!(request_id = %request_id, "Request failed (Agent: {}): {}", user_agent, e)
        }
        // Server errors are logged with full detail when rendered.
        Err(_) => {}
    }
    result.map(Json)
}

async fn process_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<DigestResult, AppError> {
    // A body that is not multipart at all has no file part either.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Multipart extraction rejected: {}", rejection);
        AppError::MissingFile
    })?;

    let mut file_part: Option<FilePart> = None;
    let mut algorithm: Option<Result<HashAlgorithm, UnsupportedAlgorithm>> = None;

    let mut fields_seen = 0usize;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            // An empty or boundary-less body carries no file part.
            Err(e) if fields_seen == 0 && e.status() != StatusCode::PAYLOAD_TOO_LARGE => {
                tracing::debug!("Multipart body has no readable parts: {}", e);
                return Err(AppError::MissingFile);
            }
            Err(e) => return Err(multipart_error(e)),
        };
        fields_seen += 1;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" if file_part.is_none() => {
                // Parts without a filename parameter are plain form fields.
                let Some(filename) = field.file_name().map(str::to_owned) else {
                    continue;
                };

                let skip = filename.is_empty() || matches!(algorithm, Some(Err(_)));
                let staged = if skip {
                    None
                } else {
                    info!("Processing file: '{}'", loggable_filename(&filename));
                    Some(state.stager.stage_field(field).await?)
                };
                file_part = Some(FilePart { filename, staged });
            }
            "algorithm" if algorithm.is_none() => {
                let text = field.text().await.map_err(multipart_error)?;
                algorithm = Some(text.parse());
            }
            _ => {}
        }
    }

    let FilePart { filename, staged } = file_part.ok_or(AppError::MissingFile)?;
    if filename.is_empty() {
        return Err(AppError::EmptyFilename);
    }
    let algorithm = algorithm.unwrap_or(Ok(HashAlgorithm::default()))?;
    let staged = staged.ok_or_else(|| AppError::Internal("Upload was not staged".to_string()))?;

    info!(
        "Hashing '{}' ({} bytes) with {}",
        loggable_filename(&filename),
        staged.size(),
        algorithm
    );
    let hash = state
        .digest
        .hash_path(staged.path().to_owned(), algorithm)
        .await?;

    // `staged` is dropped here, removing the temporary file.
    Ok(DigestResult {
        hash,
        algorithm,
        filename,
    })
}
