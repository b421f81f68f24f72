//! Problem handler implementations

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestContext,
    state::AppState,
};

use super::{
    request::{CreateProblemRequest, UpdateProblemRequest},
    response::ProblemResponse,
};

/// Create a new problem with its first testcase generation
pub async fn create_problem(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreateProblemRequest>,
) -> AppResult<(StatusCode, Json<ProblemResponse>)> {
    if let Err(e) = payload.validate() {
        state.problems().authenticate(&ctx.token).await?;
        return Err(e.into());
    }

    let created = state.problems().create(payload.into(), &ctx.token).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProblemResponse::new(
            created,
            ctx.host.as_deref(),
            &state.config().storage.pdf_media_prefix,
        )),
    ))
}

/// Get a problem with its active testcases
pub async fn get_problem(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProblemResponse>> {
    let found = state.problems().get(id).await?;

    Ok(Json(ProblemResponse::new(
        found,
        ctx.host.as_deref(),
        &state.config().storage.pdf_media_prefix,
    )))
}

/// Partially update a problem
pub async fn update_problem(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProblemRequest>,
) -> AppResult<Json<ProblemResponse>> {
    // A bad body never hides a missing problem or a bad token
    if let Err(e) = payload.validate() {
        state.problems().authorize(id, &ctx.token).await?;
        return Err(e.into());
    }

    let updated = state
        .problems()
        .update(id, payload.into(), &ctx.token)
        .await?;

    Ok(Json(ProblemResponse::new(
        updated,
        ctx.host.as_deref(),
        &state.config().storage.pdf_media_prefix,
    )))
}

/// Upload the problem statement PDF (multipart field `file`)
pub async fn upload_pdf(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<StatusCode> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

        upload = Some((file_name, data.to_vec()));
    }

    let Some((file_name, bytes)) = upload else {
        state.pdfs().authorize(id, &ctx.token).await?;
        return Err(AppError::Validation("No file uploaded".to_string()));
    };

    state
        .pdfs()
        .attach(id, &bytes, &file_name, &ctx.token)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Download the problem statement PDF
pub async fn download_pdf(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let blob = state.pdfs().fetch(id, &ctx.token).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", blob.name),
            ),
        ],
        blob.bytes,
    )
        .into_response())
}
