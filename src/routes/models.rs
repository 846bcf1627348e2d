use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::entities::model;
use crate::error::AppError;
use crate::routes::AppState;
use crate::services::storage::StoredFile;
use crate::utils::image_processor;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListModelsQuery {
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ModelResponse {
    pub id: i32,
    pub title: Option<String>,
    pub original_name: String,
    pub file_path: String,
    pub usdz_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: Option<chrono::NaiveDateTime>,
    pub is_deleted: bool,
}

impl From<model::Model> for ModelResponse {
    fn from(record: model::Model) -> Self {
        Self {
            id: record.id,
            title: record.title,
            original_name: record.original_name,
            file_path: record.file_path,
            usdz_path: record.usdz_path,
            thumbnail_path: record.thumbnail_path,
            created_at: record.created_at,
            updated_at: record.updated_at,
            is_deleted: record.is_deleted,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ModelListResponse {
    pub models: Vec<ModelResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ModelDetailResponse {
    pub model: ModelResponse,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadModelResponse {
    pub message: String,
    #[serde(rename = "modelId")]
    pub model_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UsdzUpdateResponse {
    pub message: String,
    pub usdz_path: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ThumbnailUpdateResponse {
    pub message: String,
    pub thumbnail_path: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateTitleRequest {
    pub title: String,
}

/// Pulls one named file field out of a multipart stream and persists it.
async fn store_file_field(
    state: &AppState,
    multipart: &mut Multipart,
    field_name: &str,
) -> Result<Option<StoredFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() == Some(field_name) {
            let original_name = field.file_name().unwrap_or("unknown").to_string();
            let data = field.bytes().await.map_err(|_| {
                AppError::InternalServerError("Failed to read file bytes".to_string())
            })?;
            let stored = state.storage.store(&original_name, &data).await?;
            return Ok(Some(stored));
        }
    }

    Ok(None)
}

#[utoipa::path(
    get,
    path = "/api/models",
    params(ListModelsQuery),
    responses(
        (status = 200, description = "List of catalog records, newest first", body = ModelListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ListModelsQuery>,
) -> Result<Json<ModelListResponse>, AppError> {
    let records = state.repo.list_models(query.search.as_deref()).await?;

    Ok(Json(ModelListResponse {
        models: records.into_iter().map(ModelResponse::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/models/{id}",
    params(("id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Catalog record", body = ModelDetailResponse),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ModelDetailResponse>, AppError> {
    let record = state
        .repo
        .get_model(id)
        .await?
        .ok_or(AppError::NotFound("Model not found".to_string()))?;

    Ok(Json(ModelDetailResponse {
        model: ModelResponse::from(record),
    }))
}

#[utoipa::path(
    post,
    path = "/api/models",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Model uploaded successfully", body = UploadModelResponse),
        (status = 400, description = "Missing title or file"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn upload_model(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadModelResponse>, AppError> {
    let mut title: Option<String> = None;
    let mut stored: Option<StoredFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("title") => {
                let value = field.text().await.map_err(|_| {
                    AppError::BadRequest("Invalid title field".to_string())
                })?;
                title = Some(value);
            }
            Some("modelFile") => {
                let original_name = field.file_name().unwrap_or("unknown").to_string();
                let data = field.bytes().await.map_err(|_| {
                    AppError::InternalServerError("Failed to read file bytes".to_string())
                })?;
                stored = Some(state.storage.store(&original_name, &data).await?);
            }
            _ => {}
        }
    }

    let stored = stored.ok_or(AppError::BadRequest("No file uploaded.".to_string()))?;
    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or(AppError::BadRequest("Title is required.".to_string()))?;

    let created = state
        .repo
        .create_model(&title, &stored.original_name, &stored.relative_path)
        .await?;

    tracing::info!(
        "Upload | POST /api/models | id={} | file={}",
        created.id,
        created.original_name
    );
    Ok(Json(UploadModelResponse {
        message: "Model uploaded successfully!".to_string(),
        model_id: created.id,
    }))
}

#[utoipa::path(
    post,
    path = "/api/models/{id}/file",
    params(("id" = i32, Path, description = "Model ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Model file replaced", body = MessageResponse),
        (status = 400, description = "Missing file"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn replace_model_file(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let stored = store_file_field(&state, &mut multipart, "modelFile")
        .await?
        .ok_or(AppError::BadRequest("No file uploaded for update.".to_string()))?;

    let affected = state
        .repo
        .replace_file(id, &stored.original_name, &stored.relative_path)
        .await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Model with id {} not found.", id)));
    }

    tracing::info!("Upload | POST /api/models/{}/file | file={}", id, stored.original_name);
    Ok(Json(MessageResponse {
        message: format!("Model {} updated successfully!", id),
    }))
}

#[utoipa::path(
    put,
    path = "/api/models/{id}/title",
    params(("id" = i32, Path, description = "Model ID")),
    request_body = UpdateTitleRequest,
    responses(
        (status = 200, description = "Title updated", body = MessageResponse),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn update_title(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTitleRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required.".to_string()));
    }

    let affected = state.repo.rename_title(id, &payload.title).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Model with id {} not found.", id)));
    }

    Ok(Json(MessageResponse {
        message: format!("Model {}'s title updated successfully!", id),
    }))
}

#[utoipa::path(
    post,
    path = "/api/models/{id}/usdz",
    params(("id" = i32, Path, description = "Model ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "USDZ variant attached", body = UsdzUpdateResponse),
        (status = 400, description = "Missing file"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn attach_usdz(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<UsdzUpdateResponse>, AppError> {
    let stored = store_file_field(&state, &mut multipart, "usdzFile")
        .await?
        .ok_or(AppError::BadRequest("No usdz file uploaded for update.".to_string()))?;

    let affected = state.repo.attach_usdz(id, &stored.relative_path).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Model with id {} not found.", id)));
    }

    Ok(Json(UsdzUpdateResponse {
        message: format!("Model {}'s usdz file updated successfully!", id),
        usdz_path: stored.relative_path,
    }))
}

#[utoipa::path(
    post,
    path = "/api/models/{id}/thumbnail",
    params(("id" = i32, Path, description = "Model ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail attached", body = ThumbnailUpdateResponse),
        (status = 400, description = "Missing file or not an image"),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn attach_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<ThumbnailUpdateResponse>, AppError> {
    let mut stored: Option<StoredFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() == Some("thumbnailFile") {
            let original_name = field.file_name().unwrap_or("unknown").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            if !content_type.starts_with("image/") {
                return Err(AppError::BadRequest("File is not an image".to_string()));
            }

            let data = field.bytes().await.map_err(|_| {
                AppError::InternalServerError("Failed to read file bytes".to_string())
            })?;

            let (thumb, ext) = image_processor::make_thumbnail(&data)?;
            stored = Some(
                state
                    .storage
                    .store_with_ext(&original_name, &thumb, ext)
                    .await?,
            );
            break;
        }
    }

    let stored = stored.ok_or(AppError::BadRequest(
        "No thumbnail file uploaded for update.".to_string(),
    ))?;

    let affected = state.repo.attach_thumbnail(id, &stored.relative_path).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Model with id {} not found.", id)));
    }

    Ok(Json(ThumbnailUpdateResponse {
        message: format!("Model {}'s thumbnail updated successfully!", id),
        thumbnail_path: stored.relative_path,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/models/{id}",
    params(("id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Model soft-deleted", body = MessageResponse),
        (status = 404, description = "Model not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Model Catalog"
)]
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let affected = state.repo.soft_delete(id).await?;
    if affected == 0 {
        return Err(AppError::NotFound(format!("Model with id {} not found.", id)));
    }

    // Files stay on disk: soft delete keeps the record recoverable.
    Ok(Json(MessageResponse {
        message: format!("Model {} marked as deleted.", id),
    }))
}
