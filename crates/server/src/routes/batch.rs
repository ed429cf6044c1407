use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use database::policy;
use database::services::batch::{BatchPatch, BatchService, CreateBatch};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::dtos::batch::{
    BatchRecordResponse, BatchResponse, CreateBatchRequest, UpdateBatchRequest,
};
use crate::dtos::student::StudentResponse;
use crate::error::ApiError;
use crate::routes::{ADMINS, STAFF};
use crate::state::AppState;

/// Get all batches
#[utoipa::path(
    get,
    path = "/api/batches",
    responses(
        (status = 200, description = "Batches with expanded course and trainer", body = [BatchResponse])
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn get_batches(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    policy::require_role(&actor, STAFF)?;

    let batches = BatchService::list(&state.db).await?;
    Ok(Json(batches.into_iter().map(BatchResponse::from).collect()))
}

/// Create a batch
#[utoipa::path(
    post,
    path = "/api/batches",
    request_body = CreateBatchRequest,
    responses(
        (status = 201, description = "Batch created", body = BatchRecordResponse),
        (status = 409, description = "Batch name already exists")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn create_batch(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateBatchRequest>,
) -> Result<(StatusCode, Json<BatchRecordResponse>), ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let batch = BatchService::create(
        &state.db,
        CreateBatch {
            name: body.name,
            slot: body.slot,
            course_id: body.course_id,
            trainer_id: body.trainer_id,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(BatchRecordResponse::from(batch))))
}

/// Update a batch; only supplied fields change
#[utoipa::path(
    put,
    path = "/api/batches/{id}",
    params(("id" = Uuid, Path, description = "Batch ID")),
    request_body = UpdateBatchRequest,
    responses(
        (status = 200, description = "Batch updated", body = BatchRecordResponse),
        (status = 404, description = "Batch not found"),
        (status = 409, description = "Batch name already exists")
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn update_batch(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBatchRequest>,
) -> Result<Json<BatchRecordResponse>, ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let batch = BatchService::update(
        &state.db,
        id,
        BatchPatch {
            name: body.name,
            slot: body.slot,
            course_id: body.course_id,
            trainer_id: body.trainer_id,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(BatchRecordResponse::from(batch)))
}

/// Get the roster of a batch
#[utoipa::path(
    get,
    path = "/api/batches/{id}/students",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = 200, description = "Students currently in the batch", body = [StudentResponse])
    ),
    security(("jwt" = [])),
    tag = "Batches"
)]
pub async fn get_batch_students(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    policy::require_role(&actor, STAFF)?;

    let students = BatchService::students(&state.db, id).await?;
    Ok(Json(
        students.into_iter().map(StudentResponse::from).collect(),
    ))
}
