use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use database::policy;
use database::services::attendance::{
    AttendanceFilter, AttendancePatch, AttendanceService, BulkAttendance, CreateAttendance,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::dtos::attendance::{
    AttendanceQueryParams, AttendanceRecordResponse, AttendanceResponse, BulkAttendanceRequest,
    CreateAttendanceRequest, UpdateAttendanceRequest,
};
use crate::error::ApiError;
use crate::routes::ATTENDANCE_MARKERS;
use crate::state::AppState;

/// Get attendance records, optionally scoped to a batch or trainer
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQueryParams),
    responses(
        (status = 200, description = "Attendance records with expanded references", body = [AttendanceResponse]),
        (status = 403, description = "Caller's role may not list attendance")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn get_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Query(params): Query<AttendanceQueryParams>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    policy::require_role(&actor, ATTENDANCE_MARKERS)?;

    let records = AttendanceService::list(
        &state.db,
        &actor,
        AttendanceFilter {
            batch_id: params.batch_id,
            trainer_id: params.trainer_id,
        },
    )
    .await?;
    Ok(Json(
        records.into_iter().map(AttendanceResponse::from).collect(),
    ))
}

/// Mark attendance for a single student
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendanceRequest,
    responses(
        (status = 201, description = "Record created", body = AttendanceRecordResponse),
        (status = 400, description = "Student is not assigned to the course"),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn create_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceRecordResponse>), ApiError> {
    policy::require_role(&actor, ATTENDANCE_MARKERS)?;

    let record = AttendanceService::create(
        &state.db,
        &actor,
        CreateAttendance {
            student_id: body.student_id,
            course_id: body.course_id,
            status: body.status,
            notes: body.notes,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(AttendanceRecordResponse::from(record)),
    ))
}

/// Update an attendance record's status or notes
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    request_body = UpdateAttendanceRequest,
    responses(
        (status = 200, description = "Record updated", body = AttendanceRecordResponse),
        (status = 403, description = "Caller is neither an admin nor the marking trainer"),
        (status = 404, description = "Record not found")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn update_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceRecordResponse>, ApiError> {
    policy::require_role(&actor, ATTENDANCE_MARKERS)?;

    let record = AttendanceService::update(
        &state.db,
        &actor,
        id,
        AttendancePatch {
            status: body.status,
            notes: body.notes,
        },
    )
    .await?;
    Ok(Json(AttendanceRecordResponse::from(record)))
}

/// Mark attendance for a whole batch or an explicit list of students
#[utoipa::path(
    post,
    path = "/api/attendance/bulk",
    request_body = BulkAttendanceRequest,
    responses(
        (status = 201, description = "All records created", body = [AttendanceRecordResponse]),
        (status = 400, description = "Neither batchId nor records provided")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn create_bulk_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<BulkAttendanceRequest>,
) -> Result<(StatusCode, Json<Vec<AttendanceRecordResponse>>), ApiError> {
    policy::require_role(&actor, ATTENDANCE_MARKERS)?;

    let records = AttendanceService::create_bulk(
        &state.db,
        &actor,
        BulkAttendance {
            date: body.date,
            batch_id: body.batch_id,
            student_ids: body
                .records
                .map(|records| records.into_iter().map(|r| r.student_id).collect()),
            course_id: body.course_id,
            status: body.status,
            notes: body.notes,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(
            records
                .into_iter()
                .map(AttendanceRecordResponse::from)
                .collect(),
        ),
    ))
}

/// Get a student's attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "The student's records", body = [AttendanceResponse]),
        (status = 403, description = "Caller is neither staff nor the student"),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let records = AttendanceService::for_student(&state.db, &actor, student_id).await?;
    Ok(Json(
        records.into_iter().map(AttendanceResponse::from).collect(),
    ))
}

/// Get the records a trainer has marked, newest first
#[utoipa::path(
    get,
    path = "/api/attendance/trainer/{trainer_id}",
    params(("trainer_id" = Uuid, Path, description = "Trainer ID")),
    responses(
        (status = 200, description = "The trainer's records", body = [AttendanceResponse]),
        (status = 403, description = "Caller is neither an admin nor the trainer")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn get_trainer_attendance(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(trainer_id): Path<Uuid>,
) -> Result<Json<Vec<AttendanceResponse>>, ApiError> {
    let records = AttendanceService::for_trainer(&state.db, &actor, trainer_id).await?;
    Ok(Json(
        records.into_iter().map(AttendanceResponse::from).collect(),
    ))
}
