use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use database::policy;
use database::services::student::{CreateStudent, StudentPatch, StudentService};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::dtos::student::{
    CreateStudentRequest, StudentRecordResponse, StudentResponse, UpdateStudentRequest,
};
use crate::error::ApiError;
use crate::routes::{FEE_MANAGERS, STAFF};
use crate::state::AppState;

/// Get students; sales people see only their own
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "Students with expanded references", body = [StudentResponse])
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_students(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    policy::require_role(&actor, STAFF)?;

    let students = StudentService::list(&state.db, &actor).await?;
    Ok(Json(
        students.into_iter().map(StudentResponse::from).collect(),
    ))
}

/// Get a single student; staff or the student themself
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "The student", body = StudentResponse),
        (status = 403, description = "Caller is neither staff nor the student"),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student_by_id(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = StudentService::get(&state.db, &actor, id).await?;
    Ok(Json(StudentResponse::from(student)))
}

/// Enroll a student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentRecordResponse),
        (status = 404, description = "Linked user not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentRecordResponse>), ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let student = StudentService::create(
        &state.db,
        CreateStudent {
            user_id: body.user_id,
            sales_person: body.sales_person,
            assigned_courses: body.assigned_courses,
            assigned_trainer: body.assigned_trainer,
            batch_id: body.batch_id,
            status: body.status,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(StudentRecordResponse::from(student)),
    ))
}

/// Update a student; only supplied fields change
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentRecordResponse),
        (status = 404, description = "Student not found")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<StudentRecordResponse>, ApiError> {
    policy::require_role(&actor, FEE_MANAGERS)?;

    let student = StudentService::update(
        &state.db,
        id,
        StudentPatch {
            sales_person: body.sales_person,
            assigned_courses: body.assigned_courses,
            assigned_trainer: body.assigned_trainer,
            batch_id: body.batch_id,
            status: body.status,
        },
    )
    .await?;
    Ok(Json(StudentRecordResponse::from(student)))
}
