use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use database::policy;
use database::services::course::{CoursePatch, CourseService, CreateCourse};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::dtos::course::{CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::error::ApiError;
use crate::routes::ADMINS;
use crate::state::AppState;

/// Get all courses
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "All course templates", body = [CourseResponse])
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = CourseService::list(&state.db).await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// Get a specific course by ID
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    CurrentUser(_actor): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = CourseService::get(&state.db, id).await?;
    Ok(Json(CourseResponse::from(course)))
}

/// Create a course template
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse)
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Json(body): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let course = CourseService::create(
        &state.db,
        CreateCourse {
            name: body.name,
            description: body.description,
            duration_weeks: body.duration,
            total_fees: body.total_fees,
            installments: body.installments,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

/// Update a course; only supplied fields change
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 404, description = "Course not found")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    policy::require_role(&actor, ADMINS)?;

    let course = CourseService::update(
        &state.db,
        id,
        CoursePatch {
            name: body.name,
            description: body.description,
            duration_weeks: body.duration,
            total_fees: body.total_fees,
            installments: body.installments,
        },
    )
    .await?;
    Ok(Json(CourseResponse::from(course)))
}
