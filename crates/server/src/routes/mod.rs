pub mod attendance;
pub mod batch;
pub mod course;
pub mod fee;
pub mod health;
pub mod student;
pub mod user;

use axum::Router;
use axum::routing::{get, patch, post, put};
use models::role::Role;

use crate::state::AppState;

/// Roles allowed to mark and edit attendance.
pub(crate) const ATTENDANCE_MARKERS: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::Trainer];
/// Roles that author and manage fee records.
pub(crate) const FEE_MANAGERS: &[Role] = &[Role::SuperAdmin, Role::Admin, Role::SalesPerson];
/// Any staff role.
pub(crate) const STAFF: &[Role] = &[
    Role::SuperAdmin,
    Role::Admin,
    Role::Trainer,
    Role::SalesPerson,
];
/// Administrative roles only.
pub(crate) const ADMINS: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Every bearer-token-protected route; nested under `/api` by `main`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/attendance",
            get(attendance::get_attendance).post(attendance::create_attendance),
        )
        .route("/attendance/bulk", post(attendance::create_bulk_attendance))
        .route("/attendance/{id}", put(attendance::update_attendance))
        .route(
            "/attendance/student/{student_id}",
            get(attendance::get_student_attendance),
        )
        .route(
            "/attendance/trainer/{trainer_id}",
            get(attendance::get_trainer_attendance),
        )
        .route("/fees", get(fee::get_fees).post(fee::create_fee))
        .route("/fees/pending", get(fee::get_pending_fees))
        .route("/fees/overdue", get(fee::get_overdue_fees))
        .route("/fees/payment", post(fee::record_payment))
        .route("/fees/{id}", put(fee::update_fee))
        .route("/fees/{id}/status", patch(fee::update_fee_status))
        .route("/batches", get(batch::get_batches).post(batch::create_batch))
        .route("/batches/{id}", put(batch::update_batch))
        .route("/batches/{id}/students", get(batch::get_batch_students))
        .route(
            "/students",
            get(student::get_students).post(student::create_student),
        )
        .route(
            "/students/{id}",
            get(student::get_student_by_id).put(student::update_student),
        )
        .route(
            "/courses",
            get(course::get_courses).post(course::create_course),
        )
        .route(
            "/courses/{id}",
            get(course::get_course_by_id).put(course::update_course),
        )
        .route("/users", get(user::get_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user_by_id).put(user::update_user),
        )
}
