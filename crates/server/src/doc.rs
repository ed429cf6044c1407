use crate::routes::{attendance, batch, course, fee, health, student, user};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        attendance::get_attendance,
        attendance::create_attendance,
        attendance::update_attendance,
        attendance::create_bulk_attendance,
        attendance::get_student_attendance,
        attendance::get_trainer_attendance,
        fee::get_fees,
        fee::create_fee,
        fee::update_fee,
        fee::record_payment,
        fee::update_fee_status,
        fee::get_pending_fees,
        fee::get_overdue_fees,
        batch::get_batches,
        batch::create_batch,
        batch::update_batch,
        batch::get_batch_students,
        student::get_students,
        student::get_student_by_id,
        student::create_student,
        student::update_student,
        course::get_courses,
        course::get_course_by_id,
        course::create_course,
        course::update_course,
        user::get_users,
        user::get_user_by_id,
        user::create_user,
        user::update_user,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and store connectivity"),
        (name = "Attendance", description = "Attendance marking and history"),
        (name = "Fees", description = "Fee records and payment lifecycle"),
        (name = "Batches", description = "Class sections and rosters"),
        (name = "Students", description = "Student enrollment records"),
        (name = "Courses", description = "Course templates and installment plans"),
        (name = "Users", description = "User account administration"),
    ),
    info(
        title = "Institute ERP API",
        version = "1.0.0",
        description = "Training-institute management API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
