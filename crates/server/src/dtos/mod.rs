pub mod attendance;
pub mod batch;
pub mod course;
pub mod fee;
pub mod student;
pub mod user;

use database::entities::{courses, users};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Minimal user reference embedded in expanded responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

impl From<users::Model> for UserRef {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

/// User reference that also carries the registered email, for views that
/// contact the student.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserContactRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<users::Model> for UserContactRef {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Minimal course reference embedded in expanded responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    pub id: Uuid,
    pub name: String,
}

impl From<courses::Model> for CourseRef {
    fn from(course: courses::Model) -> Self {
        Self {
            id: course.id,
            name: course.name,
        }
    }
}
