use crate::dtos::{CourseRef, UserContactRef, UserRef};
use database::entities::students;
use database::services::student::ExpandedStudent;
use models::student::StudentStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub user_id: Uuid,
    pub sales_person: Uuid,
    #[serde(default)]
    pub assigned_courses: Vec<Uuid>,
    pub assigned_trainer: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub status: StudentStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub sales_person: Option<Uuid>,
    /// Replaces the whole assigned-courses set when supplied.
    pub assigned_courses: Option<Vec<Uuid>>,
    pub assigned_trainer: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub status: Option<StudentStatus>,
}

/// Student row with user, courses and trainer expanded, for rosters and
/// detail views.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: Uuid,
    pub user: Option<UserContactRef>,
    pub sales_person: Uuid,
    pub assigned_courses: Vec<CourseRef>,
    pub assigned_trainer: Option<UserRef>,
    pub batch_id: Option<Uuid>,
    pub status: StudentStatus,
}

impl From<ExpandedStudent> for StudentResponse {
    fn from(expanded: ExpandedStudent) -> Self {
        Self {
            id: expanded.student.id,
            user: expanded.user.map(UserContactRef::from),
            sales_person: expanded.student.sales_person,
            assigned_courses: expanded.courses.into_iter().map(CourseRef::from).collect(),
            assigned_trainer: expanded.trainer.map(UserRef::from),
            batch_id: expanded.student.batch_id,
            status: expanded.student.status,
        }
    }
}

/// Flat student record as returned by create/update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecordResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sales_person: Uuid,
    pub assigned_trainer: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub status: StudentStatus,
}

impl From<students::Model> for StudentRecordResponse {
    fn from(student: students::Model) -> Self {
        Self {
            id: student.id,
            user_id: student.user_id,
            sales_person: student.sales_person,
            assigned_trainer: student.assigned_trainer,
            batch_id: student.batch_id,
            status: student.status,
        }
    }
}
