use database::entities::courses;
use models::installment::InstallmentPlan;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    pub description: String,
    /// Course length in weeks.
    pub duration: i32,
    pub total_fees: i64,
    #[serde(default)]
    pub installments: InstallmentPlan,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub total_fees: Option<i64>,
    pub installments: Option<InstallmentPlan>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub total_fees: i64,
    pub installments: InstallmentPlan,
}

impl From<courses::Model> for CourseResponse {
    fn from(course: courses::Model) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            duration: course.duration_weeks,
            total_fees: course.total_fees,
            installments: course.installments,
        }
    }
}
