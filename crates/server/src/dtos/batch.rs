use crate::dtos::{CourseRef, UserRef};
use database::entities::batches;
use database::services::batch::ExpandedBatch;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    pub name: String,
    pub slot: String,
    pub course_id: Uuid,
    pub trainer_id: Uuid,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchRequest {
    pub name: Option<String>,
    pub slot: Option<String>,
    pub course_id: Option<Uuid>,
    pub trainer_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Batch row with expanded course/trainer, for the list view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub id: Uuid,
    pub name: String,
    pub slot: String,
    pub course: Option<CourseRef>,
    pub trainer: Option<UserRef>,
    pub is_active: bool,
}

impl From<ExpandedBatch> for BatchResponse {
    fn from(expanded: ExpandedBatch) -> Self {
        Self {
            id: expanded.batch.id,
            name: expanded.batch.name,
            slot: expanded.batch.slot,
            course: expanded.course.map(CourseRef::from),
            trainer: expanded.trainer.map(UserRef::from),
            is_active: expanded.batch.is_active,
        }
    }
}

/// Flat batch record as returned by create/update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecordResponse {
    pub id: Uuid,
    pub name: String,
    pub slot: String,
    pub course_id: Uuid,
    pub trainer_id: Uuid,
    pub is_active: bool,
}

impl From<batches::Model> for BatchRecordResponse {
    fn from(batch: batches::Model) -> Self {
        Self {
            id: batch.id,
            name: batch.name,
            slot: batch.slot,
            course_id: batch.course_id,
            trainer_id: batch.trainer_id,
            is_active: batch.is_active,
        }
    }
}
