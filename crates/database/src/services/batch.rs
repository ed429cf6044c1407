use crate::entities::{batches, courses, students, users};
use crate::error::{ServiceError, on_unique_violation};
use crate::services::lookup;
use crate::services::student::{ExpandedStudent, StudentService};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateBatch {
    pub name: String,
    pub slot: String,
    pub course_id: Uuid,
    pub trainer_id: Uuid,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchPatch {
    pub name: Option<String>,
    pub slot: Option<String>,
    pub course_id: Option<Uuid>,
    pub trainer_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

/// Batch row with its course and trainer resolved for display.
#[derive(Debug, Clone)]
pub struct ExpandedBatch {
    pub batch: batches::Model,
    pub course: Option<courses::Model>,
    pub trainer: Option<users::Model>,
}

pub struct BatchService;

impl BatchService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<ExpandedBatch>, ServiceError> {
        let rows = batches::Entity::find().all(db).await?;
        Self::expand(db, rows).await
    }

    /// Batch names are unique; a duplicate surfaces as Conflict.
    pub async fn create(
        db: &DatabaseConnection,
        input: CreateBatch,
    ) -> Result<batches::Model, ServiceError> {
        let now = Utc::now();
        batches::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            slot: Set(input.slot),
            course_id: Set(input.course_id),
            trainer_id: Set(input.trainer_id),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|err| on_unique_violation(err, "Batch name already exists"))
    }

    /// Partial patch: only supplied fields change.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        patch: BatchPatch,
    ) -> Result<batches::Model, ServiceError> {
        let existing = batches::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Batch"))?;

        let mut record: batches::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            record.name = Set(name);
        }
        if let Some(slot) = patch.slot {
            record.slot = Set(slot);
        }
        if let Some(course_id) = patch.course_id {
            record.course_id = Set(course_id);
        }
        if let Some(trainer_id) = patch.trainer_id {
            record.trainer_id = Set(trainer_id);
        }
        if let Some(is_active) = patch.is_active {
            record.is_active = Set(is_active);
        }
        record.updated_at = Set(Utc::now());
        record
            .update(db)
            .await
            .map_err(|err| on_unique_violation(err, "Batch name already exists"))
    }

    /// Everyone currently enrolled in the batch, expanded for the roster
    /// view.
    pub async fn students(
        db: &DatabaseConnection,
        batch_id: Uuid,
    ) -> Result<Vec<ExpandedStudent>, ServiceError> {
        let rows = students::Entity::find()
            .filter(students::Column::BatchId.eq(batch_id))
            .all(db)
            .await?;
        StudentService::expand(db, rows).await
    }

    async fn expand(
        db: &DatabaseConnection,
        rows: Vec<batches::Model>,
    ) -> Result<Vec<ExpandedBatch>, ServiceError> {
        let (courses, trainers) = futures::try_join!(
            lookup::courses_by_id(db, rows.iter().map(|b| b.course_id)),
            lookup::users_by_id(db, rows.iter().map(|b| b.trainer_id)),
        )?;

        Ok(rows
            .into_iter()
            .map(|batch| ExpandedBatch {
                course: courses.get(&batch.course_id).cloned(),
                trainer: trainers.get(&batch.trainer_id).cloned(),
                batch,
            })
            .collect())
    }
}
