use crate::entities::courses;
use crate::error::ServiceError;
use chrono::Utc;
use models::installment::InstallmentPlan;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub name: String,
    pub description: String,
    pub duration_weeks: i32,
    pub total_fees: i64,
    pub installments: InstallmentPlan,
}

#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_weeks: Option<i32>,
    pub total_fees: Option<i64>,
    pub installments: Option<InstallmentPlan>,
}

pub struct CourseService;

impl CourseService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<courses::Model>, ServiceError> {
        Ok(courses::Entity::find().all(db).await?)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<courses::Model, ServiceError> {
        courses::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: CreateCourse,
    ) -> Result<courses::Model, ServiceError> {
        let now = Utc::now();
        Ok(courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            duration_weeks: Set(input.duration_weeks),
            total_fees: Set(input.total_fees),
            installments: Set(input.installments),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        patch: CoursePatch,
    ) -> Result<courses::Model, ServiceError> {
        let existing = courses::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))?;

        let mut record: courses::ActiveModel = existing.into();
        if let Some(name) = patch.name {
            record.name = Set(name);
        }
        if let Some(description) = patch.description {
            record.description = Set(description);
        }
        if let Some(duration_weeks) = patch.duration_weeks {
            record.duration_weeks = Set(duration_weeks);
        }
        if let Some(total_fees) = patch.total_fees {
            record.total_fees = Set(total_fees);
        }
        if let Some(installments) = patch.installments {
            record.installments = Set(installments);
        }
        record.updated_at = Set(Utc::now());
        Ok(record.update(db).await?)
    }
}
