use models::student::StudentStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The user account this enrollment belongs to.
    pub user_id: Uuid,
    /// The sales person who owns this student's pipeline.
    pub sales_person: Uuid,
    pub assigned_trainer: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub status: StudentStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SalesPerson",
        to = "super::users::Column::Id"
    )]
    SalesPerson,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedTrainer",
        to = "super::users::Column::Id"
    )]
    AssignedTrainer,
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id"
    )]
    Batch,
    #[sea_orm(has_many = "super::student_courses::Entity")]
    StudentCourses,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl Related<super::student_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentCourses.def()
    }
}

// Many-to-many relationship with courses (the assigned-courses set)
impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        super::student_courses::Relation::Course.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::student_courses::Relation::Student.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
