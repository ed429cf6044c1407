use models::installment::InstallmentPlan;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Course length in weeks.
    pub duration_weeks: i32,
    pub total_fees: i64,
    /// Scheduled partial payments; sum conventionally equals total_fees.
    #[sea_orm(column_type = "Json")]
    pub installments: InstallmentPlan,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::batches::Entity")]
    Batches,
    #[sea_orm(has_many = "super::student_courses::Entity")]
    StudentCourses,
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl Related<super::student_courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentCourses.def()
    }
}

// Many-to-many relationship with students
impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        super::student_courses::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::student_courses::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
