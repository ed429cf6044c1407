use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Enrollment state of a student. `Trial` marks pre-enrollment evaluation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
    EnumString,
    Display,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StudentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "trial")]
    Trial,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "completed")]
    Completed,
}
