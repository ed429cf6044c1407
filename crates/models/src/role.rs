use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Access role attached to every user account. A role is fixed at account
/// creation; every request is authorized against it.
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
pub enum Role {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "trainer")]
    Trainer,
    #[sea_orm(string_value = "sales_person")]
    SalesPerson,
    #[sea_orm(string_value = "student")]
    Student,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_wire_names() {
        assert_eq!(Role::from_str("super_admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_str("sales_person").unwrap(), Role::SalesPerson);
        assert!(Role::from_str("superadmin").is_err());
    }

    #[test]
    fn displays_wire_names() {
        assert_eq!(Role::SalesPerson.to_string(), "sales_person");
        assert_eq!(Role::Trainer.to_string(), "trainer");
    }
}
