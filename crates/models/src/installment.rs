use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One scheduled partial payment on a course template. This is the plan,
/// not money actually owed — actual dues are Fee records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Amount due, in whole currency units.
    pub amount: i64,
    /// Week of the course (1-based) the installment falls due.
    pub due_week: u32,
}

/// Ordered installment schedule stored as a json column on the course.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
pub struct InstallmentPlan(pub Vec<Installment>);

impl InstallmentPlan {
    /// Sum of all installment amounts. Conventionally equals the course's
    /// total fees, but that is not enforced anywhere.
    pub fn total(&self) -> i64 {
        self.0.iter().map(|i| i.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_installments() {
        let plan = InstallmentPlan(vec![
            Installment {
                amount: 10_000,
                due_week: 1,
            },
            Installment {
                amount: 20_000,
                due_week: 8,
            },
        ]);
        assert_eq!(plan.total(), 30_000);
    }

    #[test]
    fn serializes_camel_case() {
        let plan = InstallmentPlan(vec![Installment {
            amount: 5_000,
            due_week: 4,
        }]);
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(json, r#"[{"amount":5000,"dueWeek":4}]"#);
    }
}
