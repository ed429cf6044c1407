use crate::entities::{courses, fees, students, users};
use crate::error::ServiceError;
use crate::policy::Actor;
use crate::services::lookup;
use crate::services::student::StudentService;
use chrono::Utc;
use models::fee::FeeStatus;
use models::role::Role;
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct FeeFilter {
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateFee {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub due_date: DateTimeUtc,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeePatch {
    pub amount: Option<i64>,
    pub due_date: Option<DateTimeUtc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub fee_id: Uuid,
    pub paid_date: Option<DateTimeUtc>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

/// Fee row with its cross-references resolved for display, including the
/// student's user account (name and registered email).
#[derive(Debug, Clone)]
pub struct ExpandedFee {
    pub fee: fees::Model,
    pub student: Option<students::Model>,
    pub student_user: Option<users::Model>,
    pub course: Option<courses::Model>,
    pub created_by: Option<users::Model>,
}

pub struct FeeService;

impl FeeService {
    /// Lists fees, due date ascending. Sales people only see fees of
    /// students they own; other staff may pass an explicit student
    /// filter.
    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: FeeFilter,
    ) -> Result<Vec<ExpandedFee>, ServiceError> {
        let mut condition = Condition::all();

        if actor.role == Role::SalesPerson {
            let owned: Vec<Uuid> = students::Entity::find()
                .filter(students::Column::SalesPerson.eq(actor.id))
                .select_only()
                .column(students::Column::Id)
                .into_tuple()
                .all(db)
                .await?;
            if owned.is_empty() {
                return Ok(Vec::new());
            }
            condition = condition.add(fees::Column::StudentId.is_in(owned));
        } else if let Some(student_id) = filter.student_id {
            condition = condition.add(fees::Column::StudentId.eq(student_id));
        }

        let rows = fees::Entity::find()
            .filter(condition)
            .order_by_asc(fees::Column::DueDate)
            .all(db)
            .await?;
        Self::expand(db, rows).await
    }

    /// Creates a pending fee record. The caller becomes `created_by`. The
    /// returned record is expanded so the API layer can compose the
    /// reminder notification without another round trip.
    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: CreateFee,
    ) -> Result<ExpandedFee, ServiceError> {
        let student = students::Entity::find_by_id(input.student_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        let course = courses::Entity::find_by_id(input.course_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course"))?;

        StudentService::ensure_assigned(db, student.id, course.id).await?;

        let now = Utc::now();
        let fee = fees::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            course_id: Set(course.id),
            amount: Set(input.amount),
            due_date: Set(input.due_date),
            payment_method: Set(input.payment_method),
            transaction_id: Set(input.transaction_id),
            notes: Set(input.notes),
            status: Set(FeeStatus::Pending),
            paid_date: Set(None),
            created_by: Set(actor.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Self::expand_one(db, fee).await
    }

    /// Only amount, due date and notes are mutable through the plain
    /// update path; payment evidence moves via `record_payment` and
    /// `update_status`.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        patch: FeePatch,
    ) -> Result<fees::Model, ServiceError> {
        let existing = fees::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Fee record"))?;

        let mut record: fees::ActiveModel = existing.into();
        if let Some(amount) = patch.amount {
            record.amount = Set(amount);
        }
        if let Some(due_date) = patch.due_date {
            record.due_date = Set(due_date);
        }
        if let Some(notes) = patch.notes {
            record.notes = Set(Some(notes));
        }
        record.updated_at = Set(Utc::now());
        Ok(record.update(db).await?)
    }

    /// Marks a fee as paid, defaulting the paid date to now.
    pub async fn record_payment(
        db: &DatabaseConnection,
        input: RecordPayment,
    ) -> Result<fees::Model, ServiceError> {
        let fee = fees::Entity::find_by_id(input.fee_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Fee record"))?;

        let now = Utc::now();
        let mut record: fees::ActiveModel = fee.into();
        record.paid_date = Set(Some(input.paid_date.unwrap_or(now)));
        record.payment_method = Set(input.payment_method);
        record.transaction_id = Set(input.transaction_id);
        record.status = Set(FeeStatus::Paid);
        record.updated_at = Set(now);
        Ok(record.update(db).await?)
    }

    /// Transitions a fee's status. Accepts the raw wire string so an
    /// unknown status surfaces as InvalidInput rather than a decode
    /// failure.
    pub async fn update_status(
        db: &DatabaseConnection,
        id: Uuid,
        status: &str,
    ) -> Result<ExpandedFee, ServiceError> {
        let status = FeeStatus::from_str(status).map_err(|_| {
            ServiceError::invalid_input("Invalid status. Must be pending, paid, or overdue")
        })?;

        let fee = fees::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Fee record"))?;

        let record = apply_status_transition(fee, status, Utc::now());
        let updated = record.update(db).await?;
        Self::expand_one(db, updated).await
    }

    pub async fn pending(db: &DatabaseConnection) -> Result<Vec<ExpandedFee>, ServiceError> {
        let rows = fees::Entity::find()
            .filter(fees::Column::Status.eq(FeeStatus::Pending))
            .order_by_asc(fees::Column::DueDate)
            .all(db)
            .await?;
        Self::expand(db, rows).await
    }

    /// Overdue list. Status is the authoritative signal; the date filter
    /// mirrors the observed query shape and can only narrow the set.
    pub async fn overdue(db: &DatabaseConnection) -> Result<Vec<ExpandedFee>, ServiceError> {
        let rows = fees::Entity::find()
            .filter(fees::Column::Status.eq(FeeStatus::Overdue))
            .filter(fees::Column::DueDate.lte(Utc::now()))
            .order_by_asc(fees::Column::DueDate)
            .all(db)
            .await?;
        Self::expand(db, rows).await
    }

    async fn expand(
        db: &DatabaseConnection,
        rows: Vec<fees::Model>,
    ) -> Result<Vec<ExpandedFee>, ServiceError> {
        let (students, courses) = futures::try_join!(
            lookup::students_by_id(db, rows.iter().map(|f| f.student_id)),
            lookup::courses_by_id(db, rows.iter().map(|f| f.course_id)),
        )?;
        let users = lookup::users_by_id(
            db,
            rows.iter()
                .map(|f| f.created_by)
                .chain(students.values().map(|s| s.user_id)),
        )
        .await?;

        Ok(rows
            .into_iter()
            .map(|fee| {
                let student = students.get(&fee.student_id).cloned();
                ExpandedFee {
                    student_user: student
                        .as_ref()
                        .and_then(|s| users.get(&s.user_id).cloned()),
                    course: courses.get(&fee.course_id).cloned(),
                    created_by: users.get(&fee.created_by).cloned(),
                    student,
                    fee,
                }
            })
            .collect())
    }

    async fn expand_one(
        db: &DatabaseConnection,
        fee: fees::Model,
    ) -> Result<ExpandedFee, ServiceError> {
        let student = students::Entity::find_by_id(fee.student_id).one(db).await?;
        let student_user = match &student {
            Some(s) => users::Entity::find_by_id(s.user_id).one(db).await?,
            None => None,
        };
        let course = courses::Entity::find_by_id(fee.course_id).one(db).await?;
        let created_by = users::Entity::find_by_id(fee.created_by).one(db).await?;
        Ok(ExpandedFee {
            fee,
            student,
            student_user,
            course,
            created_by,
        })
    }
}

/// Status transition rules: entering `paid` stamps the paid date only if
/// it is not already set (repeated paid is a no-op); leaving `paid`
/// clears the payment evidence entirely.
fn apply_status_transition(
    fee: fees::Model,
    status: FeeStatus,
    now: DateTimeUtc,
) -> fees::ActiveModel {
    let had_paid_date = fee.paid_date.is_some();
    let mut record: fees::ActiveModel = fee.into();
    record.status = Set(status);
    match status {
        FeeStatus::Paid => {
            if !had_paid_date {
                record.paid_date = Set(Some(now));
            }
        }
        FeeStatus::Pending | FeeStatus::Overdue => {
            if had_paid_date {
                record.paid_date = Set(None);
                record.payment_method = Set(None);
                record.transaction_id = Set(None);
            }
        }
    }
    record.updated_at = Set(now);
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::ActiveValue;

    fn fee(status: FeeStatus, paid_date: Option<DateTimeUtc>) -> fees::Model {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        fees::Model {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            amount: 10_000,
            due_date: t,
            payment_method: paid_date.map(|_| "upi".to_string()),
            transaction_id: paid_date.map(|_| "txn-1".to_string()),
            notes: None,
            status,
            paid_date,
            created_by: Uuid::new_v4(),
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn entering_paid_stamps_paid_date() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let record = apply_status_transition(fee(FeeStatus::Pending, None), FeeStatus::Paid, now);
        assert_eq!(record.paid_date, ActiveValue::Set(Some(now)));
    }

    #[test]
    fn repeated_paid_keeps_original_paid_date() {
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let record = apply_status_transition(fee(FeeStatus::Paid, Some(first)), FeeStatus::Paid, later);
        // Unchanged, not re-stamped.
        assert_eq!(record.paid_date, ActiveValue::Unchanged(Some(first)));
    }

    #[test]
    fn leaving_paid_clears_payment_evidence() {
        let paid_at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let record =
            apply_status_transition(fee(FeeStatus::Paid, Some(paid_at)), FeeStatus::Pending, now);
        assert_eq!(record.paid_date, ActiveValue::Set(None));
        assert_eq!(record.payment_method, ActiveValue::Set(None));
        assert_eq!(record.transaction_id, ActiveValue::Set(None));
    }

    #[test]
    fn pending_to_overdue_leaves_evidence_untouched() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let record = apply_status_transition(fee(FeeStatus::Pending, None), FeeStatus::Overdue, now);
        assert_eq!(record.paid_date, ActiveValue::Unchanged(None));
    }
}
