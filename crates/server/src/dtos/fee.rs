use crate::dtos::{CourseRef, UserContactRef, UserRef};
use chrono::{DateTime, Utc};
use database::entities::fees;
use database::services::fee::ExpandedFee;
use models::fee::FeeStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FeeQueryParams {
    /// Explicit student filter; ignored for sales people, who are always
    /// scoped to their own students.
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub due_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeRequest {
    pub amount: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub fee_id: Uuid,
    /// Defaults to the current time when omitted.
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

/// The raw wire string is validated by the service so an unknown status
/// comes back as the uniform InvalidInput failure.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeStatusRequest {
    pub status: String,
}

/// Student reference on fee rows, carrying the account holder's contact
/// details.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeStudentRef {
    pub id: Uuid,
    pub user: Option<UserContactRef>,
}

/// Fee row with expanded cross-references, for list views and the
/// create/status-transition responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeResponse {
    pub id: Uuid,
    pub student: Option<FeeStudentRef>,
    pub course: Option<CourseRef>,
    pub amount: i64,
    pub due_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub status: FeeStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_by: Option<UserRef>,
}

impl From<ExpandedFee> for FeeResponse {
    fn from(expanded: ExpandedFee) -> Self {
        Self {
            id: expanded.fee.id,
            student: expanded.student.map(|s| FeeStudentRef {
                id: s.id,
                user: expanded.student_user.map(UserContactRef::from),
            }),
            course: expanded.course.map(CourseRef::from),
            amount: expanded.fee.amount,
            due_date: expanded.fee.due_date,
            payment_method: expanded.fee.payment_method,
            transaction_id: expanded.fee.transaction_id,
            notes: expanded.fee.notes,
            status: expanded.fee.status,
            paid_date: expanded.fee.paid_date,
            created_by: expanded.created_by.map(UserRef::from),
        }
    }
}

/// Flat fee record as returned by update and payment recording.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecordResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub due_date: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub status: FeeStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

impl From<fees::Model> for FeeRecordResponse {
    fn from(fee: fees::Model) -> Self {
        Self {
            id: fee.id,
            student_id: fee.student_id,
            course_id: fee.course_id,
            amount: fee.amount,
            due_date: fee.due_date,
            payment_method: fee.payment_method,
            transaction_id: fee.transaction_id,
            notes: fee.notes,
            status: fee.status,
            paid_date: fee.paid_date,
            created_by: fee.created_by,
        }
    }
}
