use crate::dtos::{CourseRef, UserRef};
use chrono::{DateTime, Utc};
use database::entities::attendance;
use database::services::attendance::ExpandedAttendance;
use models::attendance::AttendanceStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQueryParams {
    /// Restrict to students currently in this batch.
    pub batch_id: Option<Uuid>,
    /// Restrict to records marked by this trainer (ignored for trainer
    /// callers, who are always scoped to themselves).
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendanceRequest {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceRequest {
    pub date: DateTime<Utc>,
    /// Mode 1: every student currently in this batch.
    pub batch_id: Option<Uuid>,
    /// Mode 2: an explicit list of students.
    pub records: Option<Vec<BulkAttendanceRecord>>,
    pub course_id: Uuid,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceRecord {
    pub student_id: Uuid,
}

/// Student reference as shown on attendance rows.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStudentRef {
    pub id: Uuid,
    pub batch_id: Option<Uuid>,
}

/// Attendance row with expanded cross-references, for list views.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub student: Option<AttendanceStudentRef>,
    pub batch_id: Option<Uuid>,
    pub course: Option<CourseRef>,
    pub trainer: Option<UserRef>,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

impl From<ExpandedAttendance> for AttendanceResponse {
    fn from(expanded: ExpandedAttendance) -> Self {
        Self {
            id: expanded.record.id,
            student: expanded.student.map(|s| AttendanceStudentRef {
                id: s.id,
                batch_id: s.batch_id,
            }),
            batch_id: expanded.record.batch_id,
            course: expanded.course.map(CourseRef::from),
            trainer: expanded.trainer.map(UserRef::from),
            date: expanded.record.date,
            status: expanded.record.status,
            notes: expanded.record.notes,
        }
    }
}

/// Flat attendance record as returned by create/update.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecordResponse {
    pub id: Uuid,
    pub student_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub course_id: Uuid,
    pub trainer_id: Uuid,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

impl From<attendance::Model> for AttendanceRecordResponse {
    fn from(record: attendance::Model) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            batch_id: record.batch_id,
            course_id: record.course_id,
            trainer_id: record.trainer_id,
            date: record.date,
            status: record.status,
            notes: record.notes,
        }
    }
}
