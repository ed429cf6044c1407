use crate::entities::{attendance, courses, students, users};
use crate::error::ServiceError;
use crate::policy::{self, Actor};
use crate::services::lookup;
use crate::services::student::StudentService;
use chrono::Utc;
use models::attendance::AttendanceStatus;
use models::role::Role;
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub batch_id: Option<Uuid>,
    pub trainer_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateAttendance {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendancePatch {
    pub status: Option<AttendanceStatus>,
    pub notes: Option<String>,
}

/// Bulk marking: one shared date/status/notes applied to either every
/// student of a batch or an explicit list of students.
#[derive(Debug, Clone)]
pub struct BulkAttendance {
    pub date: DateTimeUtc,
    pub batch_id: Option<Uuid>,
    pub student_ids: Option<Vec<Uuid>>,
    pub course_id: Uuid,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Attendance row with its cross-references resolved for display.
#[derive(Debug, Clone)]
pub struct ExpandedAttendance {
    pub record: attendance::Model,
    pub student: Option<students::Model>,
    pub course: Option<courses::Model>,
    pub trainer: Option<users::Model>,
}

pub struct AttendanceService;

impl AttendanceService {
    /// Lists attendance records. A batch filter first expands to the set
    /// of students currently in that batch. Trainer callers only ever see
    /// records they marked themselves; the explicit trainer filter is for
    /// admins and can only narrow the result further.
    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
        filter: AttendanceFilter,
    ) -> Result<Vec<ExpandedAttendance>, ServiceError> {
        let mut condition = Condition::all();

        if let Some(batch_id) = filter.batch_id {
            let student_ids: Vec<Uuid> = students::Entity::find()
                .filter(students::Column::BatchId.eq(batch_id))
                .select_only()
                .column(students::Column::Id)
                .into_tuple()
                .all(db)
                .await?;
            if student_ids.is_empty() {
                return Ok(Vec::new());
            }
            condition = condition.add(attendance::Column::StudentId.is_in(student_ids));
        }

        if actor.role == Role::Trainer {
            condition = condition.add(attendance::Column::TrainerId.eq(actor.id));
        } else if let Some(trainer_id) = filter.trainer_id {
            condition = condition.add(attendance::Column::TrainerId.eq(trainer_id));
        }

        let records = attendance::Entity::find()
            .filter(condition)
            .all(db)
            .await?;
        Self::expand(db, records).await
    }

    /// Marks a single student. The batch id is denormalized from the
    /// student row so batch-scoped listing needs no join at read time.
    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: CreateAttendance,
    ) -> Result<attendance::Model, ServiceError> {
        let student = students::Entity::find_by_id(input.student_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        StudentService::ensure_assigned(db, student.id, input.course_id).await?;

        let now = Utc::now();
        let record = attendance::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            batch_id: Set(student.batch_id),
            course_id: Set(input.course_id),
            trainer_id: Set(actor.id),
            date: Set(now),
            status: Set(input.status),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(record.insert(db).await?)
    }

    /// Only status and notes are mutable; everything else is fixed at
    /// record time.
    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        patch: AttendancePatch,
    ) -> Result<attendance::Model, ServiceError> {
        let existing = attendance::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Attendance record"))?;

        if !policy::can_mutate_attendance(actor, existing.trainer_id) {
            return Err(ServiceError::forbidden(
                "Not authorized to update this attendance record",
            ));
        }

        let mut record: attendance::ActiveModel = existing.into();
        if let Some(status) = patch.status {
            record.status = Set(status);
        }
        if let Some(notes) = patch.notes {
            record.notes = Set(Some(notes));
        }
        record.updated_at = Set(Utc::now());
        Ok(record.update(db).await?)
    }

    /// Inserts one record per resolved student in a single multi-row
    /// insert: the batch lands whole or not at all.
    pub async fn create_bulk(
        db: &DatabaseConnection,
        actor: &Actor,
        input: BulkAttendance,
    ) -> Result<Vec<attendance::Model>, ServiceError> {
        let targets = match (input.batch_id, &input.student_ids) {
            (Some(batch_id), _) => {
                students::Entity::find()
                    .filter(students::Column::BatchId.eq(batch_id))
                    .all(db)
                    .await?
            }
            (None, Some(ids)) if !ids.is_empty() => {
                students::Entity::find()
                    .filter(students::Column::Id.is_in(ids.clone()))
                    .all(db)
                    .await?
            }
            _ => {
                return Err(ServiceError::invalid_input(
                    "Either batchId or records must be provided",
                ));
            }
        };

        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut ids = Vec::with_capacity(targets.len());
        let rows: Vec<attendance::ActiveModel> = targets
            .iter()
            .map(|student| {
                let id = Uuid::new_v4();
                ids.push(id);
                attendance::ActiveModel {
                    id: Set(id),
                    student_id: Set(student.id),
                    batch_id: Set(student.batch_id),
                    course_id: Set(input.course_id),
                    trainer_id: Set(actor.id),
                    date: Set(input.date),
                    status: Set(input.status),
                    notes: Set(input.notes.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
            })
            .collect();

        attendance::Entity::insert_many(rows).exec(db).await?;

        Ok(attendance::Entity::find()
            .filter(attendance::Column::Id.is_in(ids))
            .all(db)
            .await?)
    }

    /// A student's own history, newest first. Staff roles and the student
    /// themself may read it.
    pub async fn for_student(
        db: &DatabaseConnection,
        actor: &Actor,
        student_id: Uuid,
    ) -> Result<Vec<ExpandedAttendance>, ServiceError> {
        let student = students::Entity::find_by_id(student_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        if !policy::can_view_student_records(actor, student.user_id) {
            return Err(ServiceError::forbidden(
                "Not authorized to access this student's attendance",
            ));
        }

        let records = attendance::Entity::find()
            .filter(attendance::Column::StudentId.eq(student_id))
            .order_by_desc(attendance::Column::Date)
            .all(db)
            .await?;
        Self::expand(db, records).await
    }

    /// Records marked by a trainer, newest first. Admins or the trainer
    /// themself.
    pub async fn for_trainer(
        db: &DatabaseConnection,
        actor: &Actor,
        trainer_id: Uuid,
    ) -> Result<Vec<ExpandedAttendance>, ServiceError> {
        if !policy::can_view_trainer_records(actor, trainer_id) {
            return Err(ServiceError::forbidden(
                "Not authorized to access this trainer's attendance records",
            ));
        }

        let records = attendance::Entity::find()
            .filter(attendance::Column::TrainerId.eq(trainer_id))
            .order_by_desc(attendance::Column::Date)
            .all(db)
            .await?;
        Self::expand(db, records).await
    }

    async fn expand(
        db: &DatabaseConnection,
        records: Vec<attendance::Model>,
    ) -> Result<Vec<ExpandedAttendance>, ServiceError> {
        let (students, courses, trainers) = futures::try_join!(
            lookup::students_by_id(db, records.iter().map(|r| r.student_id)),
            lookup::courses_by_id(db, records.iter().map(|r| r.course_id)),
            lookup::users_by_id(db, records.iter().map(|r| r.trainer_id)),
        )?;

        Ok(records
            .into_iter()
            .map(|record| ExpandedAttendance {
                student: students.get(&record.student_id).cloned(),
                course: courses.get(&record.course_id).cloned(),
                trainer: trainers.get(&record.trainer_id).cloned(),
                record,
            })
            .collect())
    }
}
