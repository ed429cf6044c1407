use crate::entities::{courses, student_courses, students, users};
use crate::error::ServiceError;
use crate::policy::{self, Actor};
use crate::services::lookup;
use chrono::Utc;
use models::role::Role;
use models::student::StudentStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateStudent {
    pub user_id: Uuid,
    pub sales_person: Uuid,
    pub assigned_courses: Vec<Uuid>,
    pub assigned_trainer: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub sales_person: Option<Uuid>,
    /// Replaces the whole assigned-courses set when supplied.
    pub assigned_courses: Option<Vec<Uuid>>,
    pub assigned_trainer: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub status: Option<StudentStatus>,
}

/// Student row with user account, assigned courses and trainer resolved.
#[derive(Debug, Clone)]
pub struct ExpandedStudent {
    pub student: students::Model,
    pub user: Option<users::Model>,
    pub courses: Vec<courses::Model>,
    pub trainer: Option<users::Model>,
}

pub struct StudentService;

impl StudentService {
    /// Lists students. Sales people see only the students whose pipeline
    /// they own; admins and trainers see everything.
    pub async fn list(
        db: &DatabaseConnection,
        actor: &Actor,
    ) -> Result<Vec<ExpandedStudent>, ServiceError> {
        let mut condition = Condition::all();
        if actor.role == Role::SalesPerson {
            condition = condition.add(students::Column::SalesPerson.eq(actor.id));
        }

        let rows = students::Entity::find().filter(condition).all(db).await?;
        Self::expand(db, rows).await
    }

    pub async fn get(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
    ) -> Result<ExpandedStudent, ServiceError> {
        let student = students::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        if !policy::can_view_student_records(actor, student.user_id) {
            return Err(ServiceError::forbidden(
                "Not authorized to access this student",
            ));
        }

        Self::expand(db, vec![student])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("Student"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: CreateStudent,
    ) -> Result<students::Model, ServiceError> {
        users::Entity::find_by_id(input.user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        let now = Utc::now();
        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            sales_person: Set(input.sales_person),
            assigned_trainer: Set(input.assigned_trainer),
            batch_id: Set(input.batch_id),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Self::replace_assignments(db, student.id, &input.assigned_courses).await?;
        Ok(student)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        patch: StudentPatch,
    ) -> Result<students::Model, ServiceError> {
        let existing = students::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Student"))?;

        let mut record: students::ActiveModel = existing.into();
        if let Some(sales_person) = patch.sales_person {
            record.sales_person = Set(sales_person);
        }
        if let Some(trainer) = patch.assigned_trainer {
            record.assigned_trainer = Set(Some(trainer));
        }
        if let Some(batch_id) = patch.batch_id {
            record.batch_id = Set(Some(batch_id));
        }
        if let Some(status) = patch.status {
            record.status = Set(status);
        }
        record.updated_at = Set(Utc::now());
        let student = record.update(db).await?;

        if let Some(assigned) = patch.assigned_courses {
            Self::replace_assignments(db, student.id, &assigned).await?;
        }
        Ok(student)
    }

    /// Fails with InvalidState unless the course is in the student's
    /// assigned set — the referential precondition shared by attendance
    /// and fee creation.
    pub(crate) async fn ensure_assigned(
        db: &DatabaseConnection,
        student_id: Uuid,
        course_id: Uuid,
    ) -> Result<(), ServiceError> {
        let assigned = student_courses::Entity::find()
            .filter(student_courses::Column::StudentId.eq(student_id))
            .filter(student_courses::Column::CourseId.eq(course_id))
            .one(db)
            .await?;
        if assigned.is_none() {
            return Err(ServiceError::invalid_state(
                "Student is not assigned to this course",
            ));
        }
        Ok(())
    }

    pub(crate) async fn expand(
        db: &DatabaseConnection,
        rows: Vec<students::Model>,
    ) -> Result<Vec<ExpandedStudent>, ServiceError> {
        let links = if rows.is_empty() {
            Vec::new()
        } else {
            student_courses::Entity::find()
                .filter(
                    student_courses::Column::StudentId
                        .is_in(rows.iter().map(|s| s.id).collect::<Vec<_>>()),
                )
                .all(db)
                .await?
        };

        let user_ids: Vec<Uuid> = rows
            .iter()
            .flat_map(|s| [Some(s.user_id), s.assigned_trainer])
            .flatten()
            .collect();
        let course_ids_lookup: Vec<Uuid> = links.iter().map(|l| l.course_id).collect();
        let (users, courses) = futures::try_join!(
            lookup::users_by_id(db, user_ids),
            lookup::courses_by_id(db, course_ids_lookup),
        )?;

        let mut assigned: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            assigned.entry(link.student_id).or_default().push(link.course_id);
        }

        Ok(rows
            .into_iter()
            .map(|student| {
                let course_ids = assigned.remove(&student.id).unwrap_or_default();
                ExpandedStudent {
                    user: users.get(&student.user_id).cloned(),
                    trainer: student
                        .assigned_trainer
                        .and_then(|id| users.get(&id).cloned()),
                    courses: course_ids
                        .iter()
                        .filter_map(|id| courses.get(id).cloned())
                        .collect(),
                    student,
                }
            })
            .collect())
    }

    async fn replace_assignments(
        db: &DatabaseConnection,
        student_id: Uuid,
        course_ids: &[Uuid],
    ) -> Result<(), ServiceError> {
        student_courses::Entity::delete_many()
            .filter(student_courses::Column::StudentId.eq(student_id))
            .exec(db)
            .await?;

        let unique: HashSet<Uuid> = course_ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(());
        }
        let links: Vec<student_courses::ActiveModel> = unique
            .into_iter()
            .map(|course_id| student_courses::ActiveModel {
                id: Set(Uuid::new_v4()),
                student_id: Set(student_id),
                course_id: Set(course_id),
            })
            .collect();
        student_courses::Entity::insert_many(links).exec(db).await?;
        Ok(())
    }
}
