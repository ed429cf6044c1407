use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One assignment row per (student, course)
        manager
            .create_index(
                Index::create()
                    .name("uq_student_courses_student_course")
                    .table(StudentCourses::Table)
                    .col(StudentCourses::StudentId)
                    .col(StudentCourses::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Indexes on students for batch rosters and sales scoping
        manager
            .create_index(
                Index::create()
                    .name("idx_students_batch_id")
                    .table(Students::Table)
                    .col(Students::BatchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_sales_person")
                    .table(Students::Table)
                    .col(Students::SalesPerson)
                    .to_owned(),
            )
            .await?;

        // Indexes on attendance for the student/trainer listings
        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_student_id")
                    .table(Attendance::Table)
                    .col(Attendance::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_trainer_id")
                    .table(Attendance::Table)
                    .col(Attendance::TrainerId)
                    .to_owned(),
            )
            .await?;

        // Indexes on fees for scoped listings and the status queues
        manager
            .create_index(
                Index::create()
                    .name("idx_fees_student_id")
                    .table(Fees::Table)
                    .col(Fees::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fees_status_due_date")
                    .table(Fees::Table)
                    .col(Fees::Status)
                    .col(Fees::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_fees_status_due_date")
                    .table(Fees::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_fees_student_id")
                    .table(Fees::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_trainer_id")
                    .table(Attendance::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_student_id")
                    .table(Attendance::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_sales_person")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_batch_id")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uq_student_courses_student_course")
                    .table(StudentCourses::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    Table,
    BatchId,
    SalesPerson,
}

#[derive(DeriveIden)]
enum StudentCourses {
    Table,
    StudentId,
    CourseId,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    StudentId,
    TrainerId,
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    StudentId,
    Status,
    DueDate,
}
