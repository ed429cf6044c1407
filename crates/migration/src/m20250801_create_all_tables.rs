use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Phone).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::DurationWeeks).integer().not_null())
                    .col(ColumnDef::new(Courses::TotalFees).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Installments).json().not_null())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create batches table
        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Batches::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Batches::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Batches::Slot).string().not_null())
                    .col(ColumnDef::new(Batches::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Batches::TrainerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Batches::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Batches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Batches::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-batches-course_id")
                            .from(Batches::Table, Batches::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-batches-trainer_id")
                            .from(Batches::Table, Batches::TrainerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::UserId).uuid().not_null())
                    .col(ColumnDef::new(Students::SalesPerson).uuid().not_null())
                    .col(ColumnDef::new(Students::AssignedTrainer).uuid())
                    .col(ColumnDef::new(Students::BatchId).uuid())
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-user_id")
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-sales_person")
                            .from(Students::Table, Students::SalesPerson)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-assigned_trainer")
                            .from(Students::Table, Students::AssignedTrainer)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-students-batch_id")
                            .from(Students::Table, Students::BatchId)
                            .to(Batches::Table, Batches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create student_courses junction table (assigned-courses set)
        manager
            .create_table(
                Table::create()
                    .table(StudentCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentCourses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentCourses::StudentId).uuid().not_null())
                    .col(ColumnDef::new(StudentCourses::CourseId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_courses-student_id")
                            .from(StudentCourses::Table, StudentCourses::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_courses-course_id")
                            .from(StudentCourses::Table, StudentCourses::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create attendance table
        manager
            .create_table(
                Table::create()
                    .table(Attendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendance::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendance::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::BatchId).uuid())
                    .col(ColumnDef::new(Attendance::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Attendance::TrainerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Attendance::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendance::Status).string().not_null())
                    .col(ColumnDef::new(Attendance::Notes).text())
                    .col(
                        ColumnDef::new(Attendance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendance-student_id")
                            .from(Attendance::Table, Attendance::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendance-course_id")
                            .from(Attendance::Table, Attendance::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendance-trainer_id")
                            .from(Attendance::Table, Attendance::TrainerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-attendance-batch_id")
                            .from(Attendance::Table, Attendance::BatchId)
                            .to(Batches::Table, Batches::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create fees table
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Fees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Fees::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Fees::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Fees::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Fees::DueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Fees::PaymentMethod).string())
                    .col(ColumnDef::new(Fees::TransactionId).string())
                    .col(ColumnDef::new(Fees::Notes).text())
                    .col(ColumnDef::new(Fees::Status).string().not_null())
                    .col(ColumnDef::new(Fees::PaidDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Fees::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(Fees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Fees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fees-student_id")
                            .from(Fees::Table, Fees::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fees-course_id")
                            .from(Fees::Table, Fees::CourseId)
                            .to(Courses::Table, Courses::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fees-created_by")
                            .from(Fees::Table, Fees::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentCourses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Batches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Phone,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    Name,
    Description,
    DurationWeeks,
    TotalFees,
    Installments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
    Name,
    Slot,
    CourseId,
    TrainerId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    UserId,
    SalesPerson,
    AssignedTrainer,
    BatchId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentCourses {
    Table,
    Id,
    StudentId,
    CourseId,
}

#[derive(DeriveIden)]
enum Attendance {
    Table,
    Id,
    StudentId,
    BatchId,
    CourseId,
    TrainerId,
    Date,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    Id,
    StudentId,
    CourseId,
    Amount,
    DueDate,
    PaymentMethod,
    TransactionId,
    Notes,
    Status,
    PaidDate,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
