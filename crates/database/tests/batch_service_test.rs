//! Integration tests for the batch service against in-memory SQLite.

use database::error::ServiceError;
use database::services::batch::{BatchPatch, BatchService, CreateBatch};
use database::services::course::{CourseService, CreateCourse};
use database::services::student::{CreateStudent, StudentService};
use database::services::user::{CreateUser, UserService};
use migration::{Migrator, MigratorTrait};
use models::installment::InstallmentPlan;
use models::role::Role;
use models::student::StudentStatus;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use uuid::Uuid;

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn create_user(db: &DatabaseConnection, role: Role, email: &str) -> Uuid {
    UserService::create(
        db,
        CreateUser {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            phone: "0000000000".to_string(),
            password: "secret123".to_string(),
            role,
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_course(db: &DatabaseConnection, name: &str) -> Uuid {
    CourseService::create(
        db,
        CreateCourse {
            name: name.to_string(),
            description: "test course".to_string(),
            duration_weeks: 12,
            total_fees: 10_000,
            installments: InstallmentPlan::default(),
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn duplicate_batch_name_conflicts() {
    let db = setup().await;
    let trainer = create_user(&db, Role::Trainer, "trainer@test.dev").await;
    let course = create_course(&db, "Course").await;

    let input = CreateBatch {
        name: "FS-07PM".to_string(),
        slot: "19:00-20:00".to_string(),
        course_id: course,
        trainer_id: trainer,
        is_active: None,
    };
    let created = BatchService::create(&db, input.clone()).await.unwrap();
    assert!(created.is_active);

    let err = BatchService::create(&db, input).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // The unique name is listed with its references expanded.
    let listed = BatchService::list(&db).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].batch.name, "FS-07PM");
    assert_eq!(listed[0].course.as_ref().map(|c| c.id), Some(course));
    assert_eq!(listed[0].trainer.as_ref().map(|t| t.id), Some(trainer));
}

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let db = setup().await;
    let trainer = create_user(&db, Role::Trainer, "trainer@test.dev").await;
    let course = create_course(&db, "Course").await;

    let batch = BatchService::create(
        &db,
        CreateBatch {
            name: "FS-07PM".to_string(),
            slot: "19:00-20:00".to_string(),
            course_id: course,
            trainer_id: trainer,
            is_active: None,
        },
    )
    .await
    .unwrap();

    let updated = BatchService::update(
        &db,
        batch.id,
        BatchPatch {
            slot: Some("20:00-21:00".to_string()),
            ..BatchPatch::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.slot, "20:00-21:00");
    assert_eq!(updated.name, "FS-07PM");
    assert_eq!(updated.trainer_id, trainer);

    let err = BatchService::update(&db, Uuid::new_v4(), BatchPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn roster_lists_only_the_batch_students() {
    let db = setup().await;
    let trainer = create_user(&db, Role::Trainer, "trainer@test.dev").await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let course = create_course(&db, "Course").await;

    let batch = BatchService::create(
        &db,
        CreateBatch {
            name: "FS-09AM".to_string(),
            slot: "09:00-10:00".to_string(),
            course_id: course,
            trainer_id: trainer,
            is_active: None,
        },
    )
    .await
    .unwrap();

    for (i, batch_id) in [Some(batch.id), Some(batch.id), None].into_iter().enumerate() {
        let user_id = create_user(&db, Role::Student, &format!("s{i}@test.dev")).await;
        StudentService::create(
            &db,
            CreateStudent {
                user_id,
                sales_person: sales,
                assigned_courses: vec![course],
                assigned_trainer: Some(trainer),
                batch_id,
                status: StudentStatus::Active,
            },
        )
        .await
        .unwrap();
    }

    let roster = BatchService::students(&db, batch.id).await.unwrap();
    assert_eq!(roster.len(), 2);
    // Expansion resolves the user account and assigned courses.
    assert!(roster.iter().all(|s| s.user.is_some()));
    assert!(roster.iter().all(|s| s.courses.len() == 1));
}
