//! Integration tests for the student service against in-memory SQLite.

use database::error::ServiceError;
use database::policy::Actor;
use database::services::course::{CourseService, CreateCourse};
use database::services::student::{CreateStudent, StudentPatch, StudentService};
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
async fn create_requires_an_existing_user() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;

    let err = StudentService::create(
        &db,
        CreateStudent {
            user_id: Uuid::new_v4(),
            sales_person: sales,
            assigned_courses: vec![],
            assigned_trainer: None,
            batch_id: None,
            status: StudentStatus::Trial,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn list_scopes_sales_people_to_their_pipeline() {
    let db = setup().await;
    let sales_a = create_user(&db, Role::SalesPerson, "sa@test.dev").await;
    let sales_b = create_user(&db, Role::SalesPerson, "sb@test.dev").await;
    let admin = create_user(&db, Role::Admin, "admin@test.dev").await;
    let course = create_course(&db, "Course").await;

    for (i, sales) in [sales_a, sales_a, sales_b].into_iter().enumerate() {
        let user_id = create_user(&db, Role::Student, &format!("s{i}@test.dev")).await;
        StudentService::create(
            &db,
            CreateStudent {
                user_id,
                sales_person: sales,
                assigned_courses: vec![course],
                assigned_trainer: None,
                batch_id: None,
                status: StudentStatus::Active,
            },
        )
        .await
        .unwrap();
    }

    let own = StudentService::list(&db, &Actor::new(sales_a, Role::SalesPerson))
        .await
        .unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|s| s.student.sales_person == sales_a));

    let all = StudentService::list(&db, &Actor::new(admin, Role::Admin))
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn get_allows_staff_and_the_student_themself() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let course = create_course(&db, "Course").await;
    let user_id = create_user(&db, Role::Student, "me@test.dev").await;
    let stranger = create_user(&db, Role::Student, "stranger@test.dev").await;

    let student = StudentService::create(
        &db,
        CreateStudent {
            user_id,
            sales_person: sales,
            assigned_courses: vec![course],
            assigned_trainer: None,
            batch_id: None,
            status: StudentStatus::Active,
        },
    )
    .await
    .unwrap();

    let own = StudentService::get(&db, &Actor::new(user_id, Role::Student), student.id)
        .await
        .unwrap();
    assert_eq!(own.student.id, student.id);
    assert_eq!(own.courses.len(), 1);

    let err = StudentService::get(&db, &Actor::new(stranger, Role::Student), student.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn update_replaces_the_assigned_course_set() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let admin = create_user(&db, Role::Admin, "admin@test.dev").await;
    let old_course = create_course(&db, "Old").await;
    let new_course = create_course(&db, "New").await;
    let user_id = create_user(&db, Role::Student, "s1@test.dev").await;

    let student = StudentService::create(
        &db,
        CreateStudent {
            user_id,
            sales_person: sales,
            assigned_courses: vec![old_course],
            assigned_trainer: None,
            batch_id: None,
            status: StudentStatus::Trial,
        },
    )
    .await
    .unwrap();

    StudentService::update(
        &db,
        student.id,
        StudentPatch {
            assigned_courses: Some(vec![new_course]),
            status: Some(StudentStatus::Active),
            ..StudentPatch::default()
        },
    )
    .await
    .unwrap();

    let fetched = StudentService::get(&db, &Actor::new(admin, Role::Admin), student.id)
        .await
        .unwrap();
    assert_eq!(fetched.student.status, StudentStatus::Active);
    let course_ids: Vec<Uuid> = fetched.courses.iter().map(|c| c.id).collect();
    assert_eq!(course_ids, vec![new_course]);
}
