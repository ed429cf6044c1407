//! Integration tests for the fee service against in-memory SQLite.

use chrono::{Duration, Utc};
use database::error::ServiceError;
use database::policy::Actor;
use database::services::course::{CourseService, CreateCourse};
use database::services::fee::{CreateFee, FeeFilter, FeePatch, FeeService, RecordPayment};
use database::services::student::{CreateStudent, StudentService};
use database::services::user::{CreateUser, UserService};
use migration::{Migrator, MigratorTrait};
use models::fee::FeeStatus;
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

async fn create_student(
    db: &DatabaseConnection,
    sales_person: Uuid,
    courses: Vec<Uuid>,
    email: &str,
) -> Uuid {
    let user_id = create_user(db, Role::Student, email).await;
    StudentService::create(
        db,
        CreateStudent {
            user_id,
            sales_person,
            assigned_courses: courses,
            assigned_trainer: None,
            batch_id: None,
            status: StudentStatus::Active,
        },
    )
    .await
    .unwrap()
    .id
}

async fn create_fee(
    db: &DatabaseConnection,
    actor: &Actor,
    student_id: Uuid,
    course_id: Uuid,
) -> Uuid {
    FeeService::create(
        db,
        actor,
        CreateFee {
            student_id,
            course_id,
            amount: 10_000,
            due_date: Utc::now() + Duration::weeks(1),
            payment_method: None,
            transaction_id: None,
            notes: None,
        },
    )
    .await
    .unwrap()
    .fee
    .id
}

#[tokio::test]
async fn create_validates_references() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let actor = Actor::new(sales, Role::SalesPerson);
    let assigned = create_course(&db, "Assigned").await;
    let other = create_course(&db, "Other").await;
    let student = create_student(&db, sales, vec![assigned], "s1@test.dev").await;

    let err = FeeService::create(
        &db,
        &actor,
        CreateFee {
            student_id: Uuid::new_v4(),
            course_id: assigned,
            amount: 1,
            due_date: Utc::now(),
            payment_method: None,
            transaction_id: None,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let err = FeeService::create(
        &db,
        &actor,
        CreateFee {
            student_id: student,
            course_id: other,
            amount: 1,
            due_date: Utc::now(),
            payment_method: None,
            transaction_id: None,
            notes: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    let created = FeeService::create(
        &db,
        &actor,
        CreateFee {
            student_id: student,
            course_id: assigned,
            amount: 10_000,
            due_date: Utc::now() + Duration::weeks(1),
            payment_method: None,
            transaction_id: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(created.fee.status, FeeStatus::Pending);
    assert_eq!(created.fee.created_by, sales);
    assert!(created.fee.paid_date.is_none());
    // Expansion carries the student's contact details for the reminder.
    assert_eq!(
        created.student_user.map(|u| u.email),
        Some("s1@test.dev".to_string())
    );
}

#[tokio::test]
async fn paid_status_and_paid_date_move_together() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let actor = Actor::new(sales, Role::SalesPerson);
    let course = create_course(&db, "Course").await;
    let student = create_student(&db, sales, vec![course], "s1@test.dev").await;
    let fee_id = create_fee(&db, &actor, student, course).await;

    let paid = FeeService::update_status(&db, fee_id, "paid").await.unwrap();
    assert_eq!(paid.fee.status, FeeStatus::Paid);
    let first_paid_date = paid.fee.paid_date.expect("paid fee must carry a paid date");

    // Repeated paid -> paid does not re-stamp.
    let again = FeeService::update_status(&db, fee_id, "paid").await.unwrap();
    assert_eq!(again.fee.paid_date, Some(first_paid_date));

    // Leaving paid clears the payment evidence.
    let reverted = FeeService::update_status(&db, fee_id, "pending").await.unwrap();
    assert_eq!(reverted.fee.status, FeeStatus::Pending);
    assert!(reverted.fee.paid_date.is_none());
    assert!(reverted.fee.payment_method.is_none());
    assert!(reverted.fee.transaction_id.is_none());
}

#[tokio::test]
async fn update_status_rejects_unknown_values() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let actor = Actor::new(sales, Role::SalesPerson);
    let course = create_course(&db, "Course").await;
    let student = create_student(&db, sales, vec![course], "s1@test.dev").await;
    let fee_id = create_fee(&db, &actor, student, course).await;

    let err = FeeService::update_status(&db, fee_id, "cancelled")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let err = FeeService::update_status(&db, Uuid::new_v4(), "paid")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn record_payment_defaults_paid_date() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let actor = Actor::new(sales, Role::SalesPerson);
    let course = create_course(&db, "Course").await;
    let student = create_student(&db, sales, vec![course], "s1@test.dev").await;
    let fee_id = create_fee(&db, &actor, student, course).await;

    let before = Utc::now();
    let fee = FeeService::record_payment(
        &db,
        RecordPayment {
            fee_id,
            paid_date: None,
            payment_method: Some("upi".to_string()),
            transaction_id: Some("txn-42".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(fee.status, FeeStatus::Paid);
    assert!(fee.paid_date.expect("paid date stamped") >= before);
    assert_eq!(fee.payment_method.as_deref(), Some("upi"));
}

#[tokio::test]
async fn sales_people_see_only_their_students_fees() {
    let db = setup().await;
    let sales_a = create_user(&db, Role::SalesPerson, "sa@test.dev").await;
    let sales_b = create_user(&db, Role::SalesPerson, "sb@test.dev").await;
    let admin = create_user(&db, Role::Admin, "admin@test.dev").await;
    let course = create_course(&db, "Course").await;

    let actor_a = Actor::new(sales_a, Role::SalesPerson);
    let actor_b = Actor::new(sales_b, Role::SalesPerson);

    let student_a1 = create_student(&db, sales_a, vec![course], "a1@test.dev").await;
    let student_a2 = create_student(&db, sales_a, vec![course], "a2@test.dev").await;
    let student_b = create_student(&db, sales_b, vec![course], "b1@test.dev").await;

    create_fee(&db, &actor_a, student_a1, course).await;
    create_fee(&db, &actor_a, student_a2, course).await;
    create_fee(&db, &actor_b, student_b, course).await;

    let scoped = FeeService::list(&db, &actor_a, FeeFilter::default())
        .await
        .unwrap();
    assert_eq!(scoped.len(), 2);
    let scoped_students: Vec<Uuid> = scoped.iter().map(|f| f.fee.student_id).collect();
    assert!(scoped_students.contains(&student_a1));
    assert!(scoped_students.contains(&student_a2));

    let all = FeeService::list(&db, &Actor::new(admin, Role::Admin), FeeFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn update_touches_only_mutable_fields() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let actor = Actor::new(sales, Role::SalesPerson);
    let course = create_course(&db, "Course").await;
    let student = create_student(&db, sales, vec![course], "s1@test.dev").await;
    let fee_id = create_fee(&db, &actor, student, course).await;

    let new_due = Utc::now() + Duration::weeks(4);
    let fee = FeeService::update(
        &db,
        fee_id,
        FeePatch {
            amount: Some(12_500),
            due_date: Some(new_due),
            notes: Some("revised".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(fee.amount, 12_500);
    assert_eq!(fee.notes.as_deref(), Some("revised"));
    assert_eq!(fee.status, FeeStatus::Pending);
    assert_eq!(fee.created_by, sales);
}

#[tokio::test]
async fn fixed_status_queues_filter_and_sort() {
    let db = setup().await;
    let sales = create_user(&db, Role::SalesPerson, "sales@test.dev").await;
    let actor = Actor::new(sales, Role::SalesPerson);
    let course = create_course(&db, "Course").await;
    let student = create_student(&db, sales, vec![course], "s1@test.dev").await;

    let first = create_fee(&db, &actor, student, course).await;
    let second = create_fee(&db, &actor, student, course).await;
    FeeService::update_status(&db, second, "paid").await.unwrap();

    let pending = FeeService::pending(&db).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].fee.id, first);

    // Overdue status alone is not enough; the due date must have passed.
    FeeService::update_status(&db, first, "overdue").await.unwrap();
    let overdue = FeeService::overdue(&db).await.unwrap();
    assert!(overdue.is_empty());

    FeeService::update(
        &db,
        first,
        FeePatch {
            amount: None,
            due_date: Some(Utc::now() - Duration::weeks(1)),
            notes: None,
        },
    )
    .await
    .unwrap();
    let overdue = FeeService::overdue(&db).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].fee.id, first);
}
