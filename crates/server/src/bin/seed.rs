//! Provisions a demo dataset: admin accounts, trainers, a sales person,
//! two courses with installment plans, six batches and thirty students
//! spread across them. Everything goes through the regular services so
//! the seeded data is exactly what the API would have produced.

use chrono::{Duration, Utc};
use database::policy::Actor;
use database::services::batch::{BatchService, CreateBatch};
use database::services::course::{CourseService, CreateCourse};
use database::services::fee::{CreateFee, FeeService};
use database::services::student::{CreateStudent, StudentService};
use database::services::user::{CreateUser, UserService};
use log::info;
use migration::{Migrator, MigratorTrait};
use models::installment::{Installment, InstallmentPlan};
use models::role::Role;
use models::student::StudentStatus;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

async fn create_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    role: Role,
) -> Uuid {
    UserService::create(
        db,
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password: password.to_string(),
            role,
        },
    )
    .await
    .expect("failed to seed user")
    .id
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = database::db::connect(&database_url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    create_user(
        &db,
        "Super Admin",
        "superadmin@institute.test",
        "9999999999",
        "admin123",
        Role::SuperAdmin,
    )
    .await;
    create_user(
        &db,
        "Admin User",
        "admin@institute.test",
        "8888888888",
        "admin123",
        Role::Admin,
    )
    .await;

    let mut trainers = Vec::new();
    for i in 1..=3 {
        trainers.push(
            create_user(
                &db,
                &format!("Trainer {i}"),
                &format!("trainer{i}@institute.test"),
                &format!("777777777{i}"),
                "trainer123",
                Role::Trainer,
            )
            .await,
        );
    }

    let sales_person = create_user(
        &db,
        "Sales Person",
        "sales@institute.test",
        "6666666666",
        "sales123",
        Role::SalesPerson,
    )
    .await;

    let full_stack = CourseService::create(
        &db,
        CreateCourse {
            name: "Full Stack Development".to_string(),
            description: "Learn full stack development with the MERN stack".to_string(),
            duration_weeks: 24,
            total_fees: 50_000,
            installments: InstallmentPlan(vec![
                Installment {
                    amount: 10_000,
                    due_week: 1,
                },
                Installment {
                    amount: 10_000,
                    due_week: 8,
                },
                Installment {
                    amount: 10_000,
                    due_week: 16,
                },
                Installment {
                    amount: 20_000,
                    due_week: 24,
                },
            ]),
        },
    )
    .await
    .expect("failed to seed course");

    CourseService::create(
        &db,
        CreateCourse {
            name: "Data Science".to_string(),
            description: "Learn data science with Python".to_string(),
            duration_weeks: 20,
            total_fees: 45_000,
            installments: InstallmentPlan(vec![
                Installment {
                    amount: 10_000,
                    due_week: 1,
                },
                Installment {
                    amount: 10_000,
                    due_week: 8,
                },
                Installment {
                    amount: 10_000,
                    due_week: 16,
                },
                Installment {
                    amount: 15_000,
                    due_week: 20,
                },
            ]),
        },
    )
    .await
    .expect("failed to seed course");

    let slots = [
        ("FS-07AM", "07:00-08:00"),
        ("FS-08AM", "08:00-09:00"),
        ("FS-09AM", "09:00-10:00"),
        ("FS-05PM", "17:00-18:00"),
        ("FS-06PM", "18:00-19:00"),
        ("FS-07PM", "19:00-20:00"),
    ];
    let mut batches = Vec::new();
    for (i, (name, slot)) in slots.iter().enumerate() {
        batches.push(
            BatchService::create(
                &db,
                CreateBatch {
                    name: name.to_string(),
                    slot: slot.to_string(),
                    course_id: full_stack.id,
                    trainer_id: trainers[i % trainers.len()],
                    is_active: None,
                },
            )
            .await
            .expect("failed to seed batch")
            .id,
        );
    }

    let mut first_student = None;
    for i in 1..=30usize {
        let user_id = create_user(
            &db,
            &format!("Student {i}"),
            &format!("student{i}@institute.test"),
            &format!("90000000{i:02}"),
            "student123",
            Role::Student,
        )
        .await;

        let student = StudentService::create(
            &db,
            CreateStudent {
                user_id,
                sales_person,
                assigned_courses: vec![full_stack.id],
                assigned_trainer: Some(trainers[i % trainers.len()]),
                batch_id: Some(batches[i % batches.len()]),
                status: StudentStatus::Active,
            },
        )
        .await
        .expect("failed to seed student");
        first_student.get_or_insert(student.id);
    }

    // One pending fee so the dashboard's queues are non-empty on first run.
    if let Some(student_id) = first_student {
        let actor = Actor::new(sales_person, Role::SalesPerson);
        FeeService::create(
            &db,
            &actor,
            CreateFee {
                student_id,
                course_id: full_stack.id,
                amount: 10_000,
                due_date: Utc::now() + Duration::weeks(1),
                payment_method: None,
                transaction_id: None,
                notes: None,
            },
        )
        .await
        .expect("failed to seed fee");
    }

    info!("Database seeded successfully");
}
