//! Integration tests for the user service against in-memory SQLite.

use database::error::ServiceError;
use database::services::user::{CreateUser, UserPatch, UserService};
use migration::{Migrator, MigratorTrait};
use models::role::Role;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn input(email: &str, role: Role) -> CreateUser {
    CreateUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        phone: "1234567890".to_string(),
        password: "SuperSecret123!".to_string(),
        role,
    }
}

#[tokio::test]
async fn create_hashes_the_password() {
    let db = setup().await;
    let user = UserService::create(&db, input("alice@test.dev", Role::Admin))
        .await
        .unwrap();

    assert_eq!(user.role, Role::Admin);
    // Stored as an Argon2id hash, never plaintext.
    assert_ne!(user.password_hash, "SuperSecret123!");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let db = setup().await;
    UserService::create(&db, input("alice@test.dev", Role::Trainer))
        .await
        .unwrap();

    let err = UserService::create(&db, input("alice@test.dev", Role::SalesPerson))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn list_filters_by_role() {
    let db = setup().await;
    UserService::create(&db, input("t1@test.dev", Role::Trainer))
        .await
        .unwrap();
    UserService::create(&db, input("t2@test.dev", Role::Trainer))
        .await
        .unwrap();
    UserService::create(&db, input("sales@test.dev", Role::SalesPerson))
        .await
        .unwrap();

    let trainers = UserService::list(&db, Some(Role::Trainer)).await.unwrap();
    assert_eq!(trainers.len(), 2);

    let everyone = UserService::list(&db, None).await.unwrap();
    assert_eq!(everyone.len(), 3);
}

#[tokio::test]
async fn update_leaves_email_and_role_fixed() {
    let db = setup().await;
    let user = UserService::create(&db, input("alice@test.dev", Role::Trainer))
        .await
        .unwrap();

    let updated = UserService::update(
        &db,
        user.id,
        UserPatch {
            name: Some("Alice Renamed".to_string()),
            phone: Some("9876543210".to_string()),
            password: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Alice Renamed");
    assert_eq!(updated.email, "alice@test.dev");
    assert_eq!(updated.role, Role::Trainer);
    assert_eq!(updated.password_hash, user.password_hash);
}
