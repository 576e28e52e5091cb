//! Database seeder for Remit development and testing.
//!
//! Seeds two demo users ("alice" and "bob", password "password123") with
//! funded accounts for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use remit_core::auth::hash_password;
use remit_db::entities::{accounts, users};

/// Demo user IDs (consistent for all seeds).
const ALICE_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
const BOB_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

/// Demo account IDs.
const ALICE_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000011";
const BOB_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000012";

/// Password shared by the demo users.
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = remit_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo users...");
    seed_user(&db, ALICE_USER_ID, "alice", ALICE_ACCOUNT_ID, dec!(10000)).await;
    seed_user(&db, BOB_USER_ID, "bob", BOB_ACCOUNT_ID, dec!(500)).await;

    println!("Seeding complete!");
}

fn parse_id(id: &str) -> Uuid {
    Uuid::parse_str(id).expect("invalid seed UUID")
}

/// Seeds one user with a funded account, skipping if already present.
async fn seed_user(
    db: &DatabaseConnection,
    user_id: &str,
    username: &str,
    account_id: &str,
    balance: Decimal,
) {
    let user_id = parse_id(user_id);

    if users::Entity::find_by_id(user_id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  User '{username}' already exists, skipping...");
        return;
    }

    let password_hash = hash_password(DEMO_PASSWORD).expect("failed to hash demo password");
    let now = Utc::now().into();

    users::ActiveModel {
        id: Set(user_id),
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("failed to insert demo user");

    accounts::ActiveModel {
        id: Set(parse_id(account_id)),
        owner_id: Set(user_id),
        balance: Set(balance),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("failed to insert demo account");

    println!("  Seeded '{username}' with balance {balance}");
}
