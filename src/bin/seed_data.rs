//! Seed data script - populates the database with a starter canteen
//!
//! Run with: cargo run --bin seed-data -- --admin-password <password>
//!
//! This creates:
//! - the Breakfast, Lunch and Snacks meal types
//! - a handful of menu items for each
//! - one admin account
//!
//! Rows that already exist (matched by name or username) are left untouched.

use chrono::Utc;
use clap::Parser;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use std::time::Duration as StdDuration;
use tracing::info;

use canteen_api::{
    auth::hash_password,
    db::run_migrations,
    entities::{meal_type, menu_item, user, user::ADMIN_ROLE},
};

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Seed the canteen database with starter data")]
struct Args {
    /// Database URL; falls back to APP__DATABASE_URL, then a local sqlite file
    #[arg(long, env = "APP__DATABASE_URL", default_value = "sqlite://canteen.db?mode=rwc")]
    database_url: String,

    #[arg(long, default_value = "admin")]
    admin_username: String,

    #[arg(long, env = "SEED_ADMIN_PASSWORD")]
    admin_password: String,
}

const STARTER_MENU: &[(&str, &[(&str, Decimal)])] = &[
    (
        "Breakfast",
        &[
            ("Idli", dec!(30.00)),
            ("Dosa", dec!(45.00)),
            ("Poha", dec!(25.00)),
        ],
    ),
    (
        "Lunch",
        &[
            ("Rice", dec!(20.00)),
            ("Dal", dec!(30.00)),
            ("Veg Thali", dec!(90.00)),
        ],
    ),
    (
        "Snacks",
        &[
            ("Samosa", dec!(15.00)),
            ("Tea", dec!(10.00)),
            ("Sandwich", dec!(40.00)),
        ],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let mut options = ConnectOptions::new(args.database_url.clone());
    options
        .max_connections(2)
        .min_connections(1)
        .connect_timeout(StdDuration::from_secs(10))
        .acquire_timeout(StdDuration::from_secs(10));

    info!("Connecting to database: {}", args.database_url);
    let db = Database::connect(options).await?;
    run_migrations(&db).await?;

    let mut items_created = 0;
    for (meal_name, items) in STARTER_MENU {
        let meal = ensure_meal_type(&db, meal_name).await?;
        for (name, price) in items.iter() {
            if create_menu_item(&db, meal.id, name, *price).await? {
                items_created += 1;
            }
        }
    }
    info!("  Created {} menu items", items_created);

    ensure_admin(&db, &args.admin_username, &args.admin_password).await?;

    info!("=== Seed Data Complete ===");
    info!("Try: curl http://localhost:5000/api/meal-types");

    Ok(())
}

async fn ensure_meal_type(db: &DatabaseConnection, name: &str) -> anyhow::Result<meal_type::Model> {
    if let Some(existing) = meal_type::Entity::find()
        .filter(meal_type::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let created = meal_type::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("  Created meal type {}", created.name);
    Ok(created)
}

async fn create_menu_item(
    db: &DatabaseConnection,
    meal_type_id: i32,
    name: &str,
    price: Decimal,
) -> anyhow::Result<bool> {
    let exists = menu_item::Entity::find()
        .filter(menu_item::Column::Name.eq(name))
        .filter(menu_item::Column::MealTypeId.eq(meal_type_id))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Ok(false);
    }

    let now = Utc::now();
    menu_item::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        meal_type_id: Set(meal_type_id),
        is_available: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(true)
}

async fn ensure_admin(db: &DatabaseConnection, username: &str, password: &str) -> anyhow::Result<()> {
    let exists = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .is_some();
    if exists {
        info!("  Admin {} already exists", username);
        return Ok(());
    }

    user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(ADMIN_ROLE.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!("  Created admin {}", username);
    Ok(())
}
