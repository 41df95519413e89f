//! # Seed Data Generator
//!
//! Populates the database with a demo motel for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p eclipse-db --bin seed
//!
//! # Specify database path
//! cargo run -p eclipse-db --bin seed -- --db ./data/eclipse.db
//!
//! # Custom number of rooms
//! cargo run -p eclipse-db --bin seed -- --rooms 30
//! ```
//!
//! ## Generated Data
//! - Three rate plans: Standard 12h, Specialty 12h, Suite 12h
//! - Numbered rooms spread across the three plans
//! - A small consumable catalog (beverages, snacks, toiletries)

use chrono::Utc;
use std::env;
use uuid::Uuid;

use eclipse_core::{Product, RatePlan, Room, RoomState, RoomType, DEFAULT_BASE_HOURS};
use eclipse_db::{Database, DbConfig};

/// Rate plans: (name, room type, base price, extra hour price).
const RATE_PLANS: &[(&str, RoomType, i64, i64)] = &[
    ("Standard 12h", RoomType::Standard, 50_000, 10_000),
    ("Specialty 12h", RoomType::Specialty, 70_000, 14_000),
    ("Suite 12h", RoomType::Suite, 100_000, 20_000),
];

/// Consumable catalog: (name, category, price, stock).
const PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("Bottled Water 600ml", "beverages", 3_000, 48),
    ("Soda Can 330ml", "beverages", 5_000, 36),
    ("Energy Drink", "beverages", 8_000, 24),
    ("Beer Can 330ml", "beverages", 9_000, 30),
    ("Instant Coffee", "beverages", 4_000, 20),
    ("Potato Chips", "snacks", 6_000, 40),
    ("Chocolate Bar", "snacks", 5_000, 32),
    ("Cookies Pack", "snacks", 4_500, 25),
    ("Peanuts", "snacks", 3_500, 28),
    ("Toothbrush Kit", "toiletries", 7_000, 15),
    ("Shampoo Sachet", "toiletries", 2_500, 50),
    ("Razor Kit", "toiletries", 8_000, 12),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut room_count: usize = 20;
    let mut db_path = String::from("./eclipse_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rooms" | "-r" => {
                if i + 1 < args.len() {
                    room_count = args[i + 1].parse().unwrap_or(20);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Eclipse PMS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -r, --rooms <N>    Number of rooms to generate (default: 20)");
                println!("  -d, --db <PATH>    Database file path (default: ./eclipse_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Eclipse PMS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Rooms:    {}", room_count);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.rooms().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} rooms", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    // Rate plans first; rooms reference them.
    println!();
    println!("Creating rate plans...");
    let mut plan_ids = Vec::with_capacity(RATE_PLANS.len());
    for (name, _, base_price, extra_hour_price) in RATE_PLANS {
        let plan = RatePlan {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            base_price: *base_price,
            base_hours: DEFAULT_BASE_HOURS,
            extra_hour_price: *extra_hour_price,
            created_at: now,
            updated_at: now,
        };
        db.rooms().insert_rate_plan(&plan).await?;
        println!("  {} (base ${}, +${}/h)", plan.name, base_price, extra_hour_price);
        plan_ids.push(plan.id);
    }

    // Rooms: mostly standard, a few specialty, suites at the top numbers.
    println!();
    println!("Creating rooms...");
    for n in 1..=room_count {
        let (plan_idx, room_type) = match n {
            n if n > room_count.saturating_sub(2) => (2, RoomType::Suite),
            n if n % 5 == 0 => (1, RoomType::Specialty),
            _ => (0, RoomType::Standard),
        };

        let room = Room {
            id: Uuid::new_v4().to_string(),
            number: n.to_string(),
            room_type,
            state: RoomState::Available,
            rate_plan_id: plan_ids[plan_idx].clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.rooms().insert(&room).await?;
    }
    println!("  {} rooms created", room_count);

    println!();
    println!("Creating products...");
    for (name, category, price, stock) in PRODUCTS {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: Some(category.to_string()),
            sale_price: *price,
            stock: *stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
    }
    println!("  {} products created", PRODUCTS.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
