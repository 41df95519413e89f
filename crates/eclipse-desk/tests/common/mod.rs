//! Shared fixtures for desk integration tests.

#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use eclipse_core::{Product, RatePlan, Room, RoomState, RoomType, DEFAULT_BASE_HOURS};
use eclipse_db::{Database, DbConfig};

/// Fresh isolated in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Inserts a rate plan with the standard 12h base duration.
pub async fn seed_plan(db: &Database, base_price: i64, extra_hour_price: i64) -> RatePlan {
    let now = Utc::now();
    let plan = RatePlan {
        id: Uuid::new_v4().to_string(),
        name: format!("Plan {}/{}", base_price, extra_hour_price),
        base_price,
        base_hours: DEFAULT_BASE_HOURS,
        extra_hour_price,
        created_at: now,
        updated_at: now,
    };
    db.rooms().insert_rate_plan(&plan).await.expect("insert plan");
    plan
}

/// Inserts an available standard room on the given plan.
pub async fn seed_room(db: &Database, number: &str, plan: &RatePlan) -> Room {
    let now = Utc::now();
    let room = Room {
        id: Uuid::new_v4().to_string(),
        number: number.to_string(),
        room_type: RoomType::Standard,
        state: RoomState::Available,
        rate_plan_id: plan.id.clone(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.rooms().insert(&room).await.expect("insert room");
    room
}

/// Inserts an active consumable product.
pub async fn seed_product(db: &Database, name: &str, sale_price: i64, stock: i64) -> Product {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: Some("beverages".to_string()),
        sale_price,
        stock,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.expect("insert product");
    product
}
