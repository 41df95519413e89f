//! Stay lifecycle integration tests: check-in, consumption, check-out,
//! room-state transitions, and the billing that happens at the terminal write.

mod common;

use chrono::Duration;

use common::{seed_plan, seed_product, seed_room, test_db};
use eclipse_core::RoomState;
use eclipse_db::DbError;
use eclipse_desk::{ErrorKind, ShiftLedger, StayManager};

#[tokio::test]
async fn check_in_requires_open_shift() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let stays = StayManager::new(db.clone());
    let err = stays.check_in(&room.id, "clerk-1").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn check_in_marks_room_occupied() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let ledger = ShiftLedger::new(db.clone());
    let shift = ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();

    assert_eq!(stay.shift_id, shift.id);
    assert!(!stay.finalized);

    let room = db.rooms().get_by_id(&room.id).await.unwrap().unwrap();
    assert_eq!(room.state, RoomState::Occupied);
}

#[tokio::test]
async fn occupied_room_rejects_second_check_in() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let stays = StayManager::new(db.clone());
    stays.check_in(&room.id, "clerk-1").await.unwrap();

    let err = stays.check_in(&room.id, "clerk-2").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

/// The full scenario: open 100,000 → check in → 2 × 15,000 product →
/// check out at +13h20m → room 70,000 + consumption 30,000 →
/// close → closing balance 200,000.
#[tokio::test]
async fn end_to_end_stay_and_shift() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water 600ml", 15_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    let shift = ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();
    assert_eq!(shift.opening_balance, 100_000);

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();

    let entry = stays
        .attach_consumption(&stay.id, &water.id, 2)
        .await
        .unwrap();
    assert_eq!(entry.unit_price, 15_000);

    // 13h20m: 80 minutes over base, 65 billable past grace → 2 extra hours
    let checkout_at = stay.checked_in_at + Duration::minutes(13 * 60 + 20);
    let bill = stays.check_out_at(&room.id, checkout_at).await.unwrap();

    assert_eq!(bill.room_subtotal, 70_000);
    assert_eq!(bill.consumption_subtotal, 30_000);
    assert_eq!(bill.total_paid, 100_000);
    assert!((bill.elapsed_hours - 13.33).abs() < 1e-9);

    let room = db.rooms().get_by_id(&room.id).await.unwrap().unwrap();
    assert_eq!(room.state, RoomState::Cleaning);

    let closed = ledger.close_shift(None).await.unwrap();
    assert_eq!(closed.total_income, Some(100_000));
    assert_eq!(closed.total_withdrawals, Some(0));
    assert_eq!(closed.closing_balance, Some(200_000));
}

#[tokio::test]
async fn grace_window_boundaries_bill_correctly() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());

    // 12h15m: the grace window absorbs the whole overage.
    let room_a = seed_room(&db, "1", &plan).await;
    let stay_a = stays.check_in(&room_a.id, "clerk-1").await.unwrap();
    let bill_a = stays
        .check_out_at(&room_a.id, stay_a.checked_in_at + Duration::minutes(12 * 60 + 15))
        .await
        .unwrap();
    assert_eq!(bill_a.room_subtotal, 50_000);

    // 12h16m: one minute past grace starts a full extra hour.
    let room_b = seed_room(&db, "2", &plan).await;
    let stay_b = stays.check_in(&room_b.id, "clerk-1").await.unwrap();
    let bill_b = stays
        .check_out_at(&room_b.id, stay_b.checked_in_at + Duration::minutes(12 * 60 + 16))
        .await
        .unwrap();
    assert_eq!(bill_b.room_subtotal, 60_000);
}

#[tokio::test]
async fn finalized_stay_is_immutable() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 3_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays.check_out(&room.id).await.unwrap();

    // No sale after check-out.
    let err = stays
        .attach_consumption(&stay.id, &water.id, 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // No second check-out either.
    let err = stays.check_out(&room.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The stored record kept its terminal values.
    let stored = db.stays().get_by_id(&stay.id).await.unwrap().unwrap();
    assert!(stored.finalized);
    assert!(stored.checked_out_at.is_some());
}

#[tokio::test]
async fn insufficient_stock_rejects_and_preserves_stock() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 3_000, 3).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();

    let err = stays
        .attach_consumption(&stay.id, &water.id, 4)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The failed sale rolled back; stock untouched.
    let stored = db.products().get_by_id(&water.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 3);
}

#[tokio::test]
async fn removing_consumption_does_not_restock() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 3_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();

    let entry = stays
        .attach_consumption(&stay.id, &water.id, 2)
        .await
        .unwrap();
    stays.remove_consumption(&entry.id).await.unwrap();

    // The entry is gone from the bill...
    let entries = db.stays().consumption_for_stay(&stay.id).await.unwrap();
    assert!(entries.is_empty());

    // ...but the stock decrement stands. Restocking is a separate action.
    let stored = db.products().get_by_id(&water.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 8);
}

/// A product with sales history must stay resolvable for past bills and
/// reports, so deletion is refused while consumption entries reference it.
#[tokio::test]
async fn sold_product_cannot_be_deleted_while_referenced() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 3_000, 10).await;
    let soap = seed_product(&db, "Soap Bar", 2_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay.id, &water.id, 1)
        .await
        .unwrap();

    let err = db.products().soft_delete(&water.id).await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

    // Still in the catalog.
    let stored = db.products().get_by_id(&water.id).await.unwrap().unwrap();
    assert!(stored.is_active);

    // A product nothing ever sold deletes fine.
    db.products().soft_delete(&soap.id).await.unwrap();
}

/// Malformed entity IDs are rejected as validation errors before any
/// transaction opens, not surfaced as not-found or store failures.
#[tokio::test]
async fn malformed_ids_are_rejected_up_front() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());

    let err = stays.check_in("not-a-room-id", "clerk-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();

    let err = stays
        .attach_consumption(&stay.id, "???", 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = stays.remove_consumption("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = stays.check_out("not-a-room-id").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn price_is_frozen_at_sale_time() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let mut water = seed_product(&db, "Bottled Water", 3_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay.id, &water.id, 2)
        .await
        .unwrap();

    // Price hike after the sale must not change the bill.
    water.sale_price = 5_000;
    db.products().update(&water).await.unwrap();

    let bill = stays
        .check_out_at(&room.id, stay.checked_in_at + Duration::hours(2))
        .await
        .unwrap();
    assert_eq!(bill.consumption_subtotal, 6_000);
}

#[tokio::test]
async fn room_state_round_trip_through_cleaning_and_maintenance() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays.check_out(&room.id).await.unwrap();

    // cleaning → available
    stays.mark_cleaned(&room.id).await.unwrap();
    let stored = db.rooms().get_by_id(&room.id).await.unwrap().unwrap();
    assert_eq!(stored.state, RoomState::Available);

    // available → cleaning for a second pass, and back
    stays.send_to_cleaning(&room.id).await.unwrap();
    let stored = db.rooms().get_by_id(&room.id).await.unwrap().unwrap();
    assert_eq!(stored.state, RoomState::Cleaning);
    stays.mark_cleaned(&room.id).await.unwrap();

    // available → maintenance blocks check-in
    stays.set_maintenance(&room.id).await.unwrap();
    let err = stays.check_in(&room.id, "clerk-1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // maintenance → available allows it again
    stays.clear_maintenance(&room.id).await.unwrap();
    stays.check_in(&room.id, "clerk-1").await.unwrap();
}

#[tokio::test]
async fn mark_cleaned_requires_cleaning_state() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let stays = StayManager::new(db.clone());
    let err = stays.mark_cleaned(&room.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn live_charge_tracks_consumption_without_writes() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 15_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay.id, &water.id, 2)
        .await
        .unwrap();

    let live = stays
        .live_charge_at(&room.id, stay.checked_in_at + Duration::hours(3))
        .await
        .unwrap();
    assert_eq!(live.room_charge, 50_000);
    assert_eq!(live.consumption_subtotal, 30_000);
    assert_eq!(live.total, 80_000);

    // Still an open stay; nothing was finalized.
    let stored = db.stays().get_by_id(&stay.id).await.unwrap().unwrap();
    assert!(!stored.finalized);
}

/// Concurrent sales against limited stock must conserve inventory:
/// successes + remaining stock == initial stock, never negative.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sales_never_oversell() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 3_000, 5).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let stays = stays.clone();
        let stay_id = stay.id.clone();
        let product_id = water.id.clone();
        handles.push(tokio::spawn(async move {
            stays.attach_consumption(&stay_id, &product_id, 1).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 5);

    let stored = db.products().get_by_id(&water.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 0);
}
