//! Cash shift ledger integration tests: inheritance, adjustments,
//! withdrawals, reconciliation, reporting, and the historical reset.

mod common;

use chrono::Duration;

use common::{seed_plan, seed_product, seed_room, test_db};
use eclipse_core::CoreError;
use eclipse_desk::{purge_history, DeskError, ErrorKind, ShiftLedger, ShiftReporter, StayManager};

#[tokio::test]
async fn only_one_shift_open_at_a_time() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let err = ledger.open_shift("clerk-2", Some(50_000)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn new_shift_inherits_previous_closing_balance() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();
    let closed = ledger.close_shift(None).await.unwrap();
    assert_eq!(closed.closing_balance, Some(100_000));

    // Omitted opening balance → take what the last shift left.
    let next = ledger.open_shift("clerk-2", None).await.unwrap();
    assert_eq!(next.opening_balance, 100_000);

    // No adjustment entries when nothing was overridden.
    let entries = db.shifts().withdrawals_for_shift(&next.id).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn zero_override_means_inherit() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    ledger.open_shift("clerk-1", Some(75_000)).await.unwrap();
    ledger.close_shift(None).await.unwrap();

    let next = ledger.open_shift("clerk-2", Some(0)).await.unwrap();
    assert_eq!(next.opening_balance, 75_000);
}

#[tokio::test]
async fn counted_shortfall_records_adjustment_entry() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();
    ledger.close_shift(None).await.unwrap();

    // The clerk counts 80,000 where the books say 100,000 was left.
    let shift = ledger.open_shift("clerk-2", Some(80_000)).await.unwrap();
    assert_eq!(shift.opening_balance, 80_000);

    let entries = db.shifts().withdrawals_for_shift(&shift.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 20_000);
    let note = entries[0].note.as_deref().unwrap();
    assert!(note.contains("shortfall"), "note was: {note}");
}

#[tokio::test]
async fn counted_surplus_records_adjustment_entry() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();
    ledger.close_shift(None).await.unwrap();

    let shift = ledger.open_shift("clerk-2", Some(120_000)).await.unwrap();
    assert_eq!(shift.opening_balance, 120_000);

    let entries = db.shifts().withdrawals_for_shift(&shift.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 20_000);
    assert!(entries[0].note.as_deref().unwrap().contains("surplus"));
}

#[tokio::test]
async fn withdrawal_requires_open_shift_and_positive_amount() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    let err = ledger
        .record_withdrawal("clerk-1", 10_000, "supplier")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let err = ledger
        .record_withdrawal("clerk-1", 0, "nothing")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = ledger
        .record_withdrawal("clerk-1", -500, "negative")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

/// A double-click on "close shift" must say the shift is already closed,
/// not claim that no shift was ever opened.
#[tokio::test]
async fn second_close_reports_already_closed() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    // Nothing ever opened: genuinely no open shift.
    let err = ledger.close_shift(None).await.unwrap_err();
    assert!(matches!(err, DeskError::Core(CoreError::NoOpenShift)));

    let shift = ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();
    ledger.close_shift(None).await.unwrap();

    let err = ledger.close_shift(None).await.unwrap_err();
    match err {
        DeskError::Core(CoreError::ShiftAlreadyClosed(id)) => assert_eq!(id, shift.id),
        other => panic!("expected ShiftAlreadyClosed, got {other:?}"),
    }
    assert_eq!(
        ledger.close_shift(None).await.unwrap_err().kind(),
        ErrorKind::Conflict
    );
}

/// The ledger records over-withdrawals instead of rejecting them; the
/// drawer status shows the negative cash for the caller to warn with.
#[tokio::test]
async fn over_withdrawal_is_recorded_not_rejected() {
    let db = test_db().await;
    let ledger = ShiftLedger::new(db.clone());

    ledger.open_shift("clerk-1", Some(50_000)).await.unwrap();

    ledger
        .record_withdrawal("clerk-1", 80_000, "urgent supplier payment")
        .await
        .unwrap();

    let drawer = ledger.available_cash().await.unwrap();
    assert_eq!(drawer.available_cash, -30_000);

    let closed = ledger.close_shift(None).await.unwrap();
    assert_eq!(closed.closing_balance, Some(-30_000));
}

#[tokio::test]
async fn reconciliation_identity_holds_with_activity() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 15_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    let shift = ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay.id, &water.id, 2)
        .await
        .unwrap();
    stays
        .check_out_at(&room.id, stay.checked_in_at + Duration::hours(5))
        .await
        .unwrap();

    ledger
        .record_withdrawal("clerk-1", 25_000, "cash consignment")
        .await
        .unwrap();

    let drawer = ledger.available_cash().await.unwrap();
    assert_eq!(drawer.income_so_far, 80_000); // 50,000 room + 30,000 consumption
    assert_eq!(drawer.withdrawals_so_far, 25_000);
    assert_eq!(drawer.available_cash, 155_000);

    let closed = ledger.close_shift(Some("counted twice")).await.unwrap();
    assert_eq!(closed.total_income, Some(80_000));
    assert_eq!(closed.total_withdrawals, Some(25_000));
    assert_eq!(
        closed.closing_balance.unwrap(),
        closed.opening_balance + closed.total_income.unwrap() - closed.total_withdrawals.unwrap()
    );

    // Closing again must fail: the record is terminal.
    let err = ledger.close_shift(None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The stored row matches what close returned.
    // 100,000 opening + 80,000 income − 25,000 withdrawn.
    let stored = db.shifts().get_by_id(&shift.id).await.unwrap().unwrap();
    assert_eq!(stored.closing_balance, Some(155_000));
    assert_eq!(stored.notes.as_deref(), Some("counted twice"));
}

/// The reporter recomputes every total from raw rows; for a closed shift
/// they must match what the ledger stored at close.
#[tokio::test]
async fn report_cross_checks_ledger_totals() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room_a = seed_room(&db, "1", &plan).await;
    let room_b = seed_room(&db, "2", &plan).await;
    let water = seed_product(&db, "Bottled Water", 15_000, 20).await;
    let chips = seed_product(&db, "Potato Chips", 6_000, 20).await;

    let ledger = ShiftLedger::new(db.clone());
    let shift = ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let stays = StayManager::new(db.clone());

    let stay_a = stays.check_in(&room_a.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay_a.id, &water.id, 2)
        .await
        .unwrap();
    stays
        .attach_consumption(&stay_a.id, &chips.id, 1)
        .await
        .unwrap();
    stays
        .check_out_at(&room_a.id, stay_a.checked_in_at + Duration::hours(3))
        .await
        .unwrap();

    let stay_b = stays.check_in(&room_b.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay_b.id, &water.id, 1)
        .await
        .unwrap();
    stays
        .check_out_at(&room_b.id, stay_b.checked_in_at + Duration::hours(2))
        .await
        .unwrap();

    ledger
        .record_withdrawal("clerk-1", 10_000, "change fund")
        .await
        .unwrap();

    let closed = ledger.close_shift(None).await.unwrap();

    let reporter = ShiftReporter::new(db.clone());
    let report = reporter.shift_report(&shift.id).await.unwrap();

    assert_eq!(report.stays.len(), 2);
    assert_eq!(report.withdrawals.len(), 1);
    assert_eq!(report.room_income, 100_000);
    assert_eq!(report.consumption_income, 51_000); // 3×15,000 + 1×6,000
    assert_eq!(report.total_income, closed.total_income.unwrap());
    assert_eq!(report.total_withdrawals, closed.total_withdrawals.unwrap());
    assert_eq!(
        report.expected_closing_balance,
        closed.closing_balance.unwrap()
    );

    // Per-product rollup sums quantity and revenue across stays.
    let water_line = report
        .product_sales
        .iter()
        .find(|l| l.product_id == water.id)
        .unwrap();
    assert_eq!(water_line.quantity, 3);
    assert_eq!(water_line.amount, 45_000);
    assert_eq!(water_line.name, "Bottled Water");

    let chips_line = report
        .product_sales
        .iter()
        .find(|l| l.product_id == chips.id)
        .unwrap();
    assert_eq!(chips_line.quantity, 1);
    assert_eq!(chips_line.amount, 6_000);
}

#[tokio::test]
async fn daily_summary_covers_finalized_stays() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(0)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    let checkout_at = stay.checked_in_at + Duration::hours(4);
    stays.check_out_at(&room.id, checkout_at).await.unwrap();

    let reporter = ShiftReporter::new(db.clone());

    let summary = reporter
        .daily_summary(checkout_at - Duration::hours(12))
        .await
        .unwrap();
    assert_eq!(summary.stays_closed, 1);
    assert_eq!(summary.room_income, 50_000);
    assert_eq!(summary.total_income, 50_000);

    // Occupancy snapshot reflects the current room states: the checked-out
    // room is waiting on housekeeping.
    assert_eq!(summary.occupancy.cleaning, 1);
    assert_eq!(summary.occupancy.available, 0);
    assert_eq!(summary.occupancy.occupied, 0);
    assert_eq!(summary.occupancy.maintenance, 0);

    // A window that ends before the check-out sees nothing.
    let empty = reporter
        .daily_summary(checkout_at - Duration::hours(48))
        .await
        .unwrap();
    assert_eq!(empty.stays_closed, 0);
}

#[tokio::test]
async fn purge_refuses_while_shift_open_then_clears_history() {
    let db = test_db().await;
    let plan = seed_plan(&db, 50_000, 10_000).await;
    let room = seed_room(&db, "3", &plan).await;
    let water = seed_product(&db, "Bottled Water", 15_000, 10).await;

    let ledger = ShiftLedger::new(db.clone());
    ledger.open_shift("clerk-1", Some(100_000)).await.unwrap();

    let stays = StayManager::new(db.clone());
    let stay = stays.check_in(&room.id, "clerk-1").await.unwrap();
    stays
        .attach_consumption(&stay.id, &water.id, 1)
        .await
        .unwrap();

    // Open shift → refused.
    let err = purge_history(&db).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    stays.check_out(&room.id).await.unwrap();
    ledger
        .record_withdrawal("clerk-1", 5_000, "supplies")
        .await
        .unwrap();
    ledger.close_shift(None).await.unwrap();

    let report = purge_history(&db).await.unwrap();
    assert_eq!(report.stays, 1);
    assert_eq!(report.shifts, 1);
    assert_eq!(report.consumption_entries, 1);
    assert_eq!(report.withdrawals, 1);

    // Catalog tables survive the reset.
    assert_eq!(db.rooms().count().await.unwrap(), 1);
    assert_eq!(db.products().count().await.unwrap(), 1);

    // Fresh books: the next shift inherits nothing.
    let next = ledger.open_shift("clerk-1", None).await.unwrap();
    assert_eq!(next.opening_balance, 0);
}
