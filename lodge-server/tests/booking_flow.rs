//! Repository-level booking flow against a throwaway RocksDB instance.
//! Run: cargo test -p lodge-server --test booking_flow

use chrono::NaiveDate;
use surrealdb::RecordId;
use tempfile::TempDir;

use lodge_server::booking::{StayRange, quote_total, to_decimal, to_f64};
use lodge_server::db::DbService;
use lodge_server::db::models::{
    Booking, BookingPaymentStatus, BookingStatus, Payment, PaymentStatus, Room, RoomCreate,
    UserCreate, UserRole,
};
use lodge_server::db::repository::{
    BookingRepository, PaymentRepository, RoomRepository, UserRepository,
};

struct TestDb {
    // Keeps the database directory alive for the duration of the test
    _tmp: TempDir,
    service: DbService,
}

async fn test_db() -> TestDb {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("db")).await.unwrap();
    TestDb { _tmp: tmp, service }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn seed_room(db: &TestDb, number: &str, price: f64) -> Room {
    RoomRepository::new(db.service.db.clone())
        .create(RoomCreate {
            room_number: number.to_string(),
            room_type: "double".to_string(),
            price,
            capacity: Some(2),
            description: None,
            status: None,
        })
        .await
        .unwrap()
}

async fn seed_member(db: &TestDb, username: &str) -> RecordId {
    UserRepository::new(db.service.db.clone())
        .create(UserCreate {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct-horse-battery".to_string(),
            full_name: None,
            role: UserRole::Member,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

/// Replicates the handler's create flow: overlap check through the
/// repository, pricing through the engine, then persist.
async fn try_book(
    repo: &BookingRepository,
    room: &Room,
    user: &RecordId,
    check_in: &str,
    check_out: &str,
) -> Result<Booking, String> {
    let range = StayRange::new(date(check_in), date(check_out)).map_err(|e| e.to_string())?;
    let room_id = room.id.clone().unwrap();

    let existing: Vec<StayRange> = repo
        .find_overlapping(&room_id, range.check_in(), range.check_out())
        .await
        .unwrap()
        .into_iter()
        .filter_map(|b| StayRange::new(b.check_in, b.check_out).ok())
        .collect();

    if let Some(conflict) = range.find_conflict(&existing) {
        return Err(format!(
            "overlap with {}..{}",
            conflict.check_in(),
            conflict.check_out()
        ));
    }

    let total = quote_total(to_decimal(room.price), range.nights());
    Ok(repo
        .create(Booking {
            id: None,
            room: room_id,
            user: user.clone(),
            check_in: range.check_in(),
            check_out: range.check_out(),
            guest_name: "Guest".to_string(),
            guest_email: "guest@example.com".to_string(),
            guest_phone: String::new(),
            num_guests: 2,
            special_requests: None,
            total_price: to_f64(total),
            booking_status: BookingStatus::Confirmed,
            payment_status: BookingPaymentStatus::Pending,
            created_at: 1_750_000_000,
        })
        .await
        .unwrap())
}

#[tokio::test]
async fn booking_totals_and_default_statuses() {
    let db = test_db().await;
    let room = seed_room(&db, "101", 100.0).await;
    let user = seed_member(&db, "alice").await;
    let repo = BookingRepository::new(db.service.db.clone());

    let booking = try_book(&repo, &room, &user, "2025-01-01", "2025-01-03")
        .await
        .unwrap();

    assert_eq!(booking.total_price, 200.0);
    assert_eq!(booking.booking_status, BookingStatus::Confirmed);
    assert_eq!(booking.payment_status, BookingPaymentStatus::Pending);
}

#[tokio::test]
async fn overlapping_booking_is_rejected() {
    let db = test_db().await;
    let room = seed_room(&db, "102", 80.0).await;
    let user = seed_member(&db, "bob").await;
    let repo = BookingRepository::new(db.service.db.clone());

    try_book(&repo, &room, &user, "2025-03-10", "2025-03-15")
        .await
        .unwrap();

    // Every overlapping shape is refused
    for (check_in, check_out) in [
        ("2025-03-10", "2025-03-15"), // identical
        ("2025-03-12", "2025-03-13"), // inside
        ("2025-03-08", "2025-03-11"), // straddles start
        ("2025-03-14", "2025-03-20"), // straddles end
        ("2025-03-01", "2025-03-31"), // covers
    ] {
        let result = try_book(&repo, &room, &user, check_in, check_out).await;
        assert!(result.is_err(), "{}..{} should conflict", check_in, check_out);
    }

    // Back-to-back stays on either side are fine
    try_book(&repo, &room, &user, "2025-03-05", "2025-03-10")
        .await
        .unwrap();
    try_book(&repo, &room, &user, "2025-03-15", "2025-03-18")
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_booking_frees_the_room() {
    let db = test_db().await;
    let room = seed_room(&db, "103", 120.0).await;
    let user = seed_member(&db, "carol").await;
    let repo = BookingRepository::new(db.service.db.clone());

    let booking = try_book(&repo, &room, &user, "2025-05-01", "2025-05-04")
        .await
        .unwrap();
    let booking_id = booking.id.unwrap().to_string();

    // Same dates are blocked while the booking is live
    assert!(
        try_book(&repo, &room, &user, "2025-05-02", "2025-05-03")
            .await
            .is_err()
    );

    let cancelled = repo
        .update_status(&booking_id, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.booking_status, BookingStatus::Cancelled);

    // Cancelled bookings no longer count against availability
    try_book(&repo, &room, &user, "2025-05-02", "2025-05-03")
        .await
        .unwrap();
}

#[tokio::test]
async fn different_rooms_do_not_interfere() {
    let db = test_db().await;
    let room_a = seed_room(&db, "201", 90.0).await;
    let room_b = seed_room(&db, "202", 90.0).await;
    let user = seed_member(&db, "dave").await;
    let repo = BookingRepository::new(db.service.db.clone());

    try_book(&repo, &room_a, &user, "2025-07-01", "2025-07-05")
        .await
        .unwrap();
    // Same dates, other room
    try_book(&repo, &room_b, &user, "2025-07-01", "2025-07-05")
        .await
        .unwrap();
}

#[tokio::test]
async fn availability_search_excludes_booked_rooms() {
    let db = test_db().await;
    let room_a = seed_room(&db, "301", 100.0).await;
    let _room_b = seed_room(&db, "302", 100.0).await;
    let user = seed_member(&db, "erin").await;
    let booking_repo = BookingRepository::new(db.service.db.clone());
    let room_repo = RoomRepository::new(db.service.db.clone());

    try_book(&booking_repo, &room_a, &user, "2025-08-10", "2025-08-12")
        .await
        .unwrap();

    let available = room_repo
        .find_available(date("2025-08-11"), date("2025-08-13"))
        .await
        .unwrap();
    let numbers: Vec<&str> = available.iter().map(|r| r.room_number.as_str()).collect();
    assert_eq!(numbers, vec!["302"]);

    // Outside the booked window both rooms are free
    let available = room_repo
        .find_available(date("2025-08-12"), date("2025-08-14"))
        .await
        .unwrap();
    assert_eq!(available.len(), 2);
}

#[tokio::test]
async fn settling_a_payment_marks_the_booking_paid() {
    let db = test_db().await;
    let room = seed_room(&db, "401", 75.0).await;
    let user = seed_member(&db, "frank").await;
    let booking_repo = BookingRepository::new(db.service.db.clone());
    let payment_repo = PaymentRepository::new(db.service.db.clone());

    let booking = try_book(&booking_repo, &room, &user, "2025-09-01", "2025-09-03")
        .await
        .unwrap();
    let booking_id = booking.id.clone().unwrap();

    let payment = payment_repo
        .create(Payment {
            id: None,
            booking: booking_id.clone(),
            amount: booking.total_price,
            method: "card".to_string(),
            status: PaymentStatus::Pending,
            transaction_id: "TRX-test-0001".to_string(),
            created_at: 1_750_000_000,
        })
        .await
        .unwrap();
    assert_eq!(payment.amount, 150.0);

    let settled = payment_repo.settle(&payment.id.unwrap()).await.unwrap();
    assert_eq!(settled.status, PaymentStatus::Success);

    // Both sides of the transaction landed
    let booking = booking_repo
        .find_by_id(&booking_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(booking.payment_status, BookingPaymentStatus::Paid);
}

#[tokio::test]
async fn duplicate_usernames_and_room_numbers_rejected() {
    let db = test_db().await;
    seed_room(&db, "501", 60.0).await;
    seed_member(&db, "grace").await;

    let room_repo = RoomRepository::new(db.service.db.clone());
    let user_repo = UserRepository::new(db.service.db.clone());

    assert!(
        room_repo
            .create(RoomCreate {
                room_number: "501".to_string(),
                room_type: "single".to_string(),
                price: 50.0,
                capacity: None,
                description: None,
                status: None,
            })
            .await
            .is_err()
    );

    assert!(
        user_repo
            .create(UserCreate {
                username: "grace".to_string(),
                email: "grace2@example.com".to_string(),
                password: "another-password".to_string(),
                full_name: None,
                role: UserRole::Member,
            })
            .await
            .is_err()
    );
}
