use super::engine::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn stay(check_in: &str, check_out: &str) -> StayRange {
    StayRange::new(date(check_in), date(check_out)).unwrap()
}

#[test]
fn test_two_nights_at_100_totals_200() {
    let range = stay("2025-01-01", "2025-01-03");
    assert_eq!(range.nights(), 2);

    let total = quote_total(to_decimal(100.0), range.nights());
    assert_eq!(total, Decimal::from(200));
    assert_eq!(to_f64(total), 200.0);
}

#[test]
fn test_fractional_rate_rounds_to_cents() {
    // 3 nights at 99.99 = 299.97, no float drift
    let total = quote_total(to_decimal(99.99), 3);
    assert_eq!(to_f64(total), 299.97);

    // Rate with sub-cent precision rounds half-up
    let total = quote_total(to_decimal(33.335), 2);
    assert_eq!(to_f64(total), 66.67);
}

#[test]
fn test_checkout_before_checkin_rejected() {
    assert_eq!(
        StayRange::new(date("2025-01-03"), date("2025-01-01")),
        Err(BookingError::InvalidDuration)
    );
}

#[test]
fn test_zero_night_stay_rejected() {
    assert_eq!(
        StayRange::new(date("2025-01-01"), date("2025-01-01")),
        Err(BookingError::InvalidDuration)
    );
}

#[test]
fn test_single_night_is_valid() {
    let range = stay("2025-01-01", "2025-01-02");
    assert_eq!(range.nights(), 1);
}

#[test]
fn test_overlap_detection() {
    let a = stay("2025-01-01", "2025-01-05");

    // Fully inside
    assert!(a.overlaps(&stay("2025-01-02", "2025-01-04")));
    // Straddles the start
    assert!(a.overlaps(&stay("2024-12-30", "2025-01-02")));
    // Straddles the end
    assert!(a.overlaps(&stay("2025-01-04", "2025-01-08")));
    // Fully covers
    assert!(a.overlaps(&stay("2024-12-30", "2025-01-08")));
    // Identical
    assert!(a.overlaps(&a));
    // Symmetry
    let b = stay("2025-01-04", "2025-01-08");
    assert_eq!(a.overlaps(&b), b.overlaps(&a));
}

#[test]
fn test_back_to_back_stays_do_not_overlap() {
    // Checkout morning == next guest's check-in: the night is not shared
    let first = stay("2025-01-01", "2025-01-03");
    let second = stay("2025-01-03", "2025-01-05");
    assert!(!first.overlaps(&second));
    assert!(!second.overlaps(&first));
}

#[test]
fn test_disjoint_stays_do_not_overlap() {
    let a = stay("2025-01-01", "2025-01-03");
    let b = stay("2025-02-01", "2025-02-03");
    assert!(!a.overlaps(&b));
}

#[test]
fn test_find_conflict_reports_first_hit() {
    let existing = vec![
        stay("2025-01-01", "2025-01-03"),
        stay("2025-01-10", "2025-01-12"),
    ];

    let requested = stay("2025-01-11", "2025-01-14");
    let conflict = requested.find_conflict(&existing).unwrap();
    assert_eq!(conflict.check_in(), date("2025-01-10"));

    // Gap between the two existing stays is free
    assert!(stay("2025-01-03", "2025-01-10")
        .find_conflict(&existing)
        .is_none());
}

#[test]
fn test_schedule_without_overlaps_stays_consistent() {
    use rand::Rng;

    // Build a random schedule by only admitting non-conflicting stays,
    // then assert the no-overlap invariant holds pairwise
    let mut rng = rand::thread_rng();
    let base = date("2025-06-01");
    let mut accepted: Vec<StayRange> = Vec::new();

    for _ in 0..200 {
        let offset = rng.gen_range(0..90);
        let nights = rng.gen_range(1..7);
        let check_in = base + chrono::Duration::days(offset);
        let check_out = check_in + chrono::Duration::days(nights);
        let candidate = StayRange::new(check_in, check_out).unwrap();

        if candidate.find_conflict(&accepted).is_none() {
            accepted.push(candidate);
        }
    }

    assert!(!accepted.is_empty());
    for (i, a) in accepted.iter().enumerate() {
        for b in accepted.iter().skip(i + 1) {
            assert!(!a.overlaps(b), "schedule admitted overlapping stays");
        }
    }
}

#[test]
fn test_long_stay_pricing() {
    // 30 nights at 150.50
    let total = quote_total(to_decimal(150.50), 30);
    assert_eq!(to_f64(total), 4515.0);
}
