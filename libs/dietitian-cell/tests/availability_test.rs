use assert_matches::assert_matches;
use uuid::Uuid;

use dietitian_cell::models::{AvailabilityError, Slot};
use dietitian_cell::services::AvailabilityService;
use shared_database::NutritionStore;
use shared_models::booking::{Booking, BookingStatus, ConsultationType, TimeSlot};
use shared_models::dietitian::{AvailabilityRule, DayOfWeek};
use shared_models::time::ClockTime;
use shared_utils::test_utils::{monday, monday_rule, TestContext};

fn starts(slots: &[Slot]) -> Vec<String> {
    slots.iter().map(|slot| slot.start.to_string()).collect()
}

async fn book(context: &TestContext, dietitian: Uuid, start: &str, status: BookingStatus) {
    let client = context.seed_client(&format!("client-{}@example.com", Uuid::new_v4())).await;
    let start = ClockTime::parse(start).unwrap();
    let mut booking = Booking::new_pending(
        client.id,
        dietitian,
        monday(),
        TimeSlot {
            start,
            end: start.plus_minutes(30),
        },
        ConsultationType::Video,
        None,
        Vec::new(),
    );
    booking.status = status;
    context.store.create_booking(booking).await.unwrap();
}

#[tokio::test]
async fn test_monday_rule_yields_half_hour_slots() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;

    let slots = AvailabilityService::new(&context.state)
        .get_available_slots(dietitian.id, monday())
        .await
        .unwrap();

    assert_eq!(starts(&slots), vec!["09:00", "09:30", "10:00", "10:30"]);
    assert_eq!(slots.last().unwrap().end.to_string(), "11:00");
}

#[tokio::test]
async fn test_short_window_gives_one_overrunning_slot() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "09:15")]).await;

    let slots = AvailabilityService::new(&context.state)
        .get_available_slots(dietitian.id, monday())
        .await
        .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start.to_string(), "09:00");
    assert_eq!(slots[0].end.to_string(), "09:30");
}

#[tokio::test]
async fn test_unavailable_or_missing_rule_gives_no_slots() {
    let context = TestContext::new();
    let (_, dietitian) = context
        .seed_dietitian(vec![
            AvailabilityRule::new(DayOfWeek::Monday, "09:00", "17:00", false),
            AvailabilityRule::new(DayOfWeek::Wednesday, "09:00", "17:00", true),
        ])
        .await;
    let service = AvailabilityService::new(&context.state);

    let monday_slots = service.get_available_slots(dietitian.id, monday()).await.unwrap();
    assert!(monday_slots.is_empty());

    let tuesday = monday().succ_opt().unwrap();
    let tuesday_slots = service.get_available_slots(dietitian.id, tuesday).await.unwrap();
    assert!(tuesday_slots.is_empty());
}

#[tokio::test]
async fn test_first_rule_for_a_weekday_wins() {
    let context = TestContext::new();
    let (_, dietitian) = context
        .seed_dietitian(vec![monday_rule("09:00", "10:00"), monday_rule("14:00", "16:00")])
        .await;

    let slots = AvailabilityService::new(&context.state)
        .get_available_slots(dietitian.id, monday())
        .await
        .unwrap();

    assert_eq!(starts(&slots), vec!["09:00", "09:30"]);
}

#[tokio::test]
async fn test_active_bookings_remove_their_slot() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "11:00")]).await;
    book(&context, dietitian.id, "09:30", BookingStatus::Confirmed).await;
    book(&context, dietitian.id, "10:30", BookingStatus::Pending).await;

    let slots = AvailabilityService::new(&context.state)
        .get_available_slots(dietitian.id, monday())
        .await
        .unwrap();

    assert_eq!(starts(&slots), vec!["09:00", "10:00"]);
}

#[tokio::test]
async fn test_cancelled_and_completed_bookings_free_their_slot() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("09:00", "10:00")]).await;
    book(&context, dietitian.id, "09:00", BookingStatus::Cancelled).await;
    book(&context, dietitian.id, "09:30", BookingStatus::Completed).await;

    let slots = AvailabilityService::new(&context.state)
        .get_available_slots(dietitian.id, monday())
        .await
        .unwrap();

    assert_eq!(starts(&slots), vec!["09:00", "09:30"]);
}

#[tokio::test]
async fn test_repeated_queries_are_stable() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("13:00", "15:00")]).await;
    book(&context, dietitian.id, "14:00", BookingStatus::Pending).await;
    let service = AvailabilityService::new(&context.state);

    let first = service.get_available_slots(dietitian.id, monday()).await.unwrap();
    let second = service.get_available_slots(dietitian.id, monday()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(context.store.booking_count().await, 1);
}

#[tokio::test]
async fn test_bookings_for_other_dietitians_do_not_interfere() {
    let context = TestContext::new();
    let (_, first) = context.seed_dietitian(vec![monday_rule("09:00", "10:00")]).await;
    let (_, second) = context.seed_dietitian(vec![monday_rule("09:00", "10:00")]).await;
    book(&context, second.id, "09:00", BookingStatus::Confirmed).await;

    let slots = AvailabilityService::new(&context.state)
        .get_available_slots(first.id, monday())
        .await
        .unwrap();

    assert_eq!(starts(&slots), vec!["09:00", "09:30"]);
}

#[tokio::test]
async fn test_unknown_dietitian_is_not_found() {
    let context = TestContext::new();

    let result = AvailabilityService::new(&context.state)
        .get_available_slots(Uuid::new_v4(), monday())
        .await;

    assert_matches!(result, Err(AvailabilityError::DietitianNotFound));
}

#[tokio::test]
async fn test_malformed_rule_times_are_rejected() {
    let context = TestContext::new();
    let (_, dietitian) = context.seed_dietitian(vec![monday_rule("nine", "17:00")]).await;

    let result = AvailabilityService::new(&context.state)
        .get_available_slots(dietitian.id, monday())
        .await;

    assert_matches!(result, Err(AvailabilityError::InvalidTime(_)));
    assert!(context.store.find_dietitian_by_id(dietitian.id).await.unwrap().is_some());
}
