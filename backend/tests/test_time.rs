//! Tests for TimeManager

use capacity_simulator_core_rs::{TimeManager, MINUTES_PER_DAY};

#[test]
fn test_time_manager_new() {
    let time = TimeManager::new(MINUTES_PER_DAY);
    assert_eq!(time.current_minute(), 0);
    assert_eq!(time.horizon_minutes(), 1440);
    assert_eq!(time.remaining_minutes(), 1440);
}

#[test]
fn test_advance_minute() {
    let mut time = TimeManager::new(MINUTES_PER_DAY);

    time.advance_minute();
    assert_eq!(time.current_minute(), 1);

    time.advance_minute();
    assert_eq!(time.current_minute(), 2);
    assert_eq!(time.remaining_minutes(), 1438);
}

#[test]
fn test_final_minute_and_completion() {
    let mut time = TimeManager::new(100);

    for _ in 0..99 {
        assert!(!time.is_final_minute());
        time.advance_minute();
    }

    assert_eq!(time.current_minute(), 99);
    assert!(time.is_final_minute());
    assert!(!time.is_complete());

    time.advance_minute();
    assert!(!time.is_final_minute());
    assert!(time.is_complete());
    assert_eq!(time.remaining_minutes(), 0);
}

#[test]
fn test_hour_of_day() {
    let mut time = TimeManager::new(MINUTES_PER_DAY);
    assert_eq!(time.hour_of_day(), 0.0);

    for _ in 0..900 {
        time.advance_minute();
    }
    assert_eq!(time.hour_of_day(), 15.0);
}

#[test]
fn test_single_minute_horizon() {
    let time = TimeManager::new(1);
    assert!(time.is_final_minute());
    assert!(!time.is_complete());
}
