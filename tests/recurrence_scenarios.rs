mod common;

use budget_cadence::{
    calendar::{Calendar, Instant},
    ledger::{Budget, BudgetPeriod, NextReset, RecurrenceRule},
    RecurrenceEngine,
};
use chrono::{Datelike, NaiveTime, Weekday};
use common::{budget, day, utc_day, utc_engine};

#[test]
fn monthly_on_the_31st_clamps_into_february() {
    let engine = utc_engine();
    let jan31 = budget(BudgetPeriod::Monthly, utc_day(2025, 1, 31));

    let first = jan31.next_reset(&engine, jan31.start_date);
    assert_eq!(first, NextReset::At(utc_day(2025, 2, 28)));
    assert_eq!(
        jan31.next_reset(&engine, utc_day(2025, 2, 28)),
        NextReset::At(utc_day(2025, 3, 31))
    );

    let leap = budget(BudgetPeriod::Monthly, utc_day(2024, 1, 31));
    assert_eq!(
        leap.next_reset(&engine, leap.start_date),
        NextReset::At(utc_day(2024, 2, 29))
    );
}

#[test]
fn weekly_first_reset_is_exactly_one_week_later() {
    let engine = utc_engine();
    let wednesday = utc_day(2025, 6, 4);
    let calendar = Calendar::utc();
    assert_eq!(calendar.fields(wednesday).weekday, Weekday::Wed);

    let weekly = budget(BudgetPeriod::Weekly, wednesday);
    assert_eq!(
        weekly.next_reset(&engine, wednesday),
        NextReset::At(utc_day(2025, 6, 11))
    );
}

#[test]
fn non_repeating_budget_never_resets() {
    let engine = utc_engine();
    let start = utc_day(2025, 3, 3);
    let once = Budget::draft("user-1", 80.0, BudgetPeriod::Weekly, start)
        .repeating(false)
        .build(&Calendar::utc())
        .unwrap();

    for from in [start.add_days(-30), start, start.add_days(7), start.add_days(400)] {
        assert_eq!(once.next_reset(&engine, from), NextReset::Never);
        assert!(!once.has_reset(&engine, from));
    }
    assert_eq!(
        once.occurrences_in_range(&engine, start.add_millis(-1), start.add_millis(1)),
        vec![start]
    );
    assert!(once
        .occurrences_in_range(&engine, start.add_millis(1), start.add_days(90))
        .is_empty());
}

#[test]
fn end_date_clamps_the_final_occurrence() {
    let engine = utc_engine();
    let rule = RecurrenceRule::new(BudgetPeriod::Monthly, utc_day(2025, 1, 15)).ending(utc_day(2025, 3, 1));

    // The start date is itself the first occurrence of the schedule.
    assert_eq!(
        engine.occurrences_in_range(&rule, utc_day(2025, 1, 1), utc_day(2025, 4, 1)),
        vec![utc_day(2025, 1, 15), utc_day(2025, 2, 15), utc_day(2025, 3, 1)]
    );
    assert_eq!(
        engine.occurrences_in_range(&rule, utc_day(2025, 1, 16), utc_day(2025, 4, 1)),
        vec![utc_day(2025, 2, 15), utc_day(2025, 3, 1)]
    );
    assert_eq!(engine.next_reset(&rule, utc_day(2025, 2, 20)), NextReset::At(utc_day(2025, 3, 1)));
    assert_eq!(engine.next_reset(&rule, utc_day(2025, 3, 1)), NextReset::Never);
}

#[test]
fn querying_at_a_reset_instant_returns_the_following_week() {
    let engine = utc_engine();
    let weekly = budget(BudgetPeriod::Weekly, utc_day(2025, 1, 1));

    let first = weekly.next_reset(&engine, utc_day(2025, 1, 3)).instant().unwrap();
    assert_eq!(first, utc_day(2025, 1, 8));
    assert_eq!(
        weekly.next_reset(&engine, first),
        NextReset::At(utc_day(2025, 1, 15))
    );
    // Later on the same day still counts as already passed.
    assert_eq!(
        weekly.next_reset(&engine, first.add_millis(8 * 3_600_000)),
        NextReset::At(utc_day(2025, 1, 15))
    );
}

#[test]
fn monthly_clamp_is_not_sticky() {
    let engine = utc_engine();
    let rule = RecurrenceRule::new(BudgetPeriod::Monthly, utc_day(2025, 1, 31));
    let occurrences = engine.occurrences_in_range(&rule, utc_day(2025, 4, 1), utc_day(2025, 8, 31));
    assert_eq!(
        occurrences,
        vec![
            utc_day(2025, 4, 30),
            utc_day(2025, 5, 31),
            utc_day(2025, 6, 30),
            utc_day(2025, 7, 31),
            utc_day(2025, 8, 31),
        ]
    );
}

#[test]
fn has_reset_compares_now_against_its_own_next_reset() {
    let engine = utc_engine();
    let weekly = budget(BudgetPeriod::Weekly, utc_day(2025, 1, 1));
    // The next reset is always after the start of `now`'s day.
    assert!(!weekly.has_reset(&engine, utc_day(2025, 1, 8)));
    assert!(weekly.has_reset_since(&engine, utc_day(2025, 1, 2), utc_day(2025, 1, 8)));
}

#[test]
fn fifty_year_range_terminates_with_bounded_count() {
    let engine = utc_engine();
    let weekly = RecurrenceRule::new(BudgetPeriod::Weekly, utc_day(2000, 1, 5));
    let monthly = RecurrenceRule::new(BudgetPeriod::Monthly, utc_day(2000, 1, 31));
    let lo = utc_day(2000, 1, 1);
    let hi = utc_day(2050, 1, 1);

    let weeks = engine.occurrences_in_range(&weekly, lo, hi);
    let months = engine.occurrences_in_range(&monthly, lo, hi);
    assert_eq!(months.len(), 600);
    assert!(weeks.len() >= 2608 && weeks.len() <= 2610);
    assert!(weeks.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn distant_range_skips_ahead_from_the_start_date() {
    let engine = utc_engine();
    let rule = RecurrenceRule::new(BudgetPeriod::Weekly, utc_day(1971, 1, 6));
    let found = engine.occurrences_in_range(&rule, utc_day(2200, 1, 1), utc_day(2200, 1, 31));
    assert!(!found.is_empty() && found.len() <= 5);
    let calendar = Calendar::utc();
    assert!(found
        .iter()
        .all(|o| calendar.fields(*o).weekday == Weekday::Wed));
}

#[test]
fn resets_are_local_midnights_in_a_fixed_offset() {
    let calendar = Calendar::from_offset_minutes(-8 * 60).unwrap();
    let engine = RecurrenceEngine::new(calendar);
    let start = day(&calendar, 2025, 10, 31);
    let rule = RecurrenceRule::new(BudgetPeriod::Monthly, start);

    let late_evening = calendar.instant_at(
        chrono::NaiveDate::from_ymd_opt(2025, 11, 29).unwrap(),
        NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
    );
    let next = engine.next_reset(&rule, late_evening).instant().unwrap();
    assert_eq!(next, day(&calendar, 2025, 11, 30));
    assert_eq!(calendar.local(next).time(), NaiveTime::MIN);
    assert_eq!(calendar.date_of(next).day(), 30);
}

#[test]
fn before_the_start_date_the_first_reset_is_one_period_after_start() {
    let engine = utc_engine();
    let rule = RecurrenceRule::new(BudgetPeriod::Monthly, utc_day(2025, 5, 20));
    assert_eq!(
        engine.next_reset(&rule, utc_day(2024, 1, 1)),
        NextReset::At(utc_day(2025, 6, 20))
    );
    assert_eq!(engine.current_period(&rule, utc_day(2025, 5, 19)), None);
    assert_eq!(
        engine.occurrences_in_range(&rule, Instant::EPOCH, utc_day(2025, 5, 19)),
        Vec::<Instant>::new()
    );
}
