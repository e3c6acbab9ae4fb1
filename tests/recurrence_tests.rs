use std::cell::Cell;
use std::collections::BTreeSet;
use chrono::{Datelike, NaiveDate, Weekday};
use choreust::colors::NEUTRAL_COLOR;
use choreust::models::{Chore, ChoreStatus, Recurrence};
use choreust::recurrence::{expand, sort_chronologically};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn chore(id: u64, date: NaiveDate, recurrence: Recurrence) -> Chore {
    Chore {
        id,
        title: format!("Chore {id}"),
        date,
        assignee_id: None,
        recurrence,
        notes: None,
        status: ChoreStatus::Pending,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn weekly(days: &[u8], end_date: Option<NaiveDate>) -> Recurrence {
    Recurrence::Weekly { days_of_week: days.iter().copied().collect(), end_date }
}

fn monthly(day_of_month: u32, end_date: Option<NaiveDate>) -> Recurrence {
    Recurrence::Monthly { day_of_month, end_date }
}

fn no_colors(_: u64) -> Option<String> {
    None
}

fn dates(chores: &[Chore], start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    expand(chores, start, end, no_colors).into_iter().map(|i| i.date).collect()
}

#[test]
fn test_one_time_inside_window() {
    let chores = vec![chore(3, d(2025, 2, 14), Recurrence::None)];
    let instances = expand(&chores, d(2025, 2, 1), d(2025, 2, 28), no_colors);

    assert_eq!(instances.len(), 1);
    let i = &instances[0];
    assert_eq!(i.date, d(2025, 2, 14));
    assert_eq!(i.id, "3");
    assert_eq!(i.base_chore_id, 3);
    assert_eq!(i.title, "Chore 3");
    assert!(!i.is_recurring);
}

#[test]
fn test_one_time_outside_window() {
    let chores = vec![
        chore(1, d(2025, 1, 31), Recurrence::None),
        chore(2, d(2025, 3, 1), Recurrence::None),
    ];
    assert!(expand(&chores, d(2025, 2, 1), d(2025, 2, 28), no_colors).is_empty());
}

#[test]
fn test_weekly_mondays_in_month() {
    // June 2025 has five Mondays, February 2025 has four.
    let chores = vec![chore(1, d(2025, 1, 6), weekly(&[1], None))];

    let june = dates(&chores, d(2025, 6, 1), d(2025, 6, 30));
    assert_eq!(june, vec![d(2025, 6, 2), d(2025, 6, 9), d(2025, 6, 16), d(2025, 6, 23), d(2025, 6, 30)]);

    let february = dates(&chores, d(2025, 2, 1), d(2025, 2, 28));
    assert_eq!(february.len(), 4);
    assert!(february.iter().all(|day| day.weekday() == Weekday::Mon));
}

#[test]
fn test_weekly_several_days_is_chronological() {
    let chores = vec![chore(1, d(2025, 1, 1), weekly(&[4, 1], None))];
    let got = dates(&chores, d(2025, 2, 1), d(2025, 2, 28));

    assert_eq!(
        got,
        vec![
            d(2025, 2, 3), d(2025, 2, 6), d(2025, 2, 10), d(2025, 2, 13),
            d(2025, 2, 17), d(2025, 2, 20), d(2025, 2, 24), d(2025, 2, 27),
        ]
    );
}

#[test]
fn test_weekly_starts_at_anchor() {
    let chores = vec![chore(1, d(2025, 6, 16), weekly(&[1], None))];
    assert_eq!(
        dates(&chores, d(2025, 6, 1), d(2025, 6, 30)),
        vec![d(2025, 6, 16), d(2025, 6, 23), d(2025, 6, 30)]
    );
}

#[test]
fn test_weekly_stops_at_end_date() {
    let chores = vec![chore(1, d(2025, 6, 1), weekly(&[1], Some(d(2025, 6, 16))))];
    assert_eq!(
        dates(&chores, d(2025, 6, 1), d(2025, 6, 30)),
        vec![d(2025, 6, 2), d(2025, 6, 9), d(2025, 6, 16)]
    );
}

#[test]
fn test_monthly_day_31_reclamps_every_month() {
    let chores = vec![chore(7, d(2025, 1, 31), monthly(31, None))];
    let instances = expand(&chores, d(2025, 1, 1), d(2025, 3, 31), no_colors);

    let got: Vec<NaiveDate> = instances.iter().map(|i| i.date).collect();
    assert_eq!(got, vec![d(2025, 1, 31), d(2025, 2, 28), d(2025, 3, 31)]);
    assert_eq!(instances[1].id, "7-2025-02-28");
    assert!(instances.iter().all(|i| i.is_recurring && i.base_chore_id == 7));
}

#[test]
fn test_monthly_short_months_and_leap_year() {
    let chores = vec![chore(1, d(2023, 12, 31), monthly(31, None))];
    assert_eq!(
        dates(&chores, d(2024, 2, 1), d(2024, 5, 31)),
        vec![d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30), d(2024, 5, 31)]
    );

    let chores = vec![chore(2, d(2025, 1, 30), monthly(30, None))];
    assert_eq!(
        dates(&chores, d(2025, 1, 1), d(2025, 3, 31)),
        vec![d(2025, 1, 30), d(2025, 2, 28), d(2025, 3, 30)]
    );
}

#[test]
fn test_monthly_stops_at_end_date() {
    let chores = vec![chore(1, d(2025, 1, 15), monthly(15, Some(d(2025, 2, 20))))];
    assert_eq!(
        dates(&chores, d(2025, 1, 1), d(2025, 4, 30)),
        vec![d(2025, 1, 15), d(2025, 2, 15)]
    );
}

#[test]
fn test_monthly_far_past_anchor() {
    let chores = vec![chore(1, d(1990, 1, 10), monthly(10, None))];
    assert_eq!(dates(&chores, d(2025, 5, 1), d(2025, 5, 31)), vec![d(2025, 5, 10)]);
}

#[test]
fn test_monthly_occurrences_not_bounded_by_anchor() {
    // Monthly rules repeat on their day in every month of the window,
    // including months before the anchor date.
    let chores = vec![chore(1, d(2025, 6, 15), monthly(15, None))];
    assert_eq!(
        dates(&chores, d(2025, 1, 1), d(2025, 3, 31)),
        vec![d(2025, 1, 15), d(2025, 2, 15), d(2025, 3, 15)]
    );
}

#[test]
fn test_end_date_before_window_yields_nothing() {
    let end = Some(d(2025, 1, 31));
    let chores = vec![
        chore(1, d(2025, 1, 1), weekly(&[0, 1, 2, 3, 4, 5, 6], end)),
        chore(2, d(2025, 1, 1), monthly(1, end)),
    ];
    assert!(expand(&chores, d(2025, 3, 1), d(2025, 3, 31), no_colors).is_empty());
}

#[test]
fn test_end_date_before_anchor_yields_nothing() {
    let chores = vec![chore(1, d(2025, 6, 1), weekly(&[1], Some(d(2025, 5, 1))))];
    assert!(expand(&chores, d(2025, 5, 1), d(2025, 7, 31), no_colors).is_empty());
}

#[test]
fn test_window_bounds_are_inclusive() {
    let start = d(2025, 6, 2); // Monday
    let end = d(2025, 6, 30); // Monday
    let chores = vec![
        chore(1, start, Recurrence::None),
        chore(2, end, Recurrence::None),
        chore(3, d(2025, 1, 6), weekly(&[1], None)),
        chore(4, d(2025, 1, 2), monthly(2, None)),
        chore(5, d(2025, 1, 30), monthly(30, None)),
    ];
    let instances = expand(&chores, start, end, no_colors);

    let of = |id: u64| -> Vec<NaiveDate> {
        instances.iter().filter(|i| i.base_chore_id == id).map(|i| i.date).collect()
    };
    assert_eq!(of(1), vec![start]);
    assert_eq!(of(2), vec![end]);
    assert_eq!(of(3).first(), Some(&start));
    assert_eq!(of(3).last(), Some(&end));
    assert_eq!(of(4), vec![start]);
    assert_eq!(of(5), vec![end]);
}

#[test]
fn test_single_day_window() {
    let day = d(2025, 6, 9); // Monday
    let chores = vec![chore(1, d(2025, 1, 6), weekly(&[1], None))];
    assert_eq!(dates(&chores, day, day), vec![day]);
}

#[test]
fn test_inverted_window_is_empty() {
    let chores = vec![chore(1, d(2025, 6, 1), Recurrence::None)];
    assert!(expand(&chores, d(2025, 6, 30), d(2025, 6, 1), no_colors).is_empty());
}

#[test]
fn test_malformed_rules_are_skipped() {
    let chores = vec![
        chore(1, d(2025, 1, 1), weekly(&[], None)),
        chore(2, d(2025, 1, 1), monthly(10, None)),
        chore(3, d(2025, 1, 1), monthly(0, None)),
        chore(4, d(2025, 1, 1), monthly(32, None)),
    ];
    let instances = expand(&chores, d(2025, 1, 1), d(2025, 3, 31), no_colors);

    assert_eq!(instances.len(), 3);
    assert!(instances.iter().all(|i| i.base_chore_id == 2));
}

#[test]
fn test_colors_resolved_per_assignee() {
    let mut alice = chore(1, d(2025, 6, 5), Recurrence::None);
    alice.assignee_id = Some(10);
    let mut ghost = chore(2, d(2025, 6, 5), Recurrence::None);
    ghost.assignee_id = Some(99);
    let nobody = chore(3, d(2025, 6, 5), Recurrence::None);
    let mut weekly_alice = chore(4, d(2025, 6, 1), weekly(&[1, 3], None));
    weekly_alice.assignee_id = Some(10);

    let calls = Cell::new(0);
    let resolve = |id: u64| {
        calls.set(calls.get() + 1);
        (id == 10).then(|| "#1976d2".to_string())
    };
    let chores = vec![alice, ghost, nobody, weekly_alice];
    let instances = expand(&chores, d(2025, 6, 1), d(2025, 6, 30), resolve);

    assert_eq!(instances[0].color, "#1976d2");
    assert_eq!(instances[1].color, NEUTRAL_COLOR);
    assert_eq!(instances[2].color, NEUTRAL_COLOR);
    assert!(instances[3..].iter().all(|i| i.color == "#1976d2"));
    // Once per assigned chore, not per occurrence.
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_no_deduplication_and_input_order() {
    let chores = vec![
        chore(2, d(2025, 6, 1), monthly(5, None)),
        chore(1, d(2025, 6, 5), Recurrence::None),
        chore(3, d(2025, 6, 5), Recurrence::None),
    ];
    let instances = expand(&chores, d(2025, 6, 1), d(2025, 6, 30), no_colors);

    let ids: Vec<&str> = instances.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["2-2025-06-05", "1", "3"]);
    assert!(instances.iter().all(|i| i.date == d(2025, 6, 5)));
}

#[test]
fn test_expand_is_idempotent() {
    let chores = vec![
        chore(1, d(2025, 1, 6), weekly(&[1, 5], Some(d(2025, 4, 1)))),
        chore(2, d(2025, 1, 31), monthly(31, None)),
        chore(3, d(2025, 2, 14), Recurrence::None),
    ];
    let first = expand(&chores, d(2025, 1, 1), d(2025, 6, 30), no_colors);
    let second = expand(&chores, d(2025, 1, 1), d(2025, 6, 30), no_colors);
    assert_eq!(first, second);
}

#[test]
fn test_sort_chronologically_is_stable() {
    let chores = vec![
        chore(1, d(2025, 6, 1), weekly(&[1], None)),
        chore(2, d(2025, 6, 2), Recurrence::None),
    ];
    let mut instances = expand(&chores, d(2025, 6, 1), d(2025, 6, 10), no_colors);
    sort_chronologically(&mut instances);

    let ids: Vec<&str> = instances.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1-2025-06-02", "2", "1-2025-06-09"]);
}

#[test]
fn test_recurrence_labels() {
    let rule = Recurrence::parse("weekly:mon, thu").unwrap();
    assert_eq!(rule, weekly(&[1, 4], None));
    assert_eq!(rule.label(), "weekly:mon,thu");
    assert_eq!(Recurrence::parse("Weekly:0,6").unwrap(), weekly(&[0, 6], None));
    assert_eq!(Recurrence::parse("monthly:31").unwrap(), monthly(31, None));
    assert_eq!(Recurrence::parse("none").unwrap(), Recurrence::None);
    assert_eq!(Recurrence::parse("").unwrap(), Recurrence::None);

    assert!(Recurrence::parse("weekly:").is_err());
    assert!(Recurrence::parse("weekly:funday").is_err());
    assert!(Recurrence::parse("monthly:0").is_err());
    assert!(Recurrence::parse("monthly:32").is_err());
    assert!(Recurrence::parse("yearly:3-21").is_err());

    let bounded = monthly(15, None).with_end_date(Some(d(2025, 12, 31)));
    assert_eq!(bounded.to_string(), "monthly:15 until 2025-12-31");
    assert_eq!(Recurrence::None.with_end_date(Some(d(2025, 1, 1))), Recurrence::None);
}

#[test]
fn test_recurrence_json_shape() {
    let rule = Recurrence::Weekly {
        days_of_week: BTreeSet::from([1, 3]),
        end_date: Some(d(2025, 12, 31)),
    };
    let json = serde_json::to_value(&rule).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"type": "weekly", "days_of_week": [1, 3], "end_date": "2025-12-31"})
    );

    let parsed: Recurrence = serde_json::from_str(r#"{"type": "monthly", "day_of_month": 31}"#).unwrap();
    assert_eq!(parsed, monthly(31, None));
}
