use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use choreust::dates::days_in_month;
use choreust::models::{Chore, ChoreStatus, Recurrence};
use choreust::recurrence::expand;

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn arb_end_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0i64..4000).prop_map(|o| base() + Duration::days(o)))
}

fn arb_recurrence() -> impl Strategy<Value = Recurrence> {
    prop_oneof![
        Just(Recurrence::None),
        (prop::collection::btree_set(0u8..7, 0..4), arb_end_date()).prop_map(|(days, end_date)| {
            Recurrence::Weekly { days_of_week: days, end_date }
        }),
        (0u32..34, arb_end_date()).prop_map(|(day_of_month, end_date)| Recurrence::Monthly {
            day_of_month,
            end_date,
        }),
    ]
}

fn arb_chores() -> impl Strategy<Value = Vec<Chore>> {
    prop::collection::vec((0i64..4000, arb_recurrence()), 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (offset, recurrence))| Chore {
                id: idx as u64 + 1,
                title: format!("Chore {idx}"),
                date: base() + Duration::days(offset),
                assignee_id: None,
                recurrence,
                notes: None,
                status: ChoreStatus::Pending,
                created_at: String::new(),
                updated_at: String::new(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn instances_stay_inside_window(
        chores in arb_chores(),
        start_offset in 0i64..4000,
        length in 0i64..120,
    ) {
        let start = base() + Duration::days(start_offset);
        let end = start + Duration::days(length);
        for i in expand(&chores, start, end, |_| None) {
            prop_assert!(i.date >= start && i.date <= end, "{} outside {}..={}", i.date, start, end);
        }
    }

    #[test]
    fn expansion_is_deterministic(
        chores in arb_chores(),
        start_offset in 0i64..4000,
        length in 0i64..120,
    ) {
        let start = base() + Duration::days(start_offset);
        let end = start + Duration::days(length);
        prop_assert_eq!(
            expand(&chores, start, end, |_| None),
            expand(&chores, start, end, |_| None)
        );
    }

    #[test]
    fn occurrences_respect_rule(
        chores in arb_chores(),
        start_offset in 0i64..4000,
        length in 0i64..120,
    ) {
        let start = base() + Duration::days(start_offset);
        let end = start + Duration::days(length);
        let instances = expand(&chores, start, end, |_| None);

        for chore in &chores {
            let dates: Vec<NaiveDate> = instances
                .iter()
                .filter(|i| i.base_chore_id == chore.id)
                .map(|i| i.date)
                .collect();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]), "not chronological: {:?}", dates);
            if let Some(end_date) = chore.recurrence.end_date() {
                prop_assert!(dates.iter().all(|d| *d <= end_date));
            }
            match &chore.recurrence {
                Recurrence::None => {
                    prop_assert!(dates.iter().all(|d| *d == chore.date));
                }
                Recurrence::Weekly { days_of_week, .. } => {
                    for d in &dates {
                        prop_assert!(*d >= chore.date);
                        let idx = d.weekday().num_days_from_sunday() as u8;
                        prop_assert!(days_of_week.contains(&idx));
                    }
                }
                Recurrence::Monthly { day_of_month, .. } => {
                    for d in &dates {
                        let expected = (*day_of_month).min(days_in_month(d.year(), d.month()));
                        prop_assert_eq!(d.day(), expected);
                    }
                }
            }
        }
    }
}
