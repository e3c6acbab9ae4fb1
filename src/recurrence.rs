//! Expansion of chore definitions into dated occurrences.
//!
//! [`expand`] is pure: it reads a slice of chores and a viewing window and
//! returns every occurrence inside the closed interval
//! `[window_start, window_end]`. A chore whose rule cannot be expanded
//! (a weekly rule without days, a monthly rule with a day outside 1..=31)
//! contributes nothing and never affects the other chores.

use std::collections::BTreeSet;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, trace};
use crate::colors::NEUTRAL_COLOR;
use crate::dates::{clamped_day, next_month, to_iso, weekday_index};
use crate::models::{Chore, ChoreInstance, Recurrence};

/// Expands `chores` into the occurrences that fall inside the window.
///
/// `resolve_color` maps an assignee id to that member's color; chores with
/// no assignee, or whose assignee it cannot resolve, get [`NEUTRAL_COLOR`].
/// It is called at most once per chore.
///
/// Instances come out grouped by chore in input order, chronological within
/// each chore. Same-day duplicates from overlapping chores are kept.
/// An inverted window (`window_start > window_end`) yields nothing.
pub fn expand<F>(
    chores: &[Chore],
    window_start: NaiveDate,
    window_end: NaiveDate,
    resolve_color: F,
) -> Vec<ChoreInstance>
where
    F: Fn(u64) -> Option<String>,
{
    let mut instances = Vec::new();
    if window_start > window_end {
        debug!(%window_start, %window_end, "inverted window, nothing to expand");
        return instances;
    }

    for chore in chores {
        let color = chore
            .assignee_id
            .and_then(&resolve_color)
            .unwrap_or_else(|| NEUTRAL_COLOR.to_string());
        let before = instances.len();

        match &chore.recurrence {
            Recurrence::None => {
                if chore.date >= window_start && chore.date <= window_end {
                    instances.push(instance(chore, chore.date, &color));
                }
            }
            Recurrence::Weekly { days_of_week, end_date } => weekly(
                chore,
                days_of_week,
                *end_date,
                window_start,
                window_end,
                &color,
                &mut instances,
            ),
            Recurrence::Monthly { day_of_month, end_date } => monthly(
                chore,
                *day_of_month,
                *end_date,
                window_start,
                window_end,
                &color,
                &mut instances,
            ),
        }

        trace!(chore = chore.id, count = instances.len() - before, "expanded chore");
    }

    debug!(
        chores = chores.len(),
        instances = instances.len(),
        %window_start,
        %window_end,
        "expanded chores"
    );
    instances
}

/// Stable chronological sort, keeping chore order for same-day occurrences.
pub fn sort_chronologically(instances: &mut [ChoreInstance]) {
    instances.sort_by_key(|i| i.date);
}

/// Day-by-day walk from `max(anchor, window_start)` to the earlier of the
/// window end and the rule's end date.
fn weekly(
    chore: &Chore,
    days_of_week: &BTreeSet<u8>,
    end_date: Option<NaiveDate>,
    window_start: NaiveDate,
    window_end: NaiveDate,
    color: &str,
    out: &mut Vec<ChoreInstance>,
) {
    if days_of_week.is_empty() {
        debug!(chore = chore.id, "weekly rule without days, skipping");
        return;
    }
    let last = end_date.map_or(window_end, |end| end.min(window_end));
    let first = chore.date.max(window_start);

    out.extend(
        first
            .iter_days()
            .take_while(|day| *day <= last)
            .filter(|day| days_of_week.contains(&weekday_index(*day)))
            .map(|day| instance(chore, day, color)),
    );
}

/// Month-by-month walk over the clamped `day_of_month`.
///
/// The first candidate is the occurrence in the month of `window_start`; it
/// is skipped if it falls before the window. Each month is clamped on its
/// own, so day 31 gives Jan 31, Feb 28, Mar 31.
fn monthly(
    chore: &Chore,
    day_of_month: u32,
    end_date: Option<NaiveDate>,
    window_start: NaiveDate,
    window_end: NaiveDate,
    color: &str,
    out: &mut Vec<ChoreInstance>,
) {
    if !(1..=31).contains(&day_of_month) {
        debug!(chore = chore.id, day_of_month, "monthly rule with invalid day, skipping");
        return;
    }
    let last = end_date.map_or(window_end, |end| end.min(window_end));

    let (mut year, mut month) = (window_start.year(), window_start.month());
    while let Some(occurrence) = clamped_day(year, month, day_of_month) {
        if occurrence > last {
            break;
        }
        if occurrence >= window_start {
            out.push(instance(chore, occurrence, color));
        }
        (year, month) = next_month(year, month);
    }
}

fn instance(chore: &Chore, date: NaiveDate, color: &str) -> ChoreInstance {
    let recurring = chore.recurrence.is_recurring();
    ChoreInstance {
        id: if recurring {
            format!("{}-{}", chore.id, to_iso(date))
        } else {
            chore.id.to_string()
        },
        title: chore.title.clone(),
        date,
        assignee_id: chore.assignee_id,
        color: color.to_string(),
        is_recurring: recurring,
        base_chore_id: chore.id,
    }
}
