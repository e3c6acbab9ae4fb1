use std::io::{self, Write};
use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use tracing::info;
use crate::colors::{contrast_color, default_color, normalize, parse_hex};
use crate::config::Config;
use crate::dates::{month_bounds, parse_date, shift_month};
use crate::error::{ChoreError, Result};
use crate::models::{default_role, Chore, ChoreInstance, ChoreStatus, Member, Recurrence};
use crate::recurrence::{expand, sort_chronologically};
use crate::storage::{delete_database, load_chores, load_members, save_chores, save_members};

/// Parses an optional `--until` value; `none` or an empty string clears it.
fn parse_until(until: Option<&str>) -> Result<Option<NaiveDate>> {
    match until.map(str::trim) {
        None | Some("") | Some("none") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

fn ensure_member_exists(members: &[Member], id: u64) -> Result<()> {
    if members.iter().any(|m| m.id == id) {
        Ok(())
    } else {
        Err(ChoreError::MemberNotFound(id))
    }
}

fn member_name(members: &[Member], id: Option<u64>) -> String {
    match id {
        None => "-".to_string(),
        Some(id) => members
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| format!("#{id} (unknown)")),
    }
}

fn hex_to_color(hex: &str) -> Color {
    match parse_hex(hex) {
        Some((r, g, b)) => Color::Rgb { r, g, b },
        None => Color::Reset,
    }
}

/// Adds a new chore and returns its id.
///
/// `recur` is a recurrence label (`none`, `weekly:mon,wed`, `monthly:15`);
/// `until` bounds a recurring chore.
pub fn cmd_add(
    title: String,
    date: String,
    assignee: Option<u64>,
    recur: Option<String>,
    until: Option<String>,
    notes: Option<String>,
    silent: bool,
) -> Result<u64> {
    let date = parse_date(&date)?;
    let recurrence = match recur {
        Some(label) => Recurrence::parse(&label)?,
        None => Recurrence::None,
    }
    .with_end_date(parse_until(until.as_deref())?);

    if let Some(id) = assignee {
        ensure_member_exists(&load_members()?, id)?;
    }

    let mut chores = load_chores()?;
    let next_id = chores.iter().map(|c| c.id).max().unwrap_or(0) + 1;
    let now = Local::now().to_rfc3339();
    chores.push(Chore {
        id: next_id,
        title,
        date,
        assignee_id: assignee,
        recurrence,
        notes,
        status: ChoreStatus::Pending,
        created_at: now.clone(),
        updated_at: now,
    });
    save_chores(&chores)?;

    info!(id = next_id, "chore added");
    if !silent { println!("Chore added (id = {})", next_id); }
    Ok(next_id)
}

/// Field changes for [`cmd_edit`]. `None` leaves a field untouched.
#[derive(Debug, Default, Clone)]
pub struct ChoreUpdate {
    pub title: Option<String>,
    pub date: Option<String>,
    pub assignee: Option<u64>,
    /// Clears the assignee. Takes precedence over `assignee`.
    pub unassign: bool,
    pub recur: Option<String>,
    /// New end date for the rule; `none` clears it.
    pub until: Option<String>,
    pub notes: Option<String>,
}

/// Edits an existing chore's details.
pub fn cmd_edit(id: u64, update: ChoreUpdate, silent: bool) -> Result<()> {
    let mut chores = load_chores()?;
    let chore = chores
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(ChoreError::ChoreNotFound(id))?;

    if let Some(t) = update.title { chore.title = t; }
    if let Some(d) = update.date { chore.date = parse_date(&d)?; }
    if let Some(n) = update.notes { chore.notes = Some(n); }
    if update.unassign {
        chore.assignee_id = None;
    } else if let Some(a) = update.assignee {
        ensure_member_exists(&load_members()?, a)?;
        chore.assignee_id = Some(a);
    }

    let end_date = match &update.until {
        Some(_) => parse_until(update.until.as_deref())?,
        None => chore.recurrence.end_date(),
    };
    if let Some(label) = update.recur {
        chore.recurrence = Recurrence::parse(&label)?.with_end_date(end_date);
    } else if update.until.is_some() {
        chore.recurrence = chore.recurrence.clone().with_end_date(end_date);
    }

    chore.updated_at = Local::now().to_rfc3339();
    save_chores(&chores)?;
    info!(id, "chore updated");
    if !silent { println!("Chore {} updated.", id); }
    Ok(())
}

/// Sets the status of a chore.
pub fn cmd_status(id: u64, status: &str, silent: bool) -> Result<()> {
    let status: ChoreStatus = status.parse()?;
    let mut chores = load_chores()?;
    let chore = chores
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(ChoreError::ChoreNotFound(id))?;
    chore.status = status;
    chore.updated_at = Local::now().to_rfc3339();
    save_chores(&chores)?;
    info!(id, %status, "chore status changed");
    if !silent { println!("Chore {} is now {}.", id, status); }
    Ok(())
}

/// Removes a chore by ID.
pub fn cmd_remove(id: u64, silent: bool) -> Result<()> {
    let mut chores = load_chores()?;
    let len_before = chores.len();
    chores.retain(|c| c.id != id);
    if chores.len() == len_before {
        return Err(ChoreError::ChoreNotFound(id));
    }
    save_chores(&chores)?;
    info!(id, "chore removed");
    if !silent { println!("Chore {} removed.", id); }
    Ok(())
}

/// Lists chore definitions, optionally filtered by assignee and status.
pub fn cmd_list(assignee: Option<u64>, status: Option<String>) -> Result<()> {
    let status = status.map(|s| s.parse::<ChoreStatus>()).transpose()?;
    let members = load_members()?;
    let mut chores = load_chores()?;
    chores.retain(|c| assignee.map_or(true, |a| c.assignee_id == Some(a)));
    chores.retain(|c| status.map_or(true, |s| c.status == s));
    if chores.is_empty() {
        println!("No chores found.");
        return Ok(());
    }
    chores.sort_by_key(|c| (c.date, c.id));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Repeats").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for c in chores {
        let status_color = match c.status {
            ChoreStatus::Pending => Color::Yellow,
            ChoreStatus::InProgress => Color::Cyan,
            ChoreStatus::Completed => Color::Green,
            ChoreStatus::Cancelled => Color::Grey,
        };
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.title),
            Cell::new(c.date),
            Cell::new(member_name(&members, c.assignee_id)),
            Cell::new(c.recurrence.to_string()),
            Cell::new(c.status).fg(status_color),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Default `calendar` window: whole months around the month containing `today`.
pub fn default_window(today: NaiveDate, config: &Config) -> (NaiveDate, NaiveDate) {
    let start = shift_month(today, -(config.lookbehind_months as i32));
    let (_, end) = month_bounds(shift_month(today, config.lookahead_months as i32));
    (start, end)
}

/// Expands stored chores over a window, resolving colors from stored members.
///
/// Optionally keeps only one assignee's occurrences; result is chronological.
pub fn load_instances(
    start: NaiveDate,
    end: NaiveDate,
    assignee: Option<u64>,
) -> Result<Vec<ChoreInstance>> {
    let chores = load_chores()?;
    let members = load_members()?;
    let mut instances = expand(&chores, start, end, |id| {
        members.iter().find(|m| m.id == id).map(|m| m.color.clone())
    });
    if let Some(a) = assignee {
        instances.retain(|i| i.assignee_id == Some(a));
    }
    sort_chronologically(&mut instances);
    Ok(instances)
}

/// Prints every chore occurrence between `from` and `to` (inclusive).
pub fn cmd_calendar(
    from: Option<String>,
    to: Option<String>,
    assignee: Option<u64>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let (default_start, default_end) = default_window(Local::now().date_naive(), config);
    let start = from.as_deref().map(parse_date).transpose()?.unwrap_or(default_start);
    let end = to.as_deref().map(parse_date).transpose()?.unwrap_or(default_end);

    let instances = load_instances(start, end, assignee)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&instances)?);
        return Ok(());
    }
    if instances.is_empty() {
        println!("No chores between {} and {}.", start, end);
        return Ok(());
    }

    let members = load_members()?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Day").add_attribute(Attribute::Bold),
            Cell::new("Chore").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Instance").add_attribute(Attribute::Bold),
        ]);

    for i in &instances {
        let title = if i.is_recurring { format!("{} ↻", i.title) } else { i.title.clone() };
        table.add_row(vec![
            Cell::new(i.date),
            Cell::new(i.date.format("%a")),
            Cell::new(title),
            Cell::new(member_name(&members, i.assignee_id))
                .bg(hex_to_color(&i.color))
                .fg(hex_to_color(contrast_color(&i.color))),
            Cell::new(&i.id),
        ]);
    }

    println!("Chores from {} to {}:", start, end);
    println!("{table}");
    Ok(())
}

/// Counts of chores by status and assignment.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ChoreStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub recurring: usize,
    pub assigned: usize,
    pub unassigned: usize,
}

pub fn chore_stats(chores: &[Chore]) -> ChoreStats {
    let count = |status: ChoreStatus| chores.iter().filter(|c| c.status == status).count();
    let assigned = chores.iter().filter(|c| c.assignee_id.is_some()).count();
    ChoreStats {
        total: chores.len(),
        pending: count(ChoreStatus::Pending),
        in_progress: count(ChoreStatus::InProgress),
        completed: count(ChoreStatus::Completed),
        cancelled: count(ChoreStatus::Cancelled),
        recurring: chores.iter().filter(|c| c.recurrence.is_recurring()).count(),
        assigned,
        unassigned: chores.len() - assigned,
    }
}

/// Prints a summary of all chores.
pub fn cmd_stats() -> Result<ChoreStats> {
    let stats = chore_stats(&load_chores()?);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Count"]);
    for (label, value) in [
        ("Total", stats.total),
        ("Pending", stats.pending),
        ("In progress", stats.in_progress),
        ("Completed", stats.completed),
        ("Cancelled", stats.cancelled),
        ("Recurring", stats.recurring),
        ("Assigned", stats.assigned),
        ("Unassigned", stats.unassigned),
    ] {
        table.add_row(vec![label.to_string(), value.to_string()]);
    }
    println!("{table}");
    Ok(stats)
}

/// Per-member chore load.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Workload {
    pub member_id: u64,
    pub member_name: String,
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Percentage of assigned chores that are completed.
    pub completion_rate: f64,
}

pub fn member_workload(members: &[Member], chores: &[Chore]) -> Vec<Workload> {
    members
        .iter()
        .map(|m| {
            let assigned: Vec<&Chore> = chores.iter().filter(|c| c.assignee_id == Some(m.id)).collect();
            let pending = assigned.iter().filter(|c| c.status == ChoreStatus::Pending).count();
            let completed = assigned.iter().filter(|c| c.status == ChoreStatus::Completed).count();
            let completion_rate = if assigned.is_empty() {
                0.0
            } else {
                completed as f64 / assigned.len() as f64 * 100.0
            };
            Workload {
                member_id: m.id,
                member_name: m.name.clone(),
                total: assigned.len(),
                pending,
                completed,
                completion_rate,
            }
        })
        .collect()
}

/// Prints chore counts for every team member.
pub fn cmd_workload() -> Result<()> {
    let workload = member_workload(&load_members()?, &load_chores()?);
    if workload.is_empty() {
        println!("No team members found.");
        return Ok(());
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Member", "Chores", "Pending", "Completed", "Done %"]);
    for w in workload {
        table.add_row(vec![
            w.member_id.to_string(),
            w.member_name,
            w.total.to_string(),
            w.pending.to_string(),
            w.completed.to_string(),
            format!("{:.0}", w.completion_rate),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Adds a team member and returns its id.
///
/// Without an explicit color the member gets the next palette entry.
pub fn cmd_member_add(
    name: String,
    email: Option<String>,
    role: Option<String>,
    color: Option<String>,
    silent: bool,
) -> Result<u64> {
    let mut members = load_members()?;
    if let Some(e) = &email {
        if members.iter().any(|m| m.email.as_deref() == Some(e.as_str())) {
            return Err(ChoreError::DuplicateEmail(e.clone()));
        }
    }
    let color = match color {
        Some(c) => normalize(&c)?,
        None => default_color(members.len()).to_string(),
    };
    let next_id = members.iter().map(|m| m.id).max().unwrap_or(0) + 1;
    let now = Local::now().to_rfc3339();
    members.push(Member {
        id: next_id,
        name: name.clone(),
        email,
        role: role.unwrap_or_else(default_role),
        color,
        created_at: now.clone(),
        updated_at: now,
    });
    save_members(&members)?;
    info!(id = next_id, "member added");
    if !silent { println!("Member '{}' added (id = {})", name, next_id); }
    Ok(next_id)
}

/// Lists all team members.
pub fn cmd_member_list() -> Result<()> {
    let members = load_members()?;
    if members.is_empty() {
        println!("No team members found.");
        return Ok(());
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Name", "Email", "Role", "Color"]);
    for m in members {
        table.add_row(vec![
            Cell::new(m.id),
            Cell::new(&m.name),
            Cell::new(m.email.clone().unwrap_or_else(|| "-".into())),
            Cell::new(&m.role),
            Cell::new(&m.color)
                .bg(hex_to_color(&m.color))
                .fg(hex_to_color(contrast_color(&m.color))),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Field changes for [`cmd_member_edit`].
#[derive(Debug, Default, Clone)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub color: Option<String>,
}

/// Edits a team member.
pub fn cmd_member_edit(id: u64, update: MemberUpdate, silent: bool) -> Result<()> {
    let mut members = load_members()?;
    if let Some(e) = &update.email {
        if members.iter().any(|m| m.id != id && m.email.as_deref() == Some(e.as_str())) {
            return Err(ChoreError::DuplicateEmail(e.clone()));
        }
    }
    let member = members
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or(ChoreError::MemberNotFound(id))?;
    if let Some(n) = update.name { member.name = n; }
    if let Some(e) = update.email { member.email = Some(e); }
    if let Some(r) = update.role { member.role = r; }
    if let Some(c) = update.color { member.color = normalize(&c)?; }
    member.updated_at = Local::now().to_rfc3339();
    save_members(&members)?;
    info!(id, "member updated");
    if !silent { println!("Member {} updated.", id); }
    Ok(())
}

/// Removes a team member and unassigns their chores.
///
/// Returns how many chores were unassigned.
pub fn cmd_member_remove(id: u64, silent: bool) -> Result<usize> {
    let mut members = load_members()?;
    let len_before = members.len();
    members.retain(|m| m.id != id);
    if members.len() == len_before {
        return Err(ChoreError::MemberNotFound(id));
    }
    save_members(&members)?;

    let mut chores = load_chores()?;
    let now = Local::now().to_rfc3339();
    let mut unassigned = 0;
    for c in chores.iter_mut().filter(|c| c.assignee_id == Some(id)) {
        c.assignee_id = None;
        c.updated_at = now.clone();
        unassigned += 1;
    }
    if unassigned > 0 {
        save_chores(&chores)?;
    }

    info!(id, unassigned, "member removed");
    if !silent { println!("Member {} removed ({} chores unassigned).", id, unassigned); }
    Ok(unassigned)
}

/// Resets the database by deleting all chores and team members.
pub fn cmd_reset(force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all chores and team members? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    delete_database()?;
    info!("database reset");
    println!("Database reset successfully.");
    Ok(())
}
