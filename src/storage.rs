use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use serde::Serialize;
use tracing::warn;
use crate::config::{chores_path, members_path};
use crate::error::Result;
use crate::models::{Chore, Member};

/// Reads a whole file, or `None` if it does not exist.
fn read_file(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(Some(s))
}

/// Overwrites `path` with pretty-printed JSON.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Loads all chores from the storage file.
///
/// Returns an empty vector if the file does not exist. Entries that do not
/// parse as a chore are skipped with a warning so one bad record cannot hide
/// the rest; they are dropped on the next save.
pub fn load_chores() -> Result<Vec<Chore>> {
    let path = chores_path();
    let Some(raw) = read_file(&path)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    let chores = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value::<Chore>(entry) {
            Ok(chore) => Some(chore),
            Err(e) => {
                warn!(index = idx, error = %e, path = %path.display(), "skipping malformed chore");
                None
            }
        })
        .collect();
    Ok(chores)
}

/// Loads a single chore by its ID.
pub fn load_chore(id: u64) -> Result<Option<Chore>> {
    Ok(load_chores()?.into_iter().find(|c| c.id == id))
}

/// Saves the given list of chores, overwriting the existing file.
pub fn save_chores(chores: &[Chore]) -> Result<()> {
    write_json(&chores_path(), chores)
}

/// Loads all team members from the storage file.
pub fn load_members() -> Result<Vec<Member>> {
    match read_file(&members_path())? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(Vec::new()),
    }
}

/// Loads a single team member by ID.
pub fn load_member(id: u64) -> Result<Option<Member>> {
    Ok(load_members()?.into_iter().find(|m| m.id == id))
}

/// Saves the given list of team members.
pub fn save_members(members: &[Member]) -> Result<()> {
    write_json(&members_path(), members)
}

/// Deletes the chores and members files.
pub fn delete_database() -> Result<()> {
    for path in [chores_path(), members_path()] {
        if path.exists() {
            fs::remove_file(path)?;
        }
    }
    Ok(())
}
