use std::collections::BTreeSet;

use super::model::{AdmissionsTable, Level, ProgramRecord};

// ---------------------------------------------------------------------------
// SelectionPath – the user's in-progress filter state
// ---------------------------------------------------------------------------

/// A filled prefix of (university, track, admission type, admission name,
/// program unit). Setting a level clears every level below it, so a stale
/// downstream value can never survive an upstream change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionPath {
    levels: [Option<String>; 5],
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from leading values, e.g. `["A대학교", "인문"]`.
    /// Extra values beyond five are ignored.
    pub fn from_prefix<S: AsRef<str>>(values: &[S]) -> Self {
        let mut path = Self::new();
        for (level, value) in Level::ALL.iter().zip(values) {
            path.set(*level, value.as_ref());
        }
        path
    }

    pub fn get(&self, level: Level) -> Option<&str> {
        self.levels[level.index()].as_deref()
    }

    /// Choose `value` at `level` and reset everything downstream.
    /// Choosing below an unfilled level is ignored.
    pub fn set(&mut self, level: Level, value: impl Into<String>) {
        if self.levels[..level.index()].iter().any(Option::is_none) {
            return;
        }
        self.levels[level.index()] = Some(value.into());
        self.clear_below(level);
    }

    /// Unchoose `level` and everything below it.
    pub fn clear_from(&mut self, level: Level) {
        for slot in &mut self.levels[level.index()..] {
            *slot = None;
        }
    }

    fn clear_below(&mut self, level: Level) {
        for slot in &mut self.levels[level.index() + 1..] {
            *slot = None;
        }
    }

    /// First level without a value, `None` once the path is complete.
    pub fn next_level(&self) -> Option<Level> {
        Level::ALL.into_iter().find(|&l| self.get(l).is_none())
    }

    pub fn is_complete(&self) -> bool {
        self.next_level().is_none()
    }

    /// Whether `record` agrees with every filled level above `level`.
    fn matches_above(&self, record: &ProgramRecord, level: Level) -> bool {
        Level::ALL[..level.index()]
            .iter()
            .all(|&l| match self.get(l) {
                Some(want) => record.field(l) == Some(want),
                None => true,
            })
    }
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

/// Distinct values of `level` among records matching the path above `level`,
/// sorted ascending. Values chosen at `level` or below are ignored.
///
/// An unfilled upstream level yields no candidates; so does an upstream value
/// that matches nothing.
pub fn choices_for(table: &AdmissionsTable, path: &SelectionPath, level: Level) -> Vec<String> {
    if Level::ALL[..level.index()]
        .iter()
        .any(|&l| path.get(l).is_none())
    {
        return Vec::new();
    }

    let set: BTreeSet<&str> = table
        .records
        .iter()
        .filter(|r| path.matches_above(r, level))
        .filter_map(|r| r.field(level))
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Candidates for the first unfilled level of `path`; empty when complete.
pub fn next_choices(table: &AdmissionsTable, path: &SelectionPath) -> Vec<String> {
    match path.next_level() {
        Some(level) => choices_for(table, path, level),
        None => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of looking up a selection path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Some level is still unchosen.
    Incomplete,
    /// All five levels chosen but no record carries that identity.
    Unmatched,
    Resolved(&'a ProgramRecord),
}

/// The first record (in load order) matching a complete path.
///
/// The five-field identity is not guaranteed unique by the source; duplicates
/// resolve to the earliest row.
pub fn resolve<'a>(table: &'a AdmissionsTable, path: &SelectionPath) -> Option<&'a ProgramRecord> {
    if !path.is_complete() {
        return None;
    }
    table
        .records
        .iter()
        .find(|r| Level::ALL.iter().all(|&l| r.field(l) == path.get(l)))
}

pub fn lookup<'a>(table: &'a AdmissionsTable, path: &SelectionPath) -> Resolution<'a> {
    if !path.is_complete() {
        return Resolution::Incomplete;
    }
    match resolve(table, path) {
        Some(record) => Resolution::Resolved(record),
        None => Resolution::Unmatched,
    }
}

/// Bring `path` in line with the table: walking down the levels, any value
/// that is unchosen or no longer a candidate is replaced by the smallest
/// candidate (clearing everything below it). A level without candidates stays
/// unchosen, and so does everything under it.
///
/// Returns `true` if the path changed.
pub fn settle(table: &AdmissionsTable, path: &mut SelectionPath) -> bool {
    let before = path.clone();
    for level in Level::ALL {
        let choices = choices_for(table, path, level);
        let current_ok = path
            .get(level)
            .is_some_and(|v| choices.iter().any(|c| c == v));
        if current_ok {
            continue;
        }
        match choices.into_iter().next() {
            Some(first) => path.set(level, first),
            None => {
                path.clear_from(level);
                break;
            }
        }
    }
    *path != before
}
