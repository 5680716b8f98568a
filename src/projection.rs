// Filtered, sorted projection of the task list for display

use crate::task::Task;
use clap::ValueEnum;
use std::cmp::Reverse;

/// Display order for the projected list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    /// Stored (insertion) order
    #[default]
    Insertion,
    /// Newest creation first
    Newest,
    /// Oldest creation first
    Oldest,
    /// Ascending due date, tasks without a deadline last
    Deadline,
    /// Completed tasks first, newest creation breaking ties
    Completed,
}

/// Derive the display sequence from the full list, a free-text query, and
/// a sort mode. Pure: the underlying list is never reordered.
///
/// A task passes the filter when the trimmed query is empty or is a
/// case-insensitive substring of its text, category, or priority.
pub fn project<'a>(tasks: &'a [Task], query: &str, sort: SortMode) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();

    let mut list: Vec<&Task> = tasks
        .iter()
        .filter(|t| query.is_empty() || matches(t, &query))
        .collect();

    match sort {
        SortMode::Insertion => {}
        SortMode::Newest => list.sort_by_key(|t| Reverse(t.created)),
        SortMode::Oldest => list.sort_by_key(|t| t.created),
        SortMode::Deadline => list.sort_by_key(|t| (t.due.is_none(), t.due)),
        SortMode::Completed => list.sort_by_key(|t| (!t.completed, Reverse(t.created))),
    }

    list
}

fn matches(task: &Task, query: &str) -> bool {
    task.text.to_lowercase().contains(query)
        || task.category.name().contains(query)
        || task.priority.name().contains(query)
}

/// Completion counters over the full list, for the progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub percent: u8,
}

impl Stats {
    /// Encouragement tier for the current completion percentage.
    pub fn message(&self) -> &'static str {
        match self.percent {
            0 => "Start adding tasks",
            1..50 => "Keep going, small steps build momentum",
            50..100 => "Great progress, you're doing well",
            _ => "All tasks completed!",
        }
    }
}

pub fn stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let percent = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    } else {
        0
    };
    Stats {
        total,
        completed,
        pending: total - completed,
        percent,
    }
}
