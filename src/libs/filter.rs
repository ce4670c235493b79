//! Task filtering and ordering for list views.
//!
//! Pure functions over a slice of tasks: a case-insensitive text filter over
//! name and description, an exact priority filter, and a stable sort keyed by
//! one of six display labels. An unknown label keeps the filtered order.

use super::task::Task;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DATE_ASCENDING: &str = "Date Ascending";
pub const DATE_DESCENDING: &str = "Date Descending";
pub const PRIORITY_ASCENDING: &str = "Priority Ascending";
pub const PRIORITY_DESCENDING: &str = "Priority Descending";
pub const ALPHABETICALLY_ASCENDING: &str = "Alphabetically Ascending";
pub const ALPHABETICALLY_DESCENDING: &str = "Alphabetically Descending";

/// Sort order selectable from the filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateAscending,
    DateDescending,
    PriorityAscending,
    PriorityDescending,
    NameAscending,
    NameDescending,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::DateAscending,
        SortKey::DateDescending,
        SortKey::PriorityAscending,
        SortKey::PriorityDescending,
        SortKey::NameAscending,
        SortKey::NameDescending,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::DateAscending => DATE_ASCENDING,
            SortKey::DateDescending => DATE_DESCENDING,
            SortKey::PriorityAscending => PRIORITY_ASCENDING,
            SortKey::PriorityDescending => PRIORITY_DESCENDING,
            SortKey::NameAscending => ALPHABETICALLY_ASCENDING,
            SortKey::NameDescending => ALPHABETICALLY_DESCENDING,
        }
    }

    fn apply(&self, tasks: &mut [Task]) {
        // slice::sort_by is stable, so ties keep their filtered order.
        match self {
            SortKey::DateAscending => tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortKey::DateDescending => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortKey::PriorityAscending => tasks.sort_by(|a, b| a.priority.cmp(&b.priority)),
            SortKey::PriorityDescending => tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
            SortKey::NameAscending => tasks.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::NameDescending => tasks.sort_by(|a, b| b.name.cmp(&a.name)),
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::DateAscending
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.label() == s)
            .ok_or_else(|| format!("unknown sort option: {s}"))
    }
}

/// The filter selection shown by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub priority: Option<i32>,
    pub sort: String,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            query: String::new(),
            priority: None,
            sort: DATE_ASCENDING.to_string(),
        }
    }
}

impl FilterState {
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        filter_and_sort(tasks, &self.query, self.priority, &self.sort)
    }
}

fn matches_query(task: &Task, needle: &str) -> bool {
    task.name.to_lowercase().contains(needle) || task.description_or_empty().to_lowercase().contains(needle)
}

/// Filters `tasks` by text and priority and orders the result by `sort`.
///
/// An empty `query` matches every task and a `None` priority disables the
/// priority filter. `sort` is one of the six display labels; anything else
/// returns the filtered tasks in their input order.
pub fn filter_and_sort(tasks: &[Task], query: &str, priority: Option<i32>, sort: &str) -> Vec<Task> {
    let needle = query.to_lowercase();

    let mut filtered: Vec<Task> = tasks
        .iter()
        .filter(|task| matches_query(task, &needle))
        .filter(|task| priority.map_or(true, |p| task.priority == p))
        .cloned()
        .collect();

    if let Ok(key) = sort.parse::<SortKey>() {
        key.apply(&mut filtered);
    }

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, name: &str, description: Option<&str>, priority: i32, created_at: i64) -> Task {
        Task {
            id: Some(id),
            name: name.to_string(),
            description: description.map(str::to_string),
            priority,
            created_at,
        }
    }

    fn sample() -> Vec<Task> {
        vec![task(1, "Buy milk", None, 3, 100), task(2, "Call mom", Some("Sunday lunch"), 7, 50)]
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn priority_descending_orders_highest_first() {
        let result = filter_and_sort(&sample(), "", None, PRIORITY_DESCENDING);
        assert_eq!(names(&result), vec!["Call mom", "Buy milk"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let result = filter_and_sort(&sample(), "buy", None, PRIORITY_DESCENDING);
        assert_eq!(names(&result), vec!["Buy milk"]);
    }

    #[test]
    fn query_matches_description() {
        let result = filter_and_sort(&sample(), "SUNDAY", None, DATE_ASCENDING);
        assert_eq!(names(&result), vec!["Call mom"]);
    }

    #[test]
    fn priority_filter_is_exact() {
        let result = filter_and_sort(&sample(), "", Some(3), PRIORITY_DESCENDING);
        assert_eq!(names(&result), vec!["Buy milk"]);

        let result = filter_and_sort(&sample(), "", Some(4), PRIORITY_DESCENDING);
        assert!(result.is_empty());
    }

    #[test]
    fn date_sorts() {
        assert_eq!(names(&filter_and_sort(&sample(), "", None, DATE_ASCENDING)), vec!["Call mom", "Buy milk"]);
        assert_eq!(names(&filter_and_sort(&sample(), "", None, DATE_DESCENDING)), vec!["Buy milk", "Call mom"]);
    }

    #[test]
    fn alphabetical_sorts() {
        let tasks = vec![task(1, "b", None, 1, 1), task(2, "c", None, 1, 2), task(3, "a", None, 1, 3)];
        assert_eq!(names(&filter_and_sort(&tasks, "", None, ALPHABETICALLY_ASCENDING)), vec!["a", "b", "c"]);
        assert_eq!(names(&filter_and_sort(&tasks, "", None, ALPHABETICALLY_DESCENDING)), vec!["c", "b", "a"]);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let tasks = vec![task(1, "first", None, 5, 3), task(2, "second", None, 5, 1), task(3, "third", None, 5, 2)];
        let result = filter_and_sort(&tasks, "", None, PRIORITY_ASCENDING);
        assert_eq!(names(&result), vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_sort_keeps_input_order() {
        let tasks = vec![task(1, "z", None, 1, 9), task(2, "a", None, 9, 1)];
        let result = filter_and_sort(&tasks, "", None, "Shuffle");
        assert_eq!(names(&result), vec!["z", "a"]);
    }

    #[test]
    fn sort_key_labels_round_trip() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
        assert!("date ascending".parse::<SortKey>().is_err());
    }
}
