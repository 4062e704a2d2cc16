//! Derived views over synchronized state. Pure, no I/O.

use chrono::NaiveDate;

use crate::models::{CatalogEntry, Todo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartList {
    Upcoming,
    Today,
    Calendar,
    Starred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Todos matching the status filter whose title or description contains
/// `query`, ignoring case. The query is used as typed, surrounding spaces
/// included; an empty query matches everything.
pub fn filter_todos<'a>(todos: &'a [Todo], filter: StatusFilter, query: &str) -> Vec<&'a Todo> {
    let query = query.to_lowercase();
    todos
        .iter()
        .filter(|todo| match filter {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
        })
        .filter(|todo| {
            query.is_empty()
                || todo.title.to_lowercase().contains(&query)
                || todo
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn todo_stats(todos: &[Todo]) -> TodoStats {
    let completed = todos.iter().filter(|t| t.completed).count();
    TodoStats {
        total: todos.len(),
        active: todos.len() - completed,
        completed,
    }
}

/// Counts open todos for a sidebar smart list.
pub fn smart_list_count(todos: &[Todo], smart: SmartList, today: NaiveDate) -> usize {
    todos
        .iter()
        .filter(|t| !t.completed)
        .filter(|t| match smart {
            SmartList::Upcoming => t.due_date.is_some_and(|d| d > today),
            SmartList::Today => t.due_date == Some(today),
            SmartList::Calendar => t.due_date.is_some(),
            SmartList::Starred => t.starred,
        })
        .count()
}

pub fn list_count(todos: &[Todo], list_id: &str) -> usize {
    todos
        .iter()
        .filter(|t| t.list.as_deref() == Some(list_id))
        .count()
}

/// Splits entries into `(defaults, user_defined)`, keeping order.
pub fn partition_defaults(entries: &[CatalogEntry]) -> (Vec<&CatalogEntry>, Vec<&CatalogEntry>) {
    entries.iter().partition(|e| e.is_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn todo(title: &str, completed: bool, due: Option<NaiveDate>, starred: bool) -> Todo {
        Todo {
            id: title.to_lowercase(),
            title: title.to_string(),
            description: None,
            list: None,
            due_date: due,
            tags: Vec::new(),
            completed,
            starred,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2025, 6, d)
    }

    #[test]
    fn test_filter_by_status_and_query() {
        let mut milk = todo("Buy milk", false, None, false);
        milk.description = Some("Semi-skimmed".to_string());
        let todos = vec![milk, todo("Walk dog", true, None, false)];

        assert_eq!(filter_todos(&todos, StatusFilter::All, "").len(), 2);
        assert_eq!(filter_todos(&todos, StatusFilter::Active, "")[0].title, "Buy milk");
        assert_eq!(filter_todos(&todos, StatusFilter::Completed, "")[0].title, "Walk dog");
        assert_eq!(filter_todos(&todos, StatusFilter::All, "SKIM")[0].title, "Buy milk");
        assert!(filter_todos(&todos, StatusFilter::Completed, "milk").is_empty());
    }

    #[test]
    fn test_query_is_not_trimmed() {
        let todos = vec![todo("Buy milk", false, None, false)];
        assert!(filter_todos(&todos, StatusFilter::All, "milk ").is_empty());
        assert_eq!(filter_todos(&todos, StatusFilter::All, "y m").len(), 1);
        assert_eq!(filter_todos(&todos, StatusFilter::All, " ").len(), 1);
    }

    #[test]
    fn test_stats() {
        let todos = vec![
            todo("A", false, None, false),
            todo("B", true, None, false),
            todo("C", true, None, false),
        ];
        assert_eq!(
            todo_stats(&todos),
            TodoStats {
                total: 3,
                active: 1,
                completed: 2
            }
        );
    }

    #[test]
    fn test_smart_lists_skip_completed() {
        let today = day(15).unwrap();
        let todos = vec![
            todo("Past", false, day(1), true),
            todo("Today", false, day(15), false),
            todo("Later", false, day(20), false),
            todo("Done later", true, day(20), true),
            todo("Undated", false, None, true),
        ];

        assert_eq!(smart_list_count(&todos, SmartList::Upcoming, today), 1);
        assert_eq!(smart_list_count(&todos, SmartList::Today, today), 1);
        assert_eq!(smart_list_count(&todos, SmartList::Calendar, today), 3);
        assert_eq!(smart_list_count(&todos, SmartList::Starred, today), 2);
    }

    #[test]
    fn test_list_count_and_partition() {
        let mut a = todo("A", false, None, false);
        a.list = Some("l1".to_string());
        let mut b = todo("B", true, None, false);
        b.list = Some("l1".to_string());
        let todos = vec![a, b, todo("C", false, None, false)];
        assert_eq!(list_count(&todos, "l1"), 2);
        assert_eq!(list_count(&todos, "l2"), 0);

        let entries = vec![
            CatalogEntry {
                id: "d".to_string(),
                name: "Personal".to_string(),
                user_id: None,
                is_default: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            CatalogEntry {
                id: "u".to_string(),
                name: "Books".to_string(),
                user_id: Some("alice".to_string()),
                is_default: false,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        ];
        let (defaults, custom) = partition_defaults(&entries);
        assert_eq!(defaults[0].name, "Personal");
        assert_eq!(custom[0].name, "Books");
    }
}
