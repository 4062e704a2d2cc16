use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::utils::form::{blank_as_none, present, present_blank_as_none};
use crate::utils::time::millis_to_datetime;

#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub list_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub starred: bool,
    pub created_at: i64,
    pub updated_at: i64,
    /// Tag ids in the order they were attached. Loaded from `todo_tag`.
    #[sqlx(skip)]
    pub tags: Vec<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub list: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub starred: Option<bool>,
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears it.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdateForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_blank_as_none")]
    pub list: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_blank_as_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub starred: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub list: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub completed: bool,
    pub starred: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        TodoResponse {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            list: todo.list_id,
            due_date: todo.due_date,
            tags: todo.tags,
            completed: todo.completed,
            starred: todo.starred,
            created_at: millis_to_datetime(todo.created_at),
            updated_at: millis_to_datetime(todo.updated_at),
        }
    }
}

/// Tags are a set: keep the first occurrence of each id.
pub fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_requires_title() {
        let form: TodoForm = serde_json::from_str(r#"{"description": "no title"}"#).unwrap();
        let err = form.validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));

        let form: TodoForm = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_form_accepts_browser_blanks() {
        let form: TodoForm = serde_json::from_str(
            r#"{"title": "Buy milk", "list": "", "dueDate": "", "tags": ["a", "b"]}"#,
        )
        .unwrap();
        assert!(form.validate().is_ok());
        assert!(form.list.is_none());
        assert!(form.due_date.is_none());
        assert_eq!(form.tags.unwrap().len(), 2);
    }

    #[test]
    fn test_update_form_distinguishes_null_from_absent() {
        let form: TodoUpdateForm =
            serde_json::from_str(r#"{"completed": true, "dueDate": null}"#).unwrap();
        assert!(form.validate().is_ok());
        assert_eq!(form.completed, Some(true));
        assert_eq!(form.due_date, Some(None));
        assert!(form.title.is_none());
        assert!(form.description.is_none());
        assert!(form.list.is_none());
    }

    #[test]
    fn test_update_form_rejects_blank_title() {
        let form: TodoUpdateForm = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_response_uses_wire_names() {
        let todo = Todo {
            id: "t1".to_string(),
            title: "Buy milk".to_string(),
            description: None,
            list_id: Some("l1".to_string()),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 31),
            completed: false,
            starred: true,
            created_at: 0,
            updated_at: 0,
            tags: vec!["g1".to_string()],
        };
        let json = serde_json::to_value(TodoResponse::from(todo)).unwrap();
        assert_eq!(json["_id"], "t1");
        assert_eq!(json["list"], "l1");
        assert_eq!(json["dueDate"], "2025-01-31");
        assert_eq!(json["tags"][0], "g1");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_dedup_tags_keeps_first_occurrence() {
        let tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(dedup_tags(&tags), vec!["b".to_string(), "a".to_string()]);
    }
}
