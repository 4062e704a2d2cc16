use std::collections::HashMap;

use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::todo::{dedup_tags, Todo, TodoForm, TodoUpdateForm};
use crate::models::CatalogKind;
use crate::utils::time::current_timestamp_millis;

const TODO_COLUMNS: &str =
    "id, title, description, list_id, due_date, completed, starred, created_at, updated_at";

pub struct TodoService<'a> {
    db: &'a Database,
}

impl<'a> TodoService<'a> {
    pub fn new(db: &'a Database) -> Self {
        TodoService { db }
    }

    /// All todos, newest first. Ties on the millisecond fall back to insertion order.
    pub async fn get_todos(&self) -> AppResult<Vec<Todo>> {
        let sql = format!(
            "SELECT {} FROM todo ORDER BY created_at DESC, rowid DESC",
            TODO_COLUMNS
        );
        let mut todos = sqlx::query_as::<_, Todo>(&sql)
            .fetch_all(&self.db.pool)
            .await?;

        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT todo_id, tag_id FROM todo_tag ORDER BY todo_id, position")
                .fetch_all(&self.db.pool)
                .await?;

        let mut tags_by_todo: HashMap<String, Vec<String>> = HashMap::new();
        for (todo_id, tag_id) in rows {
            tags_by_todo.entry(todo_id).or_default().push(tag_id);
        }
        for todo in &mut todos {
            todo.tags = tags_by_todo.remove(&todo.id).unwrap_or_default();
        }

        Ok(todos)
    }

    pub async fn get_todo_by_id(&self, id: &str) -> AppResult<Option<Todo>> {
        let mut conn = self.db.pool.acquire().await?;
        fetch_todo(&mut conn, id).await
    }

    pub async fn insert_new_todo(&self, form_data: &TodoForm) -> AppResult<Todo> {
        let now = current_timestamp_millis();
        let id = Uuid::new_v4().to_string();
        let tags = dedup_tags(form_data.tags.as_deref().unwrap_or_default());

        let mut tx = self.db.pool.begin().await?;

        if let Some(list_id) = form_data.list.as_deref() {
            ensure_exists(&mut tx, CatalogKind::List, list_id).await?;
        }
        for tag_id in &tags {
            ensure_exists(&mut tx, CatalogKind::Tag, tag_id).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO todo (id, title, description, list_id, due_date, completed, starred, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&form_data.title)
        .bind(&form_data.description)
        .bind(&form_data.list)
        .bind(form_data.due_date)
        .bind(form_data.starred.unwrap_or(false))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_constraint(e, "Todo already exists", "List not found"))?;

        replace_tags(&mut tx, &id, &tags).await?;

        let todo = fetch_todo(&mut tx, &id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create todo".to_string()))?;

        tx.commit().await?;

        Ok(todo)
    }

    /// Applies the fields present in `form_data`; everything else keeps its
    /// stored value. Returns the full record after the update.
    pub async fn update_todo_by_id(&self, id: &str, form_data: &TodoUpdateForm) -> AppResult<Todo> {
        let now = current_timestamp_millis();
        let mut tx = self.db.pool.begin().await?;

        let existing = fetch_todo(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))?;

        let title = form_data.title.clone().unwrap_or(existing.title);
        let description = match &form_data.description {
            Some(description) => description.clone(),
            None => existing.description,
        };
        let list_id = match &form_data.list {
            Some(list_id) => list_id.clone(),
            None => existing.list_id,
        };
        let due_date = form_data.due_date.unwrap_or(existing.due_date);
        let completed = form_data.completed.unwrap_or(existing.completed);
        let starred = form_data.starred.unwrap_or(existing.starred);

        if let Some(Some(list_id)) = &form_data.list {
            ensure_exists(&mut tx, CatalogKind::List, list_id).await?;
        }

        sqlx::query(
            r#"
            UPDATE todo
            SET title = ?, description = ?, list_id = ?, due_date = ?,
                completed = ?, starred = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&title)
        .bind(&description)
        .bind(&list_id)
        .bind(due_date)
        .bind(completed)
        .bind(starred)
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_constraint(e, "Todo already exists", "List not found"))?;

        if let Some(tags) = &form_data.tags {
            let tags = dedup_tags(tags);
            for tag_id in &tags {
                ensure_exists(&mut tx, CatalogKind::Tag, tag_id).await?;
            }
            replace_tags(&mut tx, id, &tags).await?;
        }

        let todo = fetch_todo(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))?;

        tx.commit().await?;

        Ok(todo)
    }

    /// Returns whether a record was removed. Tag links go with it (cascade).
    pub async fn delete_todo_by_id(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(&self.db.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn fetch_todo(conn: &mut SqliteConnection, id: &str) -> AppResult<Option<Todo>> {
    let sql = format!("SELECT {} FROM todo WHERE id = ?", TODO_COLUMNS);
    let todo = sqlx::query_as::<_, Todo>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(mut todo) = todo else {
        return Ok(None);
    };

    let tags: Vec<(String,)> =
        sqlx::query_as("SELECT tag_id FROM todo_tag WHERE todo_id = ? ORDER BY position")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
    todo.tags = tags.into_iter().map(|(tag_id,)| tag_id).collect();

    Ok(Some(todo))
}

async fn ensure_exists(conn: &mut SqliteConnection, kind: CatalogKind, id: &str) -> AppResult<()> {
    let sql = format!("SELECT 1 FROM {} WHERE id = ?", kind.table());
    let found: Option<(i64,)> = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(format!("{} not found", kind.label()))),
    }
}

async fn replace_tags(conn: &mut SqliteConnection, todo_id: &str, tags: &[String]) -> AppResult<()> {
    sqlx::query("DELETE FROM todo_tag WHERE todo_id = ?")
        .bind(todo_id)
        .execute(&mut *conn)
        .await?;

    for (position, tag_id) in tags.iter().enumerate() {
        sqlx::query("INSERT INTO todo_tag (todo_id, tag_id, position) VALUES (?, ?, ?)")
            .bind(todo_id)
            .bind(tag_id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::from_constraint(e, "Duplicate tag", "Tag not found"))?;
    }

    Ok(())
}
