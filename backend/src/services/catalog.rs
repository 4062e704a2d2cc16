use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::models::{CatalogEntry, CatalogKind};
use crate::utils::time::current_timestamp_millis;
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "id, name, user_id, is_default, created_at, updated_at";

pub struct CatalogService<'a> {
    db: &'a Database,
    kind: CatalogKind,
}

impl<'a> CatalogService<'a> {
    pub fn new(db: &'a Database, kind: CatalogKind) -> Self {
        CatalogService { db, kind }
    }

    /// Shared entries, plus the owner's own when an owner is given.
    /// Defaults come first, then alphabetical.
    pub async fn get_entries(&self, owner: Option<&str>) -> AppResult<Vec<CatalogEntry>> {
        let filter = if owner.is_some() {
            "WHERE user_id IS NULL OR user_id = ?"
        } else {
            "WHERE user_id IS NULL"
        };
        let sql = format!(
            "SELECT {} FROM {} {} ORDER BY is_default DESC, name ASC",
            ENTRY_COLUMNS,
            self.kind.table(),
            filter
        );

        let mut query = sqlx::query_as::<_, CatalogEntry>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        Ok(query.fetch_all(&self.db.pool).await?)
    }

    pub async fn get_entry_by_id(&self, id: &str) -> AppResult<Option<CatalogEntry>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", ENTRY_COLUMNS, self.kind.table());

        let result = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?;

        Ok(result)
    }

    pub async fn find_by_name(&self, name: &str, owner: Option<&str>) -> AppResult<Option<CatalogEntry>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE name = ? AND user_id IS ?",
            ENTRY_COLUMNS,
            self.kind.table()
        );

        let result = sqlx::query_as::<_, CatalogEntry>(&sql)
            .bind(name)
            .bind(owner)
            .fetch_optional(&self.db.pool)
            .await?;

        Ok(result)
    }

    /// Inserts a user-created (non-default) entry. A concurrent insert of the
    /// same (name, owner) pair surfaces as a conflict through the unique index.
    pub async fn insert_new_entry(&self, name: &str, owner: Option<&str>) -> AppResult<CatalogEntry> {
        let now = current_timestamp_millis();
        let id = Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO {} (id, name, user_id, is_default, created_at, updated_at) VALUES (?, ?, ?, 0, ?, ?)",
            self.kind.table()
        );

        sqlx::query(&sql)
            .bind(&id)
            .bind(name)
            .bind(owner)
            .bind(now)
            .bind(now)
            .execute(&self.db.pool)
            .await
            .map_err(|e| AppError::from_constraint(e, &self.already_exists(), "Invalid reference"))?;

        self.get_entry_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Failed to create {}", self.kind.table())))
    }

    pub async fn delete_entry_by_id(&self, id: &str) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.kind.table());

        let result = sqlx::query(&sql).bind(id).execute(&self.db.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    pub fn already_exists(&self) -> String {
        format!("{} already exists", self.kind.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SeedService;

    async fn setup() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    #[actix_web::test]
    async fn test_entries_sorted_defaults_first() {
        let db = setup().await;
        SeedService::new(&db)
            .seed_defaults(&["Work".to_string(), "Health".to_string()], &[])
            .await
            .unwrap();

        let service = CatalogService::new(&db, CatalogKind::List);
        service.insert_new_entry("Errands", None).await.unwrap();
        service.insert_new_entry("Books", Some("alice")).await.unwrap();
        service.insert_new_entry("Garden", Some("bob")).await.unwrap();

        let shared: Vec<String> = service
            .get_entries(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(shared, vec!["Health", "Work", "Errands"]);

        let alice: Vec<String> = service
            .get_entries(Some("alice"))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(alice, vec!["Health", "Work", "Books", "Errands"]);
    }

    #[actix_web::test]
    async fn test_duplicate_shared_name_conflicts() {
        let db = setup().await;
        let service = CatalogService::new(&db, CatalogKind::Tag);

        service.insert_new_entry("Urgent", None).await.unwrap();
        let err = service.insert_new_entry("Urgent", None).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Tag already exists"));

        // Same name under a different owner is a different record.
        service.insert_new_entry("Urgent", Some("alice")).await.unwrap();
        assert_eq!(service.get_entries(Some("alice")).await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_find_by_name_is_owner_scoped() {
        let db = setup().await;
        let service = CatalogService::new(&db, CatalogKind::List);
        service.insert_new_entry("Errands", Some("alice")).await.unwrap();

        assert!(service.find_by_name("Errands", Some("alice")).await.unwrap().is_some());
        assert!(service.find_by_name("Errands", None).await.unwrap().is_none());
        assert!(service.find_by_name("Errands", Some("bob")).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_delete_reports_missing() {
        let db = setup().await;
        let service = CatalogService::new(&db, CatalogKind::List);
        let entry = service.insert_new_entry("Errands", None).await.unwrap();

        assert!(service.delete_entry_by_id(&entry.id).await.unwrap());
        assert!(!service.delete_entry_by_id(&entry.id).await.unwrap());
        assert!(service.get_entry_by_id(&entry.id).await.unwrap().is_none());
    }
}
