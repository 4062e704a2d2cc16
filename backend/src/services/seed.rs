use crate::db::Database;
use crate::error::AppResult;
use crate::models::CatalogKind;
use crate::utils::time::current_timestamp_millis;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub lists_created: Vec<String>,
    pub tags_created: Vec<String>,
}

/// Creates the shared default lists and tags.
pub struct SeedService<'a> {
    db: &'a Database,
}

impl<'a> SeedService<'a> {
    pub fn new(db: &'a Database) -> Self {
        SeedService { db }
    }

    /// Idempotent: names that already exist as shared records are skipped.
    /// The whole batch runs in one transaction, so a failure leaves no partial seed.
    pub async fn seed_defaults(&self, lists: &[String], tags: &[String]) -> AppResult<SeedReport> {
        let now = current_timestamp_millis();
        let mut report = SeedReport::default();
        let mut tx = self.db.pool.begin().await?;

        for (kind, names) in [(CatalogKind::List, lists), (CatalogKind::Tag, tags)] {
            let sql = format!(
                "INSERT INTO {} (id, name, user_id, is_default, created_at, updated_at) \
                 VALUES (?, ?, NULL, 1, ?, ?) ON CONFLICT DO NOTHING",
                kind.table()
            );

            for name in names {
                let result = sqlx::query(&sql)
                    .bind(Uuid::new_v4().to_string())
                    .bind(name)
                    .bind(now)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;

                if result.rows_affected() > 0 {
                    match kind {
                        CatalogKind::List => report.lists_created.push(name.clone()),
                        CatalogKind::Tag => report.tags_created.push(name.clone()),
                    }
                }
            }
        }

        tx.commit().await?;

        for name in &report.lists_created {
            tracing::info!("Default list \"{}\" created", name);
        }
        for name in &report.tags_created {
            tracing::info!("Default tag \"{}\" created", name);
        }

        Ok(report)
    }
}
