//! Lists and tags: named records, optionally owned by a user, used to
//! group todos. Both kinds share one shape and one set of rules, so they
//! share these types; [`CatalogKind`] selects the table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::form::blank_as_none;
use crate::utils::time::millis_to_datetime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    List,
    Tag,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::List => "list",
            CatalogKind::Tag => "tag",
        }
    }

    /// Capitalized name used in response messages.
    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::List => "List",
            CatalogKind::Tag => "Tag",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CatalogEntry {
    /// Shared records (no owner) can be removed by anyone; owned ones only by their owner.
    pub fn is_owned_by_other(&self, requester: Option<&str>) -> bool {
        match self.user_id.as_deref() {
            Some(owner) => Some(owner) != requester,
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CatalogEntry> for CatalogEntryResponse {
    fn from(entry: CatalogEntry) -> Self {
        CatalogEntryResponse {
            id: entry.id,
            name: entry.name,
            user_id: entry.user_id,
            is_default: entry.is_default,
            created_at: millis_to_datetime(entry.created_at),
            updated_at: millis_to_datetime(entry.updated_at),
        }
    }
}
