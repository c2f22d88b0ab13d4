use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named container grouping posts and links. Root of the content hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Page {
    pub id: i64,
    pub name: String,
}

/// A titled text entry belonging to one page. `content` is raw markup and is
/// stored verbatim; rendering (and escaping decisions) belong to the
/// presentation layer.
///
/// `date` is the last-modified time: set on create and overwritten on every
/// update. There is no separate creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub page_id: i64,
}

/// A URL with an optional description, belonging to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub url: String,
    pub description: Option<String>,
    pub page_id: i64,
}
