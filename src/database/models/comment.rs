use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::comments;

/// A comment lives inside exactly one blog for its entire lifetime and
/// is only reachable through blog-scoped store operations.
#[derive(Debug, Clone, Queryable, Insertable, Serialize)]
#[diesel(table_name = comments)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub blog_id: String,
    pub user_id: String,
    ///Snapshot of the commenter name at comment time, never refreshed
    pub user_name: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

pub struct NewComment {
    pub user_id: String,
    pub user_name: String,
    pub content: String,
}
