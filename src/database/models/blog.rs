use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use super::comment::Comment;
use crate::schema::blogs;

#[derive(Debug, Clone, Queryable, Insertable, Serialize)]
#[diesel(table_name = blogs)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub author_id: String,
    ///Snapshot of the author name at creation time, allowed to go stale
    pub author_name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub author_id: String,
    pub author_name: String,
}

/// Partial update, `None` fields are left untouched.
#[derive(Default, AsChangeset)]
#[diesel(table_name = blogs)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A blog together with its likes and embedded comments, the shape
/// every read endpoint responds with.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    #[serde(flatten)]
    pub blog: Blog,
    pub likes: Vec<String>,
    pub likes_count: usize,
    pub comments: Vec<Comment>,
}
