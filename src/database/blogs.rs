use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::app::AppError;
use crate::database::db_utils::PgPool;
use crate::database::models::blog::{Blog, BlogChanges, NewBlog};
use crate::database::models::comment::{Comment, NewComment};
use crate::database::models::like::Like;
use crate::database::ContentStore;
use crate::schema::{blogs, comments, likes};

/// Content Store backed by the postgres pool. Comments and likes are
/// kept in their own tables but only reachable through the blog that
/// owns them.
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> PgContentStore {
        PgContentStore { pool }
    }
}

impl ContentStore for PgContentStore {
    fn create_blog(&self, new: NewBlog) -> Result<Blog, AppError> {
        let mut conn = self.pool.get()?;
        let now = Utc::now().naive_utc();

        let blog = Blog {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            image: new.image,
            author_id: new.author_id,
            author_name: new.author_name,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(blogs::table)
            .values(&blog)
            .execute(&mut conn)?;

        Ok(blog)
    }

    fn find_blog(&self, id: &str) -> Result<Option<Blog>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(blogs::table
            .filter(blogs::id.eq(id))
            .first::<Blog>(&mut conn)
            .optional()?)
    }

    fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(blogs::table
            .order(blogs::created_at.desc())
            .load::<Blog>(&mut conn)?)
    }

    fn blogs_by_author(&self, author_id: &str) -> Result<Vec<Blog>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(blogs::table
            .filter(blogs::author_id.eq(author_id))
            .order(blogs::created_at.desc())
            .load::<Blog>(&mut conn)?)
    }

    fn update_blog(&self, id: &str, changes: BlogChanges) -> Result<Blog, AppError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(blogs::table.filter(blogs::id.eq(id)))
            .set((&changes, blogs::updated_at.eq(Utc::now().naive_utc())))
            .get_result::<Blog>(&mut conn)?;

        Ok(updated)
    }

    fn delete_blog(&self, id: &str) -> Result<(), AppError> {
        let mut conn = self.pool.get()?;

        // Children first so a failure cannot orphan them.
        diesel::delete(comments::table.filter(comments::blog_id.eq(id))).execute(&mut conn)?;
        diesel::delete(likes::table.filter(likes::blog_id.eq(id))).execute(&mut conn)?;
        diesel::delete(blogs::table.filter(blogs::id.eq(id))).execute(&mut conn)?;

        Ok(())
    }

    fn likes(&self, blog_id: &str) -> Result<Vec<String>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(likes::table
            .filter(likes::blog_id.eq(blog_id))
            .select(likes::user_id)
            .load::<String>(&mut conn)?)
    }

    fn has_like(&self, blog_id: &str, user_id: &str) -> Result<bool, AppError> {
        let mut conn = self.pool.get()?;

        let found = likes::table
            .filter(likes::blog_id.eq(blog_id))
            .filter(likes::user_id.eq(user_id))
            .first::<Like>(&mut conn)
            .optional()?;

        Ok(found.is_some())
    }

    fn add_like(&self, blog_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut conn = self.pool.get()?;

        let like = Like {
            user_id: user_id.to_string(),
            blog_id: blog_id.to_string(),
        };

        diesel::insert_into(likes::table)
            .values(&like)
            .execute(&mut conn)?;

        Ok(())
    }

    fn remove_like(&self, blog_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut conn = self.pool.get()?;

        diesel::delete(
            likes::table
                .filter(likes::blog_id.eq(blog_id))
                .filter(likes::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    fn comments(&self, blog_id: &str) -> Result<Vec<Comment>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(comments::table
            .filter(comments::blog_id.eq(blog_id))
            .order(comments::created_at.asc())
            .load::<Comment>(&mut conn)?)
    }

    fn add_comment(&self, blog_id: &str, new: NewComment) -> Result<Comment, AppError> {
        let mut conn = self.pool.get()?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            blog_id: blog_id.to_string(),
            user_id: new.user_id,
            user_name: new.user_name,
            content: new.content,
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(comments::table)
            .values(&comment)
            .execute(&mut conn)?;

        Ok(comment)
    }

    fn find_comment(&self, blog_id: &str, comment_id: &str) -> Result<Option<Comment>, AppError> {
        let mut conn = self.pool.get()?;

        Ok(comments::table
            .filter(comments::blog_id.eq(blog_id))
            .filter(comments::id.eq(comment_id))
            .first::<Comment>(&mut conn)
            .optional()?)
    }

    fn delete_comment(&self, blog_id: &str, comment_id: &str) -> Result<(), AppError> {
        let mut conn = self.pool.get()?;

        diesel::delete(
            comments::table
                .filter(comments::blog_id.eq(blog_id))
                .filter(comments::id.eq(comment_id)),
        )
        .execute(&mut conn)?;

        Ok(())
    }

    fn count_blogs(&self) -> Result<i64, AppError> {
        let mut conn = self.pool.get()?;

        Ok(blogs::table.count().get_result::<i64>(&mut conn)?)
    }

    fn count_comments(&self) -> Result<i64, AppError> {
        let mut conn = self.pool.get()?;

        Ok(comments::table.count().get_result::<i64>(&mut conn)?)
    }
}
