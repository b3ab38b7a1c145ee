pub mod blogs;
pub mod db_utils;
pub mod images;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod users;

use crate::app::AppError;

use models::blog::{Blog, BlogChanges, NewBlog};
use models::comment::{Comment, NewComment};
use models::user::{NewUser, Role, User, UserChanges};

/// Persistence boundary for user records.
pub trait IdentityStore: Send + Sync {
    fn create(&self, new: NewUser) -> Result<User, AppError>;
    fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    fn update(&self, id: &str, changes: UserChanges) -> Result<User, AppError>;
    fn delete(&self, id: &str) -> Result<(), AppError>;
    /// All users, optionally narrowed by a case-insensitive substring
    /// match on name or email.
    fn search(&self, query: Option<&str>) -> Result<Vec<User>, AppError>;
    fn count_role(&self, role: Role) -> Result<i64, AppError>;
}

/// Persistence boundary for blogs. Comments and likes belong to their
/// blog and are only addressable through these blog-scoped operations.
pub trait ContentStore: Send + Sync {
    fn create_blog(&self, new: NewBlog) -> Result<Blog, AppError>;
    fn find_blog(&self, id: &str) -> Result<Option<Blog>, AppError>;
    fn list_blogs(&self) -> Result<Vec<Blog>, AppError>;
    fn blogs_by_author(&self, author_id: &str) -> Result<Vec<Blog>, AppError>;
    fn update_blog(&self, id: &str, changes: BlogChanges) -> Result<Blog, AppError>;
    /// Deletes the blog together with its comments and likes.
    fn delete_blog(&self, id: &str) -> Result<(), AppError>;

    fn likes(&self, blog_id: &str) -> Result<Vec<String>, AppError>;
    fn has_like(&self, blog_id: &str, user_id: &str) -> Result<bool, AppError>;
    fn add_like(&self, blog_id: &str, user_id: &str) -> Result<(), AppError>;
    fn remove_like(&self, blog_id: &str, user_id: &str) -> Result<(), AppError>;

    fn comments(&self, blog_id: &str) -> Result<Vec<Comment>, AppError>;
    fn add_comment(&self, blog_id: &str, new: NewComment) -> Result<Comment, AppError>;
    fn find_comment(&self, blog_id: &str, comment_id: &str) -> Result<Option<Comment>, AppError>;
    fn delete_comment(&self, blog_id: &str, comment_id: &str) -> Result<(), AppError>;

    fn count_blogs(&self) -> Result<i64, AppError>;
    fn count_comments(&self) -> Result<i64, AppError>;
}

/// Boundary to the image hosting service: stores raw bytes under a
/// name and hands back a stable URL path.
pub trait ImageStore: Send + Sync {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String, AppError>;
    fn load(&self, name: &str) -> Result<Vec<u8>, AppError>;
}
