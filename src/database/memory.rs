//! In-memory store implementations backing the route tests, so the
//! suite runs without a live postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::app::AppError;
use crate::database::models::blog::{Blog, BlogChanges, NewBlog};
use crate::database::models::comment::{Comment, NewComment};
use crate::database::models::user::{NewUser, Role, User, UserChanges};
use crate::database::{ContentStore, IdentityStore, ImageStore};

struct BlogEntry {
    blog: Blog,
    likes: Vec<String>,
    comments: Vec<Comment>,
}

pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    blogs: Mutex<Vec<BlogEntry>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore {
            users: Mutex::new(Vec::new()),
            blogs: Mutex::new(Vec::new()),
        }
    }
}

impl IdentityStore for MemoryStore {
    fn create(&self, new: NewUser) -> Result<User, AppError> {
        let now = Utc::now().naive_utc();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            bio: None,
            avatar: None,
            created_at: now,
            updated_at: now,
        };

        self.users.lock().unwrap().push(user.clone());

        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    fn update(&self, id: &str, changes: UserChanges) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar) = changes.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now().naive_utc();

        Ok(user.clone())
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        self.users.lock().unwrap().retain(|user| user.id != id);

        Ok(())
    }

    fn search(&self, query: Option<&str>) -> Result<Vec<User>, AppError> {
        let users = self.users.lock().unwrap();

        Ok(match query {
            Some(q) => {
                let q = q.to_lowercase();
                users
                    .iter()
                    .filter(|user| {
                        user.name.to_lowercase().contains(&q)
                            || user.email.to_lowercase().contains(&q)
                    })
                    .cloned()
                    .collect()
            }
            None => users.clone(),
        })
    }

    fn count_role(&self, role: Role) -> Result<i64, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|user| user.role == role)
            .count() as i64)
    }
}

impl ContentStore for MemoryStore {
    fn create_blog(&self, new: NewBlog) -> Result<Blog, AppError> {
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

        self.blogs.lock().unwrap().push(BlogEntry {
            blog: blog.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
        });

        Ok(blog)
    }

    fn find_blog(&self, id: &str) -> Result<Option<Blog>, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.blog.id == id)
            .map(|entry| entry.blog.clone()))
    }

    fn list_blogs(&self) -> Result<Vec<Blog>, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.blog.clone())
            .collect())
    }

    fn blogs_by_author(&self, author_id: &str) -> Result<Vec<Blog>, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.blog.author_id == author_id)
            .map(|entry| entry.blog.clone())
            .collect())
    }

    fn update_blog(&self, id: &str, changes: BlogChanges) -> Result<Blog, AppError> {
        let mut blogs = self.blogs.lock().unwrap();
        let entry = blogs
            .iter_mut()
            .find(|entry| entry.blog.id == id)
            .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

        if let Some(title) = changes.title {
            entry.blog.title = title;
        }
        if let Some(description) = changes.description {
            entry.blog.description = description;
        }
        entry.blog.updated_at = Utc::now().naive_utc();

        Ok(entry.blog.clone())
    }

    fn delete_blog(&self, id: &str) -> Result<(), AppError> {
        self.blogs.lock().unwrap().retain(|entry| entry.blog.id != id);

        Ok(())
    }

    fn likes(&self, blog_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.blog.id == blog_id)
            .map(|entry| entry.likes.clone())
            .unwrap_or_default())
    }

    fn has_like(&self, blog_id: &str, user_id: &str) -> Result<bool, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.blog.id == blog_id)
            .map(|entry| entry.likes.iter().any(|id| id == user_id))
            .unwrap_or(false))
    }

    fn add_like(&self, blog_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut blogs = self.blogs.lock().unwrap();
        let entry = blogs
            .iter_mut()
            .find(|entry| entry.blog.id == blog_id)
            .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

        entry.likes.push(user_id.to_string());

        Ok(())
    }

    fn remove_like(&self, blog_id: &str, user_id: &str) -> Result<(), AppError> {
        let mut blogs = self.blogs.lock().unwrap();
        if let Some(entry) = blogs.iter_mut().find(|entry| entry.blog.id == blog_id) {
            entry.likes.retain(|id| id != user_id);
        }

        Ok(())
    }

    fn comments(&self, blog_id: &str) -> Result<Vec<Comment>, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.blog.id == blog_id)
            .map(|entry| entry.comments.clone())
            .unwrap_or_default())
    }

    fn add_comment(&self, blog_id: &str, new: NewComment) -> Result<Comment, AppError> {
        let mut blogs = self.blogs.lock().unwrap();
        let entry = blogs
            .iter_mut()
            .find(|entry| entry.blog.id == blog_id)
            .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            blog_id: blog_id.to_string(),
            user_id: new.user_id,
            user_name: new.user_name,
            content: new.content,
            created_at: Utc::now().naive_utc(),
        };
        entry.comments.push(comment.clone());

        Ok(comment)
    }

    fn find_comment(&self, blog_id: &str, comment_id: &str) -> Result<Option<Comment>, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .find(|entry| entry.blog.id == blog_id)
            .and_then(|entry| {
                entry
                    .comments
                    .iter()
                    .find(|comment| comment.id == comment_id)
                    .cloned()
            }))
    }

    fn delete_comment(&self, blog_id: &str, comment_id: &str) -> Result<(), AppError> {
        let mut blogs = self.blogs.lock().unwrap();
        if let Some(entry) = blogs.iter_mut().find(|entry| entry.blog.id == blog_id) {
            entry.comments.retain(|comment| comment.id != comment_id);
        }

        Ok(())
    }

    fn count_blogs(&self) -> Result<i64, AppError> {
        Ok(self.blogs.lock().unwrap().len() as i64)
    }

    fn count_comments(&self) -> Result<i64, AppError> {
        Ok(self
            .blogs
            .lock()
            .unwrap()
            .iter()
            .map(|entry| entry.comments.len() as i64)
            .sum())
    }
}

pub struct MemoryImages {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryImages {
    pub fn new() -> MemoryImages {
        MemoryImages {
            files: Mutex::new(HashMap::new()),
        }
    }
}

impl ImageStore for MemoryImages {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String, AppError> {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());

        Ok(format!("/images/{}", name))
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, AppError> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Image".to_string()))
    }
}
