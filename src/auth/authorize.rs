//! Capability checks deciding whether an identity may perform a
//! mutation. Two flat roles, no polymorphism, every rule is a plain
//! boolean check at the mutation site.

use crate::app::AppError;
use crate::database::models::blog::Blog;
use crate::database::models::comment::Comment;
use crate::database::models::user::{Role, User};

/// Blog edit/delete: the author or an admin.
pub fn can_mutate_blog(actor: &User, blog: &Blog) -> bool {
    actor.id == blog.author_id || actor.role == Role::Admin
}

/// Comment delete: the comment's own author or an admin. Owning the
/// blog grants nothing here, asymmetric from blog-level permission.
pub fn can_delete_comment(actor: &User, comment: &Comment) -> bool {
    actor.id == comment.user_id || actor.role == Role::Admin
}

/// Account delete: admins are never deletable through this path, no
/// matter who asks.
pub fn can_delete_user(target: &User) -> bool {
    target.role != Role::Admin
}

/// Gate for the admin endpoints.
pub fn require_admin(actor: &User) -> Result<(), AppError> {
    if actor.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    Ok(())
}
