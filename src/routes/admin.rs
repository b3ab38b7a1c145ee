use actix_web::{
    delete, get, put,
    web::{Data, Query},
    HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{authenticate, authorize},
    database::models::user::{Role, UserChanges},
    routes::blog::{blog_changes, expand},
};

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[derive(Deserialize)]
struct AdminUserUpdate {
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    role: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    total_users: i64,
    total_blogs: i64,
    total_comments: i64,
}

/// Pipe for listing users on the dashboard
/// - url: `{domain}/admin/users?search=`
///
/// `search` narrows by case-insensitive substring on name or email.
#[get("/admin/users")]
pub async fn list_users(
    req: HttpRequest,
    query: Query<SearchQuery>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let users = app_state.identity.search(query.search.as_deref())?;

    Ok(HttpResponse::Ok().json(users))
}

/// Pipe for admin edits to a user record
/// - url: `{domain}/admin/users/{user_id}`
///
/// `role` may only take one of the two known tags; any other value is
/// silently ignored rather than rejected.
#[put("/admin/users/{user_id}")]
pub async fn edit_user(
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let user_id = req.match_info().query("user_id").to_string();
    let target = app_state
        .identity
        .find_by_id(&user_id)?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    let body = serde_json::from_str::<AdminUserUpdate>(&req_body)?;
    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }
    }
    if let Some(email) = &body.email {
        if email.trim().is_empty() {
            return Err(AppError::Validation("Email cannot be empty".to_string()));
        }
        if let Some(existing) = app_state.identity.find_by_email(email.trim())? {
            if existing.id != target.id {
                return Err(AppError::Validation("Email already in use".to_string()));
            }
        }
    }

    let updated = app_state.identity.update(
        &target.id,
        UserChanges {
            name: body.name.map(|name| name.trim().to_string()),
            email: body.email.map(|email| email.trim().to_string()),
            bio: body.bio,
            role: body.role.as_deref().and_then(Role::parse),
            ..Default::default()
        },
    )?;

    Ok(HttpResponse::Ok().json(json!({ "user": updated })))
}

/// Pipe for removing a user account together with everything the user
/// authored
/// - url: `{domain}/admin/users/{user_id}`
///
/// Admin accounts can never be removed through this path. Each blog is
/// deleted with its embedded comments (whoever wrote them) before the
/// user record itself goes; there is no enclosing transaction, so a
/// mid-sequence failure surfaces as a 500 with no rollback.
#[delete("/admin/users/{user_id}")]
pub async fn delete_user(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let user_id = req.match_info().query("user_id").to_string();
    let target = app_state
        .identity
        .find_by_id(&user_id)?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if !authorize::can_delete_user(&target) {
        return Err(AppError::Forbidden);
    }

    let blogs = app_state.content.blogs_by_author(&target.id)?;
    let blog_count = blogs.len();
    for blog in blogs {
        app_state.content.delete_blog(&blog.id)?;
    }
    app_state.identity.delete(&target.id)?;

    log::info!("deleted user {} and {} authored blogs", target.id, blog_count);

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted" })))
}

/// Lists every blog for moderation.
#[get("/admin/blogs")]
pub async fn list_blogs(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let blogs = app_state.content.list_blogs()?;
    let views = blogs
        .into_iter()
        .map(|blog| expand(app_state.content.as_ref(), blog))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(views))
}

/// Admin edit of any blog's title/description.
#[put("/admin/blogs/{blog_id}")]
pub async fn edit_blog(
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let blog_id = req.match_info().query("blog_id").to_string();
    app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

    let changes = blog_changes(serde_json::from_str(&req_body)?)?;
    let updated = app_state.content.update_blog(&blog_id, changes)?;

    Ok(HttpResponse::Ok().json(expand(app_state.content.as_ref(), updated)?))
}

/// Admin removal of any blog.
#[delete("/admin/blogs/{blog_id}")]
pub async fn delete_blog(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let blog_id = req.match_info().query("blog_id").to_string();
    app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

    app_state.content.delete_blog(&blog_id)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Blog deleted" })))
}

/// Pipe for the dashboard counters
/// - url: `{domain}/admin/stats`
///
/// `totalUsers` counts accounts with the user role only; admins are
/// excluded. A store with zero blogs reports zero total comments.
#[get("/admin/stats")]
pub async fn stats(req: HttpRequest, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let actor = authenticate(&req, &app_state)?;
    authorize::require_admin(&actor)?;

    let stats = Stats {
        total_users: app_state.identity.count_role(Role::User)?,
        total_blogs: app_state.content.count_blogs()?,
        total_comments: app_state.content.count_comments()?,
    };

    Ok(HttpResponse::Ok().json(stats))
}
