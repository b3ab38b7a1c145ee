use actix_web::{delete, post, web::Data, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::{
    app::{AppError, AppState},
    auth::{authenticate, authorize},
    database::models::comment::NewComment,
};

#[derive(Deserialize)]
struct CommentRequest {
    content: String,
}

/// Pipe for commenting on a blog
/// - url: `{domain}/blogs/{blog_id}/comment`
///
/// The commenter name is snapshotted onto the comment and never
/// refreshed, even if the user later renames.
#[post("/blogs/{blog_id}/comment")]
pub async fn create_comment(
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let blog_id = req.match_info().query("blog_id").to_string();

    let body = serde_json::from_str::<CommentRequest>(&req_body)?;
    let content = body.content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::Validation(
            "Comment content is required".to_string(),
        ));
    }

    app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

    let comment = app_state.content.add_comment(
        &blog_id,
        NewComment {
            user_id: user.id,
            user_name: user.name,
            content,
        },
    )?;

    Ok(HttpResponse::Created().json(json!({ "comment": comment })))
}

/// Pipe for deleting a comment from a blog
/// - url: `{domain}/blogs/{blog_id}/comment/{comment_id}`
///
/// Only the comment's own author or an admin may delete it; owning the
/// blog is not enough.
#[delete("/blogs/{blog_id}/comment/{comment_id}")]
pub async fn delete_comment(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let blog_id = req.match_info().query("blog_id").to_string();
    let comment_id = req.match_info().query("comment_id").to_string();

    app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;
    let comment = app_state
        .content
        .find_comment(&blog_id, &comment_id)?
        .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

    if !authorize::can_delete_comment(&user, &comment) {
        return Err(AppError::Forbidden);
    }

    app_state.content.delete_comment(&blog_id, &comment_id)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted" })))
}
