use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web::Data, HttpRequest, HttpResponse};
use futures::{stream::StreamExt as _, TryStreamExt};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    app::{AppError, AppState},
    auth::{authenticate, authorize},
    database::images::{allowed_extension, BLOG_IMAGE_MAX_BYTES},
    database::models::blog::{Blog, BlogChanges, BlogView, NewBlog},
    database::ContentStore,
};

/// Joins a blog with its likes and embedded comments for serialization.
pub(crate) fn expand(content: &dyn ContentStore, blog: Blog) -> Result<BlogView, AppError> {
    let likes = content.likes(&blog.id)?;
    let comments = content.comments(&blog.id)?;

    Ok(BlogView {
        likes_count: likes.len(),
        blog,
        likes,
        comments,
    })
}

#[derive(Deserialize)]
pub(crate) struct BlogUpdateRequest {
    title: Option<String>,
    description: Option<String>,
}

/// Validates a partial blog update: present fields must not be blank,
/// and are trimmed on the way through.
pub(crate) fn blog_changes(body: BlogUpdateRequest) -> Result<BlogChanges, AppError> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
    }
    if let Some(description) = &body.description {
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "Description cannot be empty".to_string(),
            ));
        }
    }

    Ok(BlogChanges {
        title: body.title.map(|title| title.trim().to_string()),
        description: body.description.map(|description| description.trim().to_string()),
    })
}

/// Reads the `title`, `description` and optional `image` fields out of
/// a blog-creation multipart payload, storing the image as it streams.
async fn parse_blog_multipart(
    payload: &mut Multipart,
    app_state: &AppState,
) -> Result<(String, String, Option<String>), AppError> {
    let (mut title, mut description, mut image) = (String::new(), String::new(), None);

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = match field.content_disposition().get_name() {
            Some(name) => name.to_string(),
            None => continue,
        };

        match name.as_str() {
            "title" | "description" => {
                let mut value = String::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk?;
                    value.push_str(std::str::from_utf8(&data).map_err(|_| {
                        AppError::Validation("Text fields must be valid UTF-8".to_string())
                    })?);
                }
                if name == "title" {
                    title = value;
                } else {
                    description = value;
                }
            }
            "image" => {
                let filename = match field.content_disposition().get_filename() {
                    Some(filename) => filename.to_string(),
                    None => continue,
                };
                let ext = allowed_extension(&filename).ok_or_else(|| {
                    AppError::Validation("Unsupported image format".to_string())
                })?;

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let data = chunk?;
                    if bytes.len() + data.len() > BLOG_IMAGE_MAX_BYTES {
                        return Err(AppError::Validation(
                            "Blog images are capped at 5 MB".to_string(),
                        ));
                    }
                    bytes.extend_from_slice(&data);
                }
                if bytes.is_empty() {
                    continue;
                }

                let name = format!("{}.{}", Uuid::new_v4(), ext);
                image = Some(app_state.images.store(&name, &bytes)?);
            }
            _ => {}
        }
    }

    Ok((title, description, image))
}

/// Lists every blog, newest first, with likes and comments embedded.
#[get("/blogs")]
pub async fn list_blogs(app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let blogs = app_state.content.list_blogs()?;
    let views = blogs
        .into_iter()
        .map(|blog| expand(app_state.content.as_ref(), blog))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HttpResponse::Ok().json(views))
}

#[get("/blogs/{blog_id}")]
pub async fn get_blog(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let blog_id = req.match_info().query("blog_id").to_string();

    let blog = app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

    Ok(HttpResponse::Ok().json(expand(app_state.content.as_ref(), blog)?))
}

/// Pipe for creating a new blog, of type multipart
/// - url: `{domain}/blogs`
///
/// Fields: `title`, `description`, optional `image` file (whitelist
/// formats, 5 MB cap). The author name is snapshotted onto the blog at
/// creation time and never refreshed afterwards.
#[post("/blogs")]
pub async fn create_blog(
    req: HttpRequest,
    mut payload: Multipart,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let (title, description, image) = parse_blog_multipart(&mut payload, &app_state).await?;

    let title = title.trim().to_string();
    let description = description.trim().to_string();
    if title.is_empty() || description.is_empty() {
        return Err(AppError::Validation(
            "Title and description are required".to_string(),
        ));
    }

    let blog = app_state.content.create_blog(NewBlog {
        title,
        description,
        image,
        author_id: user.id,
        author_name: user.name,
    })?;

    Ok(HttpResponse::Created().json(expand(app_state.content.as_ref(), blog)?))
}

/// Pipe for editing a blog's title/description
/// - url: `{domain}/blogs/{blog_id}`
///
/// Only the author or an admin may edit.
#[put("/blogs/{blog_id}")]
pub async fn edit_blog(
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let blog_id = req.match_info().query("blog_id").to_string();

    let blog = app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;
    if !authorize::can_mutate_blog(&user, &blog) {
        return Err(AppError::Forbidden);
    }

    let changes = blog_changes(serde_json::from_str(&req_body)?)?;
    let updated = app_state.content.update_blog(&blog_id, changes)?;

    Ok(HttpResponse::Ok().json(expand(app_state.content.as_ref(), updated)?))
}

/// Pipe for deleting a blog together with its comments and likes
/// - url: `{domain}/blogs/{blog_id}`
///
/// Only the author or an admin may delete.
#[delete("/blogs/{blog_id}")]
pub async fn delete_blog(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let blog_id = req.match_info().query("blog_id").to_string();

    let blog = app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;
    if !authorize::can_mutate_blog(&user, &blog) {
        return Err(AppError::Forbidden);
    }

    app_state.content.delete_blog(&blog_id)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Blog deleted" })))
}

/// Pipe for liking or unliking a blog. If the caller has not liked the
/// blog the like is added, otherwise it is removed; two consecutive
/// calls return the like set to its original state. The membership
/// check and the mutation are separate store round trips, so two
/// concurrent toggles on the same blog may race (last write wins).
#[post("/blogs/{blog_id}/like")]
pub async fn toggle_like(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let blog_id = req.match_info().query("blog_id").to_string();

    app_state
        .content
        .find_blog(&blog_id)?
        .ok_or_else(|| AppError::NotFound("Blog".to_string()))?;

    let liked = if app_state.content.has_like(&blog_id, &user.id)? {
        app_state.content.remove_like(&blog_id, &user.id)?;
        false
    } else {
        app_state.content.add_like(&blog_id, &user.id)?;
        true
    };

    let likes = app_state.content.likes(&blog_id)?;

    Ok(HttpResponse::Ok().json(json!({ "liked": liked, "likesCount": likes.len() })))
}

/// Serves a stored image back to the client.
#[get("/images/{image_name}")]
pub async fn get_image(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let image_name = req.match_info().query("image_name");

    let file = app_state.images.load(image_name)?;

    Ok(HttpResponse::Ok().body(file))
}
