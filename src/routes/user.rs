use actix_web::{get, post, put, web::Data, HttpRequest, HttpResponse};
use futures::{stream::StreamExt as _, TryStreamExt};
use serde::Deserialize;
use serde_json::json;
use sha256::digest;
use uuid::Uuid;

use crate::{
    app::{AppError, AppState},
    auth::{authenticate, removal_cookie, session_cookie},
    database::images::{allowed_extension, AVATAR_MAX_BYTES},
    database::models::user::{NewUser, Role, UserChanges},
};

const PASSWORD_MIN_LEN: usize = 6;

#[derive(Deserialize)]
struct SignupRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ProfileUpdateRequest {
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
    avatar: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordChangeRequest {
    current_password: String,
    new_password: String,
}

/// Pipe for registering a new account
/// - url: `{domain}/auth/signup`
///
/// Requires `name`, `email` and `password` in the json body; the email
/// must not be taken and the password must be at least 6 characters.
/// Responds 201 with the created user and a session cookie.
#[post("/auth/signup")]
pub async fn signup(req_body: String, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = serde_json::from_str::<SignupRequest>(&req_body)?;

    let name = body.name.trim().to_string();
    let email = body.email.trim().to_string();
    // Passwords are hashed exactly as supplied, never trimmed; login
    // must see the same bytes.
    let password = body.password;

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        ));
    }
    if password.len() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if app_state.identity.find_by_email(&email)?.is_some() {
        return Err(AppError::Validation("Email already in use".to_string()));
    }

    let user = app_state.identity.create(NewUser {
        name,
        email,
        password_hash: digest(password),
        role: Role::User,
    })?;
    let token = app_state.keys.issue(&user.id)?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(token))
        .json(json!({ "user": user })))
}

/// Pipe for logging in
/// - url: `{domain}/auth/login`
///
/// A wrong email and a wrong password are rejected identically so the
/// endpoint cannot be used to probe which accounts exist.
#[post("/auth/login")]
pub async fn login(req_body: String, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = serde_json::from_str::<LoginRequest>(&req_body)?;

    let user = app_state
        .identity
        .find_by_email(body.email.trim())?
        .ok_or_else(|| AppError::Validation("Invalid credentials".to_string()))?;

    if user.password_hash != digest(body.password) {
        return Err(AppError::Validation("Invalid credentials".to_string()));
    }

    let token = app_state.keys.issue(&user.id)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token))
        .json(json!({ "user": user })))
}

/// Pipe for the admin bootstrap login
/// - url: `{domain}/auth/admin-login`
///
/// A request matching the operator-provisioned email/password pair is
/// proof of admin identity: the account is created with the admin role
/// if absent, promoted otherwise. Repeat calls are idempotent. Any
/// mismatch is answered with the same opaque rejection.
#[post("/auth/admin-login")]
pub async fn admin_login(
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = serde_json::from_str::<LoginRequest>(&req_body)?;

    if body.email != app_state.admin_email || body.password != app_state.admin_password {
        return Err(AppError::Validation("Invalid admin credentials".to_string()));
    }

    let user = match app_state.identity.find_by_email(&body.email)? {
        Some(user) if user.role == Role::Admin => user,
        Some(user) => {
            log::info!("promoting {} to admin via bootstrap login", user.id);
            app_state.identity.update(
                &user.id,
                UserChanges {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )?
        }
        None => {
            log::info!("creating admin account via bootstrap login");
            app_state.identity.create(NewUser {
                name: "admin".to_string(),
                email: body.email,
                password_hash: digest(body.password),
                role: Role::Admin,
            })?
        }
    };

    let token = app_state.keys.issue(&user.id)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token))
        .json(json!({ "user": user })))
}

/// Clears the session cookie.
#[post("/auth/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(json!({ "message": "Logged out" }))
}

/// Echoes the identity resolved from the session cookie.
#[get("/auth/me")]
pub async fn me(req: HttpRequest, app_state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

/// Pipe for self-service profile updates
/// - url: `{domain}/auth/me`
///
/// Accepts any of `name`, `email`, `bio`, `avatar`; omitted fields are
/// left untouched. Changing the email re-checks uniqueness.
#[put("/auth/me")]
pub async fn update_me(
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let body = serde_json::from_str::<ProfileUpdateRequest>(&req_body)?;

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
            if existing.id != user.id {
                return Err(AppError::Validation("Email already in use".to_string()));
            }
        }
    }

    let updated = app_state.identity.update(
        &user.id,
        UserChanges {
            name: body.name.map(|name| name.trim().to_string()),
            email: body.email.map(|email| email.trim().to_string()),
            bio: body.bio,
            avatar: body.avatar,
            ..Default::default()
        },
    )?;

    Ok(HttpResponse::Ok().json(json!({ "user": updated })))
}

/// Pipe for changing the account password
/// - url: `{domain}/auth/me/password`
#[put("/auth/me/password")]
pub async fn change_password(
    req: HttpRequest,
    req_body: String,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;
    let body = serde_json::from_str::<PasswordChangeRequest>(&req_body)?;

    if user.password_hash != digest(body.current_password) {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_password = body.new_password;
    if new_password.len() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    app_state.identity.update(
        &user.id,
        UserChanges {
            password_hash: Some(digest(new_password)),
            ..Default::default()
        },
    )?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated" })))
}

/// Pipe for uploading an avatar, of type multipart
/// - url: `{domain}/auth/me/avatar`
///
/// Accepts a single file field; formats outside the whitelist and
/// files over 20 KB are rejected. Responds with the stored avatar URL.
#[post("/auth/me/avatar")]
pub async fn upload_avatar(
    req: HttpRequest,
    mut payload: actix_multipart::Multipart,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = authenticate(&req, &app_state)?;

    let mut stored = None;
    while let Ok(Some(mut field)) = payload.try_next().await {
        let filename = match field.content_disposition().get_filename() {
            Some(filename) => filename.to_string(),
            None => continue,
        };
        let ext = allowed_extension(&filename)
            .ok_or_else(|| AppError::Validation("Unsupported image format".to_string()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if bytes.len() + data.len() > AVATAR_MAX_BYTES {
                return Err(AppError::Validation(
                    "Avatar images are capped at 20 KB".to_string(),
                ));
            }
            bytes.extend_from_slice(&data);
        }
        if bytes.is_empty() {
            continue;
        }

        let name = format!("{}.{}", Uuid::new_v4(), ext);
        stored = Some(app_state.images.store(&name, &bytes)?);
    }

    let avatar =
        stored.ok_or_else(|| AppError::Validation("No avatar file supplied".to_string()))?;

    app_state.identity.update(
        &user.id,
        UserChanges {
            avatar: Some(avatar.clone()),
            ..Default::default()
        },
    )?;

    Ok(HttpResponse::Ok().json(json!({ "avatar": avatar })))
}
