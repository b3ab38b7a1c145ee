pub mod app;
pub mod database;
pub mod schema;

mod auth;
mod routes;

use actix_web::{middleware::Logger, web, App, HttpServer};
use app::{AppState, Config};
use routes::{admin, blog::*, comment::*, user::*};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let app_state = AppState::new(&config);

    log::info!("server running on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(app_state.clone()))
            //Auth routes
            .service(signup)
            .service(login)
            .service(admin_login)
            .service(logout)
            .service(me)
            .service(update_me)
            .service(change_password)
            .service(upload_avatar)
            //Blog routes
            .service(list_blogs)
            .service(create_blog)
            .service(get_blog)
            .service(edit_blog)
            .service(delete_blog)
            .service(toggle_like)
            .service(get_image)
            //Comment routes
            .service(create_comment)
            .service(delete_comment)
            //Admin routes
            .service(admin::list_users)
            .service(admin::edit_user)
            .service(admin::delete_user)
            .service(admin::list_blogs)
            .service(admin::edit_blog)
            .service(admin::delete_blog)
            .service(admin::stats)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
