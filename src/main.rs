use std::io;

use actix_files::Files;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use env_logger::Env;
use pushkind_common::db::establish_connection_pool;
use tera::Tera;

use pushkind_inventory::db::run_migrations;
use pushkind_inventory::models::config::ServerConfig;
use pushkind_inventory::repository::DieselRepository;
use pushkind_inventory::routes::categories::{
    confirm_delete_category, create_category, delete_category, edit_category, new_category,
    show_categories, show_category, update_category,
};
use pushkind_inventory::routes::items::{
    confirm_delete_item, create_item, delete_item, edit_item, new_item, show_item, show_items,
    update_item,
};
use pushkind_inventory::routes::main::{index, root};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to establish database connection: {e}");
        io::Error::other(e.to_string())
    })?;
    run_migrations(&pool).map_err(|e| {
        log::error!("Failed to run migrations: {e}");
        io::Error::other(e)
    })?;
    let repo = DieselRepository::new(pool);

    let tera = Tera::new(&server_config.templates_dir).map_err(|e| {
        log::error!("Failed to parse templates: {e}");
        io::Error::other(e)
    })?;

    let secret_key = Key::try_from(server_config.secret.as_bytes()).map_err(|e| {
        log::error!("Secret must be at least 64 bytes: {e}");
        io::Error::other(e)
    })?;
    let message_store = CookieMessageStore::builder(secret_key).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Starting server at http://{}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(root)
            .service(index)
            // Literal `new` segments are registered ahead of `{id}` routes.
            .service(show_categories)
            .service(new_category)
            .service(create_category)
            .service(show_category)
            .service(edit_category)
            .service(update_category)
            .service(confirm_delete_category)
            .service(delete_category)
            .service(show_items)
            .service(new_item)
            .service(create_item)
            .service(show_item)
            .service(edit_item)
            .service(update_item)
            .service(confirm_delete_item)
            .service(delete_item)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
