use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::CATALOG_ROOT;
use crate::repository::DieselRepository;
use crate::routes::base_context;
use crate::services::main::show_index as show_index_service;

#[get("/")]
pub async fn root() -> impl Responder {
    redirect(CATALOG_ROOT)
}

#[get("/catalog")]
pub async fn index(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index_service(repo.get_ref()) {
        Ok(counts) => {
            let mut context = base_context(&flash_messages, "index");
            context.insert("title", "Inventory");
            context.insert("counts", &counts);
            render_template(&tera, "index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
