use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::item::items_url;
use crate::forms::items::ItemForm;
use crate::repository::DieselRepository;
use crate::routes::base_context;
use crate::services::items::{
    ItemFormView, confirm_delete_item as confirm_delete_item_service,
    create_item as create_item_service, delete_item as delete_item_service,
    edit_item as edit_item_service, new_item_form as new_item_form_service,
    show_item as show_item_service, show_items as show_items_service,
    update_item as update_item_service,
};
use crate::services::{ServiceError, Submission};

/// Decoded form pairs; `category` may repeat, one per ticked checkbox.
type FormPairs = web::Form<Vec<(String, String)>>;

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    view: &ItemFormView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "items");
    context.insert("title", view.title);
    context.insert("item", &view.item);
    context.insert("categories", &view.categories);
    context.insert("errors", &view.errors);
    render_template(tera, "items/form.html", &context)
}

fn submission_response(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    result: Result<Submission<ItemFormView>, ServiceError>,
) -> HttpResponse {
    match result {
        Ok(Submission::Committed { url }) => redirect(&url),
        Ok(Submission::Form(view)) => render_form(tera, flash_messages, &view),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to save item: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog/items")]
pub async fn show_items(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_items_service(repo.get_ref()) {
        Ok(items) => {
            let mut context = base_context(&flash_messages, "items");
            context.insert("title", "Item List");
            context.insert("items", &items);
            render_template(&tera, "items/list.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render items page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog/item/new")]
pub async fn new_item(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match new_item_form_service(repo.get_ref()) {
        Ok(view) => render_form(&tera, &flash_messages, &view),
        Err(err) => {
            log::error!("Failed to render item form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/catalog/item/new")]
pub async fn create_item(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(fields): FormPairs,
) -> impl Responder {
    let result = create_item_service(ItemForm::from(fields), repo.get_ref());
    submission_response(&tera, &flash_messages, result)
}

#[get("/catalog/item/{item_id}")]
pub async fn show_item(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_item_service(item_id.into_inner(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, "items");
            context.insert("title", "Item Detail");
            context.insert("item", &detail.item);
            context.insert("categories", &detail.categories);
            render_template(&tera, "items/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render item page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog/item/{item_id}/update")]
pub async fn edit_item(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match edit_item_service(item_id.into_inner(), repo.get_ref()) {
        Ok(view) => render_form(&tera, &flash_messages, &view),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render item form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/catalog/item/{item_id}/update")]
pub async fn update_item(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(fields): FormPairs,
) -> impl Responder {
    let result = update_item_service(
        item_id.into_inner(),
        ItemForm::from(fields),
        repo.get_ref(),
    );
    submission_response(&tera, &flash_messages, result)
}

#[get("/catalog/item/{item_id}/delete")]
pub async fn confirm_delete_item(
    item_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match confirm_delete_item_service(item_id.into_inner(), repo.get_ref()) {
        Ok(Some(item)) => {
            let mut context = base_context(&flash_messages, "items");
            context.insert("title", "Delete Item");
            context.insert("item", &item);
            render_template(&tera, "items/delete.html", &context)
        }
        Ok(None) => redirect(&items_url()),
        Err(err) => {
            log::error!("Failed to render item delete page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/catalog/item/{item_id}/delete")]
pub async fn delete_item(
    item_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_item_service(item_id.into_inner(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Item deleted.").send(),
        Ok(false) => {}
        Err(err) => {
            log::error!("Failed to delete item: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(&items_url())
}
