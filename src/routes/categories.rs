use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::category::categories_url;
use crate::forms::categories::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::base_context;
use crate::services::categories::{
    CategoryFormView, confirm_delete_category as confirm_delete_category_service,
    create_category as create_category_service, delete_category as delete_category_service,
    edit_category as edit_category_service, new_category_form,
    show_categories as show_categories_service, show_category as show_category_service,
    update_category as update_category_service,
};
use crate::services::{ServiceError, Submission};

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    view: &CategoryFormView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "categories");
    context.insert("title", view.title);
    context.insert("category", &view.category);
    context.insert("errors", &view.errors);
    render_template(tera, "categories/form.html", &context)
}

fn submission_response(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    result: Result<Submission<CategoryFormView>, ServiceError>,
) -> HttpResponse {
    match result {
        Ok(Submission::Committed { url }) => redirect(&url),
        Ok(Submission::Form(view)) => render_form(tera, flash_messages, &view),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to save category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog/categories")]
pub async fn show_categories(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_categories_service(repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("title", "Category List");
            context.insert("categories", &categories);
            render_template(&tera, "categories/list.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog/category/new")]
pub async fn new_category(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(&tera, &flash_messages, &new_category_form())
}

#[post("/catalog/category/new")]
pub async fn create_category(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let result = create_category_service(form, repo.get_ref());
    submission_response(&tera, &flash_messages, result)
}

#[get("/catalog/category/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("title", "Category Detail");
            context.insert("category", &detail.category);
            context.insert("items", &detail.items);
            render_template(&tera, "categories/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render category page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/catalog/category/{category_id}/update")]
pub async fn edit_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match edit_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(view) => render_form(&tera, &flash_messages, &view),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render category form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/catalog/category/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    let result = update_category_service(category_id.into_inner(), form, repo.get_ref());
    submission_response(&tera, &flash_messages, result)
}

#[get("/catalog/category/{category_id}/delete")]
pub async fn confirm_delete_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match confirm_delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(Some(detail)) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("title", "Delete Category");
            context.insert("category", &detail.category);
            context.insert("items", &detail.items);
            render_template(&tera, "categories/delete.html", &context)
        }
        Ok(None) => redirect(&categories_url()),
        Err(err) => {
            log::error!("Failed to render category delete page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/catalog/category/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(true) => FlashMessage::success("Category deleted.").send(),
        Ok(false) => {}
        Err(err) => {
            log::error!("Failed to delete category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    redirect(&categories_url())
}
