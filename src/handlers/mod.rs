pub mod content_handler;
pub mod health;
pub mod share_handler;

use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};

use crate::{auth::AuthMiddleware, document::ExportedDocument};

/// Registers every route. `/api/content` requires a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .service(health::health_check_live)
        .service(health::health_check_ready)
        .service(
            web::scope("/api/share")
                .service(share_handler::view_shared)
                .service(share_handler::export_shared),
        )
        .service(
            web::scope("/api/content")
                .wrap(AuthMiddleware)
                .service(content_handler::generate_content)
                .service(content_handler::list_history)
                .service(content_handler::get_content)
                .service(content_handler::delete_content)
                .service(content_handler::share_content)
                .service(content_handler::set_visibility)
                .service(content_handler::export_content),
        );
}

pub(crate) fn attachment(document: ExportedDocument) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.file_name)],
        })
        .body(document.bytes)
}
