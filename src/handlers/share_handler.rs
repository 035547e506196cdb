use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState, document::ExportFormat, errors::AppError, handlers::attachment,
};

#[get("/{code}")]
async fn view_shared(
    state: web::Data<AppState>,
    code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let details = state.content_service.view_shared(&code).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[get("/{code}/export/{format}")]
async fn export_shared(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (code, format) = path.into_inner();
    let format: ExportFormat = format.parse().map_err(AppError::ValidationError)?;

    let document = state.content_service.export_shared(&code, format).await?;
    Ok(attachment(document))
}
