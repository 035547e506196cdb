use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    document::ExportFormat,
    errors::AppError,
    handlers::attachment,
    models::dto::{
        request::{GenerateContentRequest, PaginationParams, VisibilityRequest},
        response::MessageResponse,
    },
};

#[post("")]
async fn generate_content(
    state: web::Data<AppState>,
    request: web::Json<GenerateContentRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let details = state
        .content_service
        .generate(auth.user_id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(details))
}

#[get("")]
async fn list_history(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let page = state
        .content_service
        .list_history(auth.user_id(), &query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/{id}")]
async fn get_content(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let details = state.content_service.get_owned(&id, auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(details))
}

#[delete("/{id}")]
async fn delete_content(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state
        .content_service
        .delete_owned(&id, auth.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Content deleted".to_string(),
    }))
}

#[post("/{id}/share")]
async fn share_content(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let info = state.content_service.share(&id, auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(info))
}

#[put("/{id}/visibility")]
async fn set_visibility(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<VisibilityRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summary = state
        .content_service
        .set_visibility(&id, auth.user_id(), request.is_public)
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/{id}/export/{format}")]
async fn export_content(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (id, format) = path.into_inner();
    let format: ExportFormat = format.parse().map_err(AppError::ValidationError)?;

    let document = state
        .content_service
        .export_owned(&id, auth.user_id(), format)
        .await?;
    Ok(attachment(document))
}
