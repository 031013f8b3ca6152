//! Notes REST API: list/create on the collection, get/replace/delete by id.

use actix_web::{web, HttpResponse};

use crate::codec;
use crate::error::ApiError;
use crate::AppState;

/// List every note
async fn list_notes(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let notes = data.db.list_notes()?;
    Ok(HttpResponse::Ok().json(codec::encode_all(&notes)))
}

/// Create a note from a JSON body
async fn create_note(
    data: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let draft = codec::decode_draft(&codec::parse_body(&body)?)?;
    let note = data.db.create_note(&draft)?;
    Ok(HttpResponse::Created().json(codec::encode(&note)))
}

async fn get_note(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let note = data.db.get_note(path.into_inner())?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(codec::encode(&note)))
}

/// Replace every writable field of an existing note
async fn update_note(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    // A missing note is reported before the body is looked at.
    if data.db.get_note(id)?.is_none() {
        return Err(ApiError::NotFound);
    }

    let draft = codec::decode_draft(&codec::parse_body(&body)?)?;
    let note = data.db.update_note(id, &draft)?.ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(codec::encode(&note)))
}

async fn delete_note(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    if data.db.delete_note(path.into_inner())? {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(ApiError::NotFound)
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/notes/")
            .route(web::get().to(list_notes))
            .route(web::post().to(create_note)),
    );
    cfg.service(
        web::resource("/notes/{id}/")
            // Non-integer ids don't name a note
            .app_data(web::PathConfig::default().error_handler(|_, _| ApiError::NotFound.into()))
            .route(web::get().to(get_note))
            .route(web::put().to(update_note))
            .route(web::delete().to(delete_note)),
    );
}
