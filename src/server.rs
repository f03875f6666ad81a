use crate::app_state::{AppConfig, AppState};
use crate::error::PredictError;
use crate::io_struct::{AsteroidsQuery, PredictResponse, StatusResponse};
use crate::nasa::error_envelope;
use crate::preprocess::image_to_tensor;
use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, HttpServer, get, post, web};
use futures_util::TryStreamExt;
use std::io::Write;

#[get("/")]
pub async fn index(_: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse::online())
}

/// Drains the multipart payload and returns the first non-empty field, which
/// is treated as the uploaded image regardless of its field name.
async fn read_upload(mut payload: Multipart) -> Result<web::BytesMut, actix_web::Error> {
    let mut data = web::BytesMut::new();
    while let Some(mut field) = payload.try_next().await? {
        while let Some(chunk) = field.try_next().await? {
            data.extend_from_slice(&chunk);
        }
        if !data.is_empty() {
            break;
        }
    }
    if data.is_empty() {
        return Err(PredictError::MissingUpload.into());
    }
    Ok(data)
}

#[post("/predict")]
pub async fn predict(
    payload: Multipart,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let classifier = app_state
        .classifier
        .as_ref()
        .ok_or(PredictError::ModelUnavailable)?;
    let bytes = read_upload(payload).await?;
    let tensor = image_to_tensor(&bytes)?;
    let scores = classifier.predict(&tensor)?;
    Ok(HttpResponse::Ok().json(PredictResponse::from_scores(&scores)))
}

#[get("/asteroids")]
pub async fn asteroids(
    query: web::Query<AsteroidsQuery>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    match app_state.nasa.neo_feed(&query.date).await {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::warn!("NeoWs feed failed for {}: {}", query.date, e);
            HttpResponse::Ok().json(error_envelope(&e))
        }
    }
}

#[get("/apod")]
pub async fn apod(app_state: web::Data<AppState>) -> HttpResponse {
    match app_state.nasa.apod().await {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::warn!("APOD feed failed: {}", e);
            HttpResponse::Ok().json(error_envelope(&e))
        }
    }
}

// default level is info
pub fn init_logging() {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .init();
}

pub async fn startup(config: AppConfig, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);

    log::info!("Starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        // The dashboard is served from a different origin in development.
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(cors)
            .app_data(app_state.clone())
            .service(index)
            .service(predict)
            .service(asteroids)
            .service(apod)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}
