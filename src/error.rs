use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;

/// Errors on the prediction path, mapped onto HTTP responses with a JSON
/// `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("no file field found in multipart upload")]
    MissingUpload,

    #[error("classification model is not loaded")]
    ModelUnavailable,

    #[error("inference failed: {0}")]
    Inference(String),
}

impl actix_web::ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            PredictError::Decode(_) | PredictError::MissingUpload => StatusCode::BAD_REQUEST,
            PredictError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
