use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use deep_space_api::app_state::{AppConfig, AppState};
use deep_space_api::server;
use serde_json::json;

// State with no loadable model and an upstream that refuses connections.
fn degraded_state() -> AppState {
    let config = AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        model_path: "does-not-exist.onnx".into(),
        nasa_base_url: "http://127.0.0.1:1".into(),
        api_key: "DEMO_KEY".into(),
        timeout: 5,
    };
    AppState::new(&config).unwrap()
}

#[actix_web::test]
async fn index_reports_online_status_and_endpoints() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(degraded_state()))
            .service(server::index),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "online");
    let endpoints = body["endpoints"].as_array().unwrap();
    for e in ["/predict", "/asteroids", "/apod"] {
        assert!(endpoints.contains(&json!(e)));
    }
}

#[actix_web::test]
async fn predict_without_model_returns_clean_503() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(degraded_state()))
            .service(server::predict),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header((
            "content-type",
            "multipart/form-data; boundary=XBOUNDARYX",
        ))
        .set_payload("--XBOUNDARYX--\r\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn asteroids_failure_returns_envelope_with_http_200() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(degraded_state()))
            .service(server::asteroids),
    )
    .await;
    let req = test::TestRequest::get()
        .uri("/asteroids?date=2024-01-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    // Degraded but available: the error rides in the body, not the status.
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn apod_failure_uses_the_same_envelope_policy() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(degraded_state()))
            .service(server::apod),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/apod").to_request()).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}
