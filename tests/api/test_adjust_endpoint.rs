// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /api/adjust

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::json;
use tower::util::ServiceExt;

use super::helpers::*;

fn png_data_url(width: u32, height: u32) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(width, height)))
}

#[tokio::test]
async fn test_adjust_brightness_and_saturation() {
    let body = json!({
        "image": png_data_url(20, 10),
        "options": {"adjustments": {"brightness": 1.2, "saturation": 0.5}}
    });
    let response = test_app()
        .oneshot(json_request("/api/adjust", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["enhancedImage"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
    assert_eq!(json["width"], 20);
    assert_eq!(json["height"], 10);
    assert!(json.get("mode").is_none());
}

#[tokio::test]
async fn test_adjust_accepts_bare_base64() {
    let body = json!({ "image": STANDARD.encode(png_bytes(8, 8)) });
    let response = test_app()
        .oneshot(json_request("/api/adjust", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_adjust_with_crop() {
    let body = json!({
        "image": png_data_url(30, 30),
        "options": {"crop": {"x": 10, "y": 5, "width": 12, "height": 8}}
    });
    let response = test_app()
        .oneshot(json_request("/api/adjust", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["width"], 12);
    assert_eq!(json["height"], 8);
}

#[tokio::test]
async fn test_adjust_missing_image() {
    let response = test_app()
        .oneshot(json_request("/api/adjust", r#"{"options":{}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "No image provided");
}

#[tokio::test]
async fn test_adjust_malformed_json() {
    let response = test_app()
        .oneshot(json_request("/api/adjust", "{\"image\": "))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["errorType"], "invalid_request");
}

#[tokio::test]
async fn test_adjust_invalid_base64() {
    let response = test_app()
        .oneshot(json_request(
            "/api/adjust",
            r#"{"image":"data:image/png;base64,!!!not-base64!!!"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_adjust_zero_brightness_rejected() {
    let body = json!({
        "image": png_data_url(8, 8),
        "options": {"adjustments": {"brightness": 0}}
    });
    let response = test_app()
        .oneshot(json_request("/api/adjust", &body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
