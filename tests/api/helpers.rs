// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared request builders for the API tests

use std::io::Cursor;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use image::{ImageFormat, Rgb, RgbImage};
use photo_studio::api::{create_app, AppState};
use serde_json::Value;

pub const BOUNDARY: &str = "----photostudio-test-boundary";

/// A small gradient so normalize and the recipes have something to work on
pub fn test_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (40 + x * 150 / width.max(1)) as u8,
            (60 + y * 120 / height.max(1)) as u8,
            90,
        ])
    })
}

pub fn encode_image(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Pseudo-random pixels; PNG cannot compress these much
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut seed: u32 = 0x1234_5678;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (seed >> 24) as u8
        };
        Rgb([next(), next(), next()])
    });
    encode_image(&img, ImageFormat::Png)
}

/// JPEG carrying an EXIF orientation tag, as phone cameras write them
pub fn jpeg_with_orientation(img: &RgbImage, orientation: u8) -> Vec<u8> {
    let jpeg = encode_image(img, ImageFormat::Jpeg);
    #[rustfmt::skip]
    let app1 = [
        0xFF, 0xE1, 0x00, 0x22,
        b'E', b'x', b'i', b'f', 0, 0,
        b'M', b'M', 0x00, 0x2A, 0, 0, 0, 8,
        0x00, 0x01,
        0x01, 0x12, 0x00, 0x03, 0, 0, 0, 1, 0, orientation, 0, 0,
        0, 0, 0, 0,
    ];
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode_image(&test_image(width, height), ImageFormat::Png)
}

/// Hand-built multipart/form-data body
pub fn multipart_body(image: Option<(&[u8], &str)>, options: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some((bytes, content_type)) = image {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"photo\"\r\n",
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(options) = options {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"options\"\r\n\r\n");
        body.extend_from_slice(options.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, image: Option<(&[u8], &str)>, options: Option<&str>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(image, options)))
        .unwrap()
}

pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn test_app() -> Router {
    create_app(Arc::new(AppState::new_for_test()))
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Decode the base64 payload of a `data:` URL
pub fn data_url_bytes(data_url: &str) -> Vec<u8> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let (_, payload) = data_url.split_once(',').unwrap();
    STANDARD.decode(payload).unwrap()
}
