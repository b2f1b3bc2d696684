// tests/common/request.rs
use axum::{
    body::{self, Body},
    http::{header, Method, Request},
    response::Response,
};
use serde::Serialize;
use serde_json::Value;

/// 認証付きのHTTPリクエストを作成
pub fn create_request<T: Serialize>(
    method: &str,
    uri: &str,
    token: &str,
    body: &T,
) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let body_json = serde_json::to_string(body).unwrap();

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body_json))
        .unwrap()
}

/// ボディなしの認証付きリクエストを作成
pub fn create_empty_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// レスポンスボディをJSONとして読み出す
pub async fn body_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
