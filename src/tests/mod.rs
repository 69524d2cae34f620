use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Ok, Result};
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, StatusCode},
};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt as _;

use super::*;
use crate::tests::ext::BodyExt as _;


#[tokio::test]
async fn index() -> Result<()> {
    let response = app().oneshot(Request::builder().uri("/").body(Body::empty())?).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().body_as_string().await;
    assert!(body.contains("visitor-info"));
    Ok(())
}

#[tokio::test]
async fn not_found() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/does-not-exist").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response.body_as_json().await;
    assert_eq!(
        body,
        json!({
            "status_code": 404,
            "error": "Not Found",
            "detail": "no route for /does-not-exist"
        })
    );
    Ok(())
}

#[tokio::test]
async fn ip_without_any_source_is_empty() -> Result<()> {
    let response = app().oneshot(Request::builder().uri("/ip").body(Body::empty())?).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body_as_json().await, json!({"origin": ""}));
    Ok(())
}

#[tokio::test]
async fn ip_prefers_cloudflare_header() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/ip")
                .header("X-Real-IP", "9.9.9.9")
                .header("CF-Connecting-IP", "1.1.1.1")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.body_as_json().await, json!({"origin": "1.1.1.1"}));
    Ok(())
}

#[tokio::test]
async fn ip_falls_back_to_peer_address() -> Result<()> {
    let response = app()
        .layer(MockConnectInfo(SocketAddr::from(([203, 0, 113, 7], 51000))))
        .oneshot(Request::builder().uri("/ip").body(Body::empty())?)
        .await?;

    assert_eq!(response.body_as_json().await, json!({"origin": "203.0.113.7"}));
    Ok(())
}

#[tokio::test]
async fn ip_joins_repeated_forwarded_for() -> Result<()> {
    let response = app()
        .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 51000))))
        .oneshot(
            Request::builder()
                .uri("/ip")
                .header("x-forwarded-for", "198.51.100.1")
                .header("x-forwarded-for", "198.51.100.2")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.body_as_json().await, json!({"origin": "198.51.100.1,198.51.100.2"}));
    Ok(())
}

#[test_case::test_case("CF-IPCountry", "US")]
#[test_case::test_case("X-GeoIP-Country", "DE")]
#[test_case::test_case("x-azure-clientip-country", "BR")]
#[tokio::test]
async fn country(header: &str, value: &str) -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/country").header(header, value).body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body_as_json().await, json!({"country": value}));
    Ok(())
}

#[test_case::test_case("CloudFront-Viewer-City", "Paris")]
#[test_case::test_case("X-City-Name", "Oslo")]
#[tokio::test]
async fn city(header: &str, value: &str) -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/city").header(header, value).body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body_as_json().await, json!({"city": value}));
    Ok(())
}

#[tokio::test]
async fn city_ignores_country_headers() -> Result<()> {
    let response = app()
        .oneshot(Request::builder().uri("/city").header("CF-IPCountry", "US").body(Body::empty())?)
        .await?;

    assert_eq!(response.body_as_json().await, json!({"city": ""}));
    Ok(())
}

#[tokio::test]
async fn visitor() -> Result<()> {
    let response = app()
        .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 51000))))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/visitor")
                .header("X-Forwarded-Country", "CA")
                .header("X-Country-Code", "MX")
                .header("X-AppEngine-City", "toronto")
                .header("True-Client-IP", "192.0.2.44")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.body_as_json().await,
        json!({
            "ip": "192.0.2.44",
            "country": "MX",
            "city": "toronto"
        })
    );
    Ok(())
}

#[tokio::test]
async fn headers() -> Result<()> {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/headers")
                .header("X-Custom-Header", "CustomValue")
                .header("x-forwarded-for", "1.2.3.4")
                .header("x-forwarded-for", "5.6.7.8")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.body_as_json().await;
    assert_eq!(body["headers"]["x-custom-header"], json!(["CustomValue"]));
    assert_eq!(body["headers"]["x-forwarded-for"], json!(["1.2.3.4", "5.6.7.8"]));
    Ok(())
}

#[tokio::test]
async fn response_carries_request_id_and_timing() -> Result<()> {
    let response = app().oneshot(Request::builder().uri("/ip").body(Body::empty())?).await?;

    assert!(response.headers().contains_key("x-request-id"));
    let timing = response.headers().get("server-timing").unwrap().to_str()?;
    assert!(timing.starts_with("total;dur="));
    Ok(())
}

#[tokio::test]
async fn the_real_deal() -> Result<()> {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(start_server(listener));

    let client = Client::builder(TokioExecutor::new()).build_http();

    let response = client
        .request(Request::builder().uri(format!("http://{addr}/ip")).body(Body::empty())?)
        .await?;

    let body = response.body_as_json().await;
    assert_eq!(
        body,
        json! {
            {"origin": "127.0.0.1"}
        }
    );
    Ok(())
}
