use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Instant,
};

use anyhow::{Context as _, Result};
use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, Request},
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{AppendHeaders, Html, IntoResponse},
    routing::*,
};
use axum_extra::response::ErasedJson;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{ServiceBuilderExt, cors::CorsLayer, request_id::MakeRequestUuid, trace::TraceLayer};
use tracing::debug_span;
use tracing_subscriber::{EnvFilter, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt};
use visitor_info::{Visitor, VisitorCity, VisitorCountry, VisitorInfoExt as _, VisitorIp};

mod data;

#[cfg(test)]
mod tests;

const DEFAULT_PORT: u16 = 3000;

fn app() -> Router<()> {
    let router = Router::new()
        .route("/", get(index))
        .merge(
            Router::new()
                .route("/ip", any(ip))
                .route("/country", any(country))
                .route("/city", any(city))
                .route("/visitor", any(visitor)),
        )
        .route("/headers", any(headers))
        .fallback(not_found);

    let service = ServiceBuilder::default()
        .compression()
        .set_x_request_id(MakeRequestUuid)
        .propagate_x_request_id()
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request.headers().get("x-request-id").and_then(|v| v.to_str().ok());
            let matched_path = request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
            let method = request.method().as_str();
            let visitor_ip = request.visitor_ip();
            debug_span!("request", method, matched_path, request_id, visitor_ip = visitor_ip.as_str())
        }))
        .layer(CorsLayer::very_permissive())
        .layer({
            async fn server_timing(request: Request, next: middleware::Next) -> impl IntoResponse {
                let before = Instant::now();
                let resp = next.run(request).await;
                let after = Instant::now();
                (
                    AppendHeaders([("Server-Timing", format!("total;dur={}", (after - before).as_millis()))]),
                    resp,
                )
            }
            middleware::from_fn(server_timing)
        });

    router.layer(service)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(layer().json())
        .init();
    let port = port_from_env()?;
    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    start_server(listener).await
}

fn port_from_env() -> Result<u16> {
    match std::env::var("PORT") {
        Ok(port) => port.parse().with_context(|| format!("invalid PORT value {port:?}")),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

pub(crate) async fn start_server(listener: TcpListener) -> Result<()> {
    let app = app();
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("server stopped")
}

async fn index() -> Html<String> {
    let md = include_str!("../README.md");
    Html(
        markdown::to_html_with_options(md, &markdown::Options::gfm()).unwrap_or_default()
            // language=html
            + indoc::indoc!(r#"
<style>
  @media (prefers-color-scheme: dark) {
    html {
      filter: invert(1);
    }
    body {
      background-color: white;
    }
  }
</style>
    "#),
    )
}

async fn ip(VisitorIp(origin): VisitorIp) -> impl IntoResponse {
    ErasedJson::pretty(data::Ip { origin })
}

async fn country(VisitorCountry(country): VisitorCountry) -> impl IntoResponse {
    ErasedJson::pretty(data::Country { country })
}

async fn city(VisitorCity(city): VisitorCity) -> impl IntoResponse {
    ErasedJson::pretty(data::City { city })
}

async fn visitor(visitor: Visitor) -> impl IntoResponse {
    ErasedJson::pretty(visitor)
}

async fn headers(header_map: HeaderMap) -> impl IntoResponse {
    ErasedJson::pretty(data::Headers::from(&header_map))
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        ErasedJson::pretty(data::ErrorDetail::new(404, "Not Found", format!("no route for {}", uri.path()))),
    )
}
