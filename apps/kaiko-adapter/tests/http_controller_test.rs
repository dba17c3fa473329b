//! HTTP Integration Tests
//!
//! Drives the full router → job runner → use cases → domain path against
//! in-memory market data.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

use kaiko_adapter::infrastructure::metrics::init_metrics;
use kaiko_adapter::{
    AppState, AssetCode, JobDefaults, JobRunner, QuoteAssetResolver, Region, StaticMarketData,
    create_router,
};

fn asset(code: &str) -> AssetCode {
    AssetCode::parse(code).unwrap()
}

/// AMPL trades against USD directly and against USDT, which trades at par.
fn market() -> Arc<StaticMarketData> {
    Arc::new(
        StaticMarketData::new()
            .with_rate(&asset("ampl"), &asset("usd"), dec!(1.0), dec!(100))
            .with_rate(&asset("ampl"), &asset("usdt"), dec!(1.2), dec!(300))
            .with_rate(&asset("usdt"), &asset("usd"), dec!(1.0), dec!(5000)),
    )
}

fn app(market: Arc<StaticMarketData>) -> axum::Router {
    let resolver = QuoteAssetResolver::new(vec![asset("usd"), asset("usdt")]);
    let runner = JobRunner::new(market, resolver, JobDefaults::default());
    create_router(AppState {
        runner: Arc::new(runner),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn post_job(job: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(job).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn blends_direct_and_chained_markets() {
    let response = app(market())
        .oneshot(post_job(&json!({ "id": 42, "data": { "coin": "AMPL" } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["jobRunID"], "42");
    assert_eq!(body["statusCode"], 200);

    // (1.0 × 100 + 1.2 × 300) / 400
    assert_eq!(decimal(&body["result"]), dec!(1.15));
    assert_eq!(decimal(&body["data"]["price"]), dec!(1.15));
    assert_eq!(decimal(&body["data"]["volume"]), dec!(400));
    assert_eq!(body["data"]["baseAsset"], "ampl");
    assert_eq!(body["data"]["interval"], "1d");

    let constituents = body["data"]["constituents"].as_array().unwrap();
    assert_eq!(constituents.len(), 2);
    assert_eq!(constituents[0]["quoteAsset"], "usd");
    assert_eq!(constituents[1]["quoteAsset"], "usdt");
    assert_eq!(decimal(&constituents[1]["price"]), dec!(1.2));
}

#[tokio::test]
async fn missing_usd_leg_fails_the_job() {
    let market = Arc::new(
        StaticMarketData::new()
            .with_rate(&asset("ampl"), &asset("usd"), dec!(1.0), dec!(100))
            .with_rate(&asset("ampl"), &asset("usdt"), dec!(1.2), dec!(300)),
    );

    let response = app(market)
        .oneshot(post_job(&json!({ "id": "j", "data": {} })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["status"], "errored");
    assert_eq!(body["error"], "No market data for usdt-usd");
}

#[tokio::test]
async fn zero_volume_everywhere_is_unprocessable() {
    let market = Arc::new(
        StaticMarketData::new()
            .with_rate(&asset("ampl"), &asset("usd"), dec!(1.0), dec!(0))
            .with_rate(&asset("ampl"), &asset("usdt"), dec!(1.2), dec!(0))
            .with_rate(&asset("usdt"), &asset("usd"), dec!(1.0), dec!(5000)),
    );

    let response = app(market)
        .oneshot(post_job(&json!({ "id": "z", "data": {} })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["jobRunID"], "z");
    assert_eq!(body["statusCode"], 422);
}

#[tokio::test]
async fn forward_job_reaches_provider() {
    let market = market();
    market.set_forward_response(200, json!({ "result": "success", "data": [1, 2] }));
    let endpoint = "v1/data/trades.v1/exchanges/cbse/spot/btc-usd/aggregations/ohlcv/recent";

    let response = app(Arc::clone(&market))
        .oneshot(post_job(&json!({
            "id": "fwd",
            "data": { "region": "eu", "endpoint": endpoint, "params": "interval=1m" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["data"], json!([1, 2]));

    let forwarded = market.forwarded();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded[0].region, Region::Eu);
    assert_eq!(forwarded[0].endpoint, endpoint);
    assert_eq!(forwarded[0].params, "interval=1m");
}

#[tokio::test]
async fn forward_job_rejects_unknown_endpoint() {
    let market = market();

    let response = app(Arc::clone(&market))
        .oneshot(post_job(&json!({
            "id": "bad",
            "data": { "region": "us", "endpoint": "v1/reference/assets", "params": "a=b" }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid endpoint");
    assert!(market.forwarded().is_empty());
}

#[tokio::test]
async fn forward_job_surfaces_upstream_error() {
    let market = market();
    market.set_forward_response(404, json!({ "message": "not found" }));

    let response = app(market)
        .oneshot(post_job(&json!({
            "id": "nf",
            "data": {
                "region": "us",
                "endpoint": "v1/data/trades.v1/spot_direct_exchange_rate/xyz/usd/recent",
                "params": "interval=1d"
            }
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], "errored");
    assert_eq!(body["error"]["message"], "not found");
}

#[tokio::test]
async fn metrics_endpoint_reports_jobs() {
    init_metrics().unwrap();
    let app = app(market());

    let job = app
        .clone()
        .oneshot(post_job(&json!({ "id": "m", "data": {} })))
        .await
        .unwrap();
    assert_eq!(job.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("kaiko_adapter_jobs_total"));
}

#[tokio::test]
async fn malformed_jobs_are_counted_as_invalid() {
    init_metrics().unwrap();
    let app = app(market());

    let rejected = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from("{\"id\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.lines().any(|line| {
        line.starts_with("kaiko_adapter_jobs_total")
            && line.contains("entrypoint=\"http\"")
            && line.contains("kind=\"invalid\"")
            && line.contains("outcome=\"errored\"")
    }));
}
