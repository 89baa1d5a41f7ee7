use std::error::Error;

use bytes::Bytes;
use http::Request;
use http_body_util::{BodyExt, Full};
use replay_http::handler::{CaptureBody, Handler, make_handler};
use replay_http::protocol::{CapturedRequest, HttpRequest};
use serde::Deserialize;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Deserialize, Debug)]
struct Order {
    item: String,
    quantity: u32,
}

async fn log_then_handle(request: CapturedRequest) -> Result<String, Box<dyn Error + Send + Sync>> {
    let body = request.body().collect().await?.to_bytes();
    info!(method = %request.method(), path = request.path(), body = %String::from_utf8_lossy(&body), "receiving request body");

    let order: Order = request.json()?;
    info!(?order, "order accepted");

    Ok(format!("{} x {}", order.quantity, order.item))
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let handler = CaptureBody::new(make_handler(log_then_handle));

    let request = Request::post("/orders")
        .header(http::header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Full::new(Bytes::from_static(b"{\"item\":\"book\",\"quantity\":2}")))
        .expect("request should be valid");

    match handler.call(request).await {
        Ok(summary) => info!(%summary, "finished process"),
        Err(e) => error!(cause = %e, "process request failed"),
    }
}
