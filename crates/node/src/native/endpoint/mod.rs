//! floodkv node http service: the transport adapter in front of the
//! [Processor].
#![warn(missing_docs)]
mod http_error;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Query;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use floodkv_rpc::types::*;
use tower_http::cors::CorsLayer;

use self::http_error::HttpError;
use crate::processor::LookupResult;
use crate::processor::Processor;

/// Build the node's http router.
///
/// Every route maps one rpc method onto the processor; an inbound lookup
/// may in turn issue outbound lookups to peers through the processor's
/// transport. Dropping a request mid-flight (caller disconnect) drops the
/// handler future and with it any fan-out still running.
pub fn router(processor: Arc<Processor>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/get", get(get_handler))
        .route("/store", post(store_handler))
        .route("/connect", post(connect_handler))
        .route("/lookup", get(lookup_handler))
        .with_state(processor)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(node_version_header))
}

/// Run the node's web server until it exits.
pub async fn run_service(addr: String, processor: Arc<Processor>) -> anyhow::Result<()> {
    let binding_addr: SocketAddr = addr.parse()?;

    let axum_make_service = router(processor).into_make_service();

    println!("endpoint: http://{binding_addr}");
    axum::Server::bind(&binding_addr)
        .serve(axum_make_service)
        .await?;
    Ok(())
}

async fn node_version_header<B>(
    req: http::Request<B>,
    next: axum::middleware::Next<B>,
) -> axum::response::Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    if let Ok(version) = http::HeaderValue::from_str(crate::util::build_version().as_str()) {
        headers.insert("X-NODE-VERSION", version);
    }
    res
}

async fn status_handler(
    State(processor): State<Arc<Processor>>,
) -> Result<Json<StatusResponse>, HttpError> {
    Ok(Json(processor.node_info()))
}

async fn get_handler(
    State(processor): State<Arc<Processor>>,
    Query(query): Query<GetQuery>,
) -> Result<Json<GetResponse>, HttpError> {
    let value = processor.get(&query.key)?;
    Ok(Json(GetResponse {
        key: query.key,
        value,
    }))
}

async fn store_handler(
    State(processor): State<Arc<Processor>>,
    Json(req): Json<StoreRequest>,
) -> Result<Json<StoreResponse>, HttpError> {
    processor.store(&req.key, &req.value)?;
    Ok(Json(StoreResponse { key: req.key }))
}

async fn connect_handler(
    State(processor): State<Arc<Processor>>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, HttpError> {
    processor.connect(&req.endpoint)?;
    Ok(Json(ConnectResponse {
        endpoint: req.endpoint,
    }))
}

async fn lookup_handler(
    State(processor): State<Arc<Processor>>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, HttpError> {
    let hops = query.hops.unwrap_or_else(|| processor.hop_budget());

    match processor.lookup(&query.key, hops).await? {
        LookupResult::Found(node) => Ok(Json(LookupResponse { node })),
        LookupResult::NotFound => Err(HttpError::NotFound(format!(
            "key {} not found within hop budget",
            query.key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::StatusCode;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use super::*;
    use crate::processor::ProcessorBuilder;
    use crate::processor::ProcessorConfig;

    fn prepare_router() -> Router {
        let config = ProcessorConfig::new("127.0.0.1:9000".to_string());
        let processor = Arc::new(ProcessorBuilder::from_config(&config).build().unwrap());
        router(processor)
    }

    async fn body_json<T: DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &impl serde::Serialize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_store_then_get() {
        let app = prepare_router();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/store",
                &StoreRequest {
                    key: "x".to_string(),
                    value: "42".to_string(),
                },
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let stored: StoreResponse = body_json(resp).await;
        assert_eq!(stored.key, "x");

        let resp = app.clone().oneshot(get_req("/get?key=x")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let got: GetResponse = body_json(resp).await;
        assert_eq!(got.value, "42");
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let app = prepare_router();
        let resp = app.oneshot(get_req("/get?key=absent")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = body_json(resp).await;
        assert!(err.error.contains("absent"));
    }

    #[tokio::test]
    async fn test_store_empty_key_is_400() {
        let app = prepare_router();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/store",
                &StoreRequest {
                    key: String::new(),
                    value: "v".to_string(),
                },
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app.oneshot(get_req("/status")).await.unwrap();
        let status: StatusResponse = body_json(resp).await;
        assert_eq!(status.storage, 0);
    }

    #[tokio::test]
    async fn test_lookup_local_hit_and_miss() {
        let app = prepare_router();

        app.clone()
            .oneshot(post_json(
                "/store",
                &StoreRequest {
                    key: "x".to_string(),
                    value: "42".to_string(),
                },
            ))
            .await
            .unwrap();

        let resp = app.clone().oneshot(get_req("/lookup?key=x")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let found: LookupResponse = body_json(resp).await;
        assert_eq!(found.node, "127.0.0.1:9000");

        // No peers registered, so a miss exhausts immediately.
        let resp = app.oneshot(get_req("/lookup?key=y&hops=6")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_connect_and_status_counts() {
        let app = prepare_router();

        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(post_json(
                    "/connect",
                    &ConnectRequest {
                        endpoint: "127.0.0.1:9001".to_string(),
                    },
                ))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = app.oneshot(get_req("/status")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("X-NODE-VERSION"));
        let status: StatusResponse = body_json(resp).await;
        assert_eq!(status.connections, 1);
        assert_eq!(status.address, "127.0.0.1:9000");
    }
}
