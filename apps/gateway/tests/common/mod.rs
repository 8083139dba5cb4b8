#![allow(dead_code)]

// tests/common/mod.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpRequest, HttpResponse, HttpServer};
use gateway::config::auth::{AuthConfig, DEV_SECRET};
use gateway::config::upstreams::UpstreamConfig;
use gateway::AppState;
use gateway::UserClaims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

// Logging is auto-installed for most test binaries
#[ctor::ctor]
fn init_logging() {
    gateway_test_support::logging::init();
}

pub const TEST_PUBLIC_PEM: &str = include_str!("../fixtures/test_rsa_public.pem");
pub const TEST_PRIVATE_PEM: &str = include_str!("../fixtures/test_rsa_private.pem");

pub fn seller_claims(id: i64) -> UserClaims {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    UserClaims {
        id,
        email: format!("seller{id}@example.test"),
        name: format!("Seller {id}"),
        role: "SELLER".to_string(),
        iat: Some(now),
        exp: now + 24 * 60 * 60,
    }
}

pub fn mint_rs256(claims: &UserClaims) -> String {
    let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_PEM.as_bytes()).unwrap();
    encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}

pub fn mint_dev_secret(claims: &UserClaims) -> String {
    let key = EncodingKey::from_secret(DEV_SECRET.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key).unwrap()
}

/// AppState with every upstream pointed at `base_url`.
pub fn app_state_for(base_url: &str, auth: AuthConfig) -> AppState {
    let upstreams = UpstreamConfig {
        users: base_url.to_string(),
        stores: base_url.to_string(),
        bookings: base_url.to_string(),
        payments: base_url.to_string(),
    };
    AppState::new(upstreams, auth)
}

/// AppState whose upstreams all point at a closed port.
pub fn app_state_unroutable(auth: AuthConfig) -> AppState {
    app_state_for("http://127.0.0.1:9", auth)
}

/// Assert the stable error contract on a gateway response.
pub async fn assert_problem_details(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_detail_contains: Option<&str>,
) -> Value {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;

    gateway_test_support::problem_details::assert_problem_details_parts(
        status,
        &headers,
        &body,
        expected_status,
        expected_code,
        expected_detail_contains,
    );

    serde_json::from_slice(&body).unwrap()
}

/// Behavior of the stub backend shared by proxy and dashboard tests.
#[derive(Default)]
pub struct StubConfig {
    /// `myStores` result.
    pub stores: Vec<Value>,
    /// `storeBookings` result per store id.
    pub bookings_by_store: HashMap<String, Vec<Value>>,
    /// `paymentsByStores` result.
    pub payments: Vec<Value>,
    /// Serve a 500 from the payments query.
    pub fail_payments: bool,
}

/// In-process backend standing in for all four services.
pub struct StubBackend {
    config: StubConfig,
    pub stores_calls: AtomicUsize,
    pub bookings_calls: AtomicUsize,
    pub payments_calls: AtomicUsize,
}

impl StubBackend {
    pub fn new(config: StubConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            stores_calls: AtomicUsize::new(0),
            bookings_calls: AtomicUsize::new(0),
            payments_calls: AtomicUsize::new(0),
        })
    }
}

async fn stub_graphql(stub: web::Data<Arc<StubBackend>>, body: web::Json<Value>) -> HttpResponse {
    let query = body["query"].as_str().unwrap_or("");

    if query.contains("myStores") {
        stub.stores_calls.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().json(json!({ "data": { "myStores": stub.config.stores } }))
    } else if query.contains("storeBookings") {
        stub.bookings_calls.fetch_add(1, Ordering::SeqCst);
        let store_id = body["variables"]["storeId"].as_str().unwrap_or("");
        let bookings = stub
            .config
            .bookings_by_store
            .get(store_id)
            .cloned()
            .unwrap_or_default();
        HttpResponse::Ok().json(json!({ "data": { "storeBookings": bookings } }))
    } else if query.contains("paymentsByStores") {
        stub.payments_calls.fetch_add(1, Ordering::SeqCst);
        if stub.config.fail_payments {
            HttpResponse::InternalServerError().json(json!({ "error": "payment backend down" }))
        } else {
            HttpResponse::Ok().json(json!({ "data": { "paymentsByStores": stub.config.payments } }))
        }
    } else {
        HttpResponse::BadRequest().json(json!({ "errors": [{ "message": "unknown query" }] }))
    }
}

async fn stub_public_key() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "publicKey": TEST_PUBLIC_PEM }))
}

/// Echoes method, path and the identity-bearing headers, so tests can see
/// exactly what the gateway forwarded.
async fn stub_echo(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    HttpResponse::Ok().json(json!({
        "method": req.method().as_str(),
        "path": req.path(),
        "query": req.query_string(),
        "user": header("user"),
        "authorization": header("authorization"),
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Run the stub backend on its own system thread; returns its base URL.
pub fn spawn_stub(stub: Arc<StubBackend>) -> String {
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        actix_web::rt::System::new().block_on(async move {
            let data = web::Data::new(stub);
            let server = HttpServer::new(move || {
                App::new()
                    .app_data(data.clone())
                    .route("/graphql", web::post().to(stub_graphql))
                    .route("/api/public-key", web::get().to(stub_public_key))
                    .default_service(web::to(stub_echo))
            })
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("failed to bind stub backend");

            tx.send(server.addrs()[0]).expect("report stub address");
            server.run().await.expect("stub backend crashed");
        });
    });

    let addr = rx.recv().expect("stub backend failed to start");
    format!("http://{addr}")
}
