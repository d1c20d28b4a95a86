use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use server::routes::{self, auth::AuthEndpoint};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::store::mock::{MockAuthStore, MockAuthTransaction};
use service::auth::{AccountService, AuthConfig, AuthError, AuthRequest, AuthService, AuthStore, User};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn app_with<A: AuthService>(svc: Arc<A>) -> Router {
    routes::build_router(AuthEndpoint::new(svc), cors())
}

fn accounts() -> (Arc<AccountService<MockAuthStore>>, Router) {
    let svc = Arc::new(AccountService::new(Arc::new(MockAuthStore::default()), AuthConfig::default()));
    (Arc::clone(&svc), app_with(svc))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Collaborator with a scripted outcome that counts calls.
struct ScriptedAuth {
    store: MockAuthStore,
    outcome: fn() -> Result<User, AuthError>,
    calls: AtomicUsize,
}

impl ScriptedAuth {
    fn new(outcome: fn() -> Result<User, AuthError>) -> Arc<Self> {
        Arc::new(Self { store: MockAuthStore::default(), outcome, calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl AuthService for ScriptedAuth {
    type Tx = MockAuthTransaction;

    async fn begin(&self) -> Result<Self::Tx, AuthError> {
        self.store.begin().await
    }

    async fn signup(&self, _tx: &Self::Tx, _input: AuthRequest) -> Result<User, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }

    async fn login(&self, _input: AuthRequest) -> Result<User, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}

fn fixed_user() -> Result<User, AuthError> {
    Ok(User {
        id: 1,
        email: "a@x.com".into(),
        is_verified: false,
        is_admin: false,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        last_login: None,
    })
}

#[tokio::test]
async fn signup_returns_exact_user_fields() {
    let svc = ScriptedAuth::new(fixed_user);
    let app = app_with(Arc::clone(&svc));

    let (status, body) = send(&app, post_json("/api/auth/signup", json!({"email": "a@x.com", "password": "p"}))).await;
    assert_eq!(status, StatusCode::OK);
    let got: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        got,
        json!({
            "id": 1,
            "email": "a@x.com",
            "isVerified": false,
            "isAdmin": false,
            "createdAt": "2024-05-01T12:00:00Z",
            "lastLogin": null
        })
    );
    assert_eq!(svc.store.tx_log().committed(), 1);
    assert_eq!(svc.store.tx_log().rolled_back(), 0);
}

#[tokio::test]
async fn every_failure_kind_is_bare_bad_request() {
    let outcomes: [fn() -> Result<User, AuthError>; 6] = [
        || Err(AuthError::Conflict),
        || Err(AuthError::Unauthorized),
        || Err(AuthError::Validation("email".into())),
        || Err(AuthError::HashError("argon2".into())),
        || Err(AuthError::Transaction("lost connection".into())),
        || Err(AuthError::Repository("duplicate email".into())),
    ];
    for outcome in outcomes {
        for uri in ["/api/auth/signup", "/api/auth/login"] {
            let svc = ScriptedAuth::new(outcome);
            let app = app_with(Arc::clone(&svc));
            let (status, body) = send(&app, post_json(uri, json!({"email": "a@x.com", "password": "p"}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body.is_empty(), "{uri} leaked a body: {:?}", String::from_utf8_lossy(&body));
            assert_eq!(svc.store.tx_log().committed(), 0);
        }
    }
}

#[tokio::test]
async fn failed_signup_rolls_back_and_login_opens_no_scope() {
    let svc = ScriptedAuth::new(|| Err(AuthError::Conflict));
    let app = app_with(Arc::clone(&svc));

    send(&app, post_json("/api/auth/signup", json!({"email": "a@x.com", "password": "p"}))).await;
    assert_eq!(svc.store.tx_log().begun(), 1);
    assert_eq!(svc.store.tx_log().rolled_back(), 1);

    send(&app, post_json("/api/auth/login", json!({"email": "a@x.com", "password": "p"}))).await;
    assert_eq!(svc.store.tx_log().begun(), 1);
}

#[tokio::test]
async fn malformed_body_is_bad_request_without_calling_service() {
    let svc = ScriptedAuth::new(fixed_user);
    let app = app_with(Arc::clone(&svc));

    let missing_field = post_json("/api/auth/signup", json!({"email": "a@x.com"}));
    let (status, body) = send(&app, missing_field).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let not_json = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, not_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());

    let no_content_type = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .body(Body::from(r#"{"email":"a@x.com","password":"p"}"#))
        .unwrap();
    let (status, _) = send(&app, no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(svc.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn signup_then_login_updates_last_login() {
    let (_svc, app) = accounts();
    let creds = json!({"email": "flow@x.com", "password": "S3curePass!"});

    let (status, body) = send(&app, post_json("/api/auth/signup", creds.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let signed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(signed["email"], "flow@x.com");
    assert!(signed["lastLogin"].is_null());
    assert!(signed.get("password").is_none());

    let (status, body) = send(&app, post_json("/api/auth/login", creds)).await;
    assert_eq!(status, StatusCode::OK);
    let logged: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(logged["id"], signed["id"]);
    assert_eq!(logged["createdAt"], signed["createdAt"]);
    assert!(logged["lastLogin"].is_string());
    assert!(logged.get("password").is_none());
}

#[tokio::test]
async fn duplicate_signup_is_bad_request() {
    let (svc, app) = accounts();
    let creds = json!({"email": "dup@x.com", "password": "S3curePass!"});

    let (status, _) = send(&app, post_json("/api/auth/signup", creds.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, post_json("/api/auth/signup", creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
    assert_eq!(svc.store().contents().user_count(), 1);
}

#[tokio::test]
async fn wrong_password_login_is_bad_request() {
    let (_svc, app) = accounts();
    send(&app, post_json("/api/auth/signup", json!({"email": "w@x.com", "password": "StrongPass123"}))).await;

    let (status, body) = send(&app, post_json("/api/auth/login", json!({"email": "w@x.com", "password": "wrong"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn partial_signup_leaves_no_account() {
    let store = Arc::new(MockAuthStore::new(MockAuthRepository::failing_credential_writes()));
    let svc = Arc::new(AccountService::new(Arc::clone(&store), AuthConfig::default()));
    let app = app_with(svc);

    let (status, body) = send(&app, post_json("/api/auth/signup", json!({"email": "half@x.com", "password": "S3curePass!"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
    assert!(store.repository().find_user_by_email("half@x.com").await.unwrap().is_none());
    assert_eq!(store.tx_log().rolled_back(), 1);
}

#[tokio::test]
async fn health_reports_ok() {
    let (_svc, app) = accounts();
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v, json!({"status": "ok"}));
}

#[tokio::test]
async fn served_api_doc_lists_auth_routes() {
    let (_svc, app) = accounts();
    let req = Request::builder().uri("/api-docs/openapi.json").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_slice(&body).unwrap();
    for path in ["/health", "/api/auth/signup", "/api/auth/login"] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
    assert!(doc["paths"]["/api/auth/signup"]["post"]["responses"].get("400").is_some());
}
