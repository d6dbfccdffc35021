//! Service and transport tests against the in-memory repository

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Router};
use chrono::Utc;
use platform::password::{ClearTextPassword, HashedPassword, MIN_COST};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::application::service::AuthService;
use crate::domain::entity::{app::App, user::User};
use crate::domain::repository::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};
use crate::domain::token::{SessionClaims, TokenIssuer};
use crate::domain::value_object::{AppId, UserId, app_secret::AppSecret, email::Email};
use crate::error::AuthError;
use crate::infra::memory::InMemoryAuthRepository;
use crate::presentation::middleware::{TokenGuardState, require_session_token};
use crate::presentation::router::auth_router_generic;

const TTL: Duration = Duration::from_secs(3600);
const APP_SECRET: &str = "appsecret";

type MemoryService =
    AuthService<InMemoryAuthRepository, InMemoryAuthRepository, InMemoryAuthRepository>;

fn config() -> AuthConfig {
    AuthConfig {
        token_ttl: TTL,
        password_cost: MIN_COST,
    }
}

fn email(raw: &str) -> Email {
    raw.parse().unwrap()
}

fn password(raw: impl Into<String>) -> ClearTextPassword {
    ClearTextPassword::new(raw)
}

async fn seeded_repo() -> Arc<InMemoryAuthRepository> {
    let repo = Arc::new(InMemoryAuthRepository::new());
    repo.insert_app(App::new(AppId::new(1), "test", AppSecret::new(APP_SECRET)))
        .await;
    repo.insert_app(App::new(AppId::new(2), "unsigned", AppSecret::new("")))
        .await;
    repo
}

fn service(repo: &Arc<InMemoryAuthRepository>) -> MemoryService {
    AuthService::new(repo.clone(), repo.clone(), repo.clone(), Arc::new(config()))
}

fn decode(token: &str) -> SessionClaims {
    TokenIssuer::new()
        .verify(token, &AppSecret::new(APP_SECRET))
        .unwrap()
}

// ============================================================================
// Authentication Service
// ============================================================================

#[tokio::test]
async fn test_register_then_login_claims() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    let user_id = service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let token = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap();

    let claims = decode(&token);
    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.email, "user@example.com");
    assert_eq!(claims.app_id, 1);

    let expected_exp = Utc::now().timestamp() + TTL.as_secs() as i64;
    assert!((claims.exp - expected_exp).abs() <= 5);
}

#[tokio::test]
async fn test_register_keeps_email_case() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("Mixed.Case@Example.com"), password("Secret123"))
        .await
        .unwrap();

    let token = service
        .login(email("Mixed.Case@Example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap();
    assert_eq!(decode(&token).email, "Mixed.Case@Example.com");

    let err = service
        .login(email("mixed.case@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_register_duplicate() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    let first = service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let err = service
        .register(email("user@example.com"), password("Another123"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserExists));
    assert_eq!(repo.user_count().await, 1);

    // The first account still logs in
    let token = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap();
    assert_eq!(decode(&token).user_id(), first);
}

#[tokio::test]
async fn test_register_stores_hash_not_plaintext() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let user = repo.user(&email("user@example.com")).await.unwrap();
    assert!(user.password_hash.as_str().starts_with("$2"));
    assert_ne!(user.password_hash.as_bytes(), b"Secret123");
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_match() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let wrong = service
        .login(email("user@example.com"), password("wrong"), AppId::new(1))
        .await
        .unwrap_err();
    let unknown = service
        .login(email("nobody@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap_err();

    assert!(matches!(wrong, AuthError::InvalidCredentials));
    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[tokio::test]
async fn test_login_does_not_truncate_long_password() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    let prefix = "a".repeat(72);
    service
        .register(email("user@example.com"), password(prefix.clone()))
        .await
        .unwrap();

    let err = service
        .login(
            email("user@example.com"),
            password(format!("{prefix}totally-different")),
            AppId::new(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let err = service
        .register(email("other@example.com"), password(format!("{prefix}REGISTERED")))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Internal { op: "auth.register", .. }));
}

#[tokio::test]
async fn test_login_unknown_app() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let err = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(999))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::AppNotFound));
}

#[tokio::test]
async fn test_login_app_without_secret() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let err = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(2))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MissingSigningSecret));
}

#[tokio::test]
async fn test_token_rejected_under_other_secret() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();
    let token = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap();

    let err = TokenIssuer::new()
        .verify(&token, &AppSecret::new("othersecret"))
        .unwrap_err();
    assert!(matches!(
        AuthError::from_token("test", err),
        AuthError::TokenInvalid
    ));
}

#[tokio::test]
async fn test_is_admin() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    let user_id = service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();
    assert!(!service.is_admin(user_id).await.unwrap());

    repo.set_admin(user_id, true).await.unwrap();
    assert!(service.is_admin(user_id).await.unwrap());

    let err = service.is_admin(UserId::new(999)).await.unwrap_err();
    assert!(matches!(err, AuthError::AppNotFound));
}

#[tokio::test]
async fn test_concrete_scenario() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let token = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap();
    let claims = decode(&token);
    assert_eq!(claims.email, "user@example.com");
    assert_eq!(claims.app_id, 1);

    assert!(matches!(
        service
            .register(email("user@example.com"), password("Secret123"))
            .await,
        Err(AuthError::UserExists)
    ));
    assert!(matches!(
        service
            .login(email("user@example.com"), password("Secret123"), AppId::new(999))
            .await,
        Err(AuthError::AppNotFound)
    ));
    assert!(matches!(
        service
            .login(email("user@example.com"), password("wrong"), AppId::new(1))
            .await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_concurrent_logins_are_independent() {
    let repo = seeded_repo().await;
    let service = service(&repo);

    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .login(email("user@example.com"), password("Secret123"), AppId::new(1))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let token = handle.await.unwrap().unwrap();
        assert_eq!(decode(&token).app_id, 1);
    }
}

// ============================================================================
// Storage failures
// ============================================================================

/// Every port fails with a backend error carrying sensitive-looking text
struct BrokenStore;

fn backend_error() -> StorageError {
    StorageError::Backend(Box::new(std::io::Error::other(
        "connection to 10.0.0.5:5432 refused",
    )))
}

impl UserSaver for BrokenStore {
    async fn save_user(&self, _: &Email, _: &HashedPassword) -> StorageResult<UserId> {
        Err(backend_error())
    }
}

impl UserProvider for BrokenStore {
    async fn user(&self, _: &Email) -> StorageResult<User> {
        Err(backend_error())
    }

    async fn is_admin(&self, _: UserId) -> StorageResult<bool> {
        Err(backend_error())
    }
}

impl AppProvider for BrokenStore {
    async fn app(&self, _: AppId) -> StorageResult<App> {
        Err(backend_error())
    }
}

#[tokio::test]
async fn test_backend_failures_are_internal() {
    let store = Arc::new(BrokenStore);
    let service = AuthService::new(store.clone(), store.clone(), store, Arc::new(config()));

    let register = service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap_err();
    let login = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap_err();
    let is_admin = service.is_admin(UserId::new(1)).await.unwrap_err();

    for (err, op) in [
        (register, "auth.register"),
        (login, "auth.login"),
        (is_admin, "auth.is_admin"),
    ] {
        match &err {
            AuthError::Internal { op: actual, .. } => assert_eq!(*actual, op),
            other => panic!("expected Internal, got {other:?}"),
        }
        assert!(!err.to_string().contains("10.0.0.5"));
    }
}

#[tokio::test]
async fn test_register_hashing_failure_is_internal() {
    let repo = seeded_repo().await;
    let config = AuthConfig {
        token_ttl: TTL,
        password_cost: 99,
    };
    let service = AuthService::new(repo.clone(), repo.clone(), repo.clone(), Arc::new(config));

    let err = service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Internal { op: "auth.register", .. }));
    assert!(repo.user(&email("user@example.com")).await.is_err());
}

/// Holds one user whose stored hash is not a valid bcrypt string
struct CorruptHashStore;

impl UserSaver for CorruptHashStore {
    async fn save_user(&self, _: &Email, _: &HashedPassword) -> StorageResult<UserId> {
        Err(StorageError::AlreadyExists)
    }
}

impl UserProvider for CorruptHashStore {
    async fn user(&self, email: &Email) -> StorageResult<User> {
        Ok(User::new(
            UserId::new(1),
            email.clone(),
            HashedPassword::from_bytes("$2b$zz$garbage"),
        ))
    }

    async fn is_admin(&self, _: UserId) -> StorageResult<bool> {
        Ok(false)
    }
}

impl AppProvider for CorruptHashStore {
    async fn app(&self, app_id: AppId) -> StorageResult<App> {
        Ok(App::new(app_id, "test", AppSecret::new(APP_SECRET)))
    }
}

#[tokio::test]
async fn test_login_corrupt_stored_hash() {
    let store = Arc::new(CorruptHashStore);
    let service = AuthService::new(store.clone(), store.clone(), store, Arc::new(config()));

    let err = service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

/// Hangs on every call, standing in for a stalled database
struct StalledStore;

impl UserSaver for StalledStore {
    async fn save_user(&self, _: &Email, _: &HashedPassword) -> StorageResult<UserId> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(StorageError::NotFound)
    }
}

impl UserProvider for StalledStore {
    async fn user(&self, _: &Email) -> StorageResult<User> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(StorageError::NotFound)
    }

    async fn is_admin(&self, _: UserId) -> StorageResult<bool> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(StorageError::NotFound)
    }
}

impl AppProvider for StalledStore {
    async fn app(&self, _: AppId) -> StorageResult<App> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(StorageError::NotFound)
    }
}

// ============================================================================
// HTTP transport
// ============================================================================

fn router(repo: Arc<InMemoryAuthRepository>) -> Router {
    auth_router_generic(repo, config(), Duration::from_secs(5))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

#[tokio::test]
async fn test_http_register_and_login() {
    let app = router(seeded_repo().await);

    let (status, body) = call(
        &app,
        post_json(
            "/register",
            json!({ "email": "user@example.com", "password": "Secret123" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], 1);

    let (status, body) = call(
        &app,
        post_json(
            "/login",
            json!({ "email": "user@example.com", "password": "Secret123", "appId": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    assert_eq!(decode(token).uid, 1);
}

#[tokio::test]
async fn test_http_validation() {
    let app = router(seeded_repo().await);

    let cases = [
        (
            "/register",
            json!({ "password": "Secret123" }),
            "email is required",
        ),
        (
            "/register",
            json!({ "email": "user@example.com" }),
            "password is required",
        ),
        (
            "/login",
            json!({ "email": "user@example.com", "password": "Secret123" }),
            "app_id is required",
        ),
        ("/is-admin", json!({}), "user_id is required"),
    ];

    for (uri, body, detail) in cases {
        let (status, problem) = call(&app, post_json(uri, body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(problem["detail"], detail);
    }

    let (status, _) = call(
        &app,
        post_json(
            "/register",
            json!({ "email": "user@example.com", "password": "short" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_http_malformed_json() {
    let app = router(seeded_repo().await);

    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, problem) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["title"], "Bad Request");
}

#[tokio::test]
async fn test_http_error_mapping() {
    let repo = seeded_repo().await;
    let app = router(repo.clone());

    let register = json!({ "email": "user@example.com", "password": "Secret123" });
    call(&app, post_json("/register", register.clone())).await;

    let (status, problem) = call(&app, post_json("/register", register)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["detail"], "user already exists");

    let (status, problem) = call(
        &app,
        post_json(
            "/login",
            json!({ "email": "user@example.com", "password": "Wrong1234", "appId": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(problem["detail"], "invalid credentials");

    let (status, problem) = call(
        &app,
        post_json(
            "/login",
            json!({ "email": "user@example.com", "password": "Secret123", "appId": 999 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["detail"], "app is not found");

    let (status, problem) = call(
        &app,
        post_json(
            "/login",
            json!({ "email": "user@example.com", "password": "Secret123", "appId": 2 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(problem["detail"], "internal error");
}

#[tokio::test]
async fn test_http_is_admin() {
    let repo = seeded_repo().await;
    let app = router(repo.clone());

    call(
        &app,
        post_json(
            "/register",
            json!({ "email": "admin@example.com", "password": "Secret123" }),
        ),
    )
    .await;
    repo.set_admin(UserId::new(1), true).await.unwrap();

    let (status, body) = call(&app, post_json("/is-admin", json!({ "userId": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isAdmin"], true);

    let (status, _) = call(&app, post_json("/is-admin", json!({ "userId": 42 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_http_deadline() {
    let app = auth_router_generic(
        Arc::new(StalledStore),
        config(),
        Duration::from_millis(50),
    );

    let (status, problem) = call(&app, post_json("/is-admin", json!({ "userId": 1 }))).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(problem["detail"], "request timed out");
}

// ============================================================================
// Session token middleware
// ============================================================================

fn guarded(app_id: i64) -> Router {
    Router::new()
        .route(
            "/me",
            get(|Extension(claims): Extension<SessionClaims>| async move {
                claims.email
            }),
        )
        .layer(axum::middleware::from_fn_with_state(
            TokenGuardState::new(AppId::new(app_id), AppSecret::new(APP_SECRET)),
            require_session_token,
        ))
}

fn get_me(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/me");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn issued_token() -> String {
    let repo = seeded_repo().await;
    let service = service(&repo);
    service
        .register(email("user@example.com"), password("Secret123"))
        .await
        .unwrap();
    service
        .login(email("user@example.com"), password("Secret123"), AppId::new(1))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_middleware_accepts_valid_token() {
    let token = issued_token().await;

    let response = guarded(1).oneshot(get_me(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"user@example.com");
}

#[tokio::test]
async fn test_middleware_rejects() {
    let token = issued_token().await;

    // No header
    let response = guarded(1).oneshot(get_me(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage
    let response = guarded(1).oneshot(get_me(Some("abc.def"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Minted for app 1, presented to app 7 that shares the secret
    let response = guarded(7).oneshot(get_me(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
