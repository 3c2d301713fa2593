//! Account registration and login.

use actix_web::{HttpResponse, web};

use quill_core::domain::User;
use quill_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use quill_shared::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// `POST /api/v1/user/register` - create an author account.
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();

    User::validate_credentials(&payload.username, &payload.password)?;
    let username = payload.username.trim().to_string();

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(AppError::BadRequest("Username already exists".to_string()));
    }

    let password_hash = state.passwords.hash(&payload.password)?;
    let user = state.users.create(User::new(username, password_hash)).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(UserResponse {
        id: user.id,
        username: user.username,
    }))
}

/// `POST /api/v1/user/login` - verify credentials and issue a token.
pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let payload = payload.into_inner();

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = state
        .users
        .find_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !state.passwords.verify(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = state.tokens.generate_token(user.id, &user.username)?;

    tracing::debug!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: user.id,
        username: user.username,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::json;

    use crate::handlers::testing::{test_app, test_state};

    #[actix_web::test]
    async fn register_creates_account() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "alice", "password": "secret1"}))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), 201);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["username"], "alice");
        assert!(body["id"].is_string());
    }

    #[actix_web::test]
    async fn register_rejects_duplicate_username() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let first = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "alice", "password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, first).await.status(), 201);

        let second = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "alice", "password": "another1"}))
            .to_request();
        assert_eq!(test::call_service(&app, second).await.status(), 400);
    }

    #[actix_web::test]
    async fn register_rejects_short_credentials() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let short_username = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "ab", "password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, short_username).await.status(), 400);

        let short_password = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "alice", "password": "123"}))
            .to_request();
        assert_eq!(test::call_service(&app, short_password).await.status(), 400);
    }

    #[actix_web::test]
    async fn login_returns_token() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let register = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "alice", "password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, register).await.status(), 201);

        let login = test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"username": "alice", "password": "secret1"}))
            .to_request();
        let res = test::call_service(&app, login).await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["username"], "alice");
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn login_rejects_wrong_password() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let register = test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({"username": "alice", "password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, register).await.status(), 201);

        let login = test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"username": "alice", "password": "wrong-password"}))
            .to_request();
        assert_eq!(test::call_service(&app, login).await.status(), 401);
    }

    #[actix_web::test]
    async fn login_rejects_unknown_user() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let login = test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"username": "nobody", "password": "secret1"}))
            .to_request();
        assert_eq!(test::call_service(&app, login).await.status(), 404);
    }
}
