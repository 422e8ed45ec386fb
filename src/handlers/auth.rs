// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AcceptInvitePayload, AuthResponse, LoginPayload, SignupPayload, User},
};

// Cadastro de atlética: organização + primeiro presidente, atomicamente.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = SignupPayload,
    responses(
        (status = 201, description = "Atlética criada; retorna o token do presidente", body = AuthResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 409, description = "E-mail ou slug já em uso")
    )
)]
pub async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, org) = app_state.auth_service.signup(&payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "token": token, "orgSlug": org.slug }))))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token de acesso", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state.auth_service.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse { token }))
}

// Resgate de convite: valida código/validade/e-mail e cria o membro.
#[utoipa::path(
    post,
    path = "/api/auth/accept-invite",
    tag = "Auth",
    request_body = AcceptInvitePayload,
    responses(
        (status = 201, description = "Conta criada; retorna o token", body = AuthResponse),
        (status = 404, description = "Convite inválido ou já utilizado"),
        (status = 410, description = "Convite expirado"),
        (status = 403, description = "Convite destinado a outro e-mail")
    )
)]
pub async fn accept_invite(
    State(app_state): State<AppState>,
    Json(payload): Json<AcceptInvitePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state.auth_service.accept_invite(&payload).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses((status = 200, body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
