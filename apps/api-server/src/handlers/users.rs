//! Proxy endpoints for the remote user-account service.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpRequest, HttpResponse, web};

use forum_core::domain::{NewAccount, UserId};
use forum_core::ports::UserServiceReply;
use forum_shared::ApiResponse;
use forum_shared::dto::RegisterUserRequest;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/users
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let account = NewAccount {
        first_name: body.first_name,
        last_name: body.last_name,
        username: body.username,
        password: body.password,
    };

    let missing = account.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::missing_fields(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let reply = state.users.register(&account).await?;
    tracing::info!(username = %account.username, status = reply.status, "User registered");

    Ok(relay(reply))
}

/// GET /api/users/{user_id}
pub async fn fetch(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = UserId::parse(&path.into_inner())
        .ok_or_else(|| AppError::missing_fields("Invalid user ID"))?;
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let reply = state.users.fetch(user_id, authorization).await?;

    Ok(relay(reply))
}

// Keep the upstream success status (e.g. 201 on registration).
fn relay(reply: UserServiceReply) -> HttpResponse {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::OK);
    HttpResponse::build(status).json(ApiResponse::ok(reply.body))
}
