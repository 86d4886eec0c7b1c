use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::{dto::UserPayload, repo_types::User};
use crate::{
    error::{internal, ApiError, MessageBody},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).delete(delete_all_users))
        .route("/users/:id", put(update_user).delete(delete_user))
}

/// Ids are SERIAL (int4); anything else fails the same way the database would.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(internal("parsing user id"))
}

/// A request without a JSON content type carries no fields.
fn payload_or_empty(
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<UserPayload, ApiError> {
    match payload {
        Ok(Json(p)) => Ok(p),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(UserPayload::default()),
        Err(e) => Err(ApiError::BadRequest(e.body_text())),
    }
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .store
        .list()
        .await
        .map_err(internal("retrieving users"))?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .find(id)
        .await
        .map_err(internal("retrieving user"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let payload = payload_or_empty(payload)?;
    let user = state
        .store
        .create(
            payload.name_text().as_deref(),
            payload.email_text().as_deref(),
        )
        .await
        .map_err(internal("creating user"))?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let payload = payload_or_empty(payload)?;
    state
        .store
        .update(
            id,
            payload.name_text().as_deref(),
            payload.email_text().as_deref(),
        )
        .await
        .map_err(internal("updating user"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state
        .store
        .delete(id)
        .await
        .map_err(internal("deleting user"))?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = deleted.id, "user deleted");
    Ok(Json(MessageBody {
        message: "User deleted successfully",
    }))
}

#[instrument(skip(state))]
pub async fn delete_all_users(
    State(state): State<AppState>,
) -> Result<Json<MessageBody>, ApiError> {
    state
        .store
        .delete_all()
        .await
        .map_err(internal("deleting users"))?;
    info!("all users deleted, id sequence restarted");
    Ok(Json(MessageBody {
        message: "All users deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_int4() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("2147483647").unwrap(), i32::MAX);
    }

    #[test]
    fn parse_id_rejects_garbage_and_overflow_as_internal() {
        for raw in ["abc", "1.5", "", "2147483648"] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR, "{raw}");
        }
    }

    #[test]
    fn payload_fields_default_to_none() {
        let p: UserPayload = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(p.name_text().as_deref(), Some("Ana"));
        assert!(p.email_text().is_none());
    }
}
