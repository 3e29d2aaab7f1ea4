use axum::{extract::Path, http::StatusCode, Json};

use crate::models::{NewUser, User, UserProfile};

pub async fn list_users() -> Json<Vec<User>> {
    Json(Vec::new())
}

pub async fn create_user(Json(input): Json<NewUser>) -> (StatusCode, Json<User>) {
    let user = User {
        id: 1,
        email: input.email,
        name: input.name,
        address: None,
    };
    (StatusCode::CREATED, Json(user))
}

pub async fn get_user(Path(user_id): Path<i64>) -> Result<Json<UserProfile>, StatusCode> {
    if user_id < 0 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(UserProfile {
        id: user_id,
        email: String::from("someone@example.com"),
        address: None,
    }))
}

pub async fn delete_user(Path(_user_id): Path<i64>) -> StatusCode {
    StatusCode::OK
}
