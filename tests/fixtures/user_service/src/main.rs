use axum::{
    routing::{delete, get},
    Router,
};

mod handlers;
mod models;

fn app() -> Router {
    Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/:user_id",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        // liveness check, not part of the public contract
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() {
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    axum::serve(listener, app()).await.unwrap();
}
