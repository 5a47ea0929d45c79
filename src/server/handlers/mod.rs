pub mod chat;
pub mod companies;
pub mod uploads;
pub mod users;

/// Greeting for the index route.
pub async fn root() -> &'static str {
    "Culture Buddy API Server"
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "OK"
}
