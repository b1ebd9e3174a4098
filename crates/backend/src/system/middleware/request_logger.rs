use axum::body::{Body, HttpBody as _};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Middleware для логирования HTTP запросов
///
/// Пишет одну запись tracing на запрос: метод, путь, статус,
/// длительность (ms) и размер ответа, если он известен заранее.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let size = response.body().size_hint().exact();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, ?size, "request failed");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, ?size, "request");
    }

    response
}
