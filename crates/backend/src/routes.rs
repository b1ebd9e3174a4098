use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handlers;
use crate::processors::ProcessorRegistry;
use crate::shared::host::{Host, SharedContext};
use crate::system;

/// Состояние, общее для всех обработчиков
#[derive(Clone)]
pub struct AppState {
    pub ctx: SharedContext,
    pub registry: Arc<ProcessorRegistry>,
}

impl AppState {
    pub fn new(ctx: SharedContext, registry: ProcessorRegistry) -> Self {
        Self {
            ctx,
            registry: Arc::new(registry),
        }
    }

    /// Состояние со всеми процессорами компонента
    pub fn with_defaults(ctx: SharedContext) -> Self {
        Self::new(ctx, ProcessorRegistry::with_defaults())
    }

    pub fn host(&self) -> &dyn Host {
        &*self.ctx
    }
}

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    handlers::connector::install_panic_hook();

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Коннектор (админка)
        .route(
            "/connector",
            get(handlers::connector::handle_get)
                .post(handlers::connector::handle_post)
                .layer(CatchPanicLayer::custom(handlers::connector::panic_response)),
        )
        // A001 Реестр полей
        .route(
            "/api/fields",
            get(handlers::a001_field::list_all).post(handlers::a001_field::create),
        )
        .route(
            "/api/fields/:id",
            get(handlers::a001_field::get_by_id)
                .put(handlers::a001_field::update)
                .delete(handlers::a001_field::delete),
        )
        // A002 Значения полей
        .route(
            "/api/values/:field_id/:resource_id",
            get(handlers::a002_field_value::get_value).put(handlers::a002_field_value::set_value),
        )
        .route(
            "/api/resources/:id/values",
            get(handlers::a002_field_value::list_for_resource),
        )
        // Диагностика и лог ошибок
        .route("/api/diagnostics", get(handlers::diagnostics::run))
        .route(
            "/api/logs",
            get(handlers::logs::list_all).delete(handlers::logs::clear_all),
        )
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .with_state(state)
}
