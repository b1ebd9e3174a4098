use axum::extract::State;
use axum::Json;
use contracts::shared::diagnostics::DiagnosticsReport;

use crate::diagnostics::Diagnostics;
use crate::routes::AppState;

/// GET /api/diagnostics
///
/// Always 200: the outcome is in `ok`, the details in `log`.
pub async fn run(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    let report = Diagnostics::new(state.host(), &state.registry).run().await;
    Json(report)
}
