use crate::adapters::calculator::{CalculatorConfig, HttpCalculator};
use crate::adapters::views::{render_page, PageView};
use crate::core::form::{decode_editor_urlencoded, decode_urlencoded};
use crate::core::forwarder::AllocationForwarder;
use crate::core::{AllocationCalculator, AllocationResult, ConfigProvider, RatingKind};
use crate::utils::error::{AppError, Result};
use axum::{
    body::Bytes,
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request.
pub struct AppState<C: AllocationCalculator> {
    pub forwarder: AllocationForwarder<C>,
}

impl<C: AllocationCalculator> AppState<C> {
    pub fn new(forwarder: AllocationForwarder<C>) -> Arc<Self> {
        Arc::new(Self { forwarder })
    }

    fn rating_kind(&self) -> RatingKind {
        self.forwarder.rating_kind()
    }
}

impl AppState<HttpCalculator> {
    pub fn from_config<P: ConfigProvider>(config: &P) -> Result<Arc<Self>> {
        let calculator = HttpCalculator::new(
            CalculatorConfig::new(config.calculator_url()).with_timeout(config.request_timeout()),
        )?;
        let forwarder = AllocationForwarder::new(calculator, config.rating_kind())
            .with_calculator_enabled(config.calculator_enabled());

        Ok(Self::new(forwarder))
    }
}

pub fn router<C: AllocationCalculator + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/", get(index_handler::<C>).post(edit_lists_handler::<C>))
        .route("/calculate", post(calculate_handler::<C>))
        .route("/api/calculate", post(api_calculate_handler::<C>))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler<C: AllocationCalculator + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Html<String> {
    Html(render_page(&PageView::empty(state.rating_kind())))
}

async fn edit_lists_handler<C: AllocationCalculator + 'static>(
    State(state): State<Arc<AppState<C>>>,
    body: Bytes,
) -> Html<String> {
    let kind = state.rating_kind();
    let form = decode_editor_urlencoded(&body, kind);

    Html(render_page(&PageView {
        agents: &form.agents,
        chores: &form.chores,
        ratings: form.ratings.as_ref(),
        kind,
        result: None,
    }))
}

async fn calculate_handler<C: AllocationCalculator + 'static>(
    State(state): State<Arc<AppState<C>>>,
    body: Bytes,
) -> Html<String> {
    let kind = state.rating_kind();
    let form = decode_urlencoded(&body, kind);
    let result = state.forwarder.forward(&form).await;

    Html(render_page(&PageView {
        agents: &form.agents,
        chores: &form.chores,
        ratings: form.ratings.as_ref(),
        kind,
        result: Some(&result),
    }))
}

async fn api_calculate_handler<C: AllocationCalculator + 'static>(
    State(state): State<Arc<AppState<C>>>,
    body: Bytes,
) -> Json<AllocationResult> {
    let form = decode_urlencoded(&body, state.rating_kind());
    Json(state.forwarder.forward(&form).await)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Binds the configured address and serves until Ctrl+C or SIGTERM.
pub async fn start_server<P: ConfigProvider>(config: &P) -> Result<()> {
    tracing::info!("Initializing state...");
    let state = AppState::<HttpCalculator>::from_config(config)?;
    tracing::info!(
        "Allocation Calculator at {} (enabled: {}, timeout: {:?}, ratings: {})",
        config.calculator_url(),
        config.calculator_enabled(),
        config.request_timeout(),
        config.rating_kind()
    );

    let address = format!("{}:{}", config.host(), config.port());
    tracing::info!("Binding to {}", address);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::ServerError {
            message: format!("failed to bind {}: {}", address, e),
        })?;

    serve(listener, router(state), shutdown_signal()).await
}

pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    tracing::info!("✅ Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
