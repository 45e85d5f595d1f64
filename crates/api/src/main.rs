use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pulse_core::domain::decision::DecisionOutput;
use pulse_core::pipeline::{Pipeline, PipelineState, StageError};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pulse_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let app = router();

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/evaluate", post(evaluate))
        .route("/evaluate/state", post(evaluate_state))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ApiError {
    stage: &'static str,
    error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

async fn evaluate(body: String) -> ApiResult<DecisionOutput> {
    let state = run_pipeline(&body).await?;
    let output = state.into_output().map_err(|source| {
        reject(StageError {
            stage: pulse_core::pipeline::stages::EVALUATE,
            source,
        })
    })?;
    Ok(Json(output))
}

async fn evaluate_state(body: String) -> ApiResult<PipelineState> {
    Ok(Json(run_pipeline(&body).await?))
}

// Bodies go through the same parser as the worker, so the `{"input": ...}` envelope and
// malformed JSON are handled identically. Each request gets its own state.
async fn run_pipeline(body: &str) -> Result<PipelineState, (StatusCode, Json<ApiError>)> {
    let run_id = Uuid::new_v4();
    async move {
        let input = pulse_core::ingest::parse_input(body).map_err(|source| {
            reject(StageError {
                stage: pulse_core::pipeline::stages::INGEST,
                source,
            })
        })?;
        Pipeline::standard()
            .run(PipelineState::new(input))
            .map_err(reject)
    }
    .instrument(tracing::info_span!("pulse_run", %run_id))
    .await
}

fn reject(err: StageError) -> (StatusCode, Json<ApiError>) {
    tracing::warn!(stage = err.stage, error = %err.source, "pipeline rejected input");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiError {
            stage: err.stage,
            error: err.source.to_string(),
        }),
    )
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &pulse_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: serde_json::Value) -> String {
        v.to_string()
    }

    #[tokio::test]
    async fn evaluate_returns_decision_output() {
        let Json(out) = evaluate(body(json!({
            "today": {"revenue": 12000, "cost": 9000, "customers": 300},
            "yesterday": {"revenue": 10000, "cost": 7000, "customers": 350},
        })))
        .await
        .unwrap();

        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({
                "profit": 3000.0,
                "alerts": ["Warning: CAC increased more than 20%."],
                "recommendations": [
                    "Review marketing campaigns.",
                    "Consider increasing advertising budget if sales are growing.",
                ],
            })
        );
    }

    #[tokio::test]
    async fn evaluate_rejects_zero_prior_revenue() {
        let (status, Json(err)) = evaluate(body(json!({
            "today": {"revenue": 100, "cost": 50, "customers": 1},
            "yesterday": {"revenue": 0, "cost": 50, "customers": 1},
        })))
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.stage, "compute");
        assert!(err.error.contains("yesterday.revenue"));
    }

    #[tokio::test]
    async fn evaluate_rejects_missing_field() {
        let (status, Json(err)) = evaluate(body(json!({
            "today": {"revenue": 100, "cost": 50, "customers": 1},
        })))
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.stage, "ingest");
        assert!(err.error.contains("yesterday"));
    }

    #[tokio::test]
    async fn evaluate_accepts_input_envelope() {
        let Json(out) = evaluate(body(json!({
            "input": {
                "today": {"revenue": 5000, "cost": 9000, "customers": 100},
                "yesterday": {"revenue": 8000, "cost": 6000, "customers": 100},
            }
        })))
        .await
        .unwrap();

        assert_eq!(out.profit, -4000.0);
        assert_eq!(out.alerts, vec!["Warning: Negative profit."]);
    }

    #[tokio::test]
    async fn evaluate_reports_wrong_types_as_ingest_error() {
        let (status, Json(err)) = evaluate(body(json!({
            "today": {"revenue": "lots", "cost": 50, "customers": 1},
            "yesterday": {"revenue": 100, "cost": 50, "customers": 1},
        })))
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.stage, "ingest");
        assert!(err.error.contains("not valid JSON"));
    }

    #[tokio::test]
    async fn evaluate_reports_invalid_json_as_ingest_error() {
        let (status, Json(err)) = evaluate("{\"today\": ".to_string()).await.unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.stage, "ingest");
    }

    #[tokio::test]
    async fn evaluate_rejects_overflowing_ratios() {
        let (status, Json(err)) = evaluate(body(json!({
            "today": {"revenue": 1e300, "cost": 1e300, "customers": 1},
            "yesterday": {"revenue": 1e-300, "cost": 1e-300, "customers": 1},
        })))
        .await
        .unwrap_err();

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.stage, "compute");
        assert!(err.error.contains("not a finite number"));
    }

    #[tokio::test]
    async fn evaluate_state_exposes_metrics() {
        let Json(state) = evaluate_state(body(json!({
            "today": {"revenue": 1000, "cost": 500, "customers": 0},
            "yesterday": {"revenue": 800, "cost": 400, "customers": 20},
        })))
        .await
        .unwrap();

        let v = serde_json::to_value(&state).unwrap();
        assert_eq!(v["metrics"]["today_cac"], json!(0.0));
        assert_eq!(v["metrics"]["yesterday_cac"], json!(20.0));
        assert_eq!(v["output"]["profit"], json!(500.0));
    }
}
