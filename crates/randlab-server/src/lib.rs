//! HTTP engine server.
//!
//! Exposes sequence generation, condition validation, goodness-of-fit tests
//! and acceptance-rejection sampling as JSON endpoints. Every handler is a
//! pure computation over the request body; the only shared state is the
//! immutable [`EngineLimits`].

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use randlab_core::{
    EngineError, EngineLimits, GenerationRequest, GenerationResult, RandomVariableRequest,
    RandomVariableResult, ValidationResult,
};
use randlab_tests::{StatisticalTestRequest, StatisticalTestResult};

/// Listen address and engine limits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub limits: EngineLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            limits: EngineLimits::default(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared server state.
struct AppState {
    limits: EngineLimits,
}

/// Failure body; `detail` is shown to the user as-is.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
    kind: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

type ApiResult<T> = Result<(StatusCode, Json<T>), (StatusCode, Json<ErrorBody>)>;

trait JsonWithStatus<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>);
}

impl<T> JsonWithStatus<T> for Json<T> {
    fn with_status(self, status: StatusCode) -> (StatusCode, Json<T>) {
        (status, self)
    }
}

fn status_for(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidParameter(_) | EngineError::InvalidTestInput(_) => {
            StatusCode::BAD_REQUEST
        }
        EngineError::IterationLimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn reject(route: &str, err: EngineError) -> (StatusCode, Json<ErrorBody>) {
    let status = status_for(&err);
    log::warn!("{route}: {} ({})", err, err.kind());
    Json(ErrorBody {
        detail: err.to_string(),
        kind: err.kind(),
    })
    .with_status(status)
}

/// Unwrap a JSON body, turning a malformed one into the route's input error.
fn body<T>(
    route: &str,
    payload: Result<Json<T>, JsonRejection>,
    as_error: fn(String) -> EngineError,
) -> Result<T, (StatusCode, Json<ErrorBody>)> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| reject(route, as_error(rejection.body_text())))
}

async fn handle_generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<GenerationResult> {
    let request = body("/generate", payload, EngineError::InvalidParameter)?;
    let result = randlab_core::generate_from_request(&request, &state.limits)
        .map_err(|e| reject("/generate", e))?;
    log::info!(
        "/generate {}: {} values ({})",
        request.method,
        result.statistics.count,
        result.statistics.stopped_reason
    );
    Ok(Json(result).with_status(StatusCode::OK))
}

async fn handle_validate(
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> ApiResult<ValidationResult> {
    let request = body("/validate", payload, EngineError::InvalidParameter)?;
    let result = randlab_core::validate_request(&request).map_err(|e| reject("/validate", e))?;
    log::info!(
        "/validate {}: all_satisfied={}",
        request.method,
        result.all_satisfied
    );
    Ok(Json(result).with_status(StatusCode::OK))
}

async fn handle_statistical_test(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StatisticalTestRequest>, JsonRejection>,
) -> ApiResult<StatisticalTestResult> {
    let request = body("/statistical-test", payload, EngineError::InvalidTestInput)?;
    let result = randlab_tests::run_test(&request, &state.limits)
        .map_err(|e| reject("/statistical-test", e))?;
    log::info!(
        "/statistical-test {}: N={} passes={}",
        request.test_type,
        request.numbers.len(),
        result.passes
    );
    Ok(Json(result).with_status(StatusCode::OK))
}

async fn handle_random_variables(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RandomVariableRequest>, JsonRejection>,
) -> ApiResult<RandomVariableResult> {
    let request = body("/random-variables", payload, EngineError::InvalidParameter)?;
    let result = request
        .run(&state.limits)
        .map_err(|e| reject("/random-variables", e))?;
    log::info!(
        "/random-variables {}: {} values, acceptance {:.3}",
        request.distribution,
        result.generated_values.len(),
        result.acceptance_rate
    );
    Ok(Json(result).with_status(StatusCode::OK))
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: randlab_core::VERSION,
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let limits = state.limits;
    Json(serde_json::json!({
        "name": "randlab",
        "version": randlab_core::VERSION,
        "endpoints": {
            "/": "This API index",
            "/generate": {
                "method": "POST",
                "description": "Generate a sequence until it repeats",
                "methods": randlab_core::GenerationMethod::NAMES,
                "max_iterations": limits.max_iterations,
            },
            "/validate": {
                "method": "POST",
                "description": "Check congruential parameters against their period theorem",
            },
            "/statistical-test": {
                "method": "POST",
                "description": "Chi-square or Kolmogorov-Smirnov uniformity test",
                "test_types": ["chi_square", "kolmogorov_smirnov"],
                "alphas": randlab_tests::SUPPORTED_ALPHAS,
                "max_intervals": limits.max_intervals,
            },
            "/random-variables": {
                "method": "POST",
                "description": "Acceptance-rejection sampling",
                "distributions": randlab_core::Distribution::ALL
                    .iter()
                    .map(|d| d.name())
                    .collect::<Vec<_>>(),
                "max_count": limits.max_variates,
            },
            "/health": "Health check",
        },
    }))
}

/// Permissive CORS so a browser front-end on another origin can call in.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the axum router.
pub fn build_router(limits: EngineLimits) -> Router {
    let state = Arc::new(AppState { limits });

    Router::new()
        .route("/", get(handle_index))
        .route("/generate", post(handle_generate))
        .route("/validate", post(handle_validate))
        .route("/statistical-test", post(handle_statistical_test))
        .route("/random-variables", post(handle_random_variables))
        .route("/health", get(handle_health))
        .layer(cors_layer())
        .with_state(state)
}

/// Run the HTTP engine server until the listener fails.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let app = build_router(config.limits);
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("randlab server listening on http://{addr}");
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn post_json(uri: &str, payload: Value) -> (StatusCode, Value) {
        post_raw(uri, payload.to_string()).await
    }

    async fn post_raw(uri: &str, payload: String) -> (StatusCode, Value) {
        let response = build_router(EngineLimits::default())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = build_router(EngineLimits::default())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "127.0.0.1:8000");
        assert_eq!(config.limits, EngineLimits::default());
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], randlab_core::VERSION);
    }

    #[tokio::test]
    async fn test_index_lists_endpoints() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        for route in ["/generate", "/validate", "/statistical-test", "/random-variables"] {
            assert!(body["endpoints"].get(route).is_some(), "missing {route}");
        }
    }

    #[tokio::test]
    async fn test_generate() {
        let (status, body) = post_json(
            "/generate",
            json!({"method": "mixed_congruential", "parameters": {"x0": 7, "a": 5, "b": 3, "m": 16}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numbers"].as_array().unwrap().len(), 16);
        assert_eq!(body["numbers"][0], 0.375);
        assert_eq!(body["statistics"]["period"], 16);
        assert_eq!(body["statistics"]["stopped_reason"], "period_detected");
    }

    #[tokio::test]
    async fn test_generate_string_parameters() {
        let (status, body) = post_json(
            "/generate",
            json!({"method": "middle_squares", "parameters": {"x0": "1234", "digits": "4"}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["numbers"][0], 0.5227);
    }

    #[tokio::test]
    async fn test_generate_invalid_parameter() {
        let (status, body) = post_json(
            "/generate",
            json!({"method": "mixed_congruential", "parameters": {"x0": 7, "a": 5, "b": 3, "m": 0}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_parameter");
        assert!(body["detail"].as_str().unwrap().contains("'m'"));

        let (status, body) = post_json(
            "/generate",
            json!({"method": "mixed_congruential", "parameters": {"x0": 7, "a": "five", "b": 3, "m": 16}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_parameter");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, body) = post_raw("/generate", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_parameter");

        let (status, body) =
            post_json("/statistical-test", json!({"numbers": "0.1, 0.2"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_test_input");
    }

    #[tokio::test]
    async fn test_validate() {
        let (status, body) = post_json(
            "/validate",
            json!({"method": "mixed_congruential", "parameters": {"x0": 1, "a": 21, "b": 3, "m": 16}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["all_satisfied"], true);
        assert_eq!(body["conditions"].as_array().unwrap().len(), 3);

        let (status, body) = post_json(
            "/validate",
            json!({"method": "middle_squares", "parameters": {"x0": 1234, "digits": 4}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["all_satisfied"], false);
        assert!(body["conditions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statistical_test() {
        let numbers: Vec<f64> = (0..100).map(|i| (i as f64 + 0.5) / 100.0).collect();
        let (status, body) = post_json(
            "/statistical-test",
            json!({"numbers": numbers, "test_type": "chi_square", "parameters": {"intervals": 10}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["calculated_value"], 0.0);
        assert_eq!(body["passes"], true);
        assert_eq!(body["degrees_of_freedom"], 9);

        let (status, body) = post_json(
            "/statistical-test",
            json!({
                "numbers": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
                "test_type": "kolmogorov_smirnov",
                "parameters": {"significance_level": 0.05}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["passes"], true);
        assert!(body.get("degrees_of_freedom").is_none());
    }

    #[tokio::test]
    async fn test_statistical_test_rejects_input() {
        let (status, body) = post_json(
            "/statistical-test",
            json!({"numbers": [0.5], "test_type": "kolmogorov_smirnov"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_test_input");

        let (status, _) = post_json(
            "/statistical-test",
            json!({"numbers": [0.1, 0.2], "test_type": "chi_square", "parameters": {"intervals": 10, "alpha": 0.2}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_random_variables() {
        let (status, body) = post_json(
            "/random-variables",
            json!({"count": 100, "distribution": "linear", "seed": 42}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generated_values"].as_array().unwrap().len(), 100);
        let rate = body["acceptance_rate"].as_f64().unwrap();
        assert!(rate > 0.0 && rate <= 1.0);
        assert_eq!(body["chart_data"]["M"], 2.0);
        assert_eq!(body["chart_data"]["points_x_d"].as_array().unwrap().len(), 101);
    }

    #[tokio::test]
    async fn test_random_variables_count_bounds() {
        for count in [0, 10_001] {
            let (status, body) = post_json(
                "/random-variables",
                json!({"count": count, "fx": "cuadratic"}),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["kind"], "invalid_parameter");
        }
    }

    #[tokio::test]
    async fn test_iteration_limit_is_422() {
        let limits = EngineLimits {
            trial_multiplier: 1,
            ..EngineLimits::default()
        };
        let response = build_router(limits)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/random-variables")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"count": 1000, "distribution": "hyperbola", "seed": 0}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "iteration_limit_exceeded");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let response = build_router(EngineLimits::default())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/generate")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }
}
