use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use api::{
    auth::{Actor, AuthConfig, SESSION_COOKIE, decode_token},
    schema::CrmSchema,
    service,
};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::State,
    http::{self, HeaderMap, HeaderName, HeaderValue, Method},
    response::{Html, IntoResponse},
    routing::get,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub schema: CrmSchema,
    pub db: Arc<DatabaseConnection>,
    pub auth: Arc<AuthConfig>,
    pub cors_allowed_origins: Arc<Vec<String>>,
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "crm server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let header_name = HeaderName::from_static("x-request-id");
    let cors = cors_layer(&state.cors_allowed_origins);
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/graphiql", get(graphiql))
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    if allowed.is_empty() {
        return CorsLayer::new()
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_methods([Method::POST, Method::GET])
            .allow_origin(AllowOrigin::any());
    }
    CorsLayer::new()
        .allow_credentials(true)
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_methods([Method::POST, Method::GET])
        .allow_origin(AllowOrigin::list(allowed))
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(actor) = authenticate_request(&state, &headers).await {
        request = request.data(actor);
    }
    state.schema.execute(request).await.into()
}

/// Anything short of a valid token for a known profile leaves the request
/// anonymous; resolvers then answer with UNAUTHENTICATED.
async fn authenticate_request(state: &AppState, headers: &HeaderMap) -> Option<Actor> {
    let token = extract_token(headers)?;
    let claims = match decode_token(&token, &state.auth) {
        Ok(claims) => claims,
        Err(err) => {
            debug!(error = %err, "rejected session token");
            return None;
        }
    };
    match service::load_actor(state.db.as_ref(), claims.sub).await {
        Ok(actor) => Some(actor),
        Err(err) => {
            debug!(user_id = %claims.sub, error = %err, "token subject has no usable profile");
            None
        }
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(http::header::AUTHORIZATION) {
        if let Ok(text) = value.to_str() {
            if let Some(rest) = text.strip_prefix("Bearer ") {
                return Some(rest.trim().to_string());
            }
        }
    }
    let cookie = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookie.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .map(|value| value.trim().to_string())
    })
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.db.ping().await.is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler")
    };
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! { _ = ctrl_c => {}, _ = terminate => {}, }
}

#[cfg(test)]
mod tests {
    use api::{
        auth::issue_token,
        schema::{AppSchema, build_schema},
        service::seed::SELLER_EMAIL,
    };
    use axum::body::Body;
    use http_body_util::BodyExt;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    struct Harness {
        router: Router,
        seller_token: String,
    }

    async fn harness() -> Harness {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let seeded = service::seed_demo(&db).await.unwrap();
        let db = Arc::new(db);
        let auth = Arc::new(AuthConfig {
            jwt_secret: "router-test".into(),
            session_ttl_minutes: 5,
        });
        let seller_id = seeded.profile_email(SELLER_EMAIL).unwrap().id;
        let seller = service::load_actor(&db, seller_id).await.unwrap();
        let seller_token = issue_token(&seller, &auth).unwrap();
        let AppSchema(schema) = build_schema(db.clone(), auth.clone());
        let router = build_router(AppState {
            schema,
            db,
            auth,
            cors_allowed_origins: Arc::new(vec![]),
        });
        Harness {
            router,
            seller_token,
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn graphql_post() -> http::request::Builder {
        http::Request::builder()
            .method(Method::POST)
            .uri("/graphql")
            .header(http::header::CONTENT_TYPE, "application/json")
    }

    #[tokio::test]
    async fn health_reports_database() {
        let h = harness().await;
        let response = h
            .router
            .oneshot(
                http::Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["db_ok"], true);
    }

    #[tokio::test]
    async fn bearer_token_attaches_actor() {
        let h = harness().await;
        let query = "{ crm { me { user { email } capabilities { canEditSales } } } }";
        let response = h
            .router
            .oneshot(
                graphql_post()
                    .header(
                        http::header::AUTHORIZATION,
                        format!("Bearer {}", h.seller_token),
                    )
                    .body(Body::from(json!({ "query": query }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["crm"]["me"]["user"]["email"], SELLER_EMAIL);
        assert_eq!(body["data"]["crm"]["me"]["capabilities"]["canEditSales"], true);
    }

    #[tokio::test]
    async fn session_cookie_is_accepted() {
        let h = harness().await;
        let query = "{ crm { pipelineMetrics { totalCompanies } } }";
        let response = h
            .router
            .oneshot(
                graphql_post()
                    .header(
                        http::header::COOKIE,
                        format!("theme=dark; {}={}", SESSION_COOKIE, h.seller_token),
                    )
                    .body(Body::from(json!({ "query": query }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["data"]["crm"]["pipelineMetrics"]["totalCompanies"], 3);
    }

    #[tokio::test]
    async fn bad_token_leaves_request_anonymous() {
        let h = harness().await;
        let query = "{ crm { pipelineMetrics { totalCompanies } } }";
        let response = h
            .router
            .oneshot(
                graphql_post()
                    .header(http::header::AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::from(json!({ "query": query }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc"),
        );
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("crm_session=def"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
        headers.remove(http::header::AUTHORIZATION);
        assert_eq!(extract_token(&headers).as_deref(), Some("def"));
    }
}
