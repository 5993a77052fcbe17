use crate::config::Config;
use crate::db::Database;
use crate::errors::AppError;
use crate::models::{OrderDetail, Product, ShopStats, User};
use crate::shop_store::ShopStore;
use axum::{extract::State, http::StatusCode, response::Html, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    fn store(&self) -> ShopStore {
        ShopStore::new(self.db.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub database: String,
    pub statistics: ShopStats,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderDetail>,
}

/// Builds the full router: landing page, health check and the read-only API.
pub fn router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/stats", get(stats))
        .route("/api/users", get(users))
        .route("/api/products", get(products))
        .route("/api/orders", get(orders));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// GET /
///
/// Landing page showing the deployed version.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(landing_page(&state.config.version))
}

/// GET /health
///
/// Always answers 200; the database ping only changes the `database` field.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let database = match Database::ping(&state.db).await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!("Health check: database unreachable: {}", e);
            "unhealthy"
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "database": database,
        })),
    )
}

/// GET /api/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, AppError> {
    tracing::info!("GET /api/stats");

    let statistics = state.store().stats().await?;

    Ok(Json(StatsResponse {
        database: state.config.database.database.clone(),
        statistics,
    }))
}

/// GET /api/users
pub async fn users(State(state): State<Arc<AppState>>) -> Result<Json<UsersResponse>, AppError> {
    tracing::info!("GET /api/users");

    let users = state.store().users().await?;
    tracing::debug!("Returning {} users", users.len());

    Ok(Json(UsersResponse { users }))
}

/// GET /api/products
pub async fn products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductsResponse>, AppError> {
    tracing::info!("GET /api/products");

    let products = state.store().products().await?;
    tracing::debug!("Returning {} products", products.len());

    Ok(Json(ProductsResponse { products }))
}

/// GET /api/orders
///
/// Newest orders first, read from the `order_details` view.
pub async fn orders(State(state): State<Arc<AppState>>) -> Result<Json<OrdersResponse>, AppError> {
    tracing::info!("GET /api/orders");

    let orders = state.store().order_details().await?;
    tracing::debug!("Returning {} orders", orders.len());

    Ok(Json(OrdersResponse { orders }))
}

pub fn landing_page(version: &str) -> String {
    let version = escape_html(version);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Hello World</title>
    <style>
        body {{
            font-family: Arial, sans-serif;
            display: flex;
            justify-content: center;
            align-items: center;
            height: 100vh;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
        }}
        .container {{
            text-align: center;
            padding: 40px;
            background: rgba(255, 255, 255, 0.1);
            border-radius: 20px;
            box-shadow: 0 8px 32px 0 rgba(31, 38, 135, 0.37);
        }}
        h1 {{
            font-size: 3em;
            margin-bottom: 20px;
        }}
        .version {{
            font-size: 1.2em;
            opacity: 0.8;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Hello World from Kubernetes!</h1>
        <p class="version">Version: {version}</p>
        <p>Deployed with ArgoCD</p>
    </div>
</body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
