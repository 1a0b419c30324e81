//! Axum application setup.

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // The API is read-only and consumed from a separate frontend origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/cars", get(handlers::get_cars))
        .route("/owner-stats", get(handlers::get_owner_stats));

    Router::new()
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclean::Cleaner;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn state() -> AppState {
        let outcome = Cleaner::new()
            .clean_bytes(
                b"name,year,selling_price,km_driven,owner\n\
                  Swift,2014,450000,145500,First Owner\n\
                  City,2017,$600000,60000,Second Owner\n\
                  Alto,1850,100000,1000,First Owner\n",
            )
            .unwrap();
        AppState::new(outcome)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_router(state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_cars_returns_cleaned_rows() {
        let (status, body) = get_json("/api/cars").await;
        assert_eq!(status, StatusCode::OK);

        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "City");
        assert_eq!(rows[0]["price"], 600000);
        assert_eq!(rows[1]["mileage"], 145500);
    }

    #[tokio::test]
    async fn test_owner_stats_sorted_descending() {
        let (status, body) = get_json("/api/owner-stats").await;
        assert_eq!(status, StatusCode::OK);

        let stats = body.as_array().unwrap();
        assert_eq!(stats[0]["owner"], "First Owner");
        assert_eq!(stats[0]["avg_mileage"], 145500.0);
        assert_eq!(stats[1]["owner"], "Second Owner");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = get_json("/api/trucks").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_cors_header_present() {
        let response = create_router(state())
            .oneshot(
                Request::builder()
                    .uri("/api/cars")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
