mod home;
mod models;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::repository::CatalogRepository;
use crate::services::storage::LocalStorage;

// 3D model uploads run well past axum's 2 MB default body limit.
const MAX_UPLOAD_BYTES: usize = 250 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub repo: CatalogRepository,
    pub storage: LocalStorage,
}

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // General endpoints
        home::root,
        // Model catalog endpoints
        models::list_models,
        models::get_model,
        models::upload_model,
        models::replace_model_file,
        models::update_title,
        models::attach_usdz,
        models::attach_thumbnail,
        models::delete_model,
    ),
    components(
        schemas(
            models::ModelResponse,
            models::ModelListResponse,
            models::ModelDetailResponse,
            models::UploadModelResponse,
            models::MessageResponse,
            models::UsdzUpdateResponse,
            models::ThumbnailUpdateResponse,
            models::UpdateTitleRequest,
        )
    ),
    tags(
        (name = "General", description = "General API information"),
        (name = "Model Catalog", description = "Upload, browse, and manage 3D model records")
    ),
    info(
        title = "ModelGallery API",
        version = "0.1.0",
        description = "A Rust/Axum application for cataloging uploaded 3D models (GLB/USDZ) with AR variants and thumbnails",
    )
)]
struct ApiDoc;

pub fn create_routes(state: AppState, public_dir: &str) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let api_routes = Router::new()
        .route("/api/models", get(models::list_models))
        .route("/api/models", post(models::upload_model))
        .route("/api/models/{id}", get(models::get_model))
        .route("/api/models/{id}", delete(models::delete_model))
        .route("/api/models/{id}/file", post(models::replace_model_file))
        .route("/api/models/{id}/title", put(models::update_title))
        .route("/api/models/{id}/usdz", post(models::attach_usdz))
        .route("/api/models/{id}/thumbnail", post(models::attach_thumbnail))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    // Uploaded assets are served straight off the public directory, so the
    // storage-relative paths in catalog records double as URLs.
    Router::new()
        .route("/", get(home::root))
        .merge(swagger_router)
        .merge(api_routes)
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};
    use tower::util::ServiceExt;

    async fn test_app(public_dir: &str) -> (Router, CatalogRepository) {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let repo = CatalogRepository::new(db);
        let state = AppState {
            repo: repo.clone(),
            storage: LocalStorage::new(public_dir, "models"),
        };
        (create_routes(state, public_dir), repo)
    }

    #[tokio::test]
    async fn listing_an_empty_catalog_returns_no_models() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _repo) = test_app(dir.path().to_str().unwrap()).await;

        let response = app
            .oneshot(Request::builder().uri("/api/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["models"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn listing_reflects_catalog_contents() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = test_app(dir.path().to_str().unwrap()).await;

        repo.create_model("Teapot", "teapot.glb", "models/teapot.glb")
            .await
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/api/models").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["models"][0]["title"], "Teapot");
        assert_eq!(json["models"][0]["file_path"], "models/teapot.glb");
    }

    #[tokio::test]
    async fn missing_model_maps_to_404() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _repo) = test_app(dir.path().to_str().unwrap()).await;

        let response = app
            .oneshot(Request::builder().uri("/api/models/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn title_update_on_missing_model_maps_to_404() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _repo) = test_app(dir.path().to_str().unwrap()).await;

        let request = Request::builder()
            .method("PUT")
            .uri("/api/models/42/title")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"Renamed"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_hides_the_model_from_subsequent_reads() {
        let dir = tempfile::tempdir().unwrap();
        let (app, repo) = test_app(dir.path().to_str().unwrap()).await;

        let created = repo
            .create_model("Short-lived", "s.glb", "models/s.glb")
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/models/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/models/{}", created.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
