pub mod admin;
pub mod auth;
pub mod comments;
pub mod photos;

use crate::routes::auth::middleware::{require_admin, AuthUser};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_extractor_with_state, from_fn};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::{trace::TraceLayer, LatencyUnit};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable};

/// Uploads are capped at 10 MB; the body limit leaves headroom for the
/// multipart framing around the file.
const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        // Auth handlers
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::me,
        // Photo handlers
        photos::handlers::list_photos,
        photos::handlers::my_photos,
        photos::handlers::get_photo,
        photos::handlers::upload_photo,
        photos::handlers::update_photo,
        photos::handlers::delete_photo,
        photos::handlers::like_photo,
        photos::handlers::unlike_photo,
        photos::handlers::photo_like_status,
        // Comment handlers
        comments::handlers::list_comments,
        comments::handlers::create_comment,
        comments::handlers::like_comment,
        comments::handlers::unlike_comment,
        comments::handlers::report_comment,
        comments::handlers::delete_comment,
        // Admin handlers
        admin::handlers::pending_photos,
        admin::handlers::approve_photo,
        admin::handlers::reject_photo,
        admin::handlers::list_reports,
        admin::handlers::resolve_report,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::Photo,
            crate::models::PhotoStatus,
            crate::models::PhotoVariant,
            crate::models::ModerationStatus,
            crate::models::Comment,
            crate::models::CommentReport,
            crate::models::ReportStatus,
            auth::interfaces::RegisterRequest,
            auth::interfaces::LoginRequest,
            auth::interfaces::AuthResponse,
            photos::interfaces::UpdatePhotoRequest,
            photos::interfaces::LikeStatus,
            comments::interfaces::CreateCommentRequest,
            comments::interfaces::ReportCommentRequest,
            comments::interfaces::MessageResponse,
            admin::interfaces::RejectPhotoRequest,
            admin::interfaces::ResolveReportRequest,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and session identity"),
        (name = "photos", description = "Photo upload, browsing and likes"),
        (name = "comments", description = "Comments, likes on comments and reports"),
        (name = "admin", description = "Moderation queue and report handling"),
    )
)]
struct ApiDoc;

/// Adds the bearer token scheme to the `OpenAPI` specification.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[utoipa::path(get, path = "/", responses((status = 200, description = "Service banner")))]
async fn root() -> &'static str {
    concat!("photohub v", env!("CARGO_PKG_VERSION"))
}

pub fn create_router(state: AppState) -> Router {
    let openapi = ApiDoc::openapi();
    let upload_dir = state.config.upload_dir.clone();

    Router::new()
        .merge(Scalar::with_url("/docs", openapi))
        .merge(api_routes())
        .nest("/api/admin", admin_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().on_response(
                tower_http::trace::DefaultOnResponse::new()
                    .level(tracing::Level::INFO)
                    .latency_unit(LatencyUnit::Micros),
            ),
        )
}

// Public and token-guarded endpoints share paths (a public GET next to a
// protected POST), so guarding happens per handler through the [`AuthUser`]
// extractor instead of a route-group layer.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/register", post(auth::handlers::register))
        .route("/api/login", post(auth::handlers::login))
        .route("/api/auth/me", get(auth::handlers::me))
        .route("/api/photos", get(photos::handlers::list_photos))
        .route("/api/photos/upload", post(photos::handlers::upload_photo))
        .route("/api/me/photos", get(photos::handlers::my_photos))
        // Aliases kept for clients that predate the /api/me prefix.
        .route("/api/photos/me", get(photos::handlers::my_photos))
        .route("/api/photos/mine", get(photos::handlers::my_photos))
        .route(
            "/api/photos/{id}",
            get(photos::handlers::get_photo)
                .put(photos::handlers::update_photo)
                .delete(photos::handlers::delete_photo),
        )
        .route(
            "/api/photos/{id}/like",
            get(photos::handlers::photo_like_status)
                .post(photos::handlers::like_photo)
                .delete(photos::handlers::unlike_photo),
        )
        .route(
            "/api/photos/{id}/comments",
            get(comments::handlers::list_comments).post(comments::handlers::create_comment),
        )
        .route(
            "/api/comments/{id}",
            axum::routing::delete(comments::handlers::delete_comment),
        )
        .route(
            "/api/comments/{id}/like",
            post(comments::handlers::like_comment).delete(comments::handlers::unlike_comment),
        )
        .route(
            "/api/comments/{id}/report",
            post(comments::handlers::report_comment),
        )
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/photos/pending", get(admin::handlers::pending_photos))
        .route("/photos/{id}/approve", post(admin::handlers::approve_photo))
        .route("/photos/{id}/reject", post(admin::handlers::reject_photo))
        .route("/comment-reports", get(admin::handlers::list_reports))
        .route(
            "/comment-reports/{id}/resolve",
            post(admin::handlers::resolve_report),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_extractor_with_state::<AuthUser, AppState>(state))
}
