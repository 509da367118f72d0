// --- File: crates/services/propcoord_backend/src/app.rs ---
use axum::{routing::get, Router};
use propcoord_booking::routes as booking_routes;
use propcoord_gcal::routes as gcal_routes;
use tower_http::trace::TraceLayer;

use crate::gateway_factory::Services;

/// The complete application router.
pub fn build_router(services: &Services) -> Router {
    #[allow(unused_mut)] // only the openapi feature adds to it
    let mut app = Router::new()
        .route("/", get(|| async { "Property booking coordinator" }))
        .merge(booking_routes(services.booking.clone()))
        .merge(gcal_routes(services.credentials.clone()));

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use propcoord_booking::doc::BookingApiDoc;
        use propcoord_gcal::doc::GcalAuthApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Property Coordinator API",
                version = "0.1.0",
                description = "Guest booking and owner approval endpoints",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags((name = "Coordinator", description = "Core service endpoints")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(BookingApiDoc::openapi());
        openapi_doc.merge(GcalAuthApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
}
