use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::{get, post},
};
use sso_adapters::{
    http::{
        AppState,
        routes::{google_callback, google_login, login, logout, refresh, register},
    },
    oauth::GoogleOAuthClient,
};
use sso_application::AuthOperations;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// HTTP front of the identity service.
pub struct SsoService {
    router: Router,
}

impl SsoService {
    /// Builds the router over any [`AuthOperations`] implementation.
    ///
    /// The auth facade is cloned into every request through [`AppState`], so
    /// its stores must share their state internally (pools, `Arc`s).
    pub fn new<A>(auth: A, google: GoogleOAuthClient) -> Self
    where
        A: AuthOperations,
    {
        let router = Router::new()
            .route("/register", post(register::<A>))
            .route("/login", post(login::<A>))
            .route("/refresh", post(refresh::<A>))
            .route("/logout", post(logout::<A>))
            .route("/auth/google", get(google_login::<A>))
            .route("/auth/google/callback", get(google_callback::<A>))
            .with_state(AppState::new(auth, google));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Converts the service into a router that can be nested into another
    /// application. Without `allowed_origins` no CORS layer is installed.
    pub fn as_nested_router(mut self, allowed_origins: Option<Vec<String>>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins
                            .iter()
                            .any(|allowed| allowed.as_bytes() == origin.as_bytes())
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Serves the router on `listener` until the server stops.
    ///
    /// Peer addresses are exposed to the routes so login can record the
    /// caller's IP when no proxy header is present.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<Vec<String>>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("SSO service listening on {}", listener.local_addr()?);

        axum_server::Server::<SocketAddr>::from_listener(listener)
            .serve(router.into_make_service_with_connect_info::<SocketAddr>())
            .await
    }
}
