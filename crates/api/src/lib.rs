//! HTTP API server for the adoption platform.
//!
//! Exposes pet listing CRUD, the adoption checkout pipeline (intake →
//! payment order → callback verification → confirmation e-mails), with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use checkout::{
    CheckoutCoordinator, EmailSender, InMemoryMailer, InMemoryPaymentGateway, Notifier,
    PaymentGateway, SignatureVerifier,
};
use domain::Money;
use metrics_exporter_prometheus::PrometheusHandle;
use store::{AdoptionStore, InMemoryStore, PetStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S, G, M>
where
    S: PetStore + AdoptionStore,
    G: PaymentGateway,
    M: EmailSender,
{
    pub coordinator: CheckoutCoordinator<S, G, M>,
    pub store: S,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S, G, M>(
    state: Arc<AppState<S, G, M>>,
    metrics_handle: PrometheusHandle,
) -> Router
where
    S: PetStore + AdoptionStore + Clone + 'static,
    G: PaymentGateway + 'static,
    M: EmailSender + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/pets", post(routes::pets::create::<S, G, M>))
        .route("/pets", get(routes::pets::list::<S, G, M>))
        .route("/pets/{id}", get(routes::pets::get::<S, G, M>))
        .route("/pets/{id}", put(routes::pets::update::<S, G, M>))
        .route("/pets/{id}", delete(routes::pets::delete::<S, G, M>))
        .route("/adoptions", post(routes::adoptions::create::<S, G, M>))
        .route("/adoptions/{id}", get(routes::adoptions::get::<S, G, M>))
        .route(
            "/adoptions/{id}/notify",
            post(routes::adoptions::notify::<S, G, M>),
        )
        .route("/payments/verify", post(routes::payments::verify::<S, G, M>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state backed by in-memory services.
///
/// Used by tests and credential-less local runs. The returned store,
/// gateway, and mailer handles share state with the coordinator so callers
/// can seed and inspect them.
pub fn create_default_state(
    secret: &str,
) -> (
    Arc<AppState<InMemoryStore, InMemoryPaymentGateway, InMemoryMailer>>,
    InMemoryStore,
    InMemoryPaymentGateway,
    InMemoryMailer,
) {
    let store = InMemoryStore::new();
    let gateway = InMemoryPaymentGateway::new();
    let mailer = InMemoryMailer::new();

    let notifier = Notifier::new(mailer.clone(), config::DEFAULT_FROM_EMAIL, None);
    let coordinator = CheckoutCoordinator::new(
        store.clone(),
        gateway.clone(),
        SignatureVerifier::new(secret),
        notifier,
        Money::from_rupees(500),
    );

    let state = Arc::new(AppState {
        coordinator,
        store: store.clone(),
    });

    (state, store, gateway, mailer)
}
