//! Axum middleware for authentication.
//!
//! [`authenticate`] resolves the request credential into a [`Session`] and stores it
//! in the request extensions. [`authorize_operation`] then checks the session role
//! against the decision table for the route's [`Operation`], before any body
//! extractor runs.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{field, info_span, warn, Instrument};

use crate::api::error::ApiError;
use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::auth::session::SessionResolver;
use crate::observability::metrics;

/// Middleware entry point that authenticates requests using the configured [`SessionResolver`].
pub async fn authenticate(
    State(resolver): State<SessionResolver>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %method,
        http.path = %path,
        auth.user_id = field::Empty,
        correlation_id = %correlation_id
    );
    let resolved = span.in_scope(|| match resolver.resolve_headers(request.headers()) {
        Ok(session) => {
            tracing::Span::current().record("auth.user_id", field::display(&session.user_id));
            metrics::record_authentication("success");
            Ok(session)
        }
        Err(err) => {
            warn!(%correlation_id, error = %err, "authentication failed");
            metrics::record_authentication("rejected");
            Err(err)
        }
    });

    request.extensions_mut().insert::<Session>(resolved?);
    Ok(next.run(request).instrument(span).await)
}

/// Middleware state naming the operation a route performs.
#[derive(Debug, Clone, Copy)]
pub struct OperationGate {
    decisions: DecisionTable,
    operation: Operation,
}

impl OperationGate {
    pub fn new(decisions: DecisionTable, operation: Operation) -> Self {
        Self { decisions, operation }
    }
}

/// Reject the request unless the session stored by [`authenticate`] may perform the
/// gate's operation.
pub async fn authorize_operation(
    State(gate): State<OperationGate>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let session = request.extensions().get::<Session>();
    if let Err(err) = gate.decisions.authorize_optional(session, gate.operation) {
        metrics::record_operation(gate.operation, err.kind().as_str());
        return Err(err.into());
    }

    Ok(next.run(request).await)
}
