use std::{collections::BTreeMap, error::Error};

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    serve::Serve,
    Router,
};
use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Level;

use domain::{Member, MemberAPIError};
pub mod routes;
use crate::utils::tracing::*;
use routes::api::MemberResponse;
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

/// Uniform JSON body for every API response. `results` and `error` are
/// mutually exclusive.
#[derive(Debug, Serialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<String, MemberResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    status: StatusCode,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl Envelope {
    pub fn with_members(members: impl IntoIterator<Item = Member>) -> Self {
        let results = members
            .into_iter()
            .map(|member| (member.id.to_string(), MemberResponse::from(member)))
            .collect();
        Self {
            results: Some(results),
            error: None,
            timestamp: Utc::now(),
            status: StatusCode::OK,
        }
    }

    pub fn with_error(status: StatusCode, message: String) -> Self {
        Self {
            results: None,
            error: Some(ErrorResponse {
                code: status.as_u16(),
                message,
            }),
            timestamp: Utc::now(),
            status,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self) {
            Ok(body) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                )],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode response envelope");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl MemberAPIError {
    /// Status code and user-facing message, logging the error on the way.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            MemberAPIError::MemberNotFound(id) => {
                log_error_chain(self, Level::DEBUG);
                (StatusCode::NOT_FOUND, format!("no member with ID {id}"))
            }
            MemberAPIError::ValidationError(message) => {
                log_error_chain(self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, message.as_ref().to_owned())
            }
            MemberAPIError::UnexpectedError(report) => {
                log_error_chain(self, Level::ERROR);
                let message = report
                    .chain()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(": ");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

impl IntoResponse for MemberAPIError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        Envelope::with_error(status, message).into_response()
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

/// Which front-ends get mounted on the router.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frontends {
    pub api: bool,
    pub site: bool,
}

impl Frontends {
    pub fn any(&self) -> bool {
        self.api || self.site
    }
}

impl Default for Frontends {
    fn default() -> Self {
        Self {
            api: true,
            site: true,
        }
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(
        app_state: AppState,
        address: &str,
        frontends: Frontends,
    ) -> Result<Self> {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
            ])
            .allow_origin(Any);

        let mut router = Router::new();
        if frontends.api {
            router = router.merge(routes::api::router());
        }
        if frontends.site {
            router = router.merge(routes::site::router());
        }

        let router = router
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address)
            .await
            .wrap_err_with(|| format!("failed to bind {address}"))?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
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

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}
