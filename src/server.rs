//! HTTP endpoint hosting the skill
//!
//! The voice platform POSTs request envelopes to `/<path>`; operators get
//! `/health`, `/live` and `/metrics` alongside it.

use crate::config::ServerSection;
use crate::error::{
    sanitize_error_message, ErrorBody, ErrorCode, ErrorDetails, SkillError, SkillResult,
};
use crate::observability::metrics::metrics;
use crate::protocol::RequestEnvelope;
use crate::skill::Skill;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

/// Largest request envelope accepted
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// HTTP server for the skill endpoint
pub struct SkillServer {
    skill: Arc<Skill>,
    settings: Arc<ServerSection>,
}

impl SkillServer {
    pub fn new(skill: Arc<Skill>, settings: ServerSection) -> Self {
        Self {
            skill,
            settings: Arc::new(settings),
        }
    }

    /// All routes served by the endpoint
    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        let skill = self.skill.clone();
        let settings = self.settings.clone();

        // POST /<path> - request envelopes from the voice platform
        let skill_route = warp::path(self.settings.path.clone())
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and_then(move |body: Bytes| {
                let skill = skill.clone();
                let settings = settings.clone();
                async move {
                    Ok::<_, Infallible>(handle_envelope(&body, &skill, &settings, Utc::now()).await)
                }
            });

        // GET /health - overall status
        let health_skill = self.skill.clone();
        let health_route = warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .and_then(move || {
                let skill = health_skill.clone();
                async move {
                    let snapshot = metrics().get_metrics();
                    let response = HealthResponse {
                        status: "healthy",
                        version: env!("CARGO_PKG_VERSION"),
                        uptime_seconds: snapshot.uptime_seconds,
                        handlers: skill.handler_names(),
                        timestamp: Utc::now(),
                    };
                    Ok::<_, Infallible>(warp::reply::json(&response))
                }
            });

        // GET /live - liveness probe
        let live_route = warp::path("live")
            .and(warp::path::end())
            .and(warp::get())
            .and_then(|| async {
                let response = LivenessResponse {
                    alive: true,
                    timestamp: Utc::now(),
                };
                Ok::<_, Infallible>(warp::reply::json(&response))
            });

        // GET /metrics - metrics export
        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and_then(|| async {
                Ok::<_, Infallible>(warp::reply::json(&metrics().get_metrics()))
            });

        skill_route
            .or(health_route)
            .or(live_route)
            .or(metrics_route)
            .recover(handle_rejection)
            .with(warp::trace::request())
    }

    pub fn socket_addr(&self) -> SkillResult<SocketAddr> {
        let ip: IpAddr = self.settings.host.parse().map_err(|_| {
            SkillError::invalid_request(format!("invalid listen host '{}'", self.settings.host))
        })?;
        Ok(SocketAddr::new(ip, self.settings.port))
    }

    /// Serve until SIGINT or SIGTERM
    pub async fn run(self) -> SkillResult<()> {
        let addr = self.socket_addr()?;
        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, shutdown_signal())
            .map_err(|e| SkillError::internal_error(format!("Failed to bind {addr}: {e}")))?;

        info!(
            "Skill endpoint listening on http://{}/{}",
            bound, self.settings.path
        );
        server.await;
        info!("Skill endpoint shut down");
        Ok(())
    }
}

/// Parse, check and dispatch one envelope. `now` is the local clock reading
/// used for the timestamp check.
pub async fn handle_envelope(
    body: &[u8],
    skill: &Skill,
    settings: &ServerSection,
    now: DateTime<Utc>,
) -> WithStatus<Json> {
    let envelope: RequestEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(e) => {
            metrics().request_rejected();
            return error_reply(&SkillError::invalid_request(format!(
                "unparsable request envelope: {e}"
            )));
        }
    };

    if settings.verify_timestamp {
        if let Err(e) = check_timestamp(&envelope, settings.timestamp_tolerance_secs, now) {
            metrics().request_rejected();
            return error_reply(&e);
        }
    }

    match skill.invoke(envelope).await {
        Ok(response) => warp::reply::with_status(warp::reply::json(&response), StatusCode::OK),
        Err(e) => error_reply(&e),
    }
}

/// Refuse envelopes whose timestamp is more than `tolerance_secs` from `now`
pub fn check_timestamp(
    envelope: &RequestEnvelope,
    tolerance_secs: u64,
    now: DateTime<Utc>,
) -> SkillResult<()> {
    let skew_secs = (now - envelope.request.timestamp).num_seconds();
    if skew_secs.unsigned_abs() > tolerance_secs {
        return Err(SkillError::StaleRequest {
            skew_secs,
            tolerance_secs,
        });
    }
    Ok(())
}

fn error_reply(err: &SkillError) -> WithStatus<Json> {
    let (_, status) = err.code();
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!("Request failed: {}", sanitize_error_message(&err.to_string()));
    } else {
        warn!("Request rejected: {}", sanitize_error_message(&err.to_string()));
    }

    warp::reply::with_status(warp::reply::json(&err.to_error_body()), status)
}

/// Render filter rejections with the same JSON body as skill errors
async fn handle_rejection(rejection: Rejection) -> Result<WithStatus<Json>, Infallible> {
    let (code, status, message) = if rejection.is_not_found() {
        (
            ErrorCode::NotFound,
            StatusCode::NOT_FOUND,
            "no such route".to_string(),
        )
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            ErrorCode::PayloadTooLarge,
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("request envelope exceeds {MAX_BODY_BYTES} bytes"),
        )
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (
            ErrorCode::LengthRequired,
            StatusCode::LENGTH_REQUIRED,
            "Content-Length header is required".to_string(),
        )
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            ErrorCode::MethodNotAllowed,
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        warn!("Unhandled rejection: {:?}", rejection);
        (
            ErrorCode::InvalidRequest,
            StatusCode::BAD_REQUEST,
            "request rejected".to_string(),
        )
    };

    if code != ErrorCode::NotFound {
        metrics().request_rejected();
    }

    let body = ErrorBody {
        error: ErrorDetails { code, message },
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

/// Resolves on the first SIGINT or SIGTERM
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received SIGINT");
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received SIGINT");
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    handlers: Vec<&'static str>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: DateTime<Utc>,
}
