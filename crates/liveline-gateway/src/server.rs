//! Gateway server — the Express-compatible JSON API over the desk

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use liveline_core::{
    AgentSpec, AssistRequest, AssistResponse, ConnectRequest, ConnectResponse, DeskConfig,
    DisconnectRequest, DisconnectResponse, Error, ErrorBody, GatewayConfig, HealthResponse,
    MessageRequest, MessageResponse, QueuePollResponse, SessionId, UserId,
};
use liveline_desk::{ConnectOutcome, Desk, SessionGrant};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::assist;

struct PendingTicket {
    ticket: oneshot::Receiver<SessionGrant>,
    issued_at: Instant,
}

pub struct AppState {
    pub desk: Arc<Desk>,
    /// Tickets for queued connects, keyed by user id, redeemed via polling.
    pending: DashMap<String, PendingTicket>,
}

impl AppState {
    pub fn new(desk: Arc<Desk>) -> Self {
        Self {
            desk,
            pending: DashMap::new(),
        }
    }

    pub fn pending_tickets(&self) -> usize {
        self.pending.len()
    }

    /// Drop tickets nobody redeemed within the session-age bound. Dropping a
    /// still-unresolved receiver reads as an abandoned waiter at the next
    /// drain; a session behind an already-resolved one is idle-swept.
    fn evict_stale_tickets(&self) {
        let ttl = Duration::from_secs(self.desk.config().max_session_age_secs);
        let before = self.pending.len();
        self.pending.retain(|_, p| p.issued_at.elapsed() < ttl);
        let evicted = before - self.pending.len();
        if evicted > 0 {
            debug!(evicted, "dropped unredeemed queue tickets");
        }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(assist_handler))
        .route("/api/agent/connect", post(connect_handler))
        .route("/api/agent/message", post(message_handler))
        .route("/api/agent/disconnect", post(disconnect_handler))
        .route("/api/agent/queue/:user_id", get(queue_handler))
        .route("/api/health", get(health_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}

pub async fn start_gateway(
    gateway: GatewayConfig,
    desk_config: DeskConfig,
    roster: Vec<AgentSpec>,
) -> anyhow::Result<()> {
    let desk = Arc::new(Desk::new(roster, desk_config));
    let tasks = desk.start();
    let router = app(Arc::new(AppState::new(desk)));

    let bind_addr: SocketAddr = format!("{}:{}", gateway.bind.to_addr(), gateway.port).parse()?;

    info!("Liveline Gateway v{} starting", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", bind_addr);
    info!("  Connect:      POST http://{}/api/agent/connect", bind_addr);
    info!("  Health:       GET  http://{}/api/health", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router).await?;

    tasks.shutdown().await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn connect_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConnectRequest>,
) -> Response {
    let user_id = req
        .user_id
        .unwrap_or_else(|| format!("user_{}", uuid::Uuid::new_v4()));
    let user = UserId::new(&user_id);

    match state.desk.connect(&user, &req.language).await {
        Ok(ConnectOutcome::Connected(grant)) => Json(ConnectResponse::connected(
            grant.session_id.as_str(),
            grant.agent_name,
            grant.greeting,
        ))
        .into_response(),
        Ok(ConnectOutcome::Queued { position, ticket }) => {
            // A repeat connect replaces the old ticket; the drain notices the
            // dropped receiver and rolls the stale admission back.
            state.evict_stale_tickets();
            state.pending.insert(
                user_id,
                PendingTicket {
                    ticket,
                    issued_at: Instant::now(),
                },
            );
            Json(ConnectResponse::queued(position)).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn message_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let session_id = SessionId::new(&req.session_id);
    match state.desk.send_message(&session_id, &req.message).await {
        Ok(reply) => Json(MessageResponse {
            response: reply,
            timestamp: state.desk.now(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

async fn disconnect_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DisconnectRequest>,
) -> Response {
    let session_id = SessionId::new(&req.session_id);
    let success = state.desk.disconnect(&session_id).await;
    Json(DisconnectResponse { success }).into_response()
}

/// Poll a queued connect. Redeems the ticket when the drain has resolved it.
async fn queue_handler(
    State(state): State<Arc<AppState>>,
    AxumPath(user_id): AxumPath<String>,
) -> Response {
    let user = UserId::new(&user_id);
    state.evict_stale_tickets();

    if let Some((key, mut pending)) = state.pending.remove(&user_id) {
        return match pending.ticket.try_recv() {
            Ok(grant) => Json(QueuePollResponse::Ready {
                success: true,
                session_id: grant.session_id.as_str().to_string(),
                agent_name: grant.agent_name,
                message: grant.greeting,
            })
            .into_response(),
            Err(oneshot::error::TryRecvError::Empty) => {
                let position = state.desk.queue_position(&user).await;
                state.pending.insert(key, pending);
                Json(QueuePollResponse::Waiting {
                    waiting: true,
                    position,
                })
                .into_response()
            }
            Err(oneshot::error::TryRecvError::Closed) => Json(QueuePollResponse::Waiting {
                waiting: false,
                position: None,
            })
            .into_response(),
        };
    }

    // No ticket held here; report queue membership as best effort.
    let position = state.desk.queue_position(&user).await;
    Json(QueuePollResponse::Waiting {
        waiting: position.is_some(),
        position,
    })
    .into_response()
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.desk.health().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        available_agents: snapshot.available_agents,
        active_sessions: snapshot.active_sessions,
        queue_length: snapshot.queue_length,
        timestamp: state.desk.now(),
    })
    .into_response()
}

async fn assist_handler(Json(req): Json<AssistRequest>) -> Response {
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("Message is required")),
        )
            .into_response();
    }
    let (response, suggest_live_agent) = assist::respond(&req.message, &req.language);
    Json(AssistResponse {
        response,
        suggest_live_agent,
    })
    .into_response()
}

fn error_response(e: Error) -> Response {
    let status = if e.is_recoverable() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorBody::new(e.to_string()))).into_response()
}
