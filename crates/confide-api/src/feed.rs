use axum::{
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
};

use confide_filter::POLICY_VERSION;
use confide_gateway::connection;

use crate::state::AppState;

/// GET /api/confessions/live: WebSocket stream of new confessions.
pub async fn live_feed(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| {
        connection::handle_connection(socket, dispatcher, POLICY_VERSION.to_string())
    })
}
