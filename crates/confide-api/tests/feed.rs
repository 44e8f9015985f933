mod common;

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tower::ServiceExt;

use confide_types::api::CreateConfessionResponse;
use confide_types::events::FeedEvent;

use common::*;

type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn serve(router: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .unwrap();
    });
    addr
}

async fn next_event(ws: &mut Client) -> FeedEvent {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for feed event")
            .expect("feed closed")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn subscriber_gets_ready_then_new_confessions() {
    let router = app(local_state());
    let addr = serve(router.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/api/confessions/live", addr)).await.unwrap();

    match next_event(&mut ws).await {
        FeedEvent::Ready { policy_version } => {
            assert_eq!(policy_version, confide_filter::POLICY_VERSION)
        }
        other => panic!("expected ready, got {:?}", other),
    }

    let resp = router.oneshot(post_confession("live and direct")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: CreateConfessionResponse = body_json(resp).await;

    match next_event(&mut ws).await {
        FeedEvent::ConfessionCreate { id, message, created_at } => {
            assert_eq!(id, created.confession.id);
            assert_eq!(message, "live and direct");
            assert_eq!(created_at, created.confession.created_at);
        }
        other => panic!("expected confession, got {:?}", other),
    }

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn rejected_confessions_are_not_broadcast() {
    let router = app(local_state());
    let addr = serve(router.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/api/confessions/live", addr)).await.unwrap();
    assert!(matches!(next_event(&mut ws).await, FeedEvent::Ready { .. }));

    let resp = router.clone().oneshot(post_confession("what the fuck")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = router.oneshot(post_confession("a kind word")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    match next_event(&mut ws).await {
        FeedEvent::ConfessionCreate { message, .. } => assert_eq!(message, "a kind word"),
        other => panic!("expected confession, got {:?}", other),
    }
}

#[tokio::test]
async fn client_messages_are_ignored() {
    let router = app(local_state());
    let addr = serve(router.clone()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/api/confessions/live", addr)).await.unwrap();
    assert!(matches!(next_event(&mut ws).await, FeedEvent::Ready { .. }));

    ws.send(Message::Text(r#"{"type":"confession_create"}"#.into())).await.unwrap();

    let resp = router.oneshot(post_confession("still listening")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    match next_event(&mut ws).await {
        FeedEvent::ConfessionCreate { message, .. } => assert_eq!(message, "still listening"),
        other => panic!("expected confession, got {:?}", other),
    }
}
