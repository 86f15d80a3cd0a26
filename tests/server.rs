//! End-to-end tests against the demo server over real TCP.

use std::time::Duration;

use beeline_router::config::AppConfig;
use beeline_router::http::HttpServer;
use beeline_router::lifecycle::Shutdown;
use beeline_router::middleware::IncomingConfig;
use beeline_router::trace::Span;
use serde_json::json;
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_demo_routes_are_traced() {
    let (tracer, memory) = common::memory_tracer();
    let incoming = IncomingConfig::default().with_request_decorator(|parts, span: &Span| {
        if let Some(id) = parts.headers.get("x-request-id") {
            span.add_field("request.header.x_request_id", id.to_str()?);
        }
        Ok(())
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(AppConfig::default(), tracer, incoming);
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(server.run(listener, server_shutdown));

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    let res = client
        .get(format!("http://{addr}/users/1"))
        .header("x-request-id", "req-1")
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<serde_json::Value>().await.unwrap()["name"], "ada");

    let res = client.get(format!("http://{addr}/users/42")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(format!("http://{addr}/missing")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    // Spans are sent when the response future completes, before the body is flushed.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let events = memory.events();
    assert_eq!(events.len(), 4);

    let found = &events[0];
    assert_eq!(found.str_field("name"), Some("getUser"));
    assert_eq!(found.str_field("gorilla.vars.id"), Some("1"));
    assert_eq!(found.str_field("response.content_type"), Some("application/json"));
    assert_eq!(found.str_field("request.header.x_request_id"), Some("req-1"));
    assert_eq!(found.field("app.user_id"), Some(&json!(1)));
    assert_eq!(found.field("response.status_code"), Some(&json!(200)));

    let missing_user = &events[1];
    assert_eq!(missing_user.str_field("name"), Some("getUser"));
    assert_eq!(missing_user.field("response.status_code"), Some(&json!(404)));

    let health = &events[2];
    assert_eq!(health.str_field("name"), Some("HealthCheck"));
    assert_eq!(health.str_field("handler.route"), Some("/health"));
    assert!(health.field("handler.fnname").is_none());

    let unmatched = &events[3];
    assert!(!common::has_prefix(unmatched, "handler."));
    assert_eq!(unmatched.field("response.status_code"), Some(&json!(404)));

    shutdown.trigger();
    server_task.await.unwrap().unwrap();
}
