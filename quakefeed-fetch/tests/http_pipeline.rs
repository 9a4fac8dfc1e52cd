//! Pipeline tests against a loopback HTTP responder.

use std::sync::Arc;
use std::time::Duration;

use quakefeed_core::{FeedFailure, FeedOutcome, OrderBy, QueryParameters};
use quakefeed_fetch::{FeedPipeline, HttpClient};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and returns the request line it received.
async fn serve_once(status_line: &'static str, body: Vec<u8>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        socket.shutdown().await.unwrap();

        let text = String::from_utf8_lossy(&request).into_owned();
        text.lines().next().unwrap_or_default().to_string()
    });

    (format!("http://{addr}/fdsnws/event/1/query"), handle)
}

fn client() -> Arc<HttpClient> {
    Arc::new(HttpClient::builder().no_proxy().build().unwrap())
}

#[tokio::test]
async fn test_fetch_and_parse_over_http() {
    let body = br#"{"type":"FeatureCollection","features":[
        {"properties":{"mag":6.3,"place":"12km NNE of Example Town","time":1454124312220,"url":"https://e/1"}},
        {"properties":{"mag":9.1,"place":"Example Sea","time":1454124000000,"url":"https://e/2"}}
    ]}"#
    .to_vec();
    let (endpoint, server) = serve_once("HTTP/1.1 200 OK", body).await;

    let pipeline = FeedPipeline::with_endpoint(client(), endpoint);
    let run = pipeline
        .run(&QueryParameters::new(OrderBy::Time, "2.5", "9"))
        .await;

    let request_line = server.await.unwrap();
    assert_eq!(
        request_line,
        "GET /fdsnws/event/1/query?format=geojson&limit=10&maxmagnitude=9&minmagnitude=2.5&orderby=time HTTP/1.1"
    );

    let events = run.outcome.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].raw_location, "12km NNE of Example Town");
    assert_eq!(events[1].detail_url, "https://e/2");
    assert!(run.url.is_some());
}

#[tokio::test]
async fn test_non_200_is_unavailable() {
    let (endpoint, server) = serve_once("HTTP/1.1 500 Internal Server Error", b"oops".to_vec()).await;

    let pipeline = FeedPipeline::with_endpoint(client(), endpoint);
    let outcome = pipeline.load(&QueryParameters::default()).await;
    server.await.unwrap();

    assert_eq!(
        outcome,
        FeedOutcome::Unavailable(FeedFailure::HttpStatus { status: 500 })
    );
}

#[tokio::test]
async fn test_empty_200_is_unavailable() {
    let (endpoint, server) = serve_once("HTTP/1.1 200 OK", Vec::new()).await;

    let pipeline = FeedPipeline::with_endpoint(client(), endpoint);
    let outcome = pipeline.load(&QueryParameters::default()).await;
    server.await.unwrap();

    assert_eq!(outcome, FeedOutcome::Unavailable(FeedFailure::EmptyBody));
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() {
    let mut body = br#"{"features":[{"properties":{"mag":5.0,"place":"Caf"#.to_vec();
    body.push(0xFF);
    body.extend_from_slice(br#"","time":1,"url":"https://e/1"}}]}"#);
    let (endpoint, server) = serve_once("HTTP/1.1 200 OK", body).await;

    let pipeline = FeedPipeline::with_endpoint(client(), endpoint);
    let outcome = pipeline.load(&QueryParameters::default()).await;
    server.await.unwrap();

    assert_eq!(outcome.events().len(), 1);
    assert_eq!(outcome.events()[0].raw_location, "Caf\u{FFFD}");
}

#[tokio::test]
async fn test_connection_refused_is_network_failure() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::builder()
        .no_proxy()
        .connect_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let pipeline = FeedPipeline::with_endpoint(Arc::new(client), format!("http://{addr}/query"));
    let outcome = pipeline.load(&QueryParameters::default()).await;

    assert!(matches!(
        outcome,
        FeedOutcome::Unavailable(FeedFailure::Network { .. })
    ));
}
