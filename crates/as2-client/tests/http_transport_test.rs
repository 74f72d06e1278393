//! # HTTP Transport Integration Tests
//!
//! Exercise [`HttpTransport`] against wiremock servers.
//!
//! ## Note on `spawn_blocking`
//!
//! `Transport::post` is synchronous and uses `Handle::block_on`
//! internally, which cannot run on an async worker thread. Every call is
//! wrapped in `tokio::task::spawn_blocking`.

use std::sync::Arc;
use std::time::Duration;

use as2_client::{
    As2Error, As2Sender, HeaderSet, HttpTransport, StatusCode, Transaction, Transport, TransportConfig,
    TransportError,
};
use as2_core::As2Id;
use as2_crypto::{MockCms, SigningIdentity};
use url::Url;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(timeout: Duration) -> Arc<HttpTransport> {
    let config = TransportConfig {
        timeout,
        ..TransportConfig::default()
    };
    Arc::new(HttpTransport::new(&config).expect("transport build"))
}

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{p}", server.uri())).expect("mock url")
}

fn as2_headers() -> HeaderSet {
    let mut headers = HeaderSet::new();
    headers.insert("AS2-From", "ACME");
    headers.insert("AS2-To", "GLOBEX");
    headers.insert("Content-Type", "application/EDIFACT");
    headers.insert("Content-Length", "3");
    headers
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn post_sends_headers_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/as2"))
        .and(header("AS2-From", "ACME"))
        .and(header("AS2-To", "GLOBEX"))
        .and(header("Content-Type", "application/EDIFACT"))
        .and(header("Content-Length", "3"))
        .and(body_bytes(b"UNB".to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(Duration::from_secs(5));
    let target = url(&server, "/as2");
    let status = tokio::task::spawn_blocking(move || transport.post(&target, &as2_headers(), b"UNB"))
        .await
        .expect("task")
        .expect("post");

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_2xx_is_status_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/as2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("partner down"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(Duration::from_secs(5));
    let target = url(&server, "/as2");
    let err = tokio::task::spawn_blocking(move || transport.post(&target, &as2_headers(), b"UNB"))
        .await
        .expect("task")
        .unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "partner down");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_partner_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let transport = transport(Duration::from_millis(100));
    let target = url(&server, "/as2");
    let err = tokio::task::spawn_blocking(move || transport.post(&target, &as2_headers(), b"UNB"))
        .await
        .expect("task")
        .unwrap_err();

    assert!(matches!(err, TransportError::Timeout { elapsed_ms: 100 }), "{err:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn redirects_are_followed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/as2"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/as2"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport(Duration::from_secs(5));
    let target = url(&server, "/old");
    let status = tokio::task::spawn_blocking(move || transport.post(&target, &as2_headers(), b"UNB"))
        .await
        .expect("task")
        .expect("post");

    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connection_refused_is_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let transport = transport(Duration::from_secs(5));
    let target = Url::parse(&format!("http://127.0.0.1:{port}/as2")).expect("url");
    let err = tokio::task::spawn_blocking(move || transport.post(&target, &as2_headers(), b"UNB"))
        .await
        .expect("task")
        .unwrap_err();

    assert!(matches!(err, TransportError::Connection(_)), "{err:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn signed_send_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/as2"))
        .and(header("AS2-Version", "1.2"))
        .and(header("Mime-Version", "1.0"))
        .and(header("EDIINT-Features", "multiple-attachments"))
        .and(header("Subject", "orders.edi transmission."))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&TransportConfig::default()).expect("transport build");
    let sender = Arc::new(As2Sender::new(MockCms::new(), transport));
    let tx = Transaction::new(
        url(&server, "/as2"),
        "orders.edi",
        b"UNB+UNOA:1'".as_slice(),
        As2Id::new("ACME").expect("id"),
        As2Id::new("GLOBEX").expect("id"),
    )
    .with_signing(SigningIdentity::new("me.pem"));

    let receipt = tokio::task::spawn_blocking(move || sender.send(&tx))
        .await
        .expect("task")
        .expect("send");

    assert_eq!(receipt.status, StatusCode::OK);
    assert!(receipt.signed);

    let requests = server.received_requests().await.expect("recording enabled");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .expect("content type");
    assert_eq!(content_type, receipt.content_type);
    let payload = as2_mime::extract_payload(&requests[0].body, content_type).expect("extract");
    assert_eq!(payload, b"UNB+UNOA:1'");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejected_send_surfaces_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unknown partner"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&TransportConfig::default()).expect("transport build");
    let sender = As2Sender::new(MockCms::new(), transport);
    let tx = Transaction::new(
        url(&server, "/as2"),
        "invoice.xml",
        b"<Invoice/>".as_slice(),
        As2Id::new("ACME").expect("id"),
        As2Id::new("GLOBEX").expect("id"),
    );

    let err = tokio::task::spawn_blocking(move || sender.send(&tx))
        .await
        .expect("task")
        .unwrap_err();

    assert!(matches!(
        err,
        As2Error::Transport(TransportError::Status { status: 401, .. })
    ));
}
