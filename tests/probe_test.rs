//! Embed probe tests
//!
//! The probe decides whether an embed counts as loaded.
//!
//! ## Test Cases
//! - test_ok_response_is_loaded
//! - test_error_page_still_counts_as_loaded: any HTTP answer is a load
//! - test_refused_connection_is_not_loaded
//! - test_referer_is_embed_origin

use std::time::Duration;

use embedtui::embed::probe::ProbeError;
use embedtui::embed::EmbedProbe;
use mockito::{Matcher, Server};

fn probe() -> EmbedProbe {
    EmbedProbe::new(Duration::from_secs(5))
}

#[tokio::test]
async fn test_ok_response_is_loaded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/embed/movie/99")
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let url = format!("{}/v2/embed/movie/99", server.url());
    let status = probe().probe(&url).await.unwrap();

    mock.assert_async().await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_error_page_still_counts_as_loaded() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v/404")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/v/404", server.url());
    assert_eq!(probe().probe(&url).await.unwrap(), 404);
}

#[tokio::test]
async fn test_refused_connection_is_not_loaded() {
    // Reserve a free port, then close it so nothing listens there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let url = format!("http://127.0.0.1:{}/v2/embed/movie/99", port);
    let err = probe().probe(&url).await.unwrap_err();

    assert!(matches!(err, ProbeError::Request(_)));
}

#[tokio::test]
async fn test_referer_is_embed_origin() {
    let mut server = Server::new_async().await;
    let origin = format!("{}/", server.url());
    let mock = server
        .mock("GET", "/v2/embed/movie/99")
        .match_query(Matcher::Any)
        .match_header("Referer", origin.as_str())
        .with_status(200)
        .create_async()
        .await;

    let url = format!("{}/v2/embed/movie/99?autoPlay=false#t=10", server.url());
    probe().probe(&url).await.unwrap();

    mock.assert_async().await;
}
