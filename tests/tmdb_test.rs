//! TMDB API client tests
//!
//! Runs the client against a mockito server.
//!
//! ## Test Cases
//! - test_tv_show_parsing: show with season summaries
//! - test_tv_season_parsing: season with episodes
//! - test_not_found / test_server_error / test_invalid_json: error mapping
//! - test_api_key_auth: v3 keys in the query, v4 tokens as Bearer
//! - test_rate_limit_retry: 429 then success

use embedtui::api::{TmdbClient, TmdbError};
use mockito::{Matcher, Server};

const SHOW_JSON: &str = r#"{
    "id": 42,
    "name": "Frieren: Beyond Journey's End",
    "seasons": [
        {"id": 100, "season_number": 0, "name": "Specials", "episode_count": 3},
        {"id": 101, "season_number": 1, "name": "Season 1", "episode_count": 28},
        {"id": 102, "season_number": 2, "name": "Season 2", "episode_count": 12}
    ]
}"#;

const SEASON_JSON: &str = r#"{
    "id": 101,
    "season_number": 1,
    "name": "Season 1",
    "episodes": [
        {
            "id": 9001,
            "show_id": 42,
            "episode_number": 1,
            "name": "The Journey's End",
            "overview": "The party returns home.",
            "still_path": "/still1.jpg",
            "vote_average": 8.6,
            "runtime": 24
        },
        {
            "id": 9002,
            "episode_number": 2,
            "name": "It Didn't Have to Be Magic",
            "overview": "",
            "still_path": null,
            "vote_average": null,
            "runtime": null
        }
    ]
}"#;

#[tokio::test]
async fn test_tv_show_parsing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tv/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SHOW_JSON)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let show = client.tv_show(42).await.unwrap();

    mock.assert_async().await;
    assert_eq!(show.id, 42);
    assert_eq!(show.name, "Frieren: Beyond Journey's End");
    assert_eq!(show.seasons.len(), 3);
    assert_eq!(show.seasons[0].number(), None, "specials are not numbered");
    assert_eq!(show.seasons[1].number(), Some(1));
    assert_eq!(show.seasons[2].episode_count, 12);
}

#[tokio::test]
async fn test_tv_season_parsing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tv/42/season/1")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SEASON_JSON)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let season = client.tv_season(42, 1).await.unwrap();

    mock.assert_async().await;
    assert_eq!(season.season_number, 1);
    assert_eq!(season.label(), "Season 1");
    assert_eq!(season.episodes.len(), 2);

    let first = &season.episodes[0];
    assert_eq!(first.heading(), "EP 1: The Journey's End");
    assert_eq!(first.rating_str(), "⭐ 8.6");
    assert_eq!(first.runtime_str(), "⏱ 24m");
    assert!(first.still_url().unwrap().ends_with("/still1.jpg"));

    let second = &season.episodes[1];
    assert_eq!(second.show_id, 42, "show id falls back to the request");
    assert_eq!(second.vote_average, 0.0);
    assert_eq!(second.runtime_str(), "⏱ --");
    assert!(second.still_url().is_none());
}

#[tokio::test]
async fn test_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tv/999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"status_code": 34, "status_message": "not found"}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.tv_show(999999).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::NotFound)
    ));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tv/42/season/1")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.tv_season(42, 1).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::ServerError(503))
    ));
}

#[tokio::test]
async fn test_invalid_json() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tv/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{not json")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client.tv_show(42).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_api_key_auth_query_param() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tv/42")
        .match_query(Matcher::UrlEncoded("api_key".into(), "test_key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SHOW_JSON)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    client.tv_show(42).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_key_auth_bearer_token() {
    let token = "e".repeat(120);
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tv/42")
        .match_header("Authorization", format!("Bearer {}", token).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SHOW_JSON)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url(token.clone(), server.url());
    client.tv_show(42).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_retry() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("GET", "/tv/42")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "1")
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/tv/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SHOW_JSON)
        .expect(1)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let show = client.tv_show(42).await.unwrap();

    limited.assert_async().await;
    ok.assert_async().await;
    assert_eq!(show.id, 42);
}
