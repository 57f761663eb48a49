//! Integration tests for the Spotify Web API client against a wiremock server.
//!
//! Run with: cargo test -p flowcore --test spotify_client_test

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flowcore::spotify::{parse_link, EntityKind, Metadata, MetadataError, SpotifyClient, SpotifyCredentials};

async fn client_for(server: &MockServer) -> SpotifyClient {
    SpotifyClient::new(SpotifyCredentials::new("client-id", "client-secret"))
        .unwrap()
        .with_api_base(format!("{}/v1", server.uri()))
        .with_token_url(format!("{}/api/token", server.uri()))
        .with_max_playlist_size(50)
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header_exists("authorization"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn track_json(id: &str, name: &str, artists: &[&str]) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "type": "track",
        "artists": artists.iter().map(|a| json!({"name": a})).collect::<Vec<_>>(),
        "album": {
            "name": "Some Album",
            "release_date": "2020-01-01",
            "images": [{"url": "https://i.scdn.co/image/1"}]
        },
        "duration_ms": 200_000,
        "popularity": 70,
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{}", id)}
    })
}

#[tokio::test]
async fn test_get_track_uses_bearer_token() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/4uLU6hMCjMI75M1A2tKUQC"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(track_json("4uLU6hMCjMI75M1A2tKUQC", "Never Gonna Give You Up", &["Rick Astley"])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let track = client.get_track("4uLU6hMCjMI75M1A2tKUQC").await.unwrap();

    assert_eq!(track.name, "Never Gonna Give You Up");
    assert_eq!(track.artist, "Rick Astley");
    assert_eq!(track.album, "Some Album");
    assert_eq!(track.duration, "3:20");
    assert_eq!(track.popularity, Some(70));
}

#[tokio::test]
async fn test_token_is_cached_between_calls() {
    let server = MockServer::start().await;
    // Exactly one token request for three API calls
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track_json("abc", "Song", &["A", "B"])))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    for _ in 0..3 {
        let track = client.get_track("abc").await.unwrap();
        assert_eq!(track.artist, "A, B");
    }
}

#[tokio::test]
async fn test_not_found_and_invalid_id() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"status": 404, "message": "Non existing id"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/bad"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"status": 400, "message": "invalid id"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert!(matches!(client.get_track("missing").await, Err(MetadataError::NotFound)));
    assert!(matches!(client.get_album("bad").await, Err(MetadataError::NotFound)));
}

#[tokio::test]
async fn test_rate_limit_and_server_error() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/busy"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/tracks/boom"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.get_track("busy").await {
        Err(MetadataError::RateLimited { retry_after }) => assert_eq!(retry_after, Some(7)),
        other => panic!("expected rate limit, got {:?}", other),
    }
    match client.get_track("boom").await {
        Err(MetadataError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_credentials_are_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_client"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_track("abc").await.unwrap_err();
    assert!(matches!(err, MetadataError::Auth(_)), "{err:?}");
}

#[tokio::test]
async fn test_playlist_pagination_skips_non_tracks() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let next = format!("{}/v1/playlists/pl1/tracks?offset=3&limit=3", server.uri());
    Mock::given(method("GET"))
        .and(path("/v1/playlists/pl1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "pl1",
            "name": "Road Trip",
            "description": "Songs for the road",
            "owner": {"display_name": "dj", "id": "dj_id"},
            "followers": {"total": 12},
            "images": [],
            "tracks": {
                "items": [
                    {"track": track_json("t1", "One", &["A"])},
                    {"track": null},
                    {"track": {"id": "e1", "name": "Episode", "type": "episode", "duration_ms": 1000}}
                ],
                "next": next
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/playlists/pl1/tracks"))
        .and(query_param("offset", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"track": track_json("t2", "Two", &["B"])},
                {"track": track_json("t3", "Three", &["C"])}
            ],
            "next": null
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let playlist = client.get_playlist("pl1").await.unwrap();

    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.owner, "dj");
    assert_eq!(playlist.followers, 12);
    assert_eq!(playlist.image_url, None);
    let names: Vec<&str> = playlist.tracks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["One", "Two", "Three"]);
}

#[tokio::test]
async fn test_playlist_is_capped() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let items: Vec<_> = (0..10)
        .map(|i| json!({"track": track_json(&format!("t{i}"), &format!("Song {i}"), &["X"])}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1/playlists/big"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "big",
            "name": "Big",
            "owner": {"display_name": null, "id": "owner_id"},
            "tracks": {"items": items, "next": format!("{}/v1/never-called", server.uri())}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await.with_max_playlist_size(4);
    let playlist = client.get_playlist("big").await.unwrap();
    assert_eq!(playlist.tracks.len(), 4);
    assert_eq!(playlist.owner, "owner_id");
}

#[tokio::test]
async fn test_album_tracks_inherit_album_name() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/albums/al1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "al1",
            "name": "Abbey Road",
            "artists": [{"name": "The Beatles"}],
            "total_tracks": 2,
            "release_date": "1969-09-26",
            "genres": ["rock"],
            "popularity": 85,
            "images": [{"url": "https://i.scdn.co/image/abbey"}],
            "tracks": {
                "items": [
                    {"id": "c1", "name": "Come Together", "artists": [{"name": "The Beatles"}], "duration_ms": 259_946, "track_number": 1, "type": "track"},
                    {"id": "c2", "name": "Something", "artists": [{"name": "The Beatles"}], "duration_ms": 182_293, "track_number": 2, "type": "track"}
                ],
                "next": null
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let album = client.get_album("al1").await.unwrap();

    assert_eq!(album.artist, "The Beatles");
    assert_eq!(album.total_tracks, 2);
    assert_eq!(album.genres, vec!["rock".to_string()]);
    assert!(album.tracks.iter().all(|t| t.album == "Abbey Road"));
    assert_eq!(album.tracks[1].track_number, Some(2));
    assert_eq!(album.tracks[0].duration, "4:19");
}

#[tokio::test]
async fn test_search_tracks_sends_query() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("q", "bohemian rhapsody"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {"items": [track_json("q1", "Bohemian Rhapsody", &["Queen"])], "next": null}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client.search_tracks("bohemian rhapsody", 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].artist, "Queen");
}

#[tokio::test]
async fn test_resolve_dispatches_on_kind() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/tracks/7qiZfU4dY1lWllzX7mPBI3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(track_json("7qiZfU4dY1lWllzX7mPBI3", "Shape of You", &["Ed Sheeran"])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let link = parse_link("https://open.spotify.com/track/7qiZfU4dY1lWllzX7mPBI3?si=abc").unwrap();
    let metadata = client.resolve(&link).await.unwrap();

    assert_eq!(metadata.kind(), EntityKind::Track);
    match metadata {
        Metadata::Track(track) => assert_eq!(track.name, "Shape of You"),
        other => panic!("expected track, got {:?}", other),
    }
}
