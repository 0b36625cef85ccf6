use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use lyricount::{
    config::Config,
    error::Error,
    management::{EXPIRY_MARGIN_SECS, TokenManager, is_expired},
    spotify::{Catalog, SpotifyClient, auth::request_token},
    types::AccessToken,
};
use serde_json::json;

#[derive(Default)]
struct FakeSpotify {
    base: String,
    token_requests: AtomicUsize,
    album_pages: AtomicUsize,
}

fn authorized(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn token(State(state): State<Arc<FakeSpotify>>, headers: HeaderMap, body: String) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    let basic = format!("Basic {}", STANDARD.encode("client-id:client-secret"));
    if !authorized(&headers, &basic) || body != "grant_type=client_credentials" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_client" }))).into_response();
    }

    Json(json!({ "access_token": "catalog-token", "token_type": "Bearer", "expires_in": 3600 }))
        .into_response()
}

async fn search(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers, "Bearer catalog-token") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if params.get("type").map(String::as_str) != Some("artist") {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let items = match params.get("q").map(String::as_str) {
        Some("Radiohead") => json!([{ "id": "rh", "name": "Radiohead" }]),
        _ => json!([]),
    };
    Json(json!({ "artists": { "items": items, "next": null } })).into_response()
}

async fn albums(
    State(state): State<Arc<FakeSpotify>>,
    Path(artist_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.album_pages.fetch_add(1, Ordering::SeqCst);

    match artist_id.as_str() {
        "rh" if !params.contains_key("offset") => {
            assert_eq!(params.get("limit").map(String::as_str), Some("50"));
            Json(json!({
                "items": [
                    { "id": "okc", "name": "OK Computer", "release_date": "1997-05-21" },
                    { "id": "kida", "name": "Kid A", "release_date": "2000-10-02" }
                ],
                "next": format!("{}/v1/artists/rh/albums?offset=2&limit=50", state.base)
            }))
            .into_response()
        }
        "rh" => Json(json!({
            "items": [
                { "id": "okc", "name": "OK Computer", "release_date": "1997-05-21" },
                { "id": "amn", "name": "Amnesiac" }
            ],
            "next": null
        }))
        .into_response(),
        "boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn tracks(headers: HeaderMap, Path(album_id): Path<String>) -> Response {
    if !authorized(&headers, "Bearer catalog-token") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match album_id.as_str() {
        "okc" => Json(json!({
            "items": [{ "name": "Airbag" }, { "name": "Paranoid Android" }],
            "next": null
        }))
        .into_response(),
        "malformed" => StatusCode::BAD_REQUEST.into_response(),
        "down" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "garbled" => "not json".into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_spotify() -> (Arc<FakeSpotify>, String) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let state = Arc::new(FakeSpotify {
        base: base.clone(),
        ..Default::default()
    });

    let app = Router::new()
        .route("/token", post(token))
        .route("/v1/search", get(search))
        .route("/v1/artists/{id}/albums", get(albums))
        .route("/v1/albums/{id}/tracks", get(tracks))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (state, base)
}

fn config(base: &str, secret: Option<&str>) -> Config {
    Config {
        spotify_client_id: Some("client-id".to_string()),
        spotify_client_secret: secret.map(str::to_string),
        spotify_api_url: format!("{}/v1", base),
        spotify_token_url: format!("{}/token", base),
        genius_access_token: None,
        genius_api_url: String::new(),
        cache_path: PathBuf::from("unused.db"),
        http_timeout: Duration::from_secs(5),
    }
}

async fn connected_client() -> (Arc<FakeSpotify>, SpotifyClient) {
    let (state, base) = spawn_spotify().await;
    let client = SpotifyClient::new(reqwest::Client::new(), &config(&base, Some("client-secret")));
    client.authenticate().await.unwrap();
    (state, client)
}

#[tokio::test]
async fn test_request_token_uses_client_credentials() {
    let (_state, base) = spawn_spotify().await;

    let token = request_token(
        &reqwest::Client::new(),
        &format!("{}/token", base),
        Some("client-id"),
        Some("client-secret"),
    )
    .await
    .unwrap();

    assert_eq!(token.access_token, "catalog-token");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 3600);
    assert!(token.obtained_at > 0);
}

#[tokio::test]
async fn test_rejected_credentials_are_an_auth_error() {
    let (_state, base) = spawn_spotify().await;
    let client = SpotifyClient::new(reqwest::Client::new(), &config(&base, Some("wrong")));

    let result = client.authenticate().await;

    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn test_missing_credentials_fail_without_a_request() {
    let (state, base) = spawn_spotify().await;

    let missing = SpotifyClient::new(reqwest::Client::new(), &config(&base, None));
    assert!(matches!(missing.authenticate().await, Err(Error::Auth(_))));

    let empty = request_token(
        &reqwest::Client::new(),
        &format!("{}/token", base),
        Some(""),
        Some("client-secret"),
    )
    .await;
    assert!(matches!(empty, Err(Error::Auth(_))));

    assert_eq!(state.token_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_an_auth_error() {
    let result = request_token(
        &reqwest::Client::new(),
        "http://127.0.0.1:9/token",
        Some("client-id"),
        Some("client-secret"),
    )
    .await;

    assert!(matches!(result, Err(Error::Auth(_))));
}

#[tokio::test]
async fn test_token_is_reused_while_valid() {
    let (state, client) = connected_client().await;

    client.find_artist_id("Radiohead").await.unwrap();
    client.list_tracks("okc").await.unwrap();

    assert_eq!(state.token_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_token_manager_keeps_the_obtained_token() {
    let (_state, base) = spawn_spotify().await;
    let manager = TokenManager::new(
        reqwest::Client::new(),
        format!("{}/token", base),
        Some("client-id".to_string()),
        Some("client-secret".to_string()),
    );

    assert!(manager.current_token().await.is_none());
    assert_eq!(manager.get_valid_token().await.unwrap(), "catalog-token");
    assert_eq!(
        manager.current_token().await.map(|t| t.access_token),
        Some("catalog-token".to_string())
    );
}

#[test]
fn test_token_expiry_margin() {
    let token = AccessToken {
        access_token: "t".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        obtained_at: 1_000,
    };
    let deadline = 1_000 + 3600 - EXPIRY_MARGIN_SECS;

    assert!(!is_expired(&token, 1_000));
    assert!(!is_expired(&token, deadline - 1));
    assert!(is_expired(&token, deadline));
    assert!(is_expired(&token, 1_000 + 3600));
}

#[test]
fn test_token_expiry_with_huge_lifetime() {
    let token = AccessToken {
        access_token: "t".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: u64::MAX,
        obtained_at: 1_000,
    };

    assert!(!is_expired(&token, 2_000));
    assert!(is_expired(&token, u64::MAX - 10));
}

#[tokio::test]
async fn test_find_artist_id() {
    let (_state, client) = connected_client().await;

    assert_eq!(
        client.find_artist_id("Radiohead").await.unwrap(),
        Some("rh".to_string())
    );
    assert_eq!(client.find_artist_id("Nobody At All").await.unwrap(), None);
    assert_eq!(client.find_artist_id("   ").await.unwrap(), None);
}

#[tokio::test]
async fn test_list_albums_follows_pages_and_drops_repeated_ids() {
    let (state, client) = connected_client().await;

    let albums = client.list_albums("rh").await.unwrap();

    let ids: Vec<&str> = albums.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["okc", "kida", "amn"]);
    assert_eq!(albums[0].release_date.as_deref(), Some("1997-05-21"));
    assert_eq!(albums[2].release_date, None);
    assert_eq!(state.album_pages.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_list_albums_of_unknown_artist() {
    let (_state, client) = connected_client().await;

    let missing = client.list_albums("nobody").await;
    let failing = client.list_albums("boom").await;

    assert!(matches!(missing, Err(Error::NotFound(_))));
    assert!(matches!(failing, Err(Error::Lookup(_))));
}

#[tokio::test]
async fn test_list_tracks_in_catalog_order() {
    let (_state, client) = connected_client().await;

    assert_eq!(
        client.list_tracks("okc").await.unwrap(),
        vec!["Airbag".to_string(), "Paranoid Android".to_string()]
    );
}

#[tokio::test]
async fn test_list_tracks_miss_is_empty_but_failure_is_an_error() {
    let (_state, client) = connected_client().await;

    assert!(client.list_tracks("unknown").await.unwrap().is_empty());
    assert!(client.list_tracks("malformed").await.unwrap().is_empty());
    assert!(matches!(client.list_tracks("down").await, Err(Error::Lookup(_))));
    assert!(matches!(client.list_tracks("garbled").await, Err(Error::Lookup(_))));
}
