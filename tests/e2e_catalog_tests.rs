//! End-to-end tests for the public catalog surface
//!
//! Tests health, song search, song detail, categories and pagination.

mod common;

use common::{
    TestClient, TestServer, ARTIST_1_NAME, ARTIST_2_NAME, CATEGORY_DUETS_ID,
    CATEGORY_EVERGREENS_ID, SONG_1_LYRICS, SONG_1_TITLE, SONG_2_TITLE, SONG_3_TITLE,
};
use reqwest::StatusCode;

fn item_titles(body: &serde_json::Value) -> Vec<&str> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_reports_ok() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_health().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], "catalog-server");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "up");
    assert!(body["uptime"].as_str().is_some());
    assert!(body["hash"].as_str().is_some());
}

#[tokio::test]
async fn test_search_by_title() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search_songs(&[("title", "night")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(item_titles(&body), vec![SONG_1_TITLE]);
}

#[tokio::test]
async fn test_search_by_artist() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search_songs(&[("artist", "nina")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Both songs linked to Nina Meyer, title ascending
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(item_titles(&body), vec![SONG_2_TITLE, SONG_3_TITLE]);
}

#[tokio::test]
async fn test_search_by_lyrics() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search_songs(&[("lyrics", "rain")]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(item_titles(&body), vec![SONG_3_TITLE]);
}

#[tokio::test]
async fn test_search_requires_a_criterion() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search_songs(&[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Blank criteria count as missing
    let response = client.search_songs(&[("title", "   ")]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_results_exclude_lyrics() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.search_songs(&[("title", "night")]).await;
    let body: serde_json::Value = response.json().await.unwrap();

    let item = &body["items"][0];
    assert!(item.get("lyrics").is_none());
    assert!(item["code"].as_str().is_some());
}

#[tokio::test]
async fn test_search_pagination() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    // All three songs match an artist-less title search for a shared letter
    let response = client
        .search_songs(&[("artist", "e"), ("page", "1"), ("limit", "2")])
        .await;
    let first: serde_json::Value = response.json().await.unwrap();
    assert_eq!(first["page"], 1);
    assert_eq!(first["limit"], 2);

    let response = client
        .search_songs(&[("artist", "e"), ("page", "2"), ("limit", "2")])
        .await;
    let second: serde_json::Value = response.json().await.unwrap();
    assert_eq!(second["page"], 2);

    let first_titles = item_titles(&first);
    let second_titles = item_titles(&second);
    assert_eq!(first_titles.len(), 2);
    assert!(second_titles.iter().all(|t| !first_titles.contains(t)));
}

#[tokio::test]
async fn test_get_song_detail() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_song(&server.song_ids[0]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["title"], SONG_1_TITLE);
    assert_eq!(body["lyrics"], SONG_1_LYRICS);
    assert_eq!(body["artists"][0]["name"], ARTIST_1_NAME);
    assert_eq!(body["categories"][0]["name"], "Rock");
}

#[tokio::test]
async fn test_get_song_resolves_multiple_artists() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_song(&server.song_ids[2]).await;
    let body: serde_json::Value = response.json().await.unwrap();

    let names: Vec<&str> = body["artists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&ARTIST_1_NAME));
    assert!(names.contains(&ARTIST_2_NAME));
}

#[tokio::test]
async fn test_get_song_not_found() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_song("no-such-song").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_song_detail_truncates_long_lyrics() {
    let server = TestServer::spawn().await;
    let admin = TestClient::authenticated(server.base_url.clone()).await;

    let long_lyrics = "la".repeat(400); // 800 chars
    let response = admin
        .create_song(serde_json::json!({
            "title": "Marathon",
            "code": "99999",
            "lyrics": long_lyrics,
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: serde_json::Value = response.json().await.unwrap();

    let client = TestClient::new(server.base_url.clone());
    let response = client.get_song(created["id"].as_str().unwrap()).await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["lyrics"].as_str().unwrap().chars().count(), 500);
}

#[tokio::test]
async fn test_list_categories_ordered_by_name() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_categories().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    // Evergreens has no songs but still shows up
    assert_eq!(names, vec!["Duets", "Evergreens", "Rock"]);
}

#[tokio::test]
async fn test_list_category_songs() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_category_songs(CATEGORY_DUETS_ID, &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(item_titles(&body), vec![SONG_2_TITLE, SONG_3_TITLE]);
}

#[tokio::test]
async fn test_category_without_songs_yields_empty_page() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .get_category_songs(CATEGORY_EVERGREENS_ID, &[])
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_category_yields_empty_page() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_category_songs("no-such-category", &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["items"].as_array().unwrap().is_empty());
}
