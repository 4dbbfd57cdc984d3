//! End-to-end tests for the audio streaming endpoint.

mod common;

use common::{wav_bytes, write_wav, TestServer};
use reqwest::StatusCode;
use std::fs;
use tempfile::tempdir;

#[tokio::test]
async fn stream_requires_a_selected_folder() {
    let server = TestServer::spawn().await;

    let response = server.get("/api/stream/song.wav").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Music folder not set");
}

#[tokio::test]
async fn stream_rejects_traversal() {
    let server = TestServer::spawn().await;
    let dir = tempdir().unwrap();
    server.set_music_folder(dir.path()).await;

    // Separators are encoded so the client does not normalize the path away.
    let response = server.get("/api/stream/..%2F..%2Fetc%2Fpasswd").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid file path");
}

#[tokio::test]
async fn stream_missing_file_is_404() {
    let server = TestServer::spawn().await;
    let dir = tempdir().unwrap();
    server.set_music_folder(dir.path()).await;

    let response = server.get("/api/stream/ghost.mp3").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stream_serves_whole_file_with_content_type() {
    let server = TestServer::spawn().await;
    let dir = tempdir().unwrap();
    let album_dir = dir.path().join("album");
    fs::create_dir_all(&album_dir).unwrap();
    write_wav(&album_dir, "song.wav", 1);

    server.set_music_folder(dir.path()).await;

    let response = server.get("/api/stream/album/song.wav").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "audio/wav"
    );
    assert_eq!(
        response.headers()["accept-ranges"].to_str().unwrap(),
        "bytes"
    );
    assert_eq!(response.bytes().await.unwrap().to_vec(), wav_bytes(1));
}

#[tokio::test]
async fn stream_serves_byte_ranges() {
    let server = TestServer::spawn().await;
    let dir = tempdir().unwrap();
    write_wav(dir.path(), "song.wav", 1);
    let full = wav_bytes(1);

    server.set_music_folder(dir.path()).await;

    let response = server
        .client
        .get(format!("{}/api/stream/song.wav", server.base_url))
        .header("Range", "bytes=4-7")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()["content-range"].to_str().unwrap(),
        format!("bytes 4-7/{}", full.len())
    );
    assert_eq!(response.bytes().await.unwrap().to_vec(), full[4..8].to_vec());
}

#[tokio::test]
async fn stream_serves_open_ended_ranges() {
    let server = TestServer::spawn().await;
    let dir = tempdir().unwrap();
    write_wav(dir.path(), "song.wav", 1);
    let full = wav_bytes(1);

    server.set_music_folder(dir.path()).await;

    let start = full.len() - 16;
    let response = server
        .client
        .get(format!("{}/api/stream/song.wav", server.base_url))
        .header("Range", format!("bytes={}-", start))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.bytes().await.unwrap().to_vec(), full[start..].to_vec());
}
