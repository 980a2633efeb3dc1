mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::app::spawn_test_app;
use common::fixtures::{BEST_CHOICE, GOOD_CHOICE};
use common::http::{assert_status_ok_json, player_request};

async fn play_one(app: &axum::Router, player: &str, choice: &str) -> serde_json::Value {
    let (_, _, next) = player_request(app, Method::GET, "/api/play/next", None, player).await;
    let id = next["data"]["puzzle"]["id"].as_u64().unwrap();
    let (status, _, body) = player_request(
        app,
        Method::POST,
        "/api/play/answer",
        Some(json!({ "puzzleId": id, "choiceId": choice })),
        player,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"].clone()
}

#[tokio::test]
async fn it_fresh_profile_has_defaults() {
    let app = spawn_test_app().await;

    let (status, _, body) =
        player_request(&app.app, Method::GET, "/api/profile", None, "newbie").await;
    assert_status_ok_json(status, &body);
    let data = &body["data"];
    assert_eq!(data["rating"], 1200);
    assert_eq!(data["rank"]["rank"], "Regular");
    assert_eq!(data["rank"]["nextRank"], "Skilled");
    assert_eq!(data["difficultyLabel"], "Intermediate");
    assert_eq!(data["itemsCompleted"], 0);
    assert_eq!(data["accuracyPercent"], 0);
    assert_eq!(data["corpusSize"], 4);
    assert_eq!(data["hasPending"], false);
}

#[tokio::test]
async fn it_profile_tracks_answers_and_history() {
    let app = spawn_test_app().await;

    let first = play_one(&app.app, "hank", BEST_CHOICE).await;
    let second = play_one(&app.app, "hank", GOOD_CHOICE).await;
    assert_eq!(second["currentStreak"], 0);
    assert_eq!(second["bestStreak"], 1);

    let (_, _, body) = player_request(&app.app, Method::GET, "/api/profile", None, "hank").await;
    let data = &body["data"];
    assert_eq!(data["itemsCompleted"], 2);
    assert_eq!(data["correctAnswers"], 1);
    assert_eq!(data["accuracyPercent"], 50);
    assert_eq!(data["rating"], second["ratingAfter"]);
    assert!(data["avgRatingChange"].as_f64().unwrap() > 0.0);

    let (status, _, body) = player_request(
        &app.app,
        Method::GET,
        "/api/profile/history?limit=1",
        None,
        "hank",
    )
    .await;
    assert_status_ok_json(status, &body);
    let page = &body["data"];
    assert_eq!(page["total"], 2);
    assert_eq!(page["limit"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["grade"], "good");

    let (_, _, body) = player_request(
        &app.app,
        Method::GET,
        "/api/profile/history?limit=1&offset=1",
        None,
        "hank",
    )
    .await;
    assert_eq!(body["data"]["items"][0]["itemId"], first["puzzleId"]);
}

#[tokio::test]
async fn it_history_limit_is_clamped() {
    let app = spawn_test_app().await;
    play_one(&app.app, "ivy", BEST_CHOICE).await;

    let (_, _, body) = player_request(
        &app.app,
        Method::GET,
        "/api/profile/history?limit=0",
        None,
        "ivy",
    )
    .await;
    assert_eq!(body["data"]["limit"], 1);

    let (_, _, body) = player_request(
        &app.app,
        Method::GET,
        "/api/profile/history?limit=1000",
        None,
        "ivy",
    )
    .await;
    assert_eq!(body["data"]["limit"], 100);
}

#[tokio::test]
async fn it_reset_restores_defaults() {
    let app = spawn_test_app().await;
    play_one(&app.app, "jack", BEST_CHOICE).await;

    let (status, _, body) =
        player_request(&app.app, Method::POST, "/api/profile/reset", None, "jack").await;
    assert_status_ok_json(status, &body);
    assert_eq!(body["data"]["rating"], 1200);
    assert_eq!(body["data"]["itemsCompleted"], 0);
    assert_eq!(body["data"]["completedUnique"], 0);

    let (_, _, body) = player_request(
        &app.app,
        Method::GET,
        "/api/profile/history",
        None,
        "jack",
    )
    .await;
    assert_eq!(body["data"]["total"], 0);
}
