//! End-to-end chat turns against mocked forecast and generation endpoints.

use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sunergy::app::{App, TurnPhase};
use sunergy::chat::Sender;
use sunergy::config::Config;
use sunergy::storage::{self, FileStore};

fn app_against(server_uri: &str, dir: &TempDir) -> App {
    let state_dir = dir.path().join("state");
    let config = Config {
        forecast_url: format!("{server_uri}/predict"),
        generate_url: format!("{server_uri}/api/generate"),
        model: "llama3.2:1b".to_string(),
        data_file: dir.path().join("energy_data.txt"),
        state_dir: state_dir.clone(),
    };
    App::new(config, Box::new(FileStore::new(state_dir)))
}

async fn drain_until(app: &mut App, count: usize) {
    for _ in 0..200 {
        app.process_events();
        if app.messages.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!(
        "timed out waiting for {} messages, have {}",
        count,
        app.messages.len()
    );
}

#[tokio::test]
async fn test_round_trip_appends_user_then_bot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(json!({
            "message": "How do I save power tonight?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usage_wh": 100,
            "generation_wh": 50,
            "timeframe": "day"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The generation request must carry the composed prompt, the model name
    // and the stream flag.
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.2:1b",
            "prompt": "Given that the expected energy usage is 100 Wh \
                       and expected solar generation is 50 Wh \
                       for the next day, how can the user optimize energy consumption?",
            "stream": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Turn off the lights."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_against(&server.uri(), &dir);

    app.textarea.insert_str("How do I save power tonight?");
    app.submit_message();
    assert_eq!(app.phase, TurnPhase::AwaitingForecast);
    assert_eq!(app.messages.len(), 1);

    drain_until(&mut app, 2).await;

    assert_eq!(app.messages.len(), 2);
    assert_eq!(app.messages[0].sender, Sender::User);
    assert_eq!(app.messages[0].text, "How do I save power tonight?");
    assert_eq!(app.messages[1].sender, Sender::Bot);
    assert_eq!(app.messages[1].text, "Turn off the lights.");
    assert_eq!(app.phase, TurnPhase::Idle);

    server.verify().await;
}

#[tokio::test]
async fn test_forecast_failure_skips_generation_and_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "should never be requested"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_against(&server.uri(), &dir);

    app.textarea.insert_str("hello");
    app.submit_message();
    drain_until(&mut app, 2).await;

    assert_eq!(app.messages[1].sender, Sender::Bot);
    assert_eq!(app.messages[1].text, "Sorry, something went wrong.");
    assert_eq!(app.phase, TurnPhase::Idle);

    server.verify().await;
}

#[tokio::test]
async fn test_malformed_forecast_body_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_against(&server.uri(), &dir);

    app.textarea.insert_str("hello");
    app.submit_message();
    drain_until(&mut app, 2).await;

    assert_eq!(app.messages[1].text, "Sorry, something went wrong.");
}

#[tokio::test]
async fn test_generation_failure_keeps_user_message_and_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usage_wh": 10,
            "generation_wh": 5,
            "timeframe": "hour"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_against(&server.uri(), &dir);

    app.textarea.insert_str("hello");
    app.submit_message();
    drain_until(&mut app, 2).await;

    // The already-appended user message is not rolled back.
    assert_eq!(app.messages[0].sender, Sender::User);
    assert_eq!(app.messages[0].text, "hello");
    assert_eq!(app.messages[1].text, "Sorry, something went wrong.");
}

#[tokio::test]
async fn test_history_is_persisted_after_the_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usage_wh": 100,
            "generation_wh": 50,
            "timeframe": "day"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Turn off the lights."
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_against(&server.uri(), &dir);

    app.textarea.insert_str("How do I save power tonight?");
    app.submit_message();
    drain_until(&mut app, 2).await;

    let store = FileStore::new(dir.path().join("state"));
    let loaded = storage::load_messages(&store).unwrap();
    assert_eq!(loaded, app.messages);
}
