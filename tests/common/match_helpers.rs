use reqwest::{Client, Response};
use serde_json::{json, Value};

pub fn players() -> Value {
    json!({
        "team1_player1": "Ana",
        "team1_player2": "Bea",
        "team2_player1": "Carla",
        "team2_player2": "Dani"
    })
}

pub async fn create_match(client: &Client, address: &str) -> String {
    let response = client
        .post(&format!("{}/api/matches", address))
        .json(&players())
        .send()
        .await
        .expect("Failed to create match.");
    assert_eq!(response.status().as_u16(), 201);

    let body: Value = response.json().await.expect("Failed to parse match.");
    body["id"].as_str().expect("No id in response").to_string()
}

pub async fn score(client: &Client, address: &str, match_id: &str, team: Value) -> Response {
    client
        .post(&format!("{}/api/matches/{}/point", address, match_id))
        .json(&json!({ "team": team }))
        .send()
        .await
        .expect("Failed to record point.")
}

/// Score `count` points in a row and return the last outcome
pub async fn score_many(client: &Client, address: &str, match_id: &str, team: u8, count: usize) -> Value {
    let mut last = Value::Null;
    for _ in 0..count {
        let response = score(client, address, match_id, json!(team)).await;
        assert!(response.status().is_success());
        last = response.json::<Value>().await.expect("Failed to parse point response.")["outcome"].clone();
    }
    last
}

pub async fn undo(client: &Client, address: &str, match_id: &str) -> Response {
    client
        .post(&format!("{}/api/matches/{}/undo", address, match_id))
        .send()
        .await
        .expect("Failed to undo point.")
}

pub async fn get_match(client: &Client, address: &str, match_id: &str) -> Response {
    client
        .get(&format!("{}/api/matches/{}", address, match_id))
        .send()
        .await
        .expect("Failed to fetch match.")
}

pub async fn match_detail(client: &Client, address: &str, match_id: &str) -> Value {
    let response = get_match(client, address, match_id).await;
    assert_eq!(response.status().as_u16(), 200);
    response.json().await.expect("Failed to parse match detail.")
}

/// (team1_points, team2_points, set_number, game_number) of the latest tally row
pub fn current_tally(detail: &Value) -> (i64, i64, i64, i64) {
    let current = &detail["current_points"];
    (
        current["team1_points"].as_i64().unwrap(),
        current["team2_points"].as_i64().unwrap(),
        current["set_number"].as_i64().unwrap(),
        current["game_number"].as_i64().unwrap(),
    )
}
