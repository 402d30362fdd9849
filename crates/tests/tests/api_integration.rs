use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use reststop_api::build_app;
use serde_json::json;
use tower::ServiceExt;

const API_KEY: &str = "dev-reststop-key";

#[tokio::test]
async fn health_is_public() {
    let app = build_app().await.expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_requires_api_key() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "clean" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn chat_returns_structured_reply() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(json!({ "text": "clean" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["intent"], "cleanliness");
    assert!(parsed["reply_text"]
        .as_str()
        .unwrap()
        .starts_with("Here are the cleanest restrooms in the area:"));
    assert_eq!(parsed["suggested_queries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn chat_answers_bare_area_queries_from_the_dataset() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(json!({ "text": "Gandipuram" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["intent"], "area_lookup");
    let reply = parsed["reply_text"].as_str().unwrap();
    assert!(reply.contains("I found 1 restrooms in Gandipuram"));
    assert!(reply.contains("Gandipuram Public Toilet"));
}

#[tokio::test]
async fn recommendations_return_at_most_five_labelled_venues() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/recommendations")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(
            json!({
                "lat": 11.0168,
                "lng": 76.9558,
                "preferences": { "accessibility": true }
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let restrooms = parsed["restrooms"].as_array().unwrap();
    assert!(!restrooms.is_empty());
    assert!(restrooms.len() <= 5);
    for restroom in restrooms {
        assert!(restroom["distance_label"].as_str().is_some());
    }
}

#[tokio::test]
async fn restrooms_listing_applies_filters() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .uri("/v1/restrooms?min_cleanliness=4.0")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let restrooms = parsed["restrooms"].as_array().unwrap();
    assert!(!restrooms.is_empty());
    for restroom in restrooms {
        assert!(restroom["cleanliness"].as_f64().unwrap() >= 4.0);
    }
}

#[tokio::test]
async fn unknown_restroom_kind_is_a_bad_request() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .uri("/v1/restrooms?kind=spaceport")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_restroom_is_a_404() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .uri("/v1/restrooms/restroom-999")
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn restroom_detail_round_trips_a_listed_id() {
    let app = build_app().await.expect("app should build");

    let listing = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/restrooms")
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);

    let body = to_bytes(listing.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let id = parsed["restrooms"][0]["id"].as_str().unwrap().to_string();

    let detail = app
        .oneshot(
            Request::builder()
                .uri(format!("/v1/restrooms/{id}"))
                .header("x-api-key", API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(detail.status(), StatusCode::OK);

    let body = to_bytes(detail.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn thanks_reply_is_one_of_the_fixed_acknowledgements() {
    let app = build_app().await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(json!({ "text": "thank you" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let reply = parsed["reply_text"].as_str().unwrap();
    assert!(reststop_core::THANKS_RESPONSES.contains(&reply));
}
