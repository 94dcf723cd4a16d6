use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use lookbook_api::{
    api::{create_router, AppState, Providers},
    error::{AppError, AppResult},
    models::SearchApiResponse,
    services::{
        providers::{
            CompletionProvider, CompletionRequest, ImageProvider, SearchProvider,
        },
        ModelSelection,
    },
};

// Stub providers

/// Replies with a fixed script, recording every request
#[derive(Default)]
struct ScriptedCompletion {
    replies: Mutex<Vec<AppResult<String>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    fn replying(replies: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> AppResult<String> {
        self.calls.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok("I have nothing more to say.".to_string())
        } else {
            replies.remove(0)
        }
    }
}

/// One hit per query, except queries containing `fail_on`
struct StubSearch {
    fail_on: Option<&'static str>,
    empty: bool,
}

#[async_trait::async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str) -> AppResult<SearchApiResponse> {
        if self.fail_on.is_some_and(|needle| query.contains(needle)) {
            return Err(AppError::upstream("searchapi", "request timed out"));
        }
        if self.empty {
            return Ok(SearchApiResponse::default());
        }

        let response = serde_json::from_value(json!({
            "shopping_results": [{
                "title": format!("{} product", query),
                "product_link": "https://shop.example/p/1",
                "thumbnail": "https://img.example/p/1.jpg",
                "rich_snippet": { "extensions": ["4.8 stars", "$29.99"] }
            }]
        }))
        .unwrap();
        Ok(response)
    }
}

struct StubImage {
    fail: bool,
}

#[async_trait::async_trait]
impl ImageProvider for StubImage {
    async fn text_to_image(&self, _prompt: &str) -> AppResult<Vec<u8>> {
        if self.fail {
            Err(AppError::upstream("huggingface", "model is currently loading"))
        } else {
            Ok(b"\x89PNG\r\n\x1a\nimage-bytes".to_vec())
        }
    }
}

struct Harness {
    server: TestServer,
    completion: Arc<ScriptedCompletion>,
    temp_root: TempDir,
}

fn harness(completion: Arc<ScriptedCompletion>, search: StubSearch, image: StubImage) -> Harness {
    let temp_root = tempfile::tempdir().unwrap();
    let providers = Providers {
        completion: completion.clone(),
        search: Arc::new(search),
        pages: None,
        image: Arc::new(image),
    };
    let state = AppState::with_providers(
        providers,
        ModelSelection::new("vision-model", "text-model"),
        temp_root.path().to_path_buf(),
    );

    Harness {
        server: TestServer::new(create_router(state)).unwrap(),
        completion,
        temp_root,
    }
}

fn default_harness(replies: Vec<AppResult<String>>) -> Harness {
    harness(
        ScriptedCompletion::replying(replies),
        StubSearch {
            fail_on: None,
            empty: false,
        },
        StubImage { fail: false },
    )
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

const STYLE_JSON: &str = r#"Sure, here is a look:
{
  "style": {"title": "Dark Academia", "description": "Scholarly layers", "tags": ["tweed", "vintage"]},
  "items": [
    {"description": "Tweed blazer", "category": "Outerwear"},
    {"description": "Cream turtleneck", "category": "Tops"},
    {"description": "Pleated wool trousers", "category": "Bottoms"},
    {"description": "Leather satchel", "category": "Accessories"}
  ]
}"#;

#[tokio::test]
async fn test_health_check() {
    let h = default_harness(vec![]);
    let response = h.server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
    assert!(!response.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_root_welcome() {
    let h = default_harness(vec![]);
    let response = h.server.get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let h = default_harness(vec![]);
    let id = "4f9c1a52-8a8e-4c3e-9d55-0f1f4c2b7a10";
    let response = h
        .server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_style_empty_inputs_non_json_reply_falls_back() {
    let h = default_harness(vec![Ok("I'm not able to produce JSON today.".to_string())]);

    let form = MultipartForm::new()
        .add_text("style_description", "")
        .add_text("gender", "")
        .add_text("skin_color", "");
    let response = h.server.post("/api/style").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["style"]["title"], "Casual");
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["category"], "Tops");
    assert_eq!(body["items"][1]["category"], "Bottoms");
    assert!(body["user_attributes"].is_null());

    let calls = h.completion.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "text-model");
}

#[tokio::test]
async fn test_style_with_profile_photo_uses_vision_model_and_cleans_up() {
    let h = default_harness(vec![
        Ok(r#"{"gender_presentation": "feminine", "body_type": "hourglass"}"#.to_string()),
        Ok(STYLE_JSON.to_string()),
    ]);

    let photo = Part::bytes(b"\xFF\xD8\xFF\xE0fake-jpeg".to_vec())
        .file_name("me.jpg")
        .mime_type("image/jpeg");
    let form = MultipartForm::new()
        .add_text("style_description", "dark academia")
        .add_text("price_range", "high")
        .add_part("user_photos", photo);
    let response = h.server.post("/api/style").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["style"]["title"], "Dark Academia");
    assert_eq!(body["items"].as_array().unwrap().len(), 4);
    assert_eq!(body["user_attributes"]["body_type"], "hourglass");

    let calls = h.completion.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.model == "vision-model"));
    assert!((calls[0].temperature - 0.5).abs() < f32::EPSILON);
    assert!((calls[1].temperature - 0.7).abs() < f32::EPSILON);

    assert!(is_empty_dir(h.temp_root.path()));
}

#[tokio::test]
async fn test_style_with_image_attaches_data_uri() {
    let h = default_harness(vec![Ok(STYLE_JSON.to_string())]);

    let form = MultipartForm::new()
        .add_text("style_description", "dark academia")
        .add_text("include_image", "true");
    let response = h.server.post("/api/style").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["style"]["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_recommendations_isolate_failed_query() {
    let h = harness(
        ScriptedCompletion::replying(vec![Ok(
            r#"{"tops": "cream turtleneck", "shoes": "brown brogues", "accessories": "leather satchel"}"#
                .to_string(),
        )]),
        StubSearch {
            fail_on: Some("brogues"),
            empty: false,
        },
        StubImage { fail: false },
    );

    let form = MultipartForm::new().add_text("style_description", "dark academia");
    let response = h.server.post("/api/recommendations").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["search_queries_used"]["shoes"], "brown brogues");
    assert_eq!(body["recommendations"]["shoes"], json!([]));
    assert_eq!(body["recommendations"]["tops"][0]["price"], "$29.99");
    assert_eq!(
        body["recommendations"]["tops"][0]["thumbnailURL"],
        "https://img.example/p/1.jpg"
    );
    assert_eq!(
        body["recommendations"]["accessories"][0]["productURL"],
        "https://shop.example/p/1"
    );
}

#[tokio::test]
async fn test_legacy_fashion_search_route() {
    let h = default_harness(vec![Err(AppError::upstream("openai", "status 500"))]);

    let form = MultipartForm::new()
        .add_text("style_description", "boho")
        .add_text("gender", "female");
    let response = h.server.post("/api/fashion-search").multipart(form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["search_queries_used"], json!({ "tops": "fashion boho female" }));
    assert_eq!(body["recommendations"]["tops"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_oversized_photo_rejected() {
    let h = default_harness(vec![]);

    let photo = Part::bytes(vec![0u8; 10 * 1024 * 1024 + 1]).file_name("huge.jpg");
    let form = MultipartForm::new().add_part("aesthetic_photos", photo);
    let response = h.server.post("/api/style").multipart(form).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(h.completion.calls().is_empty());
    assert!(is_empty_dir(h.temp_root.path()));
}

#[tokio::test]
async fn test_search_empty_query_is_bad_request() {
    let h = default_harness(vec![]);
    let response = h.server.post("/api/search").json(&json!({ "query": "  " })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_search_no_results_is_not_found() {
    let h = harness(
        ScriptedCompletion::replying(vec![]),
        StubSearch {
            fail_on: None,
            empty: true,
        },
        StubImage { fail: false },
    );
    let response = h
        .server
        .post("/api/search")
        .json(&json!({ "query": "glow in the dark tuxedo" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_returns_results() {
    let h = default_harness(vec![]);
    let response = h
        .server
        .post("/api/search")
        .json(&json!({ "query": "linen shirt" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"][0]["description"], "linen shirt product");
    assert_eq!(body["results"][0]["price"], "$29.99");
}

#[tokio::test]
async fn test_style_image_returns_png() {
    let h = default_harness(vec![]);
    let response = h
        .server
        .post("/api/style/image")
        .json(&json!({
            "style": {"title": "Boho", "description": "Flowing layers", "tags": ["boho"]},
            "items": [{"description": "Maxi skirt", "category": "Bottoms"}]
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert!(response.as_bytes().starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_style_image_provider_failure_is_bad_gateway() {
    let h = harness(
        ScriptedCompletion::replying(vec![]),
        StubSearch {
            fail_on: None,
            empty: false,
        },
        StubImage { fail: true },
    );
    let response = h
        .server
        .post("/api/style/image")
        .json(&json!({
            "style": {"title": "Boho", "description": "Flowing layers", "tags": []},
            "items": []
        }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_style_image_unknown_category_is_json_bad_request() {
    let h = default_harness(vec![]);
    let response = h
        .server
        .post("/api/style/image")
        .json(&json!({
            "style": {"title": "Boho", "description": "Flowing layers", "tags": []},
            "items": [{"description": "Sun hat", "category": "Headwear"}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Headwear"));
}

#[tokio::test]
async fn test_search_malformed_json_is_json_bad_request() {
    let h = default_harness(vec![]);
    let response = h
        .server
        .post("/api/search")
        .content_type("application/json")
        .bytes("{\"query\": ".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_style_without_multipart_body_is_json_bad_request() {
    let h = default_harness(vec![]);
    let response = h.server.post("/api/style").text("style_description=boho").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(h.completion.calls().is_empty());
}
