// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use tower::ServiceExt;

use mise_auth::{SigningKeypair, TokenAuthAdapter};
use mise_core::traits::{PluginAdapter, StorageAdapter};
use mise_core::types::{
    Frame, GenerationParams, GenerationResult, MealPlanParams, RecipeParams, RecordId, UserId,
};
use mise_gateway::{GatewayState, build_router};
use mise_generation::{Orchestrator, StreamSettings};
use mise_security::SecretList;
use mise_test_utils::{MemoryStore, MockProvider};

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    provider: Arc<MockProvider>,
    auth: Arc<TokenAuthAdapter>,
}

fn app(provider: MockProvider) -> TestApp {
    let provider = Arc::new(provider);
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(TokenAuthAdapter::new(SigningKeypair::generate(), 3600));
    let secrets: SecretList = Arc::new(RwLock::new(Vec::new()));
    let settings = StreamSettings {
        chunk_size: 80,
        frame_delay: Duration::from_millis(1),
    };

    let state = GatewayState {
        orchestrator: Orchestrator::new(provider.clone(), store.clone(), settings, secrets),
        store: store.clone(),
        auth: auth.clone(),
        adapters: vec![
            provider.clone() as Arc<dyn PluginAdapter>,
            store.clone() as Arc<dyn PluginAdapter>,
        ],
        stream_buffer: 8,
        start_time: Instant::now(),
    };

    TestApp {
        router: build_router(state),
        store,
        provider,
        auth,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authed(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Parse `data: <json>` events out of an SSE body.
fn events(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter_map(|event| event.strip_prefix("data: "))
        .map(|json| serde_json::from_str(json).unwrap())
        .collect()
}

fn saved_recipe(id: &str, owner: &str) -> GenerationResult {
    GenerationResult {
        id: RecordId(id.into()),
        user_id: UserId(owner.into()),
        params: GenerationParams::Recipe(RecipeParams {
            ingredients: Some("egg".into()),
            serving_number: Some("2".into()),
            ..Default::default()
        }),
        result_text: "## Eggs".into(),
        created_at: "2026-01-01T00:00:00.000Z".into(),
    }
}

#[tokio::test]
async fn stream_body_is_exact_frame_wire_format() {
    let text = format!("{}{}", "a".repeat(80), "b".repeat(20));
    let t = app(MockProvider::with_responses(vec![text]));

    let response = t
        .router
        .oneshot(get("/recipeStream?ingredients=egg&servingNumber=1&userId=u1"))
        .await
        .unwrap();

    let expected: String = [
        Frame::Chunk("a".repeat(80)),
        Frame::Chunk("b".repeat(20)),
        Frame::Close,
    ]
    .iter()
    .map(Frame::to_event_string)
    .collect();
    assert_eq!(body_string(response).await, expected);
}

#[tokio::test]
async fn recipe_stream_emits_chunks_then_close() {
    let text = "k".repeat(200);
    let t = app(MockProvider::with_responses(vec![text.clone()]));

    let response = t
        .router
        .oneshot(get(
            "/recipeStream?ingredients=egg,rice&servingNumber=4&userId=u1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");

    let events = events(&body_string(response).await);
    assert_eq!(events.len(), 4);
    let joined: String = events[..3]
        .iter()
        .map(|e| e["chunk"].as_str().unwrap())
        .collect();
    assert_eq!(joined, text);
    assert_eq!(events[3], serde_json::json!({"action": "close"}));

    let records = t.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id.0, "u1");
    assert!(t.provider.prompts().await[0].contains("Serves 4"));
}

#[tokio::test]
async fn recipe_stream_reports_missing_parameter_as_error_frame() {
    let t = app(MockProvider::new());

    let response = t
        .router
        .oneshot(get("/recipeStream?servingNumber=4&userId=u1"))
        .await
        .unwrap();

    let events = events(&body_string(response).await);
    assert_eq!(
        events,
        vec![serde_json::json!({
            "error": "Failed to generate recipe",
            "details": "Ingredients parameter is required"
        })]
    );
    assert_eq!(t.provider.call_count().await, 0);
    assert!(t.store.records().await.is_empty());
}

#[tokio::test]
async fn meal_stream_persists_meal_plan() {
    let t = app(MockProvider::with_responses(vec!["### Meal: Oats".into()]));

    let response = t
        .router
        .oneshot(get(
            "/mealStream?age=30&goalAndAspiration=fit&weight=70&height=175&sex=f&diet=vegan&mealCountPerDay=3&userId=u9",
        ))
        .await
        .unwrap();

    let events = events(&body_string(response).await);
    assert_eq!(events[0]["chunk"], "### Meal: Oats");
    assert_eq!(events.last().unwrap()["action"], "close");

    let records = t.store.records().await;
    assert_eq!(records.len(), 1);
    match &records[0].params {
        GenerationParams::MealPlan(MealPlanParams { diet, .. }) => {
            assert_eq!(diet.as_deref(), Some("vegan"))
        }
        other => panic!("expected meal plan params, got {other:?}"),
    }
}

#[tokio::test]
async fn saved_records_require_a_token() {
    let t = app(MockProvider::new());

    let response = t
        .router
        .clone()
        .oneshot(get("/recipes/saved-recipes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["message"],
        "unauthorized: missing bearer token"
    );

    let response = t
        .router
        .oneshot(authed(Method::GET, "/meals/saved-meals", "garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn saved_recipes_are_scoped_to_the_caller() {
    let t = app(MockProvider::new());
    t.store
        .insert_generation(&saved_recipe("r1", "alice"))
        .await
        .unwrap();
    t.store
        .insert_generation(&saved_recipe("r2", "bob"))
        .await
        .unwrap();
    let token = t.auth.issue("alice").unwrap();

    let response = t
        .router
        .clone()
        .oneshot(authed(Method::GET, "/recipes/saved-recipes", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = body_json(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], "r1");
    assert_eq!(list[0]["resultText"], "## Eggs");
    assert_eq!(list[0]["servingNumber"], "2");

    let response = t
        .router
        .oneshot(authed(Method::GET, "/recipes/r2", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_recipe_then_lookup_is_not_found() {
    let t = app(MockProvider::new());
    t.store
        .insert_generation(&saved_recipe("r1", "alice"))
        .await
        .unwrap();
    let token = t.auth.issue("alice").unwrap();

    let response = t
        .router
        .clone()
        .oneshot(authed(Method::GET, "/recipes/r1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = t
        .router
        .clone()
        .oneshot(authed(Method::DELETE, "/recipes/r1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Item deleted successfully"
    );

    let response = t
        .router
        .clone()
        .oneshot(authed(Method::DELETE, "/recipes/r1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = t
        .router
        .oneshot(authed(Method::GET, "/recipes/r1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "recipe not found: r1");
}

#[tokio::test]
async fn meal_routes_do_not_see_recipes() {
    let t = app(MockProvider::new());
    t.store
        .insert_generation(&saved_recipe("r1", "alice"))
        .await
        .unwrap();
    let token = t.auth.issue("alice").unwrap();

    let response = t
        .router
        .clone()
        .oneshot(authed(Method::GET, "/meals/saved-meals", &token))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, serde_json::json!([]));

    let response = t
        .router
        .oneshot(authed(Method::GET, "/meal/r1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_lists_adapters() {
    let t = app(MockProvider::new());

    let response = t.router.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    let names: Vec<&str> = body["adapters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["mock-provider", "memory"]);
    assert_eq!(body["adapters"][0]["kind"], "Provider");
    assert_eq!(body["adapters"][1]["kind"], "Storage");
    assert_eq!(body["adapters"][1]["version"], "0.1.0");
}
