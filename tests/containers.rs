//! State container behaviour against a mocked backend.

use std::time::Duration;

use newsdesk::api::{ApiClient, ListQuery};
use newsdesk::models::{PostStatus, TagPayload};
use newsdesk::store::{PostContainer, Store, TagContainer};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("loopback base URL")
}

fn tags(server: &MockServer) -> TagContainer {
    Store::new(client(server), 1000).tags
}

fn posts(server: &MockServer) -> PostContainer {
    Store::new(client(server), 1000).posts
}

async fn seed_tags(server: &MockServer, container: &TagContainer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/admin/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
    container.list(&ListQuery::default()).await.expect("seed list");
}

fn ids(container: &TagContainer) -> Vec<i64> {
    container.items().iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn test_create_prepends_exactly_once() {
    let server = MockServer::start().await;
    let container = tags(&server);
    seed_tags(
        &server,
        &container,
        json!([{"id": 1, "name": "rust"}, {"id": 2, "name": "go"}]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/admin/tags"))
        .and(body_json(json!({"name": "zig"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "zig"})))
        .expect(1)
        .mount(&server)
        .await;

    let created = container
        .create(&TagPayload {
            name: "zig".to_string(),
            color: None,
        })
        .await
        .expect("create");

    assert_eq!(created.id, 3);
    assert_eq!(ids(&container), vec![3, 1, 2]);
}

#[tokio::test]
async fn test_update_merges_in_place() {
    let server = MockServer::start().await;
    let container = tags(&server);
    seed_tags(
        &server,
        &container,
        json!([{"id": 1, "name": "rust"}, {"id": 2, "name": "go"}]),
    )
    .await;

    Mock::given(method("PUT"))
        .and(path("/admin/tags/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 2, "name": "golang", "color": "#00ADD8"})),
        )
        .mount(&server)
        .await;

    container
        .update(
            2,
            &TagPayload {
                name: "golang".to_string(),
                color: Some("#00ADD8".to_string()),
            },
        )
        .await
        .expect("update");

    let items = container.items();
    assert_eq!(ids(&container), vec![1, 2]);
    assert_eq!(items[1].name, "golang");
    assert_eq!(items[1].color.as_deref(), Some("#00ADD8"));
}

#[tokio::test]
async fn test_update_for_unlisted_id_leaves_list_alone() {
    let server = MockServer::start().await;
    let container = tags(&server);
    seed_tags(&server, &container, json!([{"id": 1, "name": "rust"}])).await;
    let before = container.items();

    Mock::given(method("PUT"))
        .and(path("/admin/tags/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 99, "name": "ghost"})))
        .mount(&server)
        .await;

    let returned = container
        .update(
            99,
            &TagPayload {
                name: "ghost".to_string(),
                color: None,
            },
        )
        .await
        .expect("update");

    assert_eq!(returned.id, 99);
    assert_eq!(container.items(), before);
}

#[tokio::test]
async fn test_delete_removes_every_copy() {
    let server = MockServer::start().await;
    let container = tags(&server);
    seed_tags(
        &server,
        &container,
        json!([
            {"id": 2, "name": "go"},
            {"id": 1, "name": "rust"},
            {"id": 2, "name": "go"}
        ]),
    )
    .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/tags/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    container.delete(2).await.expect("delete");

    assert_eq!(ids(&container), vec![1]);
}

#[tokio::test]
async fn test_failed_mutation_keeps_list_and_records_error() {
    let server = MockServer::start().await;
    let container = tags(&server);
    seed_tags(&server, &container, json!([{"id": 1, "name": "rust"}])).await;
    let before = container.items();

    Mock::given(method("POST"))
        .and(path("/admin/tags"))
        .respond_with(ResponseTemplate::new(409).set_body_string("Tag already exists"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/tags/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = container
        .create(&TagPayload {
            name: "rust".to_string(),
            color: None,
        })
        .await
        .expect_err("conflict");
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Tag already exists");
    assert_eq!(container.items(), before);
    assert_eq!(container.error().as_deref(), Some("Tag already exists"));

    let err = container.delete(1).await.expect_err("server error");
    assert_eq!(err.status(), Some(500));
    assert_eq!(container.items(), before);
    assert_eq!(
        container.error().as_deref(),
        Some("HTTP error: status 500")
    );
}

#[tokio::test]
async fn test_failed_list_keeps_previous_items() {
    let server = MockServer::start().await;
    let container = tags(&server);
    Mock::given(method("GET"))
        .and(path("/admin/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "rust"}])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    container.list(&ListQuery::default()).await.expect("first list");

    Mock::given(method("GET"))
        .and(path("/admin/tags"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;
    assert!(container.list(&ListQuery::default()).await.is_err());

    let state = container.snapshot();
    assert_eq!(state.items.len(), 1);
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("maintenance"));
}

#[tokio::test]
async fn test_paged_collection_is_fetched_as_one_large_page() {
    let server = MockServer::start().await;
    let container = posts(&server);

    Mock::given(method("GET"))
        .and(path("/admin/posts"))
        .and(query_param("page", "0"))
        .and(query_param("size", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"id": 1, "title": "First", "status": "draft"},
                {"id": 2, "title": "Second", "status": "PUBLISHED"}
            ],
            "totalElements": 2,
            "totalPages": 1,
            "size": 1000,
            "number": 0,
            "first": true,
            "last": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = container.list(&ListQuery::default()).await.expect("list");

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].status, PostStatus::Published);
    assert_eq!(container.snapshot().total, Some(2));
}

#[tokio::test]
async fn test_overlapping_lists_last_resolved_wins() {
    let server = MockServer::start().await;
    let container = posts(&server);

    let page = |id: i64, title: &str| {
        json!({
            "content": [{"id": id, "title": title, "status": "draft"}],
            "totalElements": 1
        })
    };

    // The first-issued request answers last.
    Mock::given(method("GET"))
        .and(path("/admin/posts"))
        .and(query_param("status", "draft"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(1, "slow"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/posts"))
        .and(query_param("status", "published"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(2, "fast")))
        .mount(&server)
        .await;

    let slow_query = ListQuery::with_status(PostStatus::Draft);
    let fast_query = ListQuery::with_status(PostStatus::Published);
    let (slow, fast) = tokio::join!(container.list(&slow_query), container.list(&fast_query));
    slow.expect("slow list");
    fast.expect("fast list");

    let held: Vec<String> = container.items().into_iter().map(|p| p.title).collect();
    assert_eq!(held, vec!["slow".to_string()]);
    assert!(!container.is_loading());
}
