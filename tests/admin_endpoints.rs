//! Filtered lists, editorial actions and helper endpoints against a mocked backend.

use std::time::Duration;

use newsdesk::api::{ApiClient, ListQuery};
use newsdesk::listing::filter_items;
use newsdesk::models::{CrawlStatus, CrawlType, PostStatus, Role, TagPayload};
use newsdesk::store::Store;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store(server: &MockServer) -> Store {
    let api = ApiClient::new(&server.uri(), Duration::from_secs(5)).expect("loopback base URL");
    Store::new(api, 1000)
}

fn page(content: serde_json::Value) -> serde_json::Value {
    let total = content.as_array().map(Vec::len).unwrap_or(0);
    json!({"content": content, "totalElements": total})
}

#[tokio::test]
async fn test_active_lists_and_tag_upsert() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/categories/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "slug": "tech", "name": "Tech"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/sources/active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4, "name": "Daily", "baseUrl": "https://daily.example", "isActive": true}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/tags/upsert"))
        .and(body_json(json!({"name": "rust", "color": "#dea584"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "name": "rust", "color": "#dea584", "postCount": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = store(&server).categories.api().clone();

    let categories = api.active_categories().await.expect("active categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug, "tech");

    let sources = api.active_sources().await.expect("active sources");
    assert_eq!(sources[0].base_url, "https://daily.example");

    let tag = api
        .upsert_tag(&TagPayload {
            name: "rust".to_string(),
            color: Some("#dea584".to_string()),
        })
        .await
        .expect("upsert");
    assert_eq!((tag.id, tag.post_count), (9, 3));
}

#[tokio::test]
async fn test_user_list_filtered_by_role_then_searched() {
    let server = MockServer::start().await;
    let store = store(&server);
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .and(query_param("role", "EDITOR"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"id": 1, "username": "linh", "fullName": "Tran Linh", "roleCode": "EDITOR"},
            {"id": 2, "username": "minh", "email": "minh@example.com", "roleCode": "EDITOR"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery {
        role: Some(Role::Editor),
        ..ListQuery::default()
    };
    let users = store.users.list(&query).await.expect("users");
    assert_eq!(users.len(), 2);

    let hits = filter_items(&users, "EXAMPLE.com", None);
    assert_eq!(hits.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn test_crawl_logs_filtered_by_type_and_status() {
    let server = MockServer::start().await;
    let store = store(&server);
    Mock::given(method("GET"))
        .and(path("/admin/crawl-logs"))
        .and(query_param("sourceId", "4"))
        .and(query_param("crawlType", "CONTENT"))
        .and(query_param("status", "ERROR"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {
                "id": 30,
                "crawlType": "CONTENT",
                "status": "ERROR",
                "triggeredBy": "MANUAL",
                "errorMessage": "selector matched nothing",
                "startedAt": "2024-05-01T08:30:00"
            }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery {
        page: Some(0),
        size: Some(5),
        source_id: Some(4),
        crawl_type: Some(CrawlType::Content),
        crawl_status: Some(CrawlStatus::Error),
        ..ListQuery::default()
    };
    let logs = store.crawl_logs.list(&query).await.expect("crawl logs");

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, CrawlStatus::Error);
    assert_eq!(logs[0].error_message.as_deref(), Some("selector matched nothing"));
    assert!(logs[0].started_at.is_some());
    assert_eq!(store.crawl_logs.snapshot().total, Some(1));
}

#[tokio::test]
async fn test_publish_and_restore_update_held_post() {
    let server = MockServer::start().await;
    let store = store(&server);
    Mock::given(method("GET"))
        .and(path("/admin/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            {"id": 5, "title": "Budget vote", "status": "draft", "categoryName": "Politics"},
            {"id": 6, "title": "Derby recap", "status": "removed"}
        ]))))
        .mount(&server)
        .await;
    // Publish echoes the post without its category; restore answers with no body.
    Mock::given(method("PUT"))
        .and(path("/admin/posts/5/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "title": "Budget vote", "status": "published"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/posts/6/restore"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    store.posts.list(&ListQuery::default()).await.expect("posts");
    store.posts.publish(5).await.expect("publish");
    store.posts.restore(6).await.expect("restore");

    let posts = store.posts.items();
    assert_eq!(posts[0].status, PostStatus::Published);
    assert_eq!(posts[0].category_name.as_deref(), Some("Politics"));
    assert_eq!(posts[1].status, PostStatus::Draft);
}

#[tokio::test]
async fn test_generate_prepends_unlisted_post() {
    let server = MockServer::start().await;
    let store = store(&server);
    Mock::given(method("POST"))
        .and(path("/admin/posts/8/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 8, "title": "Fresh draft", "status": "pending"
        })))
        .mount(&server)
        .await;

    let post = store.posts.generate(8).await.expect("generate");

    assert_eq!(post.status, PostStatus::Pending);
    assert_eq!(store.posts.items().iter().map(|p| p.id).collect::<Vec<_>>(), vec![8]);
}
