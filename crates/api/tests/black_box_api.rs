use std::sync::Arc;

use blog_api::app::services::AppServices;
use blog_articles::{Article, ArticleId, NewArticle};
use blog_infra::{ArticleStore, StoreError};
use reqwest::{header, StatusCode};
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(AppServices::in_memory()).await
    }

    async fn spawn_with(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = blog_api::app::build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Redirects must be observed, not followed.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn create(client: &reqwest::Client, srv: &TestServer, article: serde_json::Value) -> reqwest::Response {
    client
        .post(srv.url("/articles"))
        .json(&json!({ "article": article }))
        .send()
        .await
        .unwrap()
}

async fn list_titles(client: &reqwest::Client, srv: &TestServer) -> Vec<String> {
    let res = client.get(srv.url("/articles")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect()
}

fn location(res: &reqwest::Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = client().get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_is_empty_before_any_create() {
    let srv = TestServer::spawn().await;
    assert!(list_titles(&client(), &srv).await.is_empty());
}

#[tokio::test]
async fn new_returns_empty_form_without_side_effects() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client.get(srv.url("/articles/new")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": null, "title": null, "body": null }));

    assert!(list_titles(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn create_redirects_to_show_with_same_fields() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = create(&client, &srv, json!({ "title": "Hello", "body": "World" })).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let path = location(&res);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(path, format!("/articles/{}", created["id"]));

    let res = client.get(srv.url(&path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let article: serde_json::Value = res.json().await.unwrap();
    assert_eq!(article["id"], created["id"]);
    assert_eq!(article["title"], "Hello");
    assert_eq!(article["body"], "World");
    assert!(article["created_at"].is_string());
}

#[tokio::test]
async fn blank_title_is_unprocessable_and_not_persisted() {
    let srv = TestServer::spawn().await;
    let client = client();

    create(&client, &srv, json!({ "title": "Hello", "body": "World" })).await;
    let before = list_titles(&client, &srv).await;

    let res = create(&client, &srv, json!({ "title": "", "body": "World" })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["article"], json!({ "id": null, "title": "", "body": "World" }));
    assert_eq!(body["errors"], json!([{ "field": "title", "message": "can't be blank" }]));
    assert_eq!(body["messages"], json!(["Title can't be blank"]));

    assert_eq!(list_titles(&client, &srv).await, before);
}

#[tokio::test]
async fn missing_body_and_whitespace_title_are_both_reported() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = create(&client, &srv, json!({ "title": "   " })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["messages"], json!(["Title can't be blank", "Body can't be blank"]));

    assert!(list_titles(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn create_ignores_extraneous_fields() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = create(
        &client,
        &srv,
        json!({ "title": "Hello", "body": "World", "id": "999", "created_at": "1999-01-01T00:00:00Z" }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let path = location(&res);
    assert_ne!(path, "/articles/999");

    let res = client.get(srv.url("/articles/999")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.get(srv.url(&path)).send().await.unwrap();
    let article: serde_json::Value = res.json().await.unwrap();
    assert_ne!(article["created_at"], "1999-01-01T00:00:00Z");
}

#[tokio::test]
async fn show_unknown_or_malformed_id_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = client();

    create(&client, &srv, json!({ "title": "Hello", "body": "World" })).await;

    for id in ["2", "42", "0", "-1", "abc", "1.0", "99999999999999999999"] {
        let res = client.get(srv.url(&format!("/articles/{id}"))).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "id = {id}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "not_found");
    }
}

#[tokio::test]
async fn list_holds_every_successful_create_and_no_failed_one() {
    let srv = TestServer::spawn().await;
    let client = client();

    for (title, body) in [("one", "1"), ("", "x"), ("two", "2"), ("three", ""), ("four", "4")] {
        create(&client, &srv, json!({ "title": title, "body": body })).await;
    }

    assert_eq!(list_titles(&client, &srv).await, vec!["one", "two", "four"]);
}

#[tokio::test]
async fn missing_article_param_is_bad_request() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(srv.url("/articles"))
        .json(&json!({ "title": "Hello", "body": "World" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "parameter_missing");

    assert!(list_titles(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn form_encoded_create_behaves_like_json() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(srv.url("/articles"))
        .form(&[("article[title]", "Hello"), ("article[body]", "World"), ("article[id]", "999")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_ne!(location(&res), "/articles/999");

    let res = client
        .post(srv.url("/articles"))
        .form(&[("article[title]", ""), ("article[body]", "World")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(list_titles(&client, &srv).await, vec!["Hello"]);
}

#[tokio::test]
async fn malformed_or_unsupported_bodies_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = client();

    let res = client
        .post(srv.url("/articles"))
        .header(header::CONTENT_TYPE, "application/json")
        .body("{\"article\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(srv.url("/articles"))
        .header(header::CONTENT_TYPE, "text/plain")
        .body("title=Hello")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    assert!(list_titles(&client, &srv).await.is_empty());
}

#[tokio::test]
async fn deeply_nested_form_key_is_rejected_and_server_survives() {
    let srv = TestServer::spawn().await;
    let client = client();

    let key = format!("article{}", "[a]".repeat(200_000));
    let res = client
        .post(srv.url("/articles"))
        .form(&[(key.as_str(), "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(list_titles(&client, &srv).await.is_empty());
}

/// A store whose backend is down.
struct UnavailableStore;

#[async_trait::async_trait]
impl ArticleStore for UnavailableStore {
    async fn list(&self) -> Result<Vec<Article>, StoreError> {
        Err(StoreError::Unavailable("down".to_string()))
    }

    async fn get(&self, _id: ArticleId) -> Result<Option<Article>, StoreError> {
        Err(StoreError::Unavailable("down".to_string()))
    }

    async fn insert(&self, _article: NewArticle) -> Result<Article, StoreError> {
        Err(StoreError::Unavailable("down".to_string()))
    }
}

#[tokio::test]
async fn store_failures_are_server_errors_not_validation_errors() {
    let srv = TestServer::spawn_with(AppServices::new(Arc::new(UnavailableStore))).await;
    let client = client();

    let res = client.get(srv.url("/articles")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = client.get(srv.url("/articles/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = create(&client, &srv, json!({ "title": "Hello", "body": "World" })).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "store_error");

    // Invalid input is still rejected before the store is touched.
    let res = create(&client, &srv, json!({ "title": "", "body": "World" })).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
