//! JSON API tests driving the router in-process.

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use organizer_server::api::{AppState, build_api_router};
use organizer_server::test_helpers;
use serde_json::{Value, json};
use tower::ServiceExt;

const BASE_URL: &str = "http://testserver";

async fn setup() -> Result<Router> {
    let pool = test_helpers::create_test_pool().await?;
    Ok(build_api_router(AppState::new(pool, BASE_URL)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn startup_body(name: &str, slug: &str) -> Value {
    json!({
        "name": name,
        "slug": slug,
        "description": "Web consulting",
        "founded_date": "2013-01-18",
        "contact": "hello@example.com",
        "website": "https://example.com",
    })
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let app = setup().await?;
    let (status, body) = send(&app, Method::GET, "/api/v1/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tag"], "http://testserver/api/v1/tag/");
    assert_eq!(body["startup"], "http://testserver/api/v1/startup/");
    assert_eq!(body["newslink"], "http://testserver/api/v1/newslink/");
    assert_eq!(body["blog"], "http://testserver/api/v1/blog/");
    Ok(())
}

#[tokio::test]
async fn tag_crud() -> Result<()> {
    let app = setup().await?;

    let (status, tag) = send(
        &app,
        Method::POST,
        "/api/v1/tag/",
        Some(json!({"name": "Web Development"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tag["name"], "web development");
    assert_eq!(tag["slug"], "web-development");
    assert_eq!(tag["url"], "http://testserver/api/v1/tag/web-development/");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/tag/",
        Some(json!({"name": " WEB development "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["name"].is_array());

    let (status, tag) = send(
        &app,
        Method::PATCH,
        "/api/v1/tag/web-development/",
        Some(json!({"slug": "webdev"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag["name"], "web development");
    assert_eq!(tag["slug"], "webdev");

    let (status, _) = send(&app, Method::DELETE, "/api/v1/tag/webdev/", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/api/v1/tag/webdev/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not found."}));
    Ok(())
}

#[tokio::test]
async fn startup_slug_create_is_reserved() -> Result<()> {
    let app = setup().await?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/startup/",
        Some(startup_body("Create", "create")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["slug"][0], "Slug may not be 'create'.");

    let (_, list) = send(&app, Method::GET, "/api/v1/startup/", None).await;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn startup_with_nested_tags() -> Result<()> {
    let app = setup().await?;
    send(&app, Method::POST, "/api/v1/tag/", Some(json!({"name": "django"}))).await;

    let mut body = startup_body("JamBon Software", "");
    body["tags"] = json!(["django", {"name": "Consulting"}]);
    let (status, startup) = send(&app, Method::POST, "/api/v1/startup/", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(startup["slug"], "jambon-software");
    let tag_slugs: Vec<&str> = startup["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["slug"].as_str().unwrap())
        .collect();
    assert_eq!(tag_slugs, vec!["consulting", "django"]);
    Ok(())
}

#[tokio::test]
async fn startup_tags_action() -> Result<()> {
    let app = setup().await?;
    send(&app, Method::POST, "/api/v1/tag/", Some(json!({"name": "django"}))).await;
    send(
        &app,
        Method::POST,
        "/api/v1/startup/",
        Some(startup_body("JamBon", "jambon")),
    )
    .await;

    let uri = "/api/v1/startup/jambon/tags/";
    let (status, body) = send(&app, Method::POST, uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["slug"].is_array());

    let (status, _) = send(&app, Method::POST, uri, Some(json!({"slug": "unsaved"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for slug in ["django", "DJANGO"] {
        let (status, _) = send(&app, Method::POST, uri, Some(json!({"slug": slug}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, tags) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().unwrap().len(), 1);
    assert_eq!(tags[0]["slug"], "django");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/startup/ghost/tags/",
        Some(json!({"slug": "django"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn newslinks_are_scoped_to_their_startup() -> Result<()> {
    let app = setup().await?;
    for slug in ["jambon", "boundless"] {
        send(
            &app,
            Method::POST,
            "/api/v1/startup/",
            Some(startup_body(slug, slug)),
        )
        .await;
    }
    let newslink = |startup: &str, slug: &str| {
        json!({
            "title": "Launch",
            "slug": slug,
            "pub_date": "2018-03-01",
            "link": "https://news.example.com/launch",
            "startup": startup,
        })
    };

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/newslink/",
        Some(newslink("jambon", "launch")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["url"], "http://testserver/api/v1/newslink/jambon/launch/");
    assert_eq!(body["startup"]["slug"], "jambon");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/newslink/",
        Some(newslink("boundless", "launch")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/newslink/",
        Some(newslink("jambon", "launch")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["slug"].is_array());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/newslink/",
        Some(newslink("jambon", "add_article")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["slug"][0], "Slug may not be 'add_article'.");

    let (status, _) = send(&app, Method::GET, "/api/v1/newslink/jambon/launch/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/startup/jambon/", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/v1/newslink/jambon/launch/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, remaining) = send(&app, Method::GET, "/api/v1/newslink/", None).await;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn post_slugs_are_unique_per_month() -> Result<()> {
    let app = setup().await?;
    let post = |pub_date: &str| {
        json!({
            "title": "b",
            "slug": "b",
            "text": "Hello",
            "pub_date": pub_date,
        })
    };

    let (status, body) = send(&app, Method::POST, "/api/v1/blog/", Some(post("2017-01-01"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["url"], "http://testserver/api/v1/blog/2017/1/b/");

    let (status, _) = send(&app, Method::POST, "/api/v1/blog/", Some(post("2017-01-20"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/v1/blog/", Some(post("2017-02-01"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/api/v1/blog/2017/01/b/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pub_date"], "2017-01-01");

    let (_, list) = send(&app, Method::GET, "/api/v1/blog/", None).await;
    let dates: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["pub_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2017-02-01", "2017-01-01"]);
    Ok(())
}

#[tokio::test]
async fn post_links_tags_and_startups() -> Result<()> {
    let app = setup().await?;
    send(&app, Method::POST, "/api/v1/tag/", Some(json!({"name": "django"}))).await;
    send(
        &app,
        Method::POST,
        "/api/v1/startup/",
        Some(startup_body("JamBon", "jambon")),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/blog/",
        Some(json!({
            "title": "Launch",
            "slug": "launch",
            "text": "We launched.",
            "pub_date": "2018-03-01",
            "tags": ["django"],
            "startups": ["jambon"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["tags"], json!(["http://testserver/api/v1/tag/django/"]));
    assert_eq!(
        body["startups"],
        json!(["http://testserver/api/v1/startup/jambon/"])
    );

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/blog/",
        Some(json!({
            "title": "Other",
            "slug": "other",
            "text": "Text",
            "pub_date": "2018-03-01",
            "startups": ["ghost"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["startups"].is_array());
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_use_the_error_envelope() -> Result<()> {
    let app = setup().await?;

    let (status, body) = send(&app, Method::POST, "/api/v1/tag/", Some(json!({"name": 5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["non_field_errors"][0].is_string());

    let mut startup = startup_body("JamBon", "jambon");
    startup["tags"] = json!("django");
    let (status, body) = send(&app, Method::POST, "/api/v1/startup/", Some(startup)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["non_field_errors"].is_array());

    // no content type
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/tag/")
                .body(Body::from(r#"{"name": "django"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let (_, tags) = send(&app, Method::GET, "/api/v1/tag/", None).await;
    assert_eq!(tags, json!([]));
    Ok(())
}

#[tokio::test]
async fn post_paths_with_non_numeric_dates_are_not_found() -> Result<()> {
    let app = setup().await?;
    for uri in [
        "/api/v1/blog/abcd/1/x/",
        "/api/v1/blog/2017/jan/x/",
        "/api/v1/blog/17/1/x/",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({"detail": "Not found."}));
    }

    let (status, _) = send(&app, Method::DELETE, "/api/v1/blog/abcd/1/x/", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn tagging_unknown_startup_is_not_found_before_body_checks() -> Result<()> {
    let app = setup().await?;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/startup/ghost/tags/",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Not found."}));
    Ok(())
}
