//! HTML page tests: redirects, form handling and rendering.

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use organizer_server::api::{AppState, build_api_router};
use organizer_server::test_helpers;
use sqlx::SqlitePool;
use tower::ServiceExt;

struct Page {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

async fn setup() -> Result<(Router, SqlitePool)> {
    let pool = test_helpers::create_test_pool().await?;
    let app = build_api_router(AppState::new(pool.clone(), "http://testserver"));
    Ok((app, pool))
}

async fn request(app: &Router, method: Method, uri: &str, form: Option<&str>) -> Page {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    Page {
        status,
        location,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

#[tokio::test]
async fn root_redirects_to_blog() -> Result<()> {
    let (app, _) = setup().await?;
    let page = request(&app, Method::GET, "/", None).await;
    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location.as_deref(), Some("/blog/"));
    Ok(())
}

#[tokio::test]
async fn tag_form_creates_and_redirects() -> Result<()> {
    let (app, _) = setup().await?;

    let page = request(
        &app,
        Method::POST,
        "/tag/create/",
        Some("name=Django+Girls&slug="),
    )
    .await;
    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location.as_deref(), Some("/tag/django-girls/"));

    let list = request(&app, Method::GET, "/tag/", None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert!(list.body.contains(r#"<a href="/tag/django-girls/">django girls</a>"#));

    let page = request(&app, Method::POST, "/tag/django-girls/delete/", Some("")).await;
    assert_eq!(page.location.as_deref(), Some("/tag/"));
    Ok(())
}

#[tokio::test]
async fn invalid_form_is_rendered_with_errors() -> Result<()> {
    let (app, _) = setup().await?;

    let page = request(
        &app,
        Method::POST,
        "/startup/create/",
        Some("name=Create&slug=create&description=x&founded_date=2015-01-01&contact=a%40example.com&website=https%3A%2F%2Fexample.com"),
    )
    .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("errorlist"));
    assert!(page.body.contains("Slug may not be &#x27;create&#x27;."));
    // submitted values are kept
    assert!(page.body.contains(r#"value="a@example.com""#));
    Ok(())
}

#[tokio::test]
async fn newslink_pages() -> Result<()> {
    let (app, pool) = setup().await?;
    test_helpers::insert_startup(&pool, "jambon").await?;
    test_helpers::insert_startup(&pool, "boundless").await?;

    let mismatched = request(
        &app,
        Method::POST,
        "/startup/jambon/add_article/",
        Some("title=Launch&slug=launch&pub_date=2018-03-01&link=https%3A%2F%2Fexample.com&startup=boundless"),
    )
    .await;
    assert_eq!(mismatched.status, StatusCode::BAD_REQUEST);

    let created = request(
        &app,
        Method::POST,
        "/startup/jambon/add_article/",
        Some("title=Launch&slug=launch&pub_date=2018-03-01&link=https%3A%2F%2Fexample.com&startup=jambon"),
    )
    .await;
    assert_eq!(created.status, StatusCode::FOUND);
    assert_eq!(created.location.as_deref(), Some("/startup/jambon/"));

    let detail = request(&app, Method::GET, "/startup/jambon/launch/", None).await;
    assert_eq!(detail.status, StatusCode::FOUND);
    assert_eq!(detail.location.as_deref(), Some("/startup/jambon/"));

    let startup = request(&app, Method::GET, "/startup/jambon/", None).await;
    assert!(startup.body.contains("Launch"));
    assert!(startup.body.contains("/startup/jambon/launch/update/"));

    let missing = request(&app, Method::GET, "/startup/jambon/ghost/", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let deleted = request(&app, Method::POST, "/startup/jambon/launch/delete/", Some("")).await;
    assert_eq!(deleted.location.as_deref(), Some("/startup/jambon/"));
    Ok(())
}

#[tokio::test]
async fn post_text_is_markdown_with_html_escaped() -> Result<()> {
    let (app, _) = setup().await?;

    let created = request(
        &app,
        Method::POST,
        "/blog/create/",
        Some("title=Hello&slug=hello&pub_date=2017-01-01&text=**bold**+%3Cscript%3Ex%3C%2Fscript%3E"),
    )
    .await;
    assert_eq!(created.status, StatusCode::FOUND);
    assert_eq!(created.location.as_deref(), Some("/blog/2017/1/hello/"));

    let page = request(&app, Method::GET, "/blog/2017/1/hello/", None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("<strong>bold</strong>"));
    assert!(!page.body.contains("<script>"));
    assert!(page.body.contains("Hello on 2017-01-01"));
    Ok(())
}

#[tokio::test]
async fn unknown_records_are_not_found() -> Result<()> {
    let (app, _) = setup().await?;
    for uri in [
        "/tag/ghost/",
        "/startup/ghost/",
        "/blog/2017/1/ghost/",
        "/blog/abcd/1/ghost/",
        "/blog/2017/jan/ghost/",
        "/blog/2017/1/ghost/update/",
        "/nowhere/",
    ] {
        let page = request(&app, Method::GET, uri, None).await;
        assert_eq!(page.status, StatusCode::NOT_FOUND, "{uri}");
    }
    Ok(())
}
