use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;

use super::form::FormData;
use super::html::{FormErrors, confirm_delete, escape, form, input, layout, select};
use super::{PageError, PageResult, form_errors, redirect};
use crate::api::AppState;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::newslink::mutations::{create_newslink, delete_newslink, update_newslink};
use crate::newslink::queries::get_newslink;
use crate::newslink::{NewsLinkInput, NewsLinkRecord};
use crate::startup::queries::{get_startup, list_startups};

const FIELDS: &[&str] = &["title", "slug", "pub_date", "link", "startup"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/startup/{slug}/add_article/",
            get(create_form).post(create_submit),
        )
        .route("/startup/{slug}/{newslink_slug}/", get(newslink_detail))
        .route(
            "/startup/{slug}/{newslink_slug}/update/",
            get(update_form).post(update_submit),
        )
        .route(
            "/startup/{slug}/{newslink_slug}/delete/",
            get(delete_form).post(delete_submit),
        )
}

fn input_from(form: &FormData) -> NewsLinkInput {
    NewsLinkInput {
        title: form.value("title"),
        slug: form.value("slug"),
        pub_date: form.value("pub_date"),
        link: form.value("link"),
        startup: form.value("startup"),
    }
}

/// Newslink forms are nested under a startup; the submitted startup must be
/// the one in the URL.
fn verify_startup(values: &NewsLinkInput, startup_slug: &str) -> Result<(), PageError> {
    if values.startup.trim() == startup_slug {
        Ok(())
    } else {
        Err(PageError::BadRequest(
            "The startup of this article does not match the startup in the URL.".to_string(),
        ))
    }
}

async fn render_form(
    state: &AppState,
    title: &str,
    action: &str,
    values: &NewsLinkInput,
    errors: &FormErrors,
) -> PageResult {
    let startup_options: Vec<(String, String)> = list_startups(&state.pool)
        .await?
        .into_iter()
        .map(|startup| (startup.slug, startup.name))
        .collect();

    let fields = [
        errors.others(FIELDS),
        input("Title", "title", "text", &values.title, errors),
        input("Slug", "slug", "text", &values.slug, errors),
        input("Date Published", "pub_date", "date", &values.pub_date, errors),
        input("Link", "link", "url", &values.link, errors),
        select(
            "Startup",
            "startup",
            &startup_options,
            &values.startup,
            errors,
        ),
    ]
    .concat();
    let body = format!("<h2>{}</h2>{}", escape(title), form(action, &fields, title));
    Ok(layout(title, &body).into_response())
}

/// Newslinks are shown on their startup's page.
async fn newslink_detail(
    State(state): State<AppState>,
    Path((slug, newslink_slug)): Path<(String, String)>,
) -> PageResult {
    let newslink = get_newslink(&state.pool, &slug, &newslink_slug).await?;
    Ok(redirect(&newslink.page_path()))
}

async fn create_form(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let startup = get_startup(&state.pool, &slug).await?;
    let values = NewsLinkInput {
        startup: startup.slug.clone(),
        ..NewsLinkInput::default()
    };
    render_form(
        &state,
        "Add Article",
        &format!("{}add_article/", startup.page_path()),
        &values,
        &FormErrors::default(),
    )
    .await
}

async fn create_submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    form: FormData,
) -> PageResult {
    let startup = get_startup(&state.pool, &slug).await?;
    let values = input_from(&form);
    verify_startup(&values, &startup.slug)?;

    match create_newslink(&state.pool, values.clone()).await {
        Ok(newslink) => {
            record_created("newslink", &newslink.to_string());
            Ok(redirect(&newslink.page_path()))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            let action = format!("{}add_article/", startup.page_path());
            render_form(&state, "Add Article", &action, &values, &errors).await
        }
    }
}

async fn update_form(
    State(state): State<AppState>,
    Path((slug, newslink_slug)): Path<(String, String)>,
) -> PageResult {
    let newslink = get_newslink(&state.pool, &slug, &newslink_slug).await?;
    let values = values_of(&newslink);
    render_form(
        &state,
        "Update Article",
        &newslink.update_path(),
        &values,
        &FormErrors::default(),
    )
    .await
}

async fn update_submit(
    State(state): State<AppState>,
    Path((slug, newslink_slug)): Path<(String, String)>,
    form: FormData,
) -> PageResult {
    let current = get_newslink(&state.pool, &slug, &newslink_slug).await?;
    let values = input_from(&form);
    verify_startup(&values, &current.startup_slug)?;

    match update_newslink(&state.pool, &slug, &newslink_slug, values.clone()).await {
        Ok(newslink) => {
            record_updated("newslink", &newslink.to_string());
            Ok(redirect(&newslink.page_path()))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            render_form(
                &state,
                "Update Article",
                &current.update_path(),
                &values,
                &errors,
            )
            .await
        }
    }
}

async fn delete_form(
    State(state): State<AppState>,
    Path((slug, newslink_slug)): Path<(String, String)>,
) -> PageResult {
    let newslink = get_newslink(&state.pool, &slug, &newslink_slug).await?;
    let body = format!(
        "<h2>Delete Article</h2>{}",
        confirm_delete(
            &newslink.delete_path(),
            &newslink.title,
            &newslink.page_path()
        )
    );
    Ok(layout("Delete Article", &body).into_response())
}

async fn delete_submit(
    State(state): State<AppState>,
    Path((slug, newslink_slug)): Path<(String, String)>,
) -> PageResult {
    let newslink = delete_newslink(&state.pool, &slug, &newslink_slug).await?;
    record_deleted("newslink", &newslink.to_string());
    Ok(redirect(&newslink.page_path()))
}

fn values_of(newslink: &NewsLinkRecord) -> NewsLinkInput {
    NewsLinkInput {
        title: newslink.title.clone(),
        slug: newslink.slug.clone(),
        pub_date: newslink.pub_date.to_string(),
        link: newslink.link.clone(),
        startup: newslink.startup_slug.clone(),
    }
}
