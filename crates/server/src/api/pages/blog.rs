use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;

use super::form::FormData;
use super::html::{
    FormErrors, checkboxes, confirm_delete, escape, form, input, layout, link, list, textarea,
};
use super::markdown::render_markdown;
use super::{PageResult, form_errors, redirect};
use crate::api::AppState;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::post::models::parse_period;
use crate::post::mutations::{create_post, delete_post, update_post};
use crate::post::queries::{get_post, list_posts};
use crate::post::{PostInput, PostRecord};
use crate::relations::{TagSpec, list_startups_for_post, list_tags_for_post};
use crate::startup::queries::list_startups;
use crate::tag::queries::list_tags;

const FIELDS: &[&str] = &["title", "slug", "text", "pub_date", "tags", "startups"];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blog/", get(post_list))
        .route("/blog/create/", get(create_form).post(create_submit))
        .route("/blog/{year}/{month}/{slug}/", get(post_detail))
        .route(
            "/blog/{year}/{month}/{slug}/update/",
            get(update_form).post(update_submit),
        )
        .route(
            "/blog/{year}/{month}/{slug}/delete/",
            get(delete_form).post(delete_submit),
        )
}

fn input_from(form: &FormData) -> PostInput {
    PostInput {
        title: form.value("title"),
        slug: form.value("slug"),
        text: form.value("text"),
        pub_date: form.value("pub_date"),
        tags: Some(form.values("tags").into_iter().map(TagSpec::Slug).collect()),
        startups: Some(form.values("startups")),
    }
}

async fn render_form(
    state: &AppState,
    title: &str,
    action: &str,
    values: &PostInput,
    errors: &FormErrors,
) -> PageResult {
    let tag_options: Vec<(String, String)> = list_tags(&state.pool)
        .await?
        .into_iter()
        .map(|tag| (tag.slug, tag.name))
        .collect();
    let startup_options: Vec<(String, String)> = list_startups(&state.pool)
        .await?
        .into_iter()
        .map(|startup| (startup.slug, startup.name))
        .collect();
    let selected_tags: Vec<String> = values
        .tags
        .iter()
        .flatten()
        .filter_map(|spec| match spec {
            TagSpec::Slug(slug) => Some(slug.clone()),
            _ => None,
        })
        .collect();
    let selected_startups = values.startups.clone().unwrap_or_default();

    let fields = [
        errors.others(FIELDS),
        input("Title", "title", "text", &values.title, errors),
        input("Slug", "slug", "text", &values.slug, errors),
        textarea("Text", "text", &values.text, errors),
        input("Date Published", "pub_date", "date", &values.pub_date, errors),
        checkboxes("Tags", "tags", &tag_options, &selected_tags, errors),
        checkboxes(
            "Startups",
            "startups",
            &startup_options,
            &selected_startups,
            errors,
        ),
    ]
    .concat();
    let body = format!("<h2>{}</h2>{}", escape(title), form(action, &fields, title));
    Ok(layout(title, &body).into_response())
}

async fn post_list(State(state): State<AppState>) -> PageResult {
    let posts = list_posts(&state.pool).await?;
    let items: Vec<String> = posts
        .iter()
        .map(|post| {
            format!(
                "{} <small>{}</small>",
                link(&post.page_path(), &post.title),
                post.pub_date.format("%B %-d, %Y"),
            )
        })
        .collect();
    let body = format!(
        "<h2>Blog</h2>{}<p>{}</p>",
        list(&items, "No blog posts available."),
        link("/blog/create/", "Write New Blog Post"),
    );
    Ok(layout("Blog", &body).into_response())
}

async fn post_detail(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
) -> PageResult {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = get_post(&state.pool, year, month, &slug).await?;
    let tags: Vec<String> = list_tags_for_post(&state.pool, post.id)
        .await?
        .iter()
        .map(|tag| link(&tag.page_path(), &tag.name))
        .collect();
    let startups: Vec<String> = list_startups_for_post(&state.pool, post.id)
        .await?
        .iter()
        .map(|startup| link(&startup.page_path(), &startup.name))
        .collect();

    let body = format!(
        "<article>\
         <h2>{title}</h2>\
         <p>Written on <time datetime=\"{date}\">{pretty}</time></p>\
         <p>{update} {delete}</p>\
         {text}\
         <h3>Tags</h3>{tags}\
         <h3>Startups</h3>{startups}\
         </article>",
        title = escape(&post.title),
        date = post.pub_date,
        pretty = post.pub_date.format("%B %-d, %Y"),
        update = link(&update_path(&post), "Edit Post"),
        delete = link(&delete_path(&post), "Delete Post"),
        text = render_markdown(&post.text),
        tags = list(&tags, "No tags."),
        startups = list(&startups, "No startups."),
    );
    Ok(layout(&post.to_string(), &body).into_response())
}

async fn create_form(State(state): State<AppState>) -> PageResult {
    render_form(
        &state,
        "Create Post",
        "/blog/create/",
        &PostInput::default(),
        &FormErrors::default(),
    )
    .await
}

async fn create_submit(State(state): State<AppState>, form: FormData) -> PageResult {
    let values = input_from(&form);
    match create_post(&state.pool, values.clone()).await {
        Ok(post) => {
            record_created("post", &post.page_path());
            Ok(redirect(&post.page_path()))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            render_form(&state, "Create Post", "/blog/create/", &values, &errors).await
        }
    }
}

async fn update_form(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
) -> PageResult {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = get_post(&state.pool, year, month, &slug).await?;
    let tags = list_tags_for_post(&state.pool, post.id).await?;
    let startups = list_startups_for_post(&state.pool, post.id).await?;
    let values = PostInput {
        title: post.title.clone(),
        slug: post.slug.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date.to_string(),
        tags: Some(tags.into_iter().map(|tag| TagSpec::Slug(tag.slug)).collect()),
        startups: Some(startups.into_iter().map(|startup| startup.slug).collect()),
    };
    render_form(
        &state,
        "Update Post",
        &update_path(&post),
        &values,
        &FormErrors::default(),
    )
    .await
}

async fn update_submit(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
    form: FormData,
) -> PageResult {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let current = get_post(&state.pool, year, month, &slug).await?;
    let values = input_from(&form);
    match update_post(&state.pool, year, month, &slug, values.clone()).await {
        Ok(post) => {
            record_updated("post", &post.page_path());
            Ok(redirect(&post.page_path()))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            render_form(
                &state,
                "Update Post",
                &update_path(&current),
                &values,
                &errors,
            )
            .await
        }
    }
}

async fn delete_form(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
) -> PageResult {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = get_post(&state.pool, year, month, &slug).await?;
    let body = format!(
        "<h2>Delete Post</h2>{}",
        confirm_delete(&delete_path(&post), &post.to_string(), &post.page_path())
    );
    Ok(layout("Delete Post", &body).into_response())
}

async fn delete_submit(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
) -> PageResult {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = delete_post(&state.pool, year, month, &slug).await?;
    record_deleted("post", &post.page_path());
    Ok(redirect("/blog/"))
}

fn update_path(post: &PostRecord) -> String {
    format!("{}update/", post.page_path())
}

fn delete_path(post: &PostRecord) -> String {
    format!("{}delete/", post.page_path())
}
