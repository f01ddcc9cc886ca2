use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;

use super::form::FormData;
use super::html::{FormErrors, confirm_delete, escape, form, input, layout, link, list};
use super::{PageResult, form_errors, redirect};
use crate::api::AppState;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::tag::mutations::{create_tag, delete_tag, update_tag};
use crate::tag::queries::{get_tag, list_tags, posts_for_tag, startups_for_tag};
use crate::tag::{TagInput, TagRecord};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tag/", get(tag_list))
        .route("/tag/create/", get(create_form).post(create_submit))
        .route("/tag/{slug}/", get(tag_detail))
        .route("/tag/{slug}/update/", get(update_form).post(update_submit))
        .route("/tag/{slug}/delete/", get(delete_form).post(delete_submit))
}

fn input_from(form: &FormData) -> TagInput {
    TagInput {
        name: form.value("name"),
        slug: Some(form.value("slug")),
    }
}

fn render_form(title: &str, action: &str, values: &TagInput, errors: &FormErrors) -> PageResult {
    let fields = [
        errors.others(&["name", "slug"]),
        input("Name", "name", "text", &values.name, errors),
        input(
            "Slug",
            "slug",
            "text",
            values.slug.as_deref().unwrap_or_default(),
            errors,
        ),
    ]
    .concat();
    let body = format!("<h2>{}</h2>{}", escape(title), form(action, &fields, title));
    Ok(layout(title, &body).into_response())
}

async fn tag_list(State(state): State<AppState>) -> PageResult {
    let tags = list_tags(&state.pool).await?;
    let items: Vec<String> = tags
        .iter()
        .map(|tag| link(&tag.page_path(), &tag.name))
        .collect();
    let body = format!(
        "<h2>Tag List</h2>{}<p>{}</p>",
        list(&items, "No tags yet."),
        link("/tag/create/", "Create New Tag"),
    );
    Ok(layout("Tag List", &body).into_response())
}

async fn tag_detail(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let tag = get_tag(&state.pool, &slug).await?;
    let startups: Vec<String> = startups_for_tag(&state.pool, tag.id)
        .await?
        .iter()
        .map(|startup| link(&startup.page_path(), &startup.name))
        .collect();
    let posts: Vec<String> = posts_for_tag(&state.pool, tag.id)
        .await?
        .iter()
        .map(|post| link(&post.page_path(), &post.to_string()))
        .collect();

    let body = format!(
        "<h2>{name}</h2>\
         <p>{update} {delete}</p>\
         <h3>Startups</h3>{startups}\
         <h3>Blog Posts</h3>{posts}",
        name = escape(&tag.name),
        update = link(&update_path(&tag), "Edit Tag"),
        delete = link(&delete_path(&tag), "Delete Tag"),
        startups = list(&startups, "This tag is not related to any startups."),
        posts = list(&posts, "This tag is not related to any blog posts."),
    );
    Ok(layout(&tag.name, &body).into_response())
}

async fn create_form() -> PageResult {
    render_form(
        "Create Tag",
        "/tag/create/",
        &TagInput::default(),
        &FormErrors::default(),
    )
}

async fn create_submit(State(state): State<AppState>, form: FormData) -> PageResult {
    let values = input_from(&form);
    match create_tag(&state.pool, values.clone()).await {
        Ok(tag) => {
            record_created("tag", &tag.slug);
            Ok(redirect(&tag.page_path()))
        }
        Err(err) => render_form("Create Tag", "/tag/create/", &values, &form_errors(err)?),
    }
}

async fn update_form(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let tag = get_tag(&state.pool, &slug).await?;
    let values = TagInput {
        name: tag.name.clone(),
        slug: Some(tag.slug.clone()),
    };
    render_form("Update Tag", &update_path(&tag), &values, &FormErrors::default())
}

async fn update_submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    form: FormData,
) -> PageResult {
    let current = get_tag(&state.pool, &slug).await?;
    let values = input_from(&form);
    match update_tag(&state.pool, &slug, values.clone()).await {
        Ok(tag) => {
            record_updated("tag", &tag.slug);
            Ok(redirect(&tag.page_path()))
        }
        Err(err) => render_form(
            "Update Tag",
            &update_path(&current),
            &values,
            &form_errors(err)?,
        ),
    }
}

async fn delete_form(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let tag = get_tag(&state.pool, &slug).await?;
    let body = format!(
        "<h2>Delete Tag</h2>{}",
        confirm_delete(&delete_path(&tag), &tag.name, &tag.page_path())
    );
    Ok(layout("Delete Tag", &body).into_response())
}

async fn delete_submit(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let tag = delete_tag(&state.pool, &slug).await?;
    record_deleted("tag", &tag.slug);
    Ok(redirect("/tag/"))
}

fn update_path(tag: &TagRecord) -> String {
    format!("{}update/", tag.page_path())
}

fn delete_path(tag: &TagRecord) -> String {
    format!("{}delete/", tag.page_path())
}
