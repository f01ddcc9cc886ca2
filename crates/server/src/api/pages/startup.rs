use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;

use super::form::FormData;
use super::html::{
    FormErrors, checkboxes, confirm_delete, escape, form, input, layout, link, list, textarea,
};
use super::{PageResult, form_errors, redirect};
use crate::api::AppState;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::newslink::queries::newslinks_for_startup;
use crate::relations::{TagSpec, list_tags_for_startup};
use crate::startup::mutations::{create_startup, delete_startup, update_startup};
use crate::startup::queries::{get_startup, list_startups, posts_for_startup};
use crate::startup::{StartupInput, StartupRecord};
use crate::tag::queries::list_tags;

const FIELDS: &[&str] = &[
    "name",
    "slug",
    "description",
    "founded_date",
    "contact",
    "website",
    "tags",
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/startup/", get(startup_list))
        .route("/startup/create/", get(create_form).post(create_submit))
        .route("/startup/{slug}/", get(startup_detail))
        .route("/startup/{slug}/update/", get(update_form).post(update_submit))
        .route("/startup/{slug}/delete/", get(delete_form).post(delete_submit))
}

fn input_from(form: &FormData) -> StartupInput {
    StartupInput {
        name: form.value("name"),
        slug: Some(form.value("slug")),
        description: form.value("description"),
        founded_date: form.value("founded_date"),
        contact: form.value("contact"),
        website: form.value("website"),
        // an empty checkbox group clears the tag set
        tags: Some(form.values("tags").into_iter().map(TagSpec::Slug).collect()),
    }
}

fn selected_tags(values: &StartupInput) -> Vec<String> {
    values
        .tags
        .iter()
        .flatten()
        .filter_map(|spec| match spec {
            TagSpec::Slug(slug) => Some(slug.clone()),
            _ => None,
        })
        .collect()
}

async fn render_form(
    state: &AppState,
    title: &str,
    action: &str,
    values: &StartupInput,
    errors: &FormErrors,
) -> PageResult {
    let tag_options: Vec<(String, String)> = list_tags(&state.pool)
        .await?
        .into_iter()
        .map(|tag| (tag.slug, tag.name))
        .collect();

    let fields = [
        errors.others(FIELDS),
        input("Name", "name", "text", &values.name, errors),
        input(
            "Slug",
            "slug",
            "text",
            values.slug.as_deref().unwrap_or_default(),
            errors,
        ),
        textarea("Description", "description", &values.description, errors),
        input(
            "Date Founded",
            "founded_date",
            "date",
            &values.founded_date,
            errors,
        ),
        input("Contact", "contact", "email", &values.contact, errors),
        input("Website", "website", "url", &values.website, errors),
        checkboxes(
            "Tags",
            "tags",
            &tag_options,
            &selected_tags(values),
            errors,
        ),
    ]
    .concat();
    let body = format!("<h2>{}</h2>{}", escape(title), form(action, &fields, title));
    Ok(layout(title, &body).into_response())
}

async fn startup_list(State(state): State<AppState>) -> PageResult {
    let startups = list_startups(&state.pool).await?;
    let items: Vec<String> = startups
        .iter()
        .map(|startup| link(&startup.page_path(), &startup.name))
        .collect();
    let body = format!(
        "<h2>Startup List</h2>{}<p>{}</p>",
        list(&items, "No startups yet."),
        link("/startup/create/", "Create New Startup"),
    );
    Ok(layout("Startup List", &body).into_response())
}

async fn startup_detail(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let startup = get_startup(&state.pool, &slug).await?;
    let tags: Vec<String> = list_tags_for_startup(&state.pool, startup.id)
        .await?
        .iter()
        .map(|tag| link(&tag.page_path(), &tag.name))
        .collect();
    let newslinks: Vec<String> = newslinks_for_startup(&state.pool, startup.id)
        .await?
        .iter()
        .map(|newslink| {
            format!(
                r#"<a href="{href}">{title}</a> ({date}) {update} {delete}"#,
                href = escape(&newslink.link),
                title = escape(&newslink.title),
                date = newslink.pub_date,
                update = link(&newslink.update_path(), "Edit"),
                delete = link(&newslink.delete_path(), "Delete"),
            )
        })
        .collect();
    let posts: Vec<String> = posts_for_startup(&state.pool, startup.id)
        .await?
        .iter()
        .map(|post| link(&post.page_path(), &post.to_string()))
        .collect();

    let body = format!(
        "<h2>{name}</h2>\
         <p>{update} {delete}</p>\
         <dl>\
         <dt>Date Founded</dt><dd>{founded}</dd>\
         <dt>Website</dt><dd>{website}</dd>\
         <dt>Contact</dt><dd>{contact}</dd>\
         <dt>Tags</dt><dd>{tags}</dd>\
         </dl>\
         <p>{description}</p>\
         <h3>Recent News</h3>{newslinks}<p>{add_article}</p>\
         <h3>Blog Posts</h3>{posts}",
        name = escape(&startup.name),
        update = link(&update_path(&startup), "Edit Startup"),
        delete = link(&delete_path(&startup), "Delete Startup"),
        founded = startup.founded_date,
        website = link(&startup.website, &startup.website),
        contact = escape(&startup.contact),
        tags = list(&tags, "No tags."),
        description = escape(&startup.description),
        newslinks = list(&newslinks, "No news yet."),
        add_article = link(&format!("{}add_article/", startup.page_path()), "Add Article"),
        posts = list(&posts, "No blog posts mention this startup."),
    );
    Ok(layout(&startup.name, &body).into_response())
}

async fn create_form(State(state): State<AppState>) -> PageResult {
    render_form(
        &state,
        "Create Startup",
        "/startup/create/",
        &StartupInput::default(),
        &FormErrors::default(),
    )
    .await
}

async fn create_submit(State(state): State<AppState>, form: FormData) -> PageResult {
    let values = input_from(&form);
    match create_startup(&state.pool, values.clone()).await {
        Ok(startup) => {
            record_created("startup", &startup.slug);
            Ok(redirect(&startup.page_path()))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            render_form(&state, "Create Startup", "/startup/create/", &values, &errors).await
        }
    }
}

async fn update_form(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let startup = get_startup(&state.pool, &slug).await?;
    let tags = list_tags_for_startup(&state.pool, startup.id).await?;
    let values = StartupInput {
        name: startup.name.clone(),
        slug: Some(startup.slug.clone()),
        description: startup.description.clone(),
        founded_date: startup.founded_date.to_string(),
        contact: startup.contact.clone(),
        website: startup.website.clone(),
        tags: Some(tags.into_iter().map(|tag| TagSpec::Slug(tag.slug)).collect()),
    };
    render_form(
        &state,
        "Update Startup",
        &update_path(&startup),
        &values,
        &FormErrors::default(),
    )
    .await
}

async fn update_submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    form: FormData,
) -> PageResult {
    let current = get_startup(&state.pool, &slug).await?;
    let values = input_from(&form);
    match update_startup(&state.pool, &slug, values.clone()).await {
        Ok(startup) => {
            record_updated("startup", &startup.slug);
            Ok(redirect(&startup.page_path()))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            render_form(
                &state,
                "Update Startup",
                &update_path(&current),
                &values,
                &errors,
            )
            .await
        }
    }
}

async fn delete_form(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let startup = get_startup(&state.pool, &slug).await?;
    let body = format!(
        "<h2>Delete Startup</h2>{}",
        confirm_delete(&delete_path(&startup), &startup.name, &startup.page_path())
    );
    Ok(layout("Delete Startup", &body).into_response())
}

async fn delete_submit(State(state): State<AppState>, Path(slug): Path<String>) -> PageResult {
    let (startup, _) = delete_startup(&state.pool, &slug).await?;
    record_deleted("startup", &startup.slug);
    Ok(redirect("/startup/"))
}

fn update_path(startup: &StartupRecord) -> String {
    format!("{}update/", startup.page_path())
}

fn delete_path(startup: &StartupRecord) -> String {
    format!("{}delete/", startup.page_path())
}
