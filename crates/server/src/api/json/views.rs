//! Serialized forms of the records, with absolute `url` fields.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::api::AppState;
use crate::errors::OrganizerResult;
use crate::newslink::NewsLinkRecord;
use crate::post::PostRecord;
use crate::relations::{list_startups_for_post, list_tags_for_post, list_tags_for_startup};
use crate::startup::StartupRecord;
use crate::startup::queries::get_startup;
use crate::tag::TagRecord;

#[derive(Debug, Serialize)]
pub struct TagView {
    pub url: String,
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct StartupView {
    pub url: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub founded_date: NaiveDate,
    pub contact: String,
    pub website: String,
    pub tags: Vec<TagView>,
}

#[derive(Debug, Serialize)]
pub struct NewsLinkView {
    pub url: String,
    pub title: String,
    pub slug: String,
    pub pub_date: NaiveDate,
    pub link: String,
    pub startup: StartupView,
}

/// Posts reference their tags and startups by API URL.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub url: String,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub pub_date: NaiveDate,
    pub tags: Vec<String>,
    pub startups: Vec<String>,
}

pub fn tag_view(state: &AppState, tag: TagRecord) -> TagView {
    TagView {
        url: state.absolute_url(&tag.api_path()),
        id: tag.id,
        name: tag.name,
        slug: tag.slug,
    }
}

pub async fn startup_view(state: &AppState, startup: StartupRecord) -> OrganizerResult<StartupView> {
    let tags = list_tags_for_startup(&state.pool, startup.id)
        .await?
        .into_iter()
        .map(|tag| tag_view(state, tag))
        .collect();

    Ok(StartupView {
        url: state.absolute_url(&startup.api_path()),
        name: startup.name,
        slug: startup.slug,
        description: startup.description,
        founded_date: startup.founded_date,
        contact: startup.contact,
        website: startup.website,
        tags,
    })
}

pub async fn newslink_view(
    state: &AppState,
    newslink: NewsLinkRecord,
) -> OrganizerResult<NewsLinkView> {
    let startup = get_startup(&state.pool, &newslink.startup_slug).await?;

    Ok(NewsLinkView {
        url: state.absolute_url(&newslink.api_path()),
        title: newslink.title,
        slug: newslink.slug,
        pub_date: newslink.pub_date,
        link: newslink.link,
        startup: startup_view(state, startup).await?,
    })
}

pub async fn post_view(state: &AppState, post: PostRecord) -> OrganizerResult<PostView> {
    let pool: &SqlitePool = &state.pool;
    let tags = list_tags_for_post(pool, post.id)
        .await?
        .iter()
        .map(|tag| state.absolute_url(&tag.api_path()))
        .collect();
    let startups = list_startups_for_post(pool, post.id)
        .await?
        .iter()
        .map(|startup| state.absolute_url(&startup.api_path()))
        .collect();

    Ok(PostView {
        url: state.absolute_url(&post.api_path()),
        title: post.title,
        slug: post.slug,
        text: post.text,
        pub_date: post.pub_date,
        tags,
        startups,
    })
}
