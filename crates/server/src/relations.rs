//! Relation management: tag membership for startups and posts, post to
//! startup links, and cascade-safe deletes.
//!
//! Functions taking a `SqliteConnection` expect to run inside the caller's
//! transaction so that a failed batch leaves nothing behind.

use serde::Deserialize;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

use crate::errors::{OrganizerError, OrganizerResult, ValidationError};
use crate::startup::models::StartupRecord;
use crate::tag::db::{fetch_tag_by_id, fetch_tag_by_name, find_tag_by_slug_ci};
use crate::tag::models::{TagInput, TagRecord, normalize_tag_name};
use crate::tag::mutations::insert_tag;

/// One entry of a nested tag list: an id, a slug, or a tag payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagSpec {
    Id(i64),
    Slug(String),
    Fields(TagFields),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TagFields {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Record whose tag set is being managed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagOwner {
    Startup(i64),
    Post(i64),
}

impl TagOwner {
    fn id(self) -> i64 {
        match self {
            TagOwner::Startup(id) | TagOwner::Post(id) => id,
        }
    }

    fn clear_sql(self) -> &'static str {
        match self {
            TagOwner::Startup(_) => "DELETE FROM startup_tags WHERE startup_id = ?",
            TagOwner::Post(_) => "DELETE FROM post_tags WHERE post_id = ?",
        }
    }

    fn link_sql(self) -> &'static str {
        match self {
            TagOwner::Startup(_) => {
                "INSERT OR IGNORE INTO startup_tags (startup_id, tag_id) VALUES (?, ?)"
            }
            TagOwner::Post(_) => "INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)",
        }
    }
}

enum Resolved {
    Existing(TagRecord),
    New(TagInput),
}

/// Adds an existing tag, looked up by slug ignoring case, to a startup.
/// Attaching a tag twice leaves a single association.
pub async fn attach_tag_to_startup(
    pool: &SqlitePool,
    startup_id: i64,
    tag_slug: &str,
) -> OrganizerResult<TagRecord> {
    let tag = find_tag_by_slug_ci(pool, tag_slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("tag", tag_slug))?;

    sqlx::query(TagOwner::Startup(startup_id).link_sql())
        .bind(startup_id)
        .bind(tag.id)
        .execute(pool)
        .await?;

    Ok(tag)
}

pub async fn list_tags_for_startup<'e, E>(
    executor: E,
    startup_id: i64,
) -> Result<Vec<TagRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TagRecord>(
        "SELECT t.id, t.name, t.slug FROM tags t \
         JOIN startup_tags st ON st.tag_id = t.id \
         WHERE st.startup_id = ? ORDER BY t.name",
    )
    .bind(startup_id)
    .fetch_all(executor)
    .await
}

pub async fn list_tags_for_post<'e, E>(
    executor: E,
    post_id: i64,
) -> Result<Vec<TagRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TagRecord>(
        "SELECT t.id, t.name, t.slug FROM tags t \
         JOIN post_tags pt ON pt.tag_id = t.id \
         WHERE pt.post_id = ? ORDER BY t.name",
    )
    .bind(post_id)
    .fetch_all(executor)
    .await
}

pub async fn list_startups_for_post<'e, E>(
    executor: E,
    post_id: i64,
) -> Result<Vec<StartupRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, StartupRecord>(
        "SELECT s.id, s.name, s.slug, s.description, s.founded_date, s.contact, s.website \
         FROM startups s JOIN post_startups ps ON ps.startup_id = s.id \
         WHERE ps.post_id = ? ORDER BY s.name",
    )
    .bind(post_id)
    .fetch_all(executor)
    .await
}

/// Sets the tag set of `owner` to the tags named by `specs`.
///
/// Existing tags are resolved first, then payloads with no matching tag are
/// created, then all of them are linked. Any invalid entry fails the batch.
pub async fn replace_tags(
    conn: &mut SqliteConnection,
    owner: TagOwner,
    specs: &[TagSpec],
) -> OrganizerResult<Vec<TagRecord>> {
    let mut tags: Vec<TagRecord> = Vec::new();
    let mut pending: Vec<TagInput> = Vec::new();
    let mut issues = ValidationError::default();

    for spec in specs {
        match resolve_spec(conn, spec, &mut issues).await? {
            Some(Resolved::Existing(tag)) => tags.push(tag),
            Some(Resolved::New(input)) => pending.push(input),
            None => {}
        }
    }

    let mut cleaned = Vec::with_capacity(pending.len());
    for input in pending {
        match input.clean() {
            Ok(clean) => cleaned.push(clean),
            Err(err) => {
                for issue in err.issues {
                    issues.push(format!("tags.{}", issue.field), issue.message);
                }
            }
        }
    }

    if !issues.is_empty() {
        return Err(issues.into());
    }

    for clean in cleaned {
        // two payloads in one batch may normalize to the same name
        if tags.iter().any(|tag| tag.name == clean.name) {
            continue;
        }
        tags.push(insert_tag(conn, clean).await?);
    }

    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags.dedup_by_key(|tag| tag.id);

    sqlx::query(owner.clear_sql())
        .bind(owner.id())
        .execute(&mut *conn)
        .await?;
    for tag in &tags {
        sqlx::query(owner.link_sql())
            .bind(owner.id())
            .bind(tag.id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(tags)
}

async fn resolve_spec(
    conn: &mut SqliteConnection,
    spec: &TagSpec,
    issues: &mut ValidationError,
) -> OrganizerResult<Option<Resolved>> {
    let (id, slug, name) = match spec {
        TagSpec::Id(id) => (Some(*id), None, None),
        TagSpec::Slug(slug) => (None, Some(slug.as_str()), None),
        TagSpec::Fields(fields) => (
            fields.id,
            fields.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            fields.name.as_deref(),
        ),
    };

    if let Some(id) = id {
        return Ok(match fetch_tag_by_id(&mut *conn, id).await? {
            Some(tag) => Some(Resolved::Existing(tag)),
            None => {
                issues.push("tags", format!("Invalid id \"{id}\" - tag does not exist."));
                None
            }
        });
    }

    if let Some(slug) = slug {
        if let Some(tag) = find_tag_by_slug_ci(&mut *conn, slug).await? {
            return Ok(Some(Resolved::Existing(tag)));
        }
    }

    let Some(name) = name else {
        match slug {
            Some(slug) => issues.push("tags", format!("Tag with slug \"{slug}\" does not exist.")),
            None => issues.push("tags.name", "This field is required."),
        }
        return Ok(None);
    };

    if let Some(tag) = fetch_tag_by_name(&mut *conn, &normalize_tag_name(name)).await? {
        return Ok(Some(Resolved::Existing(tag)));
    }

    Ok(Some(Resolved::New(TagInput {
        name: name.to_string(),
        slug: slug.map(str::to_string),
    })))
}

/// Sets the startups a post is about, by startup slug.
pub async fn replace_startups(
    conn: &mut SqliteConnection,
    post_id: i64,
    startup_slugs: &[String],
) -> OrganizerResult<Vec<StartupRecord>> {
    let mut startups: Vec<StartupRecord> = Vec::new();
    let mut issues = ValidationError::default();

    for slug in startup_slugs {
        let found = sqlx::query_as::<_, StartupRecord>(
            "SELECT id, name, slug, description, founded_date, contact, website \
             FROM startups WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;

        match found {
            Some(startup) => startups.push(startup),
            None => issues.push(
                "startups",
                format!("Startup with slug \"{slug}\" does not exist."),
            ),
        }
    }

    if !issues.is_empty() {
        return Err(issues.into());
    }

    startups.sort_by(|a, b| a.name.cmp(&b.name));
    startups.dedup_by_key(|startup| startup.id);

    sqlx::query("DELETE FROM post_startups WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    for startup in &startups {
        sqlx::query("INSERT OR IGNORE INTO post_startups (post_id, startup_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(startup.id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(startups)
}

/// Removes a startup together with its newslinks. Tags and posts that
/// referenced it survive. Returns the number of newslinks removed.
pub async fn delete_startup(conn: &mut SqliteConnection, startup_id: i64) -> OrganizerResult<u64> {
    let newslinks = sqlx::query("DELETE FROM newslinks WHERE startup_id = ?")
        .bind(startup_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM startup_tags WHERE startup_id = ?")
        .bind(startup_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM post_startups WHERE startup_id = ?")
        .bind(startup_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM startups WHERE id = ?")
        .bind(startup_id)
        .execute(&mut *conn)
        .await?;

    Ok(newslinks)
}

/// Drops every association of a tag ahead of deleting it.
pub async fn detach_tag(conn: &mut SqliteConnection, tag_id: i64) -> OrganizerResult<()> {
    sqlx::query("DELETE FROM startup_tags WHERE tag_id = ?")
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM post_tags WHERE tag_id = ?")
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Drops the tag and startup links of a post ahead of deleting it.
pub async fn detach_post(conn: &mut SqliteConnection, post_id: i64) -> OrganizerResult<()> {
    sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM post_startups WHERE post_id = ?")
        .bind(post_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
