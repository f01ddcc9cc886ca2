use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Parser)]
#[command(name = "organizer")]
#[command(about = "Startup organizer CLI - manage tags, startups, articles and posts over HTTP", long_about = None)]
struct Cli {
    /// JSON API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    Tag(TagCommands),
    #[command(subcommand)]
    Startup(StartupCommands),
    #[command(subcommand)]
    Newslink(NewsLinkCommands),
    #[command(subcommand)]
    Post(PostCommands),
}

#[derive(Subcommand)]
enum TagCommands {
    /// List all tags
    List,
    /// Create a tag
    Create {
        name: String,
        /// Slug (derived from the name when omitted)
        #[arg(short, long)]
        slug: Option<String>,
    },
}

#[derive(Subcommand)]
enum StartupCommands {
    /// List all startups
    List,
    /// Create a startup
    Create {
        name: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: String,
        /// Founding date (YYYY-MM-DD)
        #[arg(long)]
        founded: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        website: String,
        /// Tag slugs to attach
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Attach an existing tag to a startup
    Tag { startup: String, tag: String },
}

#[derive(Subcommand)]
enum NewsLinkCommands {
    /// Create a news article for a startup
    Create {
        /// Owning startup slug
        startup: String,
        title: String,
        #[arg(long)]
        slug: String,
        /// Publication date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long)]
        link: String,
    },
}

#[derive(Subcommand)]
enum PostCommands {
    /// List all blog posts
    List,
}

#[derive(Deserialize, Debug)]
struct TagNode {
    url: String,
    name: String,
    slug: String,
}

#[derive(Deserialize, Debug)]
struct StartupNode {
    url: String,
    name: String,
    slug: String,
    founded_date: String,
    #[serde(default)]
    tags: Vec<TagNode>,
}

#[derive(Deserialize, Debug)]
struct NewsLinkNode {
    url: String,
    title: String,
    pub_date: String,
    startup: StartupNode,
}

#[derive(Deserialize, Debug)]
struct PostNode {
    url: String,
    title: String,
    pub_date: String,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Serialize)]
struct CreateTagInput {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
}

#[derive(Serialize)]
struct CreateStartupInput {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    description: String,
    founded_date: String,
    contact: String,
    website: String,
    tags: Vec<String>,
}

#[derive(Serialize)]
struct AttachTagInput {
    slug: String,
}

#[derive(Serialize)]
struct CreateNewsLinkInput {
    title: String,
    slug: String,
    pub_date: String,
    link: String,
    startup: String,
}

struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    fn new(api_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .context("Failed to send request to organizer API")?;
        parse(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send_post(path, body).await?;
        parse(response).await
    }

    async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let response = self.send_post(path, body).await?;
        check(response).await.map(|_| ())
    }

    async fn send_post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .context("Failed to send request to organizer API")
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(anyhow::anyhow!(describe_failure(status, &body)))
}

async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    check(response)
        .await?
        .json()
        .await
        .context("Failed to parse organizer API response")
}

fn describe_failure(status: StatusCode, body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return format!("Request failed with status: {status}");
    };

    if let Some(detail) = parsed.detail {
        return format!("Request failed with status {status}: {detail}");
    }

    let messages: Vec<String> = parsed
        .errors
        .iter()
        .flat_map(|(field, messages)| {
            messages
                .iter()
                .map(move |message| format!("{field}: {message}"))
        })
        .collect();
    if messages.is_empty() {
        format!("Request failed with status: {status}")
    } else {
        format!("Validation failed: {}", messages.join(", "))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url);

    match cli.command {
        Commands::Tag(command) => match command {
            TagCommands::List => list_tags(&client).await?,
            TagCommands::Create { name, slug } => create_tag(&client, name, slug).await?,
        },
        Commands::Startup(command) => match command {
            StartupCommands::List => list_startups(&client).await?,
            StartupCommands::Create {
                name,
                slug,
                description,
                founded,
                contact,
                website,
                tag,
            } => {
                let input = CreateStartupInput {
                    name,
                    slug,
                    description,
                    founded_date: founded,
                    contact,
                    website,
                    tags: tag,
                };
                create_startup(&client, input).await?
            }
            StartupCommands::Tag { startup, tag } => tag_startup(&client, startup, tag).await?,
        },
        Commands::Newslink(NewsLinkCommands::Create {
            startup,
            title,
            slug,
            date,
            link,
        }) => {
            let input = CreateNewsLinkInput {
                title,
                slug,
                pub_date: date,
                link,
                startup,
            };
            create_newslink(&client, input).await?
        }
        Commands::Post(PostCommands::List) => list_posts(&client).await?,
    }

    Ok(())
}

async fn list_tags(client: &ApiClient) -> Result<()> {
    let tags: Vec<TagNode> = client.get("tag/").await?;
    if tags.is_empty() {
        println!("No tags.");
    }
    for tag in tags {
        println!("{:<24} {}", tag.slug, tag.name);
    }
    Ok(())
}

async fn create_tag(client: &ApiClient, name: String, slug: Option<String>) -> Result<()> {
    let tag: TagNode = client.post("tag/", &CreateTagInput { name, slug }).await?;

    println!("✓ Tag created successfully!");
    println!("  Name: {}", tag.name);
    println!("  Slug: {}", tag.slug);
    println!("  URL:  {}", tag.url);
    Ok(())
}

async fn list_startups(client: &ApiClient) -> Result<()> {
    let startups: Vec<StartupNode> = client.get("startup/").await?;
    if startups.is_empty() {
        println!("No startups.");
    }
    for startup in startups {
        let tags: Vec<&str> = startup.tags.iter().map(|tag| tag.slug.as_str()).collect();
        println!(
            "{:<24} {:<32} {} [{}]",
            startup.slug,
            startup.name,
            startup.founded_date,
            tags.join(", ")
        );
    }
    Ok(())
}

async fn create_startup(client: &ApiClient, input: CreateStartupInput) -> Result<()> {
    let startup: StartupNode = client.post("startup/", &input).await?;

    println!("✓ Startup created successfully!");
    println!("  Name: {}", startup.name);
    println!("  Slug: {}", startup.slug);
    println!("  URL:  {}", startup.url);
    Ok(())
}

async fn tag_startup(client: &ApiClient, startup: String, tag: String) -> Result<()> {
    client
        .post_empty(&format!("startup/{startup}/tags/"), &AttachTagInput { slug: tag.clone() })
        .await?;

    println!("✓ Tagged {startup} with {tag}");
    Ok(())
}

async fn create_newslink(client: &ApiClient, input: CreateNewsLinkInput) -> Result<()> {
    let newslink: NewsLinkNode = client.post("newslink/", &input).await?;

    println!("✓ Article created successfully!");
    println!("  Title:   {}", newslink.title);
    println!("  Date:    {}", newslink.pub_date);
    println!("  Startup: {}", newslink.startup.name);
    println!("  URL:     {}", newslink.url);
    Ok(())
}

async fn list_posts(client: &ApiClient) -> Result<()> {
    let posts: Vec<PostNode> = client.get("blog/").await?;
    if posts.is_empty() {
        println!("No blog posts.");
    }
    for post in posts {
        println!("{} {:<40} {}", post.pub_date, post.title, post.url);
    }
    Ok(())
}
