//! housing-cli - command-line client for housing-api

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reqwest::{multipart, Client, Method, RequestBuilder};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "housing-cli")]
#[command(about = "Client for the Housing Data API")]
#[command(version)]
struct Cli {
    /// Base URL of the running service
    #[arg(long, global = true, env = "HOUSING_API_URL", default_value = "http://127.0.0.1:8000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload and preprocess a CSV file
    Upload {
        file: PathBuf,
        #[command(flatten)]
        collection: CollectionArgs,
    },
    /// Predict over a stored collection
    Process {
        #[command(flatten)]
        collection: CollectionArgs,
    },
    /// Page through stored raw records
    RawData {
        #[command(flatten)]
        collection: CollectionArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Page through stored predictions, newest first
    PredictedData {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        table_name: Option<String>,
    },
    /// Delete every record of a collection
    Delete {
        #[command(flatten)]
        collection: CollectionArgs,
    },
    /// Check service health
    Health,
}

#[derive(Args, Debug, Default)]
struct CollectionArgs {
    #[arg(long)]
    db_name: Option<String>,
    #[arg(long)]
    collection_name: Option<String>,
}

impl CollectionArgs {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(db) = &self.db_name {
            query.push(("db_name", db.clone()));
        }
        if let Some(collection) = &self.collection_name {
            query.push(("collection_name", collection.clone()));
        }
        query
    }
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    skip: i64,
    #[arg(long, default_value_t = 10)]
    limit: i64,
}

impl PageArgs {
    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("limit", self.limit.to_string())]
    }
}

/// Method, path and query string for a command
fn route(command: &Command) -> (Method, &'static str, Vec<(&'static str, String)>) {
    match command {
        Command::Upload { collection, .. } => (Method::POST, "/api/upload", collection.query()),
        Command::Process { collection } => (Method::GET, "/api/process", collection.query()),
        Command::RawData { collection, page } => {
            let mut query = collection.query();
            query.extend(page.query());
            (Method::GET, "/api/raw_data", query)
        }
        Command::PredictedData { page, table_name } => {
            let mut query = page.query();
            if let Some(table) = table_name {
                query.push(("table_name", table.clone()));
            }
            (Method::GET, "/api/predicted_data", query)
        }
        Command::Delete { collection } => (Method::DELETE, "/api/raw_data", collection.query()),
        Command::Health => (Method::GET, "/api/health", Vec::new()),
    }
}

async fn build_request(client: &Client, base_url: &str, command: &Command) -> Result<RequestBuilder> {
    let (method, path, query) = route(command);
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    debug!("{} {}", method, url);

    let mut request = client.request(method, url).query(&query);
    if let Command::Upload { file, .. } = command {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("text/csv")?;
        request = request.multipart(multipart::Form::new().part("file", part));
    }
    Ok(request)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = Client::new();

    let response = build_request(&client, &cli.url, &cli.command)
        .await?
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", cli.url))?;

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("Response body is not JSON")?;

    println!("{}", status);
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
