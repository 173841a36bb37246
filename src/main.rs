// src/main.rs
// =============================================================================
// Entry point of the repo-porter CLI.
//
// What happens here:
// 1. Load .env, parse command-line arguments, set up logging
// 2. Build the API client from the global flags
// 3. Dispatch to the handler for the chosen subcommand
// 4. Exit with proper code (0 = success, 1 = operation failed or tree is
//    incomplete, 2 = error)
// =============================================================================

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use dotenv::dotenv;
use log::{warn, LevelFilter};
use simple_logger::SimpleLogger;

use cli::{Cli, Commands};
use repo_porter::{
    BuildOptions, ClientConfig, ContentTransfer, DownloadSource, ExclusionPolicy, FailurePolicy,
    GitHubClient, RepoRef, TreeBuilder, TreeEntry, TreeSession, TreeSnapshot,
};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    // Dependencies stay at warn; -v only raises our own output
    let result = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("repo_porter", level)
        .init();
    if let Err(e) = result {
        eprintln!("Warning: could not initialise logging: {}", e);
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = ClientConfig {
        api_base: cli.api_url,
        token: cli.token.filter(|t| !t.trim().is_empty()),
        timeout: Duration::from_secs(cli.timeout.max(1)),
        ..ClientConfig::default()
    };
    if config.token.is_none() {
        warn!("no token configured, requests are anonymous and heavily rate limited");
    }
    let api = Arc::new(GitHubClient::new(config)?);

    match cli.command {
        Commands::Tree {
            repo,
            branch,
            path,
            exclude,
            no_default_excludes,
            lenient,
            concurrency,
            json,
        } => {
            let mut policy = if no_default_excludes {
                ExclusionPolicy::none()
            } else {
                ExclusionPolicy::default()
            };
            for name in exclude {
                policy = policy.with(name);
            }
            let options = BuildOptions {
                exclude: policy,
                failure: if lenient {
                    FailurePolicy::Lenient
                } else {
                    FailurePolicy::Strict
                },
                concurrency,
            };
            let repo = RepoRef::parse(&repo, &branch)?;
            handle_tree(TreeBuilder::new(api, options), repo, &path, json).await
        }
        Commands::Show { repo, path, branch } => {
            let repo = RepoRef::parse(&repo, &branch)?;
            handle_show(ContentTransfer::new(api), &repo, &path).await
        }
        Commands::Download {
            repo,
            path,
            branch,
            dest,
            name,
        } => {
            let repo = RepoRef::parse(&repo, &branch)?;
            handle_download(ContentTransfer::new(api), &repo, &path, &dest, name.as_deref()).await
        }
        Commands::Upload {
            repo,
            file,
            branch,
            target,
            message,
            json,
        } => {
            let repo = RepoRef::parse(&repo, &branch)?;
            handle_upload(
                ContentTransfer::new(api),
                &repo,
                &file,
                target.as_deref(),
                message.as_deref(),
                json,
            )
            .await
        }
    }
}

// Handles the 'tree' subcommand
async fn handle_tree(builder: TreeBuilder<GitHubClient>, repo: RepoRef, path: &str, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Building tree for {}", repo);
    }

    let session = TreeSession::new();
    let snapshot = session
        .load(&builder, repo, path)
        .await?
        .ok_or_else(|| anyhow!("tree build was superseded"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*snapshot)?);
    } else {
        print_tree(&snapshot);
    }

    if snapshot.is_complete() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints the tree with two spaces of indentation per level
fn print_tree(snapshot: &TreeSnapshot) {
    if snapshot.entries.is_empty() {
        println!("   (empty directory)");
    }

    snapshot.visit(|entry: &TreeEntry, depth| {
        let indent = "  ".repeat(depth + 1);
        if entry.is_dir() {
            println!("{}📁 {}/", indent, entry.name);
        } else {
            println!("{}📄 {}", indent, entry.name);
        }
    });

    println!();
    println!("📊 Summary:");
    println!("   📁 Directories: {}", snapshot.dir_count());
    println!("   📄 Files: {}", snapshot.file_count());

    if !snapshot.failures.is_empty() {
        println!("   ⚠️  Skipped subtrees: {}", snapshot.failures.len());
        for failure in &snapshot.failures {
            println!("      {} ({}): {}", failure.path, failure.kind, failure.message);
        }
    }
}

// Handles the 'show' subcommand
async fn handle_show(transfer: ContentTransfer<GitHubClient>, repo: &RepoRef, path: &str) -> Result<i32> {
    let content = transfer.fetch_content(repo, path, None).await;

    if let Some(failure) = &content.failure {
        eprintln!("❌ Could not fetch {}: {}", content.path, failure.message);
        if let Some(link) = content.fallback_link() {
            eprintln!("🔗 Direct link: {}", link);
        }
        return Ok(1);
    }

    match content.text() {
        Some(text) if !content.is_binary() => print!("{}", text),
        _ => println!(
            "📦 {} is a binary file ({} bytes); use `download` to save it",
            content.path,
            content.bytes().len()
        ),
    }
    Ok(0)
}

// Handles the 'download' subcommand
//
// Inline fetch first; when that fails the download link is used instead
async fn handle_download(
    transfer: ContentTransfer<GitHubClient>,
    repo: &RepoRef,
    path: &str,
    dest: &Path,
    name: Option<&str>,
) -> Result<i32> {
    let content = transfer.fetch_content(repo, path, None).await;
    if let Some(failure) = &content.failure {
        match content.fallback_link() {
            Some(link) => println!("⚠️  Inline fetch failed ({}), downloading from {}", failure.kind, link),
            None => {
                eprintln!("❌ Could not fetch {}: {}", content.path, failure.message);
                return Ok(1);
            }
        }
    }

    let written = transfer
        .download(DownloadSource::Content(&content), dest, name)
        .await?;
    println!("💾 Saved {} to {}", content.path, written.display());
    Ok(0)
}

// Handles the 'upload' subcommand
async fn handle_upload(
    transfer: ContentTransfer<GitHubClient>,
    repo: &RepoRef,
    file: &Path,
    target: Option<&str>,
    message: Option<&str>,
    json: bool,
) -> Result<i32> {
    match transfer.upload_file(repo, file, target, message).await {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let verb = if result.created { "Created" } else { "Updated" };
                println!("✅ {} {} on {}", verb, result.path, repo);
                println!("   Commit: {}", result.commit_sha);
                if let Some(url) = &result.commit_url {
                    println!("   {}", url);
                }
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Upload failed ({}): {}", e.kind(), e);
            Ok(1)
        }
    }
}
