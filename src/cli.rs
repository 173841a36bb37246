// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Global flags configure the API client (token, base URL, timeout, logging);
// each subcommand maps onto one engine operation:
//   tree     -> TreeBuilder::build_tree
//   show     -> ContentTransfer::fetch_content
//   download -> ContentTransfer::fetch_content + download
//   upload   -> ContentTransfer::upload_file
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use repo_porter::github::DEFAULT_API_BASE;
use repo_porter::tree::DEFAULT_CONCURRENCY;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "repo-porter",
    version,
    about = "Browse, fetch and upload files of a GitHub repository",
    long_about = "repo-porter walks a repository through the GitHub contents API. \
                  It prints the file tree, shows or downloads single files, and uploads \
                  local files as new commits."
)]
pub struct Cli {
    /// API token, sent as a bearer token
    ///
    /// Read from GITHUB_TOKEN (also via a .env file) when not given
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Base URL of the API (change it for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE, global = true)]
    pub api_url: Url,

    /// Timeout for each request, in seconds
    #[arg(long, env = "REPO_PORTER_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// More log output: -v for info, -vv for debug
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the file tree of a repository
    ///
    /// Example: repo-porter tree rust-lang/rust --branch master --path library
    Tree {
        /// Repository as owner/repo or a GitHub URL
        repo: String,

        #[arg(long, default_value = "main")]
        branch: String,

        /// Directory to start from (default: repository root)
        #[arg(long, default_value = "")]
        path: String,

        /// Entry name to skip, may be repeated (node_modules is always skipped
        /// unless --no-default-excludes is set)
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Do not skip node_modules
        #[arg(long)]
        no_default_excludes: bool,

        /// Keep going when a subdirectory cannot be listed
        #[arg(long)]
        lenient: bool,

        /// Maximum directory listings in flight
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Output the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the contents of one file
    Show {
        repo: String,

        /// Path of the file inside the repository
        path: String,

        #[arg(long, default_value = "main")]
        branch: String,
    },

    /// Save one file to a local directory
    Download {
        repo: String,

        path: String,

        #[arg(long, default_value = "main")]
        branch: String,

        /// Directory to save into
        #[arg(long, default_value = ".")]
        dest: PathBuf,

        /// Local file name (default: last segment of the path)
        #[arg(long)]
        name: Option<String>,
    },

    /// Commit a local file to the repository
    ///
    /// Example: repo-porter upload octocat/hello ./logo.png --target assets/logo.png
    Upload {
        repo: String,

        /// Local file to upload
        file: PathBuf,

        #[arg(long, default_value = "main")]
        branch: String,

        /// Path in the repository (default: the local file name)
        #[arg(long)]
        target: Option<String>,

        /// Commit message (default: "Upload <target>")
        #[arg(short, long)]
        message: Option<String>,

        /// Output the commit confirmation as JSON
        #[arg(long)]
        json: bool,
    },
}
