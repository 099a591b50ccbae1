//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ghup - upload and label GitHub release assets from the command line
#[derive(Parser, Debug)]
#[command(name = "ghup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload binary assets to GitHub releases and pre-signed storage forms")]
#[command(long_about = concat!(
    "ghup (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Command-line utilities for GitHub release assets: direct multipart uploads,\n",
    "pre-signed storage form uploads, and asset relabeling.\n\n",
    "Authentication uses --password, the GHUP_TOKEN environment variable, or an\n",
    "access-token file in the user config directory."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// GitHub API base URL
    #[arg(long, global = true, default_value = "https://api.github.com")]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file through a pre-signed storage form
    ///
    /// Prepares the upload against the API, then POSTs the file as a
    /// multipart form to the storage URL the API hands back. An interrupted
    /// run leaves a <file>.upload.tmp resume cache next to the file.
    ///
    /// Example:
    ///   ghup upload -u octocat -r hello dist/hello-1.0.tar.gz
    #[command(display_order = 1)]
    Upload {
        /// GitHub user name
        #[arg(short = 'u', long, required = true)]
        owner: String,

        /// Name of the repository
        #[arg(short = 'r', long, required = true)]
        repository: String,

        /// GitHub password (otherwise token auth is used)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Description for the file
        #[arg(short = 'd', long)]
        description: Option<String>,

        /// MIME type of the file
        #[arg(short = 't', long = "type")]
        mime: Option<String>,

        /// File to upload
        file: PathBuf,
    },

    /// Upload a file directly as a release asset
    ///
    /// Finds the release by tag and POSTs the file as a multipart form to
    /// its asset upload endpoint.
    ///
    /// Examples:
    ///   ghup push -u octocat -r hello --tag v1.0 dist/hello-1.0.tar.gz
    ///   ghup push -u octocat -r hello --tag v1.1 --create dist/hello-1.1.tar.gz
    #[command(visible_alias = "asset")]
    #[command(display_order = 2)]
    Push {
        /// GitHub user name
        #[arg(short = 'u', long, required = true)]
        owner: String,

        /// Name of the repository
        #[arg(short = 'r', long, required = true)]
        repository: String,

        /// GitHub password (otherwise token auth is used)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Tag name of the release
        #[arg(long, required = true)]
        tag: String,

        /// Create the release if the tag has none yet
        #[arg(long)]
        create: bool,

        /// MIME type of the file
        #[arg(long = "type")]
        mime: Option<String>,

        /// File to upload
        file: PathBuf,
    },

    /// Set the display label of an existing release asset
    ///
    /// Examples:
    ///   ghup label -u octocat -r hello --tag v1.0 hello-1.0.tar.gz "Source tarball"
    ///   ghup label -u octocat -r hello --tag v1.0 -i 12345 hello.tar.gz "Renamed"
    #[command(display_order = 3)]
    Label {
        /// GitHub user name
        #[arg(short = 'u', long, required = true)]
        owner: String,

        /// Name of the repository
        #[arg(short = 'r', long, required = true)]
        repository: String,

        /// GitHub password (otherwise token auth is used)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Tag name of the release
        #[arg(short = 't', long, required = true)]
        tag: String,

        /// Select the asset by id instead of by file name
        #[arg(short = 'i', long)]
        asset_id: Option<u64>,

        /// Asset file name (kept as the asset name after relabeling)
        filename: String,

        /// New display label
        label: String,
    },

    /// Check CLI version
    ///
    /// Examples:
    ///   ghup version
    #[command(display_order = 4)]
    Version,
}

impl Cli {
    /// Parse command-line arguments
    ///
    /// # Returns
    ///
    /// Parsed CLI arguments
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn push_parses_tag_and_create() {
        let cli = Cli::try_parse_from([
            "ghup", "push", "-u", "octocat", "-r", "hello", "--tag", "v1.0", "--create",
            "dist/a.bin",
        ]);
        match cli {
            Ok(Cli {
                command:
                    Commands::Push {
                        owner,
                        tag,
                        create,
                        file,
                        ..
                    },
                ..
            }) => {
                assert_eq!(owner, "octocat");
                assert_eq!(tag, "v1.0");
                assert!(create);
                assert_eq!(file, PathBuf::from("dist/a.bin"));
            }
            other => assert!(other.is_ok(), "parse failed: {other:?}"),
        }
    }

    #[test]
    fn label_requires_filename_and_label() {
        let missing = Cli::try_parse_from([
            "ghup", "label", "-u", "octocat", "-r", "hello", "--tag", "v1.0", "a.bin",
        ]);
        assert!(missing.is_err());
    }
}
