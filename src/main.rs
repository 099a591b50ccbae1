//! ghup CLI - GitHub release asset upload tools
//!
//! Uploads binary assets as multipart/form-data bodies, directly to a
//! release or through a pre-signed storage form, and relabels assets.

use ghup_cli::auth::Credentials;
use ghup_cli::cli::{Cli, Commands};
use ghup_cli::client::ApiClient;
use ghup_cli::error::CliError;
use ghup_cli::{label, upload};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

/// Main application entry point
async fn run() -> i32 {
    let cli = Cli::parse_args();

    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Error: {err:#}");
            err.downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code)
        }
    }
}

/// Execute the requested command
async fn execute(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        println!("ghup CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Verbose output enabled");
    }

    match cli.command {
        Commands::Upload {
            owner,
            repository,
            password,
            description,
            mime,
            file,
        } => {
            let credentials = Credentials::resolve(&owner, password.as_deref())?;
            let client = ApiClient::new(&credentials);
            upload::upload(
                &client,
                &cli.api_url,
                &owner,
                &repository,
                &file,
                description.as_deref(),
                mime.as_deref(),
            )
            .await
        }
        Commands::Push {
            owner,
            repository,
            password,
            tag,
            create,
            mime,
            file,
        } => {
            let credentials = Credentials::resolve(&owner, password.as_deref())?;
            let client = ApiClient::new(&credentials);
            upload::push(
                &client,
                &cli.api_url,
                &owner,
                &repository,
                &tag,
                create,
                &file,
                mime.as_deref(),
            )
            .await
        }
        Commands::Label {
            owner,
            repository,
            password,
            tag,
            asset_id,
            filename,
            label,
        } => {
            let credentials = Credentials::resolve(&owner, password.as_deref())?;
            let client = ApiClient::new(&credentials);
            label::label(
                &client,
                &cli.api_url,
                &owner,
                &repository,
                &tag,
                asset_id,
                &filename,
                &label,
            )
            .await
        }
        Commands::Version => {
            println!("ghup CLI v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
