use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use infrastructure::deploy::SiteDeployer;
use infrastructure::environment::DeployTarget;
use infrastructure::unitok::{unitok_stack, Assets};
use tracing_subscriber::EnvFilter;

/// UniTok infrastructure
#[derive(Parser, Debug)]
#[command(name = "infrastructure")]
#[command(about = "Synthesize the UniTok stack or deploy its site")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the synthesized template
    Synth {
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        /// Workspace root the asset paths are resolved against
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Upload the site and render `config.json` for the API endpoint
    DeploySite {
        #[arg(long, env = "UNITOK_SITE_BUCKET")]
        bucket: String,

        #[arg(long, env = "UNITOK_API_ENDPOINT")]
        api_endpoint: String,

        #[arg(long, default_value = "frontend/site")]
        source: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let target = DeployTarget::from_env();

    match args.command {
        Command::Synth { out, root } => {
            let (stack, _) = unitok_stack(target, &Assets::from_root(&root))?;
            let template = stack.synth()?.to_json_pretty()?;

            match out {
                Some(path) => {
                    std::fs::write(&path, template)?;
                    tracing::info!("Wrote template to {}", path.display());
                }
                None => println!("{template}"),
            }
        }
        Command::DeploySite {
            bucket,
            api_endpoint,
            source,
        } => {
            let s3_client = Arc::new(aws_sdk_s3::Client::from_conf(
                target.s3_client_config().await,
            ));
            let keys = SiteDeployer::new(s3_client, bucket)
                .deploy(&source, &api_endpoint)
                .await?;
            tracing::info!("Deployed {} objects", keys.len());
        }
    }

    Ok(())
}
