//! 🚀 dimx-cli: the front door, the bouncer, the maitre d' of dimx.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 Thin wrapper: parse args, set up logging, load config, let the library
//! do the heavy lifting. Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dimx", version, about = "JSON deployment configs in, star-schema CSV tables out")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk the input documents and write every table.
    Normalize {
        /// TOML config file. Without one, DIMX_* env vars and defaults apply.
        #[arg(default_value = "dimx.toml")]
        config: PathBuf,
    },
    /// Print the inventory rows for a project deployed to a namespace, or No_Data.
    Lookup {
        project: String,
        namespace: String,
        #[arg(long, default_value = dimx::lookup::DEFAULT_INVENTORY_CSV)]
        csv: PathBuf,
    },
}

/// 🚀 main(): the "I pressed F5 and held my breath" moment.
#[tokio::main]
async fn main() -> Result<()> {
    // 📡 logs go to stderr so `dimx lookup` output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Normalize { config } => normalize(config).await,
        Command::Lookup {
            project,
            namespace,
            csv,
        } => lookup(csv, project, namespace).await,
    };

    if let Err(err) = result {
        error!("💀 error: {}", err);
        // -- 🧅 peel the onion of sadness, one layer at a time
        for cause in err.chain().skip(1) {
            error!("⚠️  cause: {}", cause);
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn normalize(config: PathBuf) -> Result<()> {
    // 🔒 A missing file is fine, a path we can't even check is not.
    let config_exists = config.try_exists().with_context(|| {
        format!(
            "💀 Couldn't check whether the configuration file exists. If it's a pwd/cwd thing, \
             use an absolute path to be absolutely certain. Was checking here: '{}'",
            config.display()
        )
    })?;
    let config_file = config_exists.then_some(config.as_path());

    let app_config = dimx::app_config::load_config(config_file)
        .context("💀 In dimx-cli we couldn't load the config. Take a look at the file and the DIMX_* env vars")?;
    dimx::run(app_config).await?;
    Ok(())
}

async fn lookup(csv: PathBuf, project: String, namespace: String) -> Result<()> {
    let output = dimx::lookup::lookup_file(&csv, &project, &namespace).await?;
    println!("{}", output);
    Ok(())
}
