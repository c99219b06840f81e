//! CourseVault CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use coursevault::{CourseService, LogFormat, Overrides, init_logging, load_config, serve};
use coursevault_core::{ConfigProfile, to_json_string};
use std::path::PathBuf;
use std::sync::Arc;

/// CourseVault - Markdown courses as web pages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory whose subdirectories are courses
    #[arg(short, long, env = "COURSEVAULT_COURSES", global = true)]
    courses: Option<PathBuf>,

    /// Configuration file (toml, yaml or json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Configuration profile (development, production, authoring)
    #[arg(short, long, default_value = "development", global = true)]
    profile: String,

    /// Log format (text, json)
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    /// Rebuild the course index on every request
    #[arg(long, action = clap::ArgAction::SetTrue, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve courses over HTTP (default)
    Serve {
        /// Address to bind, e.g. 127.0.0.1:3000
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Print the course index as JSON and exit
    Index,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let profile: ConfigProfile = args.profile.parse()?;
    let log_format: LogFormat = args.log_format.parse()?;

    let bind = match &args.command {
        Some(Command::Serve { bind }) => bind.clone(),
        _ => None,
    };
    let overrides = Overrides {
        courses_root: args.courses.clone(),
        bind,
        enable_caching: args.no_cache.then_some(false),
    };
    let config = load_config(profile, args.config.as_deref(), &overrides)?;

    init_logging(&config.log_level, log_format)?;
    log::info!("CourseVault v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Profile: {} | Courses: {} | Caching: {}",
        profile.name(),
        config.courses_root.display(),
        config.enable_caching
    );

    let service = Arc::new(CourseService::new(Arc::new(config)));

    match args.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { .. } => serve(service).await,
        Command::Index => {
            let courses = tokio::task::spawn_blocking({
                let service = Arc::clone(&service);
                move || service.courses_structure()
            })
            .await??;
            log::info!(
                "Indexed {} courses ({} documents)",
                courses.len(),
                courses.iter().map(|c| c.document_count()).sum::<usize>()
            );
            println!("{}", to_json_string(&courses, "course index")?);
            Ok(())
        }
    }
}
