use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use sessionshare::config::{DEFAULT_BASE_PATH, DEFAULT_BRANCH, config_path};
use sessionshare::{
    Config, Publisher, ShareOptions, ShareOutcome, SystemRunner, logging, render_file,
    resolve_transcript, setup, share,
};

#[derive(Parser)]
#[command(
    name = "sessionshare",
    version,
    about = "Share Claude Code sessions as markdown in a GitHub repository"
)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the current session and push it to the configured repository
    #[command(name = "share")]
    Share {
        /// Free-text description, used for the filename and commit message
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
        /// Transcript to share instead of the most recent session
        #[arg(long)]
        transcript: Option<PathBuf>,
        /// Show where the session would be published without cloning or pushing
        #[arg(long)]
        dry_run: bool,
    },

    /// Render a session to markdown without publishing
    #[command(name = "render")]
    Render {
        #[arg(long)]
        transcript: Option<PathBuf>,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Configure the target repository and install the /share command
    #[command(name = "setup")]
    Setup,

    /// View or modify config (~/.sessionshare/config.toml)
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the stored config
    Show,
    /// Set a config value
    Set {
        /// Key to set (repo, username, branch, base_path)
        key: String,
        /// Value to set; empty clears the key
        value: String,
    },
    /// Reset config to defaults
    Reset,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Share {
            description,
            transcript,
            dry_run,
        } => {
            let description = Some(description.join(" ")).filter(|d| !d.trim().is_empty());
            let runner = SystemRunner;
            let config = Config::load()?.resolve_from_env(&runner);
            let publisher = Publisher::new(&runner);
            let outcome = share(
                ShareOptions {
                    description,
                    transcript,
                    dry_run,
                },
                &config,
                &publisher,
            )?;
            if let ShareOutcome::DryRun {
                target,
                document_bytes,
                ..
            } = outcome
            {
                println!("Dry run: nothing was cloned or pushed.");
                println!("Would write {document_bytes} bytes to {}", target.file_path());
                println!("Commit message: {}", target.commit_message());
                println!("URL: {}", target.url());
            }
        }
        Commands::Render { transcript, out } => {
            let path = resolve_transcript(transcript)?;
            let document = render_file(&path)?;
            match out {
                Some(out) => {
                    fs::write(&out, &document)?;
                    eprintln!("wrote {}", out.display());
                }
                None => println!("{document}"),
            }
        }
        Commands::Setup => {
            setup::run()?;
        }
        Commands::Config { action } => {
            handle_config(action)?;
        }
    }
    Ok(())
}

fn handle_config(action: Option<ConfigAction>) -> Result<()> {
    match action {
        None | Some(ConfigAction::Show) => {
            let config = Config::load()?;
            let show = |value: &Option<String>, fallback: &str| {
                value.clone().unwrap_or_else(|| fallback.to_string())
            };
            println!("repo = \"{}\"", show(&config.repo, ""));
            println!("username = \"{}\"", show(&config.username, ""));
            println!("branch = \"{}\"", show(&config.branch, DEFAULT_BRANCH));
            println!("base_path = \"{}\"", show(&config.base_path, DEFAULT_BASE_PATH));
        }
        Some(ConfigAction::Set { key, value }) => {
            let path = config_path()?;
            Config::update_file(&path, &key, &value)?;
            println!("saved to {}", path.display());
        }
        Some(ConfigAction::Reset) => {
            let config = Config::default();
            let path = config.save()?;
            println!("reset to defaults at {}", path.display());
        }
    }
    Ok(())
}
