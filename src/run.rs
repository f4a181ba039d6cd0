use crate::board;
use crate::cli::parser::{self, BoardArgs, Command};
use crate::config::{self, ConfigKey, Settings};
use crate::github::client::GithubClient;
use crate::github::memory::MemorySource;
use crate::output;
use crate::render;
use anyhow::Context;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Run the command described by `args`.
///
/// Everything printed to stdout is also written to `stdout_additional` when given.
/// `project_dir` is where `.kanban/config.json` is looked up, the current
/// directory by default.
pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
    project_dir: Option<&Path>,
) -> anyhow::Result<()> {
    match parser::parse_args(&args) {
        Command::Board(board_args) => {
            let settings =
                resolve_settings(&board_args, project_dir, |name| std::env::var(name).ok())?;
            let board = build_board(&board_args, &settings).await?;

            let rendered = if board_args.json {
                render::render_json(&board).context("Failed to serialize board")?
            } else {
                render::render_text(&board)
            };
            output::println(rendered.trim_end(), &mut stdout_additional)?;
        }
        Command::Help => {
            output::println(parser::USAGE, &mut stdout_additional)?;
        }
        Command::Unknown(message) => {
            return Err(anyhow::anyhow!(
                "{message}. Use --help for usage."
            ));
        }
    }
    Ok(())
}

/// Configuration values given on the command line.
fn cli_config(args: &BoardArgs) -> HashMap<ConfigKey, Value> {
    let mut config = HashMap::new();
    if !args.repositories.is_empty() {
        config.insert(ConfigKey::Repositories, serde_json::json!(args.repositories));
    }
    if !args.pause_labels.is_empty() {
        config.insert(ConfigKey::PausingLabels, serde_json::json!(args.pause_labels));
    }
    if let Some(account) = &args.account {
        config.insert(ConfigKey::Account, Value::String(account.clone()));
    }
    if let Some(token) = &args.token {
        config.insert(ConfigKey::Token, Value::String(token.clone()));
    }
    if args.ignore_label_case {
        config.insert(ConfigKey::IgnoreLabelCase, Value::Bool(true));
    }
    config
}

/// Merge the project file, the environment and the command line, in increasing precedence.
///
/// Environment variables are read through `lookup`.
fn resolve_settings<F>(
    args: &BoardArgs,
    project_dir: Option<&Path>,
    lookup: F,
) -> anyhow::Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let project_dir = match project_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let file_config = config::load_project_config(&project_dir)?;
    let env_config = config::env_config(lookup);
    let merged = config::update_config(
        &config::update_config(&file_config, &env_config),
        &cli_config(args),
    );
    Settings::from_config(&merged)
}

async fn build_board(
    args: &BoardArgs,
    settings: &Settings,
) -> anyhow::Result<Vec<board::RepositoryExport>> {
    if let Some(path) = &args.fixture {
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read fixture {path}"))?;
        let source = MemorySource::from_json(&content)
            .with_context(|| format!("Invalid fixture {path}"))?;
        return Ok(board::build(&settings.repositories, &source, &settings.pause_labels).await);
    }

    let token = settings.token.as_deref().ok_or_else(|| {
        anyhow::anyhow!("No token found. Use --token or set GH_TOKEN.")
    })?;
    let client = GithubClient::new(token, settings.account.as_deref(), &settings.api_url)
        .context("Failed to create HTTP client")?;
    Ok(board::build(&settings.repositories, &client, &settings.pause_labels).await)
}
