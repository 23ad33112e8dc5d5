//! Environment file generation.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use suko_db::DatabaseConfig;

use super::{BuildMode, EnvArgs, EnvCommand};
use crate::context::Context;

pub const PRODUCTION_FILE: &str = "environment.json";
pub const DEVELOPMENT_FILE: &str = "environment.development.json";
pub const EXAMPLE_FILE: &str = "environment.example.json";

/// Run the env command.
pub async fn run(args: EnvArgs, ctx: &Context) -> Result<()> {
    match args.command {
        EnvCommand::Generate { mode, out_dir } => generate(mode, &out_dir, ctx),
        EnvCommand::Check => check(ctx),
    }
}

fn check(ctx: &Context) -> Result<()> {
    let config = DatabaseConfig::from_env().context("Environment check failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": true,
            "databaseURL": config.database_url,
        }));
        return Ok(());
    }

    ctx.output.success("Environment is valid");
    ctx.output.kv("project", &config.project_id);
    ctx.output.kv("database", &config.database_url);
    Ok(())
}

fn generate(mode: BuildMode, out_dir: &Path, ctx: &Context) -> Result<()> {
    let config = DatabaseConfig::from_env().context("Cannot generate environment files")?;
    let out_dir = ctx.resolve_path(out_dir);
    tracing::info!(?mode, dir = %out_dir.display(), "generating environment files");

    let written = write_environment(&config, &out_dir)?;

    if ctx.output.is_json() {
        let files: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        ctx.output.json(&serde_json::json!({ "files": files }));
        return Ok(());
    }

    ctx.output.header("Environment files");
    for path in &written {
        ctx.output.list_item(&path.display().to_string());
    }
    ctx.output.success(&format!("Generated environment files for {:?} build", mode));
    Ok(())
}

/// Write the production and development documents into `out_dir`, plus an
/// example document unless one already exists. Returns the written paths.
pub fn write_environment(config: &DatabaseConfig, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(3);
    for (name, production) in [(PRODUCTION_FILE, true), (DEVELOPMENT_FILE, false)] {
        let path = out_dir.join(name);
        write_document(&path, &config.environment_document(production))?;
        written.push(path);
    }

    // An existing example may hold hand-edited placeholders
    let example = out_dir.join(EXAMPLE_FILE);
    if !example.exists() {
        write_document(&example, &config.environment_document(false))?;
        written.push(example);
    }

    Ok(written)
}

fn write_document(path: &Path, document: &serde_json::Value) -> Result<()> {
    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
