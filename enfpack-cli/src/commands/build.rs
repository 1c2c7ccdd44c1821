//! The `build` subcommand: run multiple pack jobs from a YAML config.
//!
//! The config is either a document with a `projects:` list or a bare list
//! of project entries; each entry deserializes into [`PackArgs`] with the
//! CLI defaults filled in. Relative paths resolve against the config file's
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;

use crate::commands::pack::{self, PackArgs};
use crate::error::CliError;

const DEFAULT_CONFIG_NAME: &str = ".enfpack.yaml";

/// Run multiple pack jobs from a config file.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Path to the config file or its directory (default: ./.enfpack.yaml)
    #[arg(value_name = "path")]
    pub path: Option<String>,

    /// Build only the selected project names (repeatable)
    #[arg(short = 'p', long = "project")]
    pub project: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuildDoc {
    #[serde(default)]
    projects: Vec<PackArgs>,
}

/// Run the build command.
pub fn run(args: &BuildArgs) -> Result<(), CliError> {
    let config_path = resolve_config_path(args.path.as_deref())?;

    let data = fs::read_to_string(&config_path).map_err(|e| CliError::file(&config_path, e))?;
    let mut projects = parse_projects(&data)?;
    if projects.is_empty() {
        return Err(CliError::Build(format!(
            "no projects found in {}",
            config_path.display()
        )));
    }

    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    for project in projects.iter_mut() {
        normalize_project_paths(project, &base_dir);
    }

    let selected = filter_projects(projects, &args.project)?;
    if selected.is_empty() {
        return Err(CliError::Build("no projects selected".to_string()));
    }

    for project in &selected {
        pack::run(project)?;
    }

    Ok(())
}

fn resolve_config_path(arg: Option<&str>) -> Result<PathBuf, CliError> {
    let arg = arg.map(str::trim).filter(|s| !s.is_empty());

    let Some(arg) = arg else {
        let path = PathBuf::from(DEFAULT_CONFIG_NAME);
        if !path.exists() {
            return Err(CliError::Build(format!(
                "config not found: {}",
                path.display()
            )));
        }
        return Ok(path);
    };

    let path = PathBuf::from(arg);
    if path.is_dir() {
        let nested = path.join(DEFAULT_CONFIG_NAME);
        if !nested.exists() {
            return Err(CliError::Build(format!(
                "config not found: {}",
                nested.display()
            )));
        }
        return Ok(nested);
    }
    if !path.exists() {
        return Err(CliError::Build(format!("config not found: {}", path.display())));
    }

    Ok(path)
}

fn parse_projects(data: &str) -> Result<Vec<PackArgs>, CliError> {
    // Preferred shape: a document with a `projects:` list.
    if let Ok(doc) = serde_yaml::from_str::<BuildDoc>(data) {
        if !doc.projects.is_empty() {
            return Ok(doc.projects);
        }
    }

    // Fallback: a bare list of project entries.
    serde_yaml::from_str::<Vec<PackArgs>>(data)
        .map_err(|e| CliError::Build(format!("parse config: {e}")))
}

fn filter_projects(projects: Vec<PackArgs>, only: &[String]) -> Result<Vec<PackArgs>, CliError> {
    if only.is_empty() {
        return Ok(projects);
    }

    let only: Vec<&str> = only
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if only.is_empty() {
        return Err(CliError::Build("no valid --project values".to_string()));
    }

    let mut out = Vec::new();
    for project in projects {
        let effective = resolve_project_name(&project)?;
        if only.contains(&effective.as_str()) {
            out.push(project);
        }
    }

    Ok(out)
}

fn resolve_project_name(project: &PackArgs) -> Result<String, CliError> {
    if let Some(name) = project.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(name.to_string());
    }

    if project.input.trim().is_empty() {
        return Err(CliError::Build(
            "project input is required when name is empty".to_string(),
        ));
    }

    Ok(Path::new(&project.input)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

fn normalize_project_paths(project: &mut PackArgs, base_dir: &Path) {
    project.input = resolve_relative(base_dir, &project.input);
    if let Some(output) = &project.output {
        project.output = Some(resolve_relative(base_dir, output));
    }
}

fn resolve_relative(base_dir: &Path, path: &str) -> String {
    if path.trim().is_empty() {
        return path.to_string();
    }
    let p = Path::new(path);
    if p.is_absolute() {
        return path.to_string();
    }
    base_dir.join(p).display().to_string()
}
