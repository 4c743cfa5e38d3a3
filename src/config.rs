//! Optional `aspx2blazor.json` settings.

use crate::mapping;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "aspx2blazor.json";
pub const MARKUP_EXTENSION: &str = "aspx";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Inject {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct Config {
    /// The code-behind of `<base>.aspx` is `<base>.<code-behind-extension>`.
    pub code_behind_extension: String,
    pub output_extension: String,
    /// Name the output after the capitalized base name, like the route.
    pub capitalize_file_name: bool,
    pub usings: Vec<String>,
    pub injects: Vec<Inject>,
    pub wrapper_tags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            code_behind_extension: String::from("aspx.cs"),
            output_extension: String::from("razor"),
            capitalize_file_name: false,
            usings: vec![String::from("Microsoft.JSInterop")],
            injects: vec![Inject {
                type_name: String::from("IJSRuntime"),
                name: String::from("JS"),
            }],
            wrapper_tags: mapping::DEFAULT_WRAPPER_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Config {
    pub fn new(path: &Path) -> Result<Config> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("Could not parse {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Config> {
        let mut config: Config = serde_json::from_str(contents)?;
        config.code_behind_extension = normalize_extension(&config.code_behind_extension)?;
        config.output_extension = normalize_extension(&config.output_extension)?;
        Ok(config)
    }

    /// Reads the explicitly requested file, or `aspx2blazor.json` in `folder`
    /// when it exists, or falls back to the defaults.
    pub fn load(explicit: Option<&Path>, folder: &Path) -> Result<Config> {
        match explicit {
            Some(path) => Self::new(path),
            None => {
                let default_path: PathBuf = folder.join(CONFIG_FILE);
                if default_path.exists() {
                    log::debug!("Using config {}", default_path.display());
                    Self::new(&default_path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }
}

fn normalize_extension(extension: &str) -> Result<String> {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return Err(anyhow!("File extensions in the config must not be empty"));
    }
    Ok(trimmed.to_string())
}
