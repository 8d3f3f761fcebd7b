use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::branch_major;
use crate::error::{DevkitError, Result};
use crate::host::github::GITHUB_API_URL;
use crate::host::RepoRef;

/// Represents the application settings for devkit.
///
/// Contains the repository host connection settings and the location of the
/// project definitions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default = "default_projects_file")]
    pub projects_file: String,
}

fn default_projects_file() -> String {
    "projects.yaml".to_string()
}

fn default_organization() -> String {
    "sonata-project".to_string()
}

fn default_api_url() -> String {
    GITHUB_API_URL.to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_bot_login() -> String {
    "SonataCI".to_string()
}

/// Connection settings for the GitHub organization hosting the projects.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitHubConfig {
    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Automation account whose pull requests never count towards a release
    #[serde(default = "default_bot_login")]
    pub bot_login: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            organization: default_organization(),
            api_url: default_api_url(),
            token_env: default_token_env(),
            bot_login: default_bot_login(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            github: GitHubConfig::default(),
            projects_file: default_projects_file(),
        }
    }
}

impl Config {
    /// API token from the configured environment variable, if set
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.github.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `devkit.toml` in current directory
/// 3. `devkit.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./devkit.toml").exists() {
        fs::read_to_string("./devkit.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("devkit.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

#[derive(Debug, Deserialize)]
struct RawProject {
    repository: Option<String>,
    package: Option<String>,
    #[serde(default)]
    branches: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
struct RawBranch {
    #[serde(default)]
    php: Vec<String>,
    target_php: Option<String>,
    #[serde(default)]
    variants: BTreeMap<String, Vec<String>>,
    docs_path: Option<String>,
    tests_path: Option<String>,
}

/// A maintained branch of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub major: u64,
    pub php: Vec<String>,
    pub target_php: Option<String>,
    pub variants: BTreeMap<String, Vec<String>>,
    pub docs_path: String,
    pub tests_path: String,
}

/// A project of the organization and its maintained branches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub package: Option<String>,
    pub repository: String,
    /// Newest major first
    pub branches: Vec<Branch>,
}

impl Project {
    pub fn repo_ref(&self, organization: &str) -> RepoRef {
        RepoRef::new(organization, self.repository.clone())
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }
}

impl Branch {
    fn from_raw(name: String, raw: RawBranch) -> Result<Self> {
        let major = branch_major(&name).map_err(|e| DevkitError::config(e.to_string()))?;
        let target_php = raw.target_php.or_else(|| raw.php.last().cloned());

        Ok(Branch {
            name,
            major,
            php: raw.php,
            target_php,
            variants: raw.variants,
            docs_path: raw.docs_path.unwrap_or_else(|| "docs".to_string()),
            tests_path: raw.tests_path.unwrap_or_else(|| "tests".to_string()),
        })
    }
}

impl Project {
    fn from_raw(name: String, raw: RawProject) -> Result<Self> {
        if raw.branches.is_empty() {
            return Err(DevkitError::config(format!(
                "Project '{}' has no branches",
                name
            )));
        }

        let repository = match (&raw.repository, &raw.package) {
            (Some(repository), _) => repository.clone(),
            (None, Some(package)) => package
                .rsplit('/')
                .next()
                .unwrap_or(package.as_str())
                .to_string(),
            (None, None) => name.clone(),
        };

        let mut branches = raw
            .branches
            .into_iter()
            .map(|(key, value)| {
                let branch: RawBranch = serde_yaml::from_value(value)?;
                Branch::from_raw(branch_key(key)?, branch)
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| DevkitError::config(format!("Project '{}': {}", name, e)))?;
        branches.sort_by(|a, b| b.major.cmp(&a.major).then_with(|| b.name.cmp(&a.name)));

        Ok(Project {
            name,
            package: raw.package,
            repository,
            branches,
        })
    }
}

/// Unquoted keys like `4.2` or `3.10` load as numbers and lose their
/// spelling, so only string keys name a branch.
fn branch_key(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(name) => Ok(name),
        serde_yaml::Value::Number(number) => Err(DevkitError::config(format!(
            "Branch name {} is read as a number; quote it in the projects file",
            number
        ))),
        other => Err(DevkitError::config(format!(
            "Branch name must be a string, got {:?}",
            other
        ))),
    }
}

/// Parse project definitions from YAML, keeping the file's project order.
pub fn parse_projects(yaml: &str) -> Result<Vec<Project>> {
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;

    mapping
        .into_iter()
        .map(|(key, value)| {
            let name = key
                .as_str()
                .ok_or_else(|| DevkitError::config("Project names must be strings"))?
                .to_string();
            let raw: RawProject = serde_yaml::from_value(value)?;
            Project::from_raw(name, raw)
        })
        .collect()
}

/// Load project definitions from a YAML file.
pub fn load_projects(path: impl AsRef<Path>) -> Result<Vec<Project>> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| {
        DevkitError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_projects(&yaml)
}
