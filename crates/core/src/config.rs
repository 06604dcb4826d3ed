use crate::access::{DefaultPosture, NoMatchPolicy};
use crate::assignment::AssignmentSettings;
use crate::models::Operation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub assignment: AssignmentSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/section-access.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub no_match: NoMatchPolicy,
    #[serde(default = "default_operations")]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub bundles: Vec<String>,
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,
    #[serde(default)]
    pub default_posture: DefaultPosture,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            no_match: NoMatchPolicy::default(),
            operations: default_operations(),
            bundles: Vec::new(),
            checks: default_checks(),
            default_posture: DefaultPosture::default(),
        }
    }
}

fn default_operations() -> Vec<Operation> {
    vec![Operation::Update]
}

fn default_checks() -> Vec<String> {
    vec!["path_section".to_string(), "node_permission".to_string()]
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
