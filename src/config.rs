use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_VERSION: &str = "1";
pub const DEFAULT_PAGE_SIZE: u32 = 25;

lazy_static! {
    static ref ENV_REFERENCE: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid env regex");
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct JsonApiConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub params: ParamNames,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Value reported as `meta.api.version`
    #[serde(default = "default_api_version")]
    pub version: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PageConfig {
    /// Page size used when the request omits one or sends a size below 1
    #[serde(default = "default_page_size")]
    pub default_size: u32,
}

/// Query parameter names of the decoded families.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParamNames {
    #[serde(default = "default_filter_name")]
    pub filter: String,
    #[serde(default = "default_fields_name")]
    pub fields: String,
    #[serde(default = "default_page_name")]
    pub page: String,
    #[serde(default = "default_sort_name")]
    pub sort: String,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_filter_name() -> String {
    "filter".to_string()
}

fn default_fields_name() -> String {
    "fields".to_string()
}

fn default_page_name() -> String {
    "page".to_string()
}

fn default_sort_name() -> String {
    "sort".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: default_api_version(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            default_size: default_page_size(),
        }
    }
}

impl Default for ParamNames {
    fn default() -> Self {
        Self {
            filter: default_filter_name(),
            fields: default_fields_name(),
            page: default_page_name(),
            sort: default_sort_name(),
        }
    }
}

impl JsonApiConfig {
    /// Load configuration from YAML file
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(AppError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text, expanding environment references first
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let expanded = Self::expand_env_vars(content)?;

        // An empty document means "all defaults"
        let config: JsonApiConfig = if expanded.trim().is_empty() {
            JsonApiConfig::default()
        } else {
            serde_yaml::from_str(&expanded).map_err(|e| {
                AppError::Configuration(format!("Failed to parse config: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        JsonApiConfig::default()
    }

    fn validate(&self) -> AppResult<()> {
        if self.page.default_size < 1 {
            return Err(AppError::Configuration(
                "page.default_size must be at least 1".to_string(),
            ));
        }

        let names = [
            ("params.filter", &self.params.filter),
            ("params.fields", &self.params.fields),
            ("params.page", &self.params.page),
            ("params.sort", &self.params.sort),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(AppError::Configuration(format!("{} must not be empty", key)));
            }
        }

        Ok(())
    }

    /// Expand environment variables in format ${VAR_NAME} or ${VAR_NAME:-default}
    fn expand_env_vars(content: &str) -> AppResult<String> {
        let mut expanded = String::with_capacity(content.len());
        let mut last = 0;

        for caps in ENV_REFERENCE.captures_iter(content) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let var_name = &caps[1];

            let value = match std::env::var(var_name) {
                Ok(val) => val,
                Err(_) => match caps.get(2) {
                    Some(default) => default.as_str().to_string(),
                    None => {
                        return Err(AppError::Configuration(format!(
                            "Environment variable {} not found and no default provided",
                            var_name
                        )))
                    }
                },
            };

            expanded.push_str(&content[last..whole.start()]);
            expanded.push_str(&value);
            last = whole.end();
        }
        expanded.push_str(&content[last..]);

        Ok(expanded)
    }
}
