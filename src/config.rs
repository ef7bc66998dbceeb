use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Remote backend settings. With no `url`, the catalog runs purely
/// locally and all remote fetch/push paths are skipped.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Category marking onboarding content. Hidden from the
    /// student-facing category list.
    #[serde(default = "default_sentinel")]
    pub sentinel_category: String,
    /// Registry seed used when no remote backend is configured and the
    /// store is empty.
    #[serde(default = "default_demo_categories")]
    pub demo_categories: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            sentinel_category: default_sentinel(),
            demo_categories: default_demo_categories(),
        }
    }
}

fn default_category() -> String {
    "General".to_string()
}
fn default_sentinel() -> String {
    "Welcome".to_string()
}
fn default_demo_categories() -> Vec<String> {
    ["General", "Tutorial", "Curated", "Induction"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialsConfig {
    #[serde(default = "default_student_account")]
    pub student: AccountConfig,
    #[serde(default = "default_admin_account")]
    pub admin: AccountConfig,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            student: default_student_account(),
            admin: default_admin_account(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    pub user: String,
    pub pass: String,
}

fn default_student_account() -> AccountConfig {
    AccountConfig {
        user: "student".to_string(),
        pass: "student".to_string(),
    }
}

fn default_admin_account() -> AccountConfig {
    AccountConfig {
        user: "admin".to_string(),
        pass: "admin".to_string(),
    }
}

impl Config {
    /// Minimal in-memory config for tooling paths that run without a
    /// config file on disk.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/catalog.sqlite"),
            },
            remote: RemoteConfig::default(),
            catalog: CatalogConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate catalog
    if config.catalog.default_category.trim().is_empty() {
        anyhow::bail!("catalog.default_category must not be empty");
    }
    if config.catalog.sentinel_category.trim().is_empty() {
        anyhow::bail!("catalog.sentinel_category must not be empty");
    }

    // Validate remote
    if let Some(url) = &config.remote.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("remote.url must be an http(s) URL, got '{}'", url);
        }
    }

    // Validate credentials
    for (role, account) in [
        ("student", &config.credentials.student),
        ("admin", &config.credentials.admin),
    ] {
        if account.user.is_empty() || account.pass.is_empty() {
            anyhow::bail!("credentials.{} must have a non-empty user and pass", role);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[db]\npath = \"./data/catalog.sqlite\"\n").unwrap();
        let cfg = load_config(tmp.path()).unwrap();
        assert_eq!(cfg.catalog.default_category, "General");
        assert_eq!(cfg.catalog.sentinel_category, "Welcome");
        assert!(cfg.remote.url.is_none());
        assert_eq!(cfg.credentials.admin.user, "admin");
    }

    #[test]
    fn test_rejects_non_http_remote() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[db]\npath = \"./c.sqlite\"\n[remote]\nurl = \"ftp://example.com\"\n",
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }
}
