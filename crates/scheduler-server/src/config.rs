use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Server configuration.
///
/// Sources, lowest priority first: built-in defaults, the TOML file,
/// `TODO_`-prefixed environment variables, and `JWT_SECRET`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// TCP port to listen on
    pub port: u16,
    /// SQLite database file
    #[serde(alias = "dbfile")]
    pub db_file: String,
    /// Shared password; authentication is disabled when unset or empty
    #[serde(deserialize_with = "optional_scalar_string")]
    pub password: Option<String>,
    /// HMAC secret for signing tokens
    #[serde(deserialize_with = "scalar_string")]
    pub jwt_secret: String,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Directory with the static frontend, served for unmatched paths
    pub web_dir: Option<PathBuf>,
    /// Page size for task listings when the request gives no limit
    pub list_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 7540,
            db_file: "scheduler.db".to_string(),
            password: None,
            jwt_secret: String::new(),
            log_level: "info".to_string(),
            web_dir: None,
            list_limit: 50,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("TODO_"))
            .merge(Env::raw().only(&["JWT_SECRET"]))
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

// Environment values such as `TODO_PASSWORD=1234` arrive as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Signed(n) => n.to_string(),
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn optional_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}
