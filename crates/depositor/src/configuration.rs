//! Runtime configuration.
//!
//! Configuration lives in a small TOML file:
//!
//! ```toml
//! server = "sandbox"
//! resume_dir = "/var/tmp/depositor"
//! token = "..."
//! ```
//!
//! Every key is optional. The API token is normally supplied through the
//! `ZENODO_TOKEN` environment variable, which always wins over the file.

use super::*;

/// Environment variable holding the Zenodo API token.
pub const TOKEN_ENV_VAR: &str = "ZENODO_TOKEN";

/// Zenodo instance to deposit into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Server {
  /// zenodo.org
  #[default]
  Production,
  /// sandbox.zenodo.org, for trial runs with a separate token
  Sandbox,
}

impl Server {
  /// Deposit collection URL of this instance.
  pub fn base_url(self) -> &'static str {
    match self {
      Self::Production => "https://zenodo.org/api/deposit/depositions",
      Self::Sandbox => "https://sandbox.zenodo.org/api/deposit/depositions",
    }
  }
}

/// Depositor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Zenodo instance
  pub server:     Server,
  /// Directory resume files are written to
  pub resume_dir: PathBuf,
  /// API token, used when `ZENODO_TOKEN` is unset
  #[serde(skip_serializing_if = "Option::is_none")]
  pub token:      Option<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self { server: Server::default(), resume_dir: std::env::temp_dir(), token: None }
  }
}

impl Config {
  /// Returns the default path of the configuration file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.config/depositor/config.toml`
  /// - On macOS: `~/Library/Application Support/depositor/config.toml`
  /// - On Windows: `%APPDATA%\depositor\config.toml`
  /// - Fallback: `./depositor/config.toml` in the current directory
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("depositor").join("config.toml")
  }

  /// Loads the configuration at `path`.
  ///
  /// A missing file yields the defaults.
  ///
  /// # Errors
  ///
  /// [`DepositorError::TomlDe`] if the file is not a valid configuration.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No config at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
  }

  /// Sets the Zenodo instance.
  pub fn with_server(mut self, server: Server) -> Self {
    self.server = server;
    self
  }

  /// Sets the directory resume files are written to.
  pub fn with_resume_dir(mut self, resume_dir: impl Into<PathBuf>) -> Self {
    self.resume_dir = resume_dir.into();
    self
  }

  /// Sets the fallback API token.
  pub fn with_token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  /// The API token, from `ZENODO_TOKEN` or else the configuration.
  ///
  /// # Errors
  ///
  /// [`DepositorError::MissingToken`] if neither provides a non-empty token.
  pub fn token(&self) -> Result<String> {
    std::env::var(TOKEN_ENV_VAR)
      .ok()
      .filter(|token| !token.trim().is_empty())
      .or_else(|| self.token.clone().filter(|token| !token.trim().is_empty()))
      .ok_or(DepositorError::MissingToken)
  }
}

#[cfg(test)]
mod tests {
  use serial_test::serial;

  use super::*;

  #[test]
  fn test_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.server.base_url(), "https://zenodo.org/api/deposit/depositions");
  }

  #[test]
  fn test_load_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "server = \"sandbox\"\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.server, Server::Sandbox);
    assert_eq!(config.resume_dir, std::env::temp_dir());
    assert_eq!(config.token, None);
  }

  #[test]
  fn test_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "server = \"staging\"\n").unwrap();
    assert!(matches!(Config::load(&path), Err(DepositorError::TomlDe(_))));
  }

  #[test]
  fn test_builder() {
    let config = Config::default().with_server(Server::Sandbox).with_resume_dir("/srv/resume");
    assert_eq!(config.server.base_url(), "https://sandbox.zenodo.org/api/deposit/depositions");
    assert_eq!(config.resume_dir, PathBuf::from("/srv/resume"));
  }

  #[test]
  #[serial]
  fn test_token_prefers_environment() {
    std::env::set_var(TOKEN_ENV_VAR, "from-env");
    let config = Config::default().with_token("from-file");
    assert_eq!(config.token().unwrap(), "from-env");
    std::env::remove_var(TOKEN_ENV_VAR);

    assert_eq!(config.token().unwrap(), "from-file");
  }

  #[test]
  #[serial]
  fn test_missing_token() {
    std::env::remove_var(TOKEN_ENV_VAR);
    assert!(matches!(Config::default().token(), Err(DepositorError::MissingToken)));

    std::env::set_var(TOKEN_ENV_VAR, "  ");
    assert!(matches!(Config::default().token(), Err(DepositorError::MissingToken)));
    std::env::remove_var(TOKEN_ENV_VAR);
  }
}
