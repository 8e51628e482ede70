use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Process settings. Every flag falls back to an environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "wordscope", version, about)]
pub struct Settings {
    /// Address the HTTP server listens on.
    #[arg(long, env = "WORDSCOPE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Google Translate v2 API key.
    #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
    pub translate_api_key: Option<String>,

    /// Bing Search account key.
    #[arg(long, env = "BING_API_KEY", hide_env_values = true)]
    pub bing_api_key: Option<String>,

    /// Directory holding per-language dictionary rule files (`<lang>.json`).
    #[arg(long, env = "WORDSCOPE_INSTRUCTIONS_DIR", default_value = "instructions")]
    pub instructions_dir: PathBuf,

    /// Surface unexpected failures as hard errors with full detail.
    #[arg(long, env = "WORDSCOPE_DEBUG")]
    pub debug: bool,
}

impl Settings {
    pub fn translate_key(&self) -> Option<ApiKey> {
        ApiKey::from_setting(self.translate_api_key.as_deref())
    }

    pub fn bing_key(&self) -> Option<ApiKey> {
        ApiKey::from_setting(self.bing_api_key.as_deref())
    }
}

#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    fn from_setting(raw: Option<&str>) -> Option<Self> {
        raw.map(str::trim)
            .filter(|k| !k.is_empty())
            .map(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
