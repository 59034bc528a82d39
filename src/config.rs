use anyhow::Result;
use clap::Parser;
use std::fmt;

/// Default upstream host of the Baidu AI Open Platform
pub const DEFAULT_BASE_URL: &str = "https://aip.baidubce.com";

/// Baidu AI Gateway - Rust Implementation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// API key issued by the Baidu AI console
    #[arg(short = 'k', long, env = "BAIDU_API_KEY")]
    pub api_key: Option<String>,

    /// Secret key issued by the Baidu AI console
    #[arg(short = 's', long, env = "BAIDU_SECRET_KEY")]
    pub secret_key: Option<String>,

    /// Upstream platform base URL
    #[arg(short = 'u', long, env = "BAIDU_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format (text, json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Deployment environment reported by /api/info
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub environment: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LogFormat {
    Text,
    Json,
}

/// AI platform capability exposed by the gateway
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Ocr,
    Asr,
    Tts,
    Nlp,
    ImageClassify,
}

impl Capability {
    /// Every capability, in the order reported by /api/info
    pub const ALL: [Capability; 5] = [
        Capability::Ocr,
        Capability::Asr,
        Capability::Tts,
        Capability::Nlp,
        Capability::ImageClassify,
    ];

    /// Service name as exposed to clients
    pub fn name(self) -> &'static str {
        match self {
            Capability::Ocr => "ocr",
            Capability::Asr => "asr",
            Capability::Tts => "tts",
            Capability::Nlp => "nlp",
            Capability::ImageClassify => "imageClassify",
        }
    }

    /// Upstream path prefix for this capability
    pub fn path_prefix(self) -> &'static str {
        match self {
            Capability::Ocr => "/rest/2.0/ocr/v1",
            Capability::Asr => "/pro-api/v1/asr",
            Capability::Tts => "/rest/2.0/tts/v1",
            Capability::Nlp => "/rpc/2.0/nlp/v1",
            Capability::ImageClassify => "/rest/2.0/image-classify/v1",
        }
    }

    /// Full upstream path for an operation under this capability
    ///
    /// An empty suffix addresses the capability prefix itself.
    pub fn endpoint(self, suffix: &str) -> String {
        format!("{}{}", self.path_prefix(), suffix)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Upstream credentials
    pub api_key: Option<String>,
    pub secret_key: Option<String>,
    pub base_url: String,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,

    // Misc
    pub environment: String,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();

        Ok(Self::from_args(args))
    }

    /// Build configuration from parsed CLI arguments
    pub fn from_args(args: CliArgs) -> Self {
        Config {
            server_host: args.host,
            server_port: args.port,
            api_key: non_empty(args.api_key),
            secret_key: non_empty(args.secret_key),
            base_url: normalize_base_url(&args.base_url),
            log_level: args.log_level,
            log_format: parse_log_format(&args.log_format),
            environment: args.environment,
        }
    }

    /// Validate configuration
    ///
    /// A missing API key is not fatal: the server starts and every capability
    /// call fails with a configuration error until one is provided.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("BAIDU_BASE_URL must be an http(s) URL: {}", self.base_url);
        }

        Ok(())
    }

    /// Whether an API key is available for token refreshes
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Treat blank strings from the environment as unset
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse log format from string
fn parse_log_format(s: &str) -> LogFormat {
    match s.to_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

/// Strip trailing slashes so endpoint paths can be appended directly
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["baidu-ai-gateway"];
        argv.extend_from_slice(args);
        Config::from_args(CliArgs::parse_from(argv))
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(Some(" key ".to_string())), Some("key".to_string()));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://aip.baidubce.com/"),
            "https://aip.baidubce.com"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:1234//"),
            "http://127.0.0.1:1234"
        );
        assert_eq!(normalize_base_url(DEFAULT_BASE_URL), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format("json"), LogFormat::Json);
        assert_eq!(parse_log_format("JSON"), LogFormat::Json);
        assert_eq!(parse_log_format("text"), LogFormat::Text);
        assert_eq!(parse_log_format(""), LogFormat::Text);
        assert_eq!(parse_log_format("pretty"), LogFormat::Text);
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let config = parse(&[
            "--port",
            "8080",
            "--api-key",
            "abc",
            "--base-url",
            "http://localhost:9000/",
        ]);

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.base_url, "http://localhost:9000");
        assert!(config.has_api_key());
    }

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = parse(&["--api-key", ""]);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let config = parse(&["--base-url", "ftp://example.com"]);
        assert!(config.validate().is_err());

        let config = parse(&["--base-url", "https://example.com"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capability_names_and_paths() {
        let names: Vec<&str> = Capability::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["ocr", "asr", "tts", "nlp", "imageClassify"]);

        assert_eq!(
            Capability::Ocr.endpoint("/general_basic"),
            "/rest/2.0/ocr/v1/general_basic"
        );
        assert_eq!(Capability::Tts.endpoint(""), "/rest/2.0/tts/v1");
        assert_eq!(
            Capability::ImageClassify.endpoint("/advanced_general"),
            "/rest/2.0/image-classify/v1/advanced_general"
        );
        assert_eq!(Capability::Nlp.to_string(), "nlp");
    }
}
