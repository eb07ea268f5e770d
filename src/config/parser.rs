use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads a `sitecorpus.toml` file and validates it
///
/// Tables and keys missing from the file fall back to their defaults
/// (`max-concurrent-requests = 5`, `connect-timeout-secs = 10`,
/// `root-dir = "output"`, no request timeout). An empty file is a valid config.
/// Unknown keys are rejected.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Loaded configuration with defaults filled in
/// * `Err(ConfigError)` - Unreadable file, bad TOML, or a value out of range
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;

    tracing::debug!(
        "Config: concurrency {}, output root {}, user agent {}",
        config.crawler.max_concurrent_requests,
        config.output.root_dir,
        config.user_agent.header_value()
    );
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the exact settings they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration together with the SHA-256 of the file it came from
///
/// CLI overrides (`--output-dir`, `--concurrency`) are applied after this and
/// are not part of the hash.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-concurrent-requests = 8
request-timeout-secs = 20

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[output]
root-dir = "./out"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 8);
        assert_eq!(config.crawler.request_timeout_secs, Some(20));
        assert_eq!(config.crawler.connect_timeout_secs, 10);
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
        assert_eq!(config.output.root_dir, "./out");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 5);
        assert_eq!(config.crawler.request_timeout_secs, None);
        assert_eq!(config.user_agent.crawler_name, "sitecorpus");
        assert_eq!(config.output.root_dir, "output");
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let file = create_temp_config("[crawler]\nmax-concurrent-requests = 2\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 2);
        assert_eq!(config.crawler.connect_timeout_secs, 10);
        assert_eq!(config.output.root_dir, "output");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = create_temp_config("[crawler]\nmax-depth = 3\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-concurrent-requests = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_load_config_with_hash_matches_file_hash() {
        let file = create_temp_config("[output]\nroot-dir = \"corpus\"\n");

        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.output.root_dir, "corpus");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
