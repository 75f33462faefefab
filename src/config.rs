use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::constants::{
    DEFAULT_GEMINI_ENDPOINT, DEFAULT_IMAGE_MODEL, DEFAULT_OUTPUT_DIR, DEFAULT_PROMPT_FILE,
    DEFAULT_REFERENCE_IMAGE_1, DEFAULT_REFERENCE_IMAGE_2, DEFAULT_REQUEST_INTERVAL_SECS,
};
use crate::error::StartupError;

/// Settings for one batch run. Built once in `main` and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub output_dir: PathBuf,
    pub prompt_file: PathBuf,
    pub reference_images: [PathBuf; 2],
    pub request_interval: Duration,
    pub request_timeout: Option<Duration>,
    pub preflight: bool,
}

impl Config {
    /// Reads the process environment. `main` loads `.env` into it beforehand.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let string_or =
            |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let api_key = get("GOOGLE_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .ok_or_else(|| {
                StartupError::Config("GOOGLE_API_KEY (or GEMINI_API_KEY) must be set".to_string())
            })?;

        let request_interval = Duration::from_secs(parse_or(
            "REQUEST_INTERVAL_SECS",
            get("REQUEST_INTERVAL_SECS"),
            DEFAULT_REQUEST_INTERVAL_SECS,
        ));
        let request_timeout = get("REQUEST_TIMEOUT_SECS").and_then(|raw| match raw.parse::<u64>() {
            Ok(0) => None,
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                warn!(
                    "Invalid REQUEST_TIMEOUT_SECS value '{}'; requests will not time out.",
                    raw
                );
                None
            }
        });

        Ok(Self {
            api_key,
            model: string_or("GEMINI_MODEL", DEFAULT_IMAGE_MODEL),
            endpoint: string_or("GEMINI_ENDPOINT", DEFAULT_GEMINI_ENDPOINT),
            output_dir: PathBuf::from(string_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
            prompt_file: PathBuf::from(string_or("PROMPT_FILE_PATH", DEFAULT_PROMPT_FILE)),
            reference_images: [
                PathBuf::from(string_or("REFERENCE_IMAGE_1_PATH", DEFAULT_REFERENCE_IMAGE_1)),
                PathBuf::from(string_or("REFERENCE_IMAGE_2_PATH", DEFAULT_REFERENCE_IMAGE_2)),
            ],
            request_interval,
            request_timeout,
            preflight: parse_bool("PREFLIGHT_MODEL_CHECK", get("PREFLIGHT_MODEL_CHECK"), true),
        })
    }
}

fn parse_or(name: &str, raw: Option<String>, default: u64) -> u64 {
    match raw {
        None => default,
        Some(value) => value.parse::<u64>().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}'; using {}.", name, value, default);
            default
        }),
    }
}

fn parse_bool(name: &str, raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::to_lowercase).as_deref() {
        None => default,
        Some("true" | "1" | "yes" | "on") => true,
        Some("false" | "0" | "no" | "off") => false,
        Some(other) => {
            warn!("Invalid {} value '{}'; using {}.", name, other, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, StartupError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = config_from(&[("GOOGLE_API_KEY", "abc")]).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.endpoint, DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.output_dir, PathBuf::from("generated_character_images"));
        assert_eq!(config.prompt_file, PathBuf::from("prompts.txt"));
        assert_eq!(config.reference_images[0], PathBuf::from("character_ref_1.png"));
        assert_eq!(config.reference_images[1], PathBuf::from("character_ref_2.png"));
        assert_eq!(config.request_interval, Duration::from_secs(2));
        assert_eq!(config.request_timeout, None);
        assert!(config.preflight);
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = config_from(&[("GEMINI_MODEL", "x")]).unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
        assert!(matches!(
            config_from(&[("GOOGLE_API_KEY", "   ")]),
            Err(StartupError::Config(_))
        ));
    }

    #[test]
    fn gemini_api_key_is_a_fallback() {
        let config = config_from(&[("GEMINI_API_KEY", "fallback")]).unwrap();
        assert_eq!(config.api_key, "fallback");
    }

    #[test]
    fn overrides_are_trimmed_and_parsed() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", " key "),
            ("GEMINI_MODEL", "gemini-2.5-flash-image"),
            ("OUTPUT_DIR", "out/images"),
            ("REFERENCE_IMAGE_2_PATH", "refs/b.jpg"),
            ("REQUEST_INTERVAL_SECS", "0"),
            ("REQUEST_TIMEOUT_SECS", "90"),
            ("PREFLIGHT_MODEL_CHECK", "off"),
        ])
        .unwrap();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.model, "gemini-2.5-flash-image");
        assert_eq!(config.output_dir, PathBuf::from("out/images"));
        assert_eq!(config.reference_images[1], PathBuf::from("refs/b.jpg"));
        assert_eq!(config.request_interval, Duration::ZERO);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(90)));
        assert!(!config.preflight);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "key"),
            ("REQUEST_INTERVAL_SECS", "soon"),
            ("REQUEST_TIMEOUT_SECS", "never"),
            ("PREFLIGHT_MODEL_CHECK", "maybe"),
        ])
        .unwrap();

        assert_eq!(config.request_interval, Duration::from_secs(2));
        assert_eq!(config.request_timeout, None);
        assert!(config.preflight);
    }
}
