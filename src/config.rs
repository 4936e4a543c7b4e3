use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub nlp: NlpConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}
fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

/// Linguistic capability settings.
///
/// `annotator` picks the segmentation strategy: `"tagger"` requires the
/// part-of-speech tagger, `"basic"` forces the plain tokenizer, and `"auto"`
/// tries the tagger and falls back to the tokenizer if it cannot be loaded.
#[derive(Debug, Deserialize, Clone)]
pub struct NlpConfig {
    #[serde(default = "default_annotator")]
    pub annotator: String,
    #[serde(default)]
    pub pos_lexicon: Option<PathBuf>,
    #[serde(default)]
    pub easy_words: Option<PathBuf>,
    #[serde(default)]
    pub easy_words_top_k: Option<usize>,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            annotator: default_annotator(),
            pos_lexicon: None,
            easy_words: None,
            easy_words_top_k: None,
        }
    }
}

fn default_annotator() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_preview_chars() -> usize {
    200
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.uploads.max_bytes == 0 {
        anyhow::bail!("uploads.max_bytes must be > 0");
    }

    if config.history.preview_chars == 0 {
        anyhow::bail!("history.preview_chars must be > 0");
    }

    if config.nlp.easy_words_top_k == Some(0) {
        anyhow::bail!("nlp.easy_words_top_k must be > 0 when set");
    }

    match config.nlp.annotator.as_str() {
        "auto" | "tagger" | "basic" => {}
        other => anyhow::bail!(
            "Unknown nlp.annotator: '{}'. Must be auto, tagger, or basic.",
            other
        ),
    }

    Ok(())
}
