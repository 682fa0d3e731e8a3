use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use contracts::enums::{NormalizerPreset, SchemaId};

use crate::projections::p901_wb_report::reshaper::PalletMergePolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    /// Таймаут построчной выгрузки, секунды
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
    /// Таймаут остальных запросов, секунды
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Пауза перед повтором неудачной строки
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Пауза между строками
    #[serde(default = "default_row_pause")]
    pub row_pause_ms: u64,
    /// Ограничение попыток на строку; без значения повторяем до успеха
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Переопределение политики нормализации: код схемы → пресет
    #[serde(default)]
    pub presets: BTreeMap<String, NormalizerPreset>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DownloadConfig {
    /// Каталог отчётов; по умолчанию «Загрузки» пользователя
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub pallet_merge: PalletMergePolicy,
}

fn default_upload_timeout() -> u64 {
    75
}

fn default_request_timeout() -> u64 {
    30
}

fn default_retry_delay() -> u64 {
    2000
}

fn default_row_pause() -> u64 {
    500
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay(),
            row_pause_ms: default_row_pause(),
            max_attempts: None,
            presets: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl UploadConfig {
    /// Активная политика для схемы: переопределение из конфигурации или пресет схемы
    pub fn preset_for(&self, schema: SchemaId) -> NormalizerPreset {
        self.presets
            .get(schema.code())
            .copied()
            .unwrap_or_else(|| schema.default_preset())
    }
}

impl DownloadConfig {
    /// Каталог сохранения отчётов
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::download_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
base_url = "https://corrywilliams.ru"
upload_timeout_secs = 75
request_timeout_secs = 30

[upload]
retry_delay_ms = 2000
row_pause_ms = 500

[download]
pallet_merge = "split_per_pallet"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.server.base_url, "https://corrywilliams.ru");
        assert_eq!(config.server.upload_timeout(), Duration::from_secs(75));
        assert_eq!(config.upload.row_pause_ms, 500);
        assert!(config.upload.max_attempts.is_none());
        assert_eq!(config.download.pallet_merge, PalletMergePolicy::SplitPerPallet);
    }

    #[test]
    fn test_shipped_config_matches_default() {
        let shipped: Config = toml::from_str(include_str!("../../../../config.toml")).unwrap();
        let embedded: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(shipped.server.base_url, embedded.server.base_url);
        assert_eq!(shipped.upload.retry_delay_ms, embedded.upload.retry_delay_ms);
        assert_eq!(shipped.download.pallet_merge, embedded.download.pallet_merge);
    }

    // build.rs копирует файл рядом с бинарником, только если все секции на месте
    #[test]
    fn test_shipped_config_has_all_sections() {
        let shipped = include_str!("../../../../config.toml");
        for section in ["[server]", "[upload]", "[download]"] {
            assert!(shipped.lines().any(|l| l.trim() == section), "{section}");
        }
    }

    #[test]
    fn test_preset_override() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "http://localhost:3000"

            [upload.presets]
            basic = "strict_marker"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.upload.preset_for(SchemaId::BasicUpload),
            NormalizerPreset::StrictMarker
        );
        assert_eq!(
            config.upload.preset_for(SchemaId::ExtendedUpload),
            NormalizerPreset::Web
        );
        assert_eq!(config.upload.retry_delay_ms, 2000);
    }
}
