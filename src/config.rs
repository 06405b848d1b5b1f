use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub practice: PracticeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub channels: u16,
    pub fragment_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PracticeConfig {
    pub level: String,
    pub topic: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "fluency-coach".to_string(),
                base_url: "http://127.0.0.1:5000".to_string(),
            },
            audio: AudioConfig {
                sample_rate: 16_000,
                channels: 1,
                fragment_ms: 1_000,
            },
            practice: PracticeConfig {
                level: "intermediate".to_string(),
                topic: "general".to_string(),
            },
        }
    }
}
