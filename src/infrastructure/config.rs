use config::{Config, ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub fleet: FleetSettings,
    pub snapshot: SnapshotSettings,
    pub report: ReportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FleetSettings {
    /// Zero-based month shown at startup
    pub initial_month: u32,
    pub initial_year: i32,
    pub activity_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotSettings {
    pub scale: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("fleet.initial_month", 0_i64)?
        .set_default("fleet.initial_year", 2025_i64)?
        .set_default("fleet.activity_capacity", 200_i64)?
        .set_default("snapshot.scale", 2_i64)?
        .set_default("report.endpoint", "https://generativelanguage.googleapis.com")?
        .set_default("report.model", "gemini-3-flash-preview")?
        .set_default("report.timeout_secs", 30_i64)?)
}

/// Defaults, then `config/dashboard.*` if present, then `FLEET__SECTION__KEY` variables.
/// `API_KEY` is accepted as a fallback for the report key.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults()?
        .add_source(File::with_name("config/dashboard").required(false))
        .add_source(
            Environment::with_prefix("FLEET")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut app_config: AppConfig = settings.try_deserialize()?;
    if app_config.report.api_key.is_none() {
        app_config.report.api_key = std::env::var("API_KEY").ok().filter(|k| !k.is_empty());
    }

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse_app_config(toml: &str) -> anyhow::Result<AppConfig> {
        let settings = with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    #[test]
    fn test_defaults() {
        let config = parse_app_config("").unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.fleet.initial_month, 0);
        assert_eq!(config.fleet.initial_year, 2025);
        assert_eq!(config.fleet.activity_capacity, 200);
        assert_eq!(config.snapshot.scale, 2);
        assert_eq!(config.report.model, "gemini-3-flash-preview");
        assert_eq!(config.report.timeout_secs, 30);
        assert!(config.report.api_key.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = parse_app_config(
            r#"
            [server]
            bind = "127.0.0.1:9000"

            [fleet]
            initial_month = 5
            initial_year = 2024

            [report]
            api_key = "secret"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.fleet.initial_month, 5);
        assert_eq!(config.fleet.initial_year, 2024);
        assert_eq!(config.fleet.activity_capacity, 200);
        assert_eq!(config.report.api_key.as_deref(), Some("secret"));
        assert_eq!(config.report.timeout_secs, 5);
    }
}
