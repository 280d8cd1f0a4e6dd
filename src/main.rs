use anyhow::Context;
use clap::Parser;
use grade_tracker::api::{GradeService, Method, Route};
use grade_tracker::core::ConfigProvider;
use grade_tracker::utils::{logger, validation::Validate};
use grade_tracker::{CliConfig, GradeStore, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 載入 TOML 配置 (命令列參數優先)
    if let Some(config_path) = config.config.clone() {
        let toml = match TomlConfig::from_file(&config_path) {
            Ok(toml) => toml,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", config_path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        };
        if let Err(e) = toml.validate() {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
        config.merge_toml(&toml);
    }

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose());
    }

    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let method = match &config.method {
        Some(raw) => raw
            .parse::<Method>()
            .map_err(anyhow::Error::msg)
            .context("invalid --method")?,
        None => Route::from_path(&config.path)
            .map(Route::method)
            .unwrap_or(Method::Get),
    };
    let payload = config.payload_json()?;

    let store = GradeStore::from_config(LocalStorage::new("."), &config);
    tracing::debug!("Using grade store at {}", store.path());
    let service = GradeService::new(store);

    let response = service.handle_request(method, &config.path, &payload).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&response.body).context("failed to render response")?
    );

    // 2xx => 0, 4xx => 1, 5xx => 2
    let exit_code = match response.status {
        200..=299 => 0,
        400..=499 => 1,
        _ => 2,
    };
    if exit_code > 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
