use clap::Parser;
use tracing::error;

use shortkey::cli::Cli;
use shortkey::config::{StaticConfig, init_config};
use shortkey::errors::ShortkeyError;
use shortkey::runtime::modes::{self, Mode};
use shortkey::system::init_logging;

#[actix_web::main]
async fn main() {
    let cli = Cli::parse();

    // 显式指定的配置文件加载失败直接退出，默认路径失败则回退到默认值
    let mut config = match cli.config.as_deref() {
        Some(path) => match StaticConfig::try_load(Some(path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", ShortkeyError::config(e.to_string()).format_colored());
                std::process::exit(1);
            }
        },
        None => StaticConfig::load(None),
    };
    cli.apply_overrides(&mut config);
    let config = init_config(config);

    match modes::detect_mode(cli.command) {
        Mode::Cli(command) => {
            if let Err(e) = modes::run_cli(command, &config) {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
        }
        Mode::Server => {
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("Failed to initialize logging: {:#}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = modes::run_server().await {
                error!("Server exited with error: {:#}", e);
                match e.downcast_ref::<ShortkeyError>() {
                    Some(err) => eprintln!("{}", err.format_colored()),
                    None => eprintln!("{:#}", e),
                }
                std::process::exit(1);
            }
        }
    }
}
