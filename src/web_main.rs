//! Web 服务器主程序入口

use langroute::env::{generate_env_docs, EnvConfig};
use langroute::routing::{ConfigManager, TranslationService};
use langroute::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_config = EnvConfig::from_env()?;
    langroute::telemetry::init_tracing(&env_config.log_level);

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut web_config = WebConfig::from_env()?;
    let mut config_path: Option<String> = None;

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    web_config.bind_addr = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    web_config.port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            "--env-docs" => {
                print!("{}", generate_env_docs());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    web_config.validate()?;

    if env_config.is_development() {
        env_config.print_summary();
    }

    let manager = match config_path {
        Some(path) => ConfigManager::from_file(&path)?,
        None => ConfigManager::new()?,
    };
    let config = manager.into_config();
    let service = TranslationService::from_config(&config)?;

    if config.preload_models {
        for failure in service.warm_up().await {
            tracing::warn!("preload failed: {}", failure);
        }
    }

    let server = WebServer::new(web_config, service);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("langroute web server");
    println!();
    println!("USAGE:");
    println!("    langroute-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 8000]");
    println!("    -c, --config <FILE>      Router config file (TOML or JSON)");
    println!("        --env-docs           Print supported environment variables");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    langroute-web");
    println!("    langroute-web --bind 0.0.0.0 --port 3000 --config langroute.toml");
}
