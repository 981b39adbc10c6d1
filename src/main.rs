use std::io::{self, Write};
use std::process;

use clap::Parser;

use langroute::env::{core, EnvVar};
use langroute::routing::{ConfigManager, RoutingError, ServiceResponse, TranslationService};

const EXIT_ROUTING_FAILURE: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "langroute",
    version,
    about = "Detect the source language of TEXT and translate it through the model server"
)]
struct Cli {
    /// Target language (en, hi, fr by default)
    #[arg(short, long, default_value = "en")]
    target: String,

    /// Router config file (TOML or JSON)
    #[arg(short, long)]
    config: Option<String>,

    /// Only print the detected source language
    #[arg(long)]
    detect_only: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Text to translate (multiple words are joined with spaces)
    #[arg(required = true)]
    text: Vec<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // 命令行默认只输出警告，`LANGROUTE_LOG_LEVEL` 显式设置时才放宽
    let log_level = core::LogLevel::get_set()
        .and_then(Result::ok)
        .unwrap_or_else(|| "warn".to_string());
    langroute::telemetry::init_tracing(&log_level);

    let service = match load_service(cli.config.as_deref()) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_ROUTING_FAILURE);
        }
    };

    let text = cli.text.join(" ");

    if cli.detect_only {
        match service.detect(&text) {
            Ok(lang) => println!("{}", lang),
            Err(e) => fail(&e, cli.json),
        }
        return;
    }

    match service.resolve_and_translate(&text, &cli.target).await {
        Ok(result) if cli.json => print_json(&ServiceResponse::Success(result)),
        Ok(result) => println!("{}", result.translated_text),
        Err(e) => fail(&e, cli.json),
    }
}

fn load_service(config_path: Option<&str>) -> Result<TranslationService, RoutingError> {
    let manager = match config_path {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };
    TranslationService::from_config(manager.get_config())
}

fn print_json(response: &ServiceResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).ok();
        }
        Err(e) => eprintln!("Error: failed to serialize result: {}", e),
    }
}

fn fail(error: &RoutingError, json: bool) -> ! {
    if json {
        print_json(&ServiceResponse::Failure {
            error: error.to_string(),
        });
    } else {
        eprintln!("Error: {}", error);
    }

    let code = if error.is_validation() {
        EXIT_INVALID_INPUT
    } else {
        EXIT_ROUTING_FAILURE
    };
    process::exit(code);
}
