use crate::{
    cli::{
        args::{AnalyzeArgs, ChatArgs, CliArgs, Command, ConfigCommand, ImageArgs},
        check::check_environment,
    },
    config::ConfigStore,
    executor::AnalysisResult,
    pipeline::{AnalyzeOptions, SmartAnalyzer, DEFAULT_IMAGE_QUESTION, DEFAULT_QUESTION},
    report::ReportFormatter,
    routing::{DefaultStrategy, RoutingThresholds},
    transport::HttpTransport,
    utils::{ConfigError, Result},
};
use console::Term;
use std::sync::Arc;

/// Runs one subcommand; `Ok(false)` means it completed but reported failure.
pub async fn handle_command(args: &CliArgs) -> Result<bool> {
    let config_dir = ConfigStore::resolve_dir(args.config_dir.as_deref());
    let formatter = ReportFormatter::new(args.should_use_color() && Term::stdout().is_term());

    match &args.command {
        Command::Analyze(analyze) => {
            let Some(store) = open_for_request(&config_dir, analyze.json)? else {
                return Ok(false);
            };
            analyze_video(&store, analyze, &formatter).await
        }
        Command::Image(image) => {
            let Some(store) = open_for_request(&config_dir, image.json)? else {
                return Ok(false);
            };
            describe_image(&store, image, &formatter).await
        }
        Command::Chat(chat) => {
            let Some(store) = open_for_request(&config_dir, chat.json)? else {
                return Ok(false);
            };
            generate_text(&store, chat, &formatter).await
        }
        Command::Check => Ok(run_check(&config_dir)),
        Command::Config(command) => {
            let mut store = ConfigStore::open(&config_dir)?;
            handle_config(&mut store, command)
        }
        Command::Compare => {
            println!(
                "{}",
                formatter.render_strategy_comparison(&RoutingThresholds::default())
            );
            Ok(true)
        }
        Command::Version => {
            println!("zai-video {}", env!("CARGO_PKG_VERSION"));
            println!("Strategy-routed multimodal video analysis");
            Ok(true)
        }
    }
}

/// In JSON mode an unreadable configuration is reported as a `{error}`
/// envelope on stdout and `None` is returned.
fn open_for_request(config_dir: &std::path::Path, json: bool) -> Result<Option<ConfigStore>> {
    match ConfigStore::open(config_dir) {
        Ok(store) => Ok(Some(store)),
        Err(e) if json => {
            let failure = AnalysisResult::failure(e.to_string());
            println!("{}", serde_json::to_string_pretty(&failure)?);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_result(result: &AnalysisResult, json: bool, formatter: &ReportFormatter) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", formatter.format_result(result));
    }
    Ok(())
}

async fn analyze_video(
    store: &ConfigStore,
    args: &AnalyzeArgs,
    formatter: &ReportFormatter,
) -> Result<bool> {
    let transport = Arc::new(HttpTransport::new()?);
    let analyzer = SmartAnalyzer::new(store, transport);

    let options = AnalyzeOptions {
        question: args
            .question
            .clone()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_QUESTION.to_string()),
        allow_fallback: !args.no_fallback,
        show_spinner: !args.json && Term::stderr().is_term(),
    };

    let decision = analyzer.route(&args.input, &options.question);
    if !args.json {
        println!("{}", formatter.render_decision(&decision, !args.no_plan));
        println!();
    }

    let result = analyzer.execute(&decision, &options).await;
    print_result(&result, args.json, formatter)?;
    Ok(result.is_success())
}

async fn describe_image(
    store: &ConfigStore,
    args: &ImageArgs,
    formatter: &ReportFormatter,
) -> Result<bool> {
    let analyzer = SmartAnalyzer::new(store, Arc::new(HttpTransport::new()?));
    let question = args
        .question
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .unwrap_or(DEFAULT_IMAGE_QUESTION);

    let result = analyzer
        .describe_image(&args.image_url, question, !args.json && Term::stderr().is_term())
        .await;
    print_result(&result, args.json, formatter)?;
    Ok(result.is_success())
}

async fn generate_text(
    store: &ConfigStore,
    args: &ChatArgs,
    formatter: &ReportFormatter,
) -> Result<bool> {
    let analyzer = SmartAnalyzer::new(store, Arc::new(HttpTransport::new()?));
    let result = analyzer
        .generate_text(
            &args.prompt,
            args.model.as_deref(),
            !args.json && Term::stderr().is_term(),
        )
        .await;
    print_result(&result, args.json, formatter)?;
    Ok(result.is_success())
}

fn run_check(config_dir: &std::path::Path) -> bool {
    let opened = ConfigStore::open(config_dir);
    let report = check_environment(
        config_dir,
        opened.as_ref().map_err(|e| e.to_string()),
        &std::env::temp_dir(),
    );
    println!("{}", report.render());
    report.passed()
}

fn handle_config(store: &mut ConfigStore, command: &ConfigCommand) -> Result<bool> {
    match command {
        ConfigCommand::Show => {
            let info = store.info();
            println!("Configuration:");
            println!("{:-<60}", "");
            println!("{:<20} {}", "config directory", info.config_dir);
            println!("{:<20} {}", "api config", info.api_config_path);
            println!("{:<20} {}", "preferences", info.preferences_path);
            println!("{:<20} {}", "api key", info.api_key_masked);
            println!("{:<20} {}", "model", info.model_name);
            println!("{:<20} {}", "endpoint", info.base_url);
            println!();
            println!("Preferences:");
            println!("{:-<60}", "");
            println!("{}", serde_json::to_string_pretty(store.preferences())?);
        }
        ConfigCommand::SetStrategy { strategy } => {
            let strategy: DefaultStrategy =
                strategy.parse().map_err(|reason| ConfigError::InvalidValue {
                    key: "default_strategy".to_string(),
                    reason,
                })?;
            store.set_default_strategy(strategy)?;
            println!("✓ Default strategy set to {}", strategy);
        }
        ConfigCommand::Set { key, value } => {
            store.set_preference(key, value)?;
            println!("✓ {} set to {}", key, value);
        }
        ConfigCommand::Reset => {
            store.reset_preferences()?;
            println!("✓ Preferences reset to defaults");
        }
    }

    Ok(true)
}
