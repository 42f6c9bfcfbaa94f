use crate::{
    config::{PlannerConfig, Provider},
    error::PlannerError,
    schemas::Validator,
    server,
};
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::json;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI entry point for the trip-planner binary
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let config = apply_overrides(PlannerConfig::from_env()?, &matches)?;
    info!("Using {:?} model {}", config.provider, config.model());

    match matches.subcommand() {
        Some(("serve", sub)) => {
            let bind = sub
                .get_one::<String>("bind")
                .cloned()
                .unwrap_or_else(|| config.bind_addr.clone());
            let generator = config.build_generator()?;
            server::run_server(&bind, generator).await?;
        }
        Some(("plan", sub)) => plan(&config, sub).await?,
        _ => unreachable!("clap enforces a subcommand"),
    }

    Ok(())
}

async fn plan(config: &PlannerConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let payload = json!({
        "city": matches.get_one::<String>("city"),
        "budget": matches.get_one::<String>("budget"),
        "days": matches.get_one::<i64>("days"),
    });

    let generator = config.build_generator()?;
    let itinerary = match generator.generate_from_value(&payload).await {
        Ok(itinerary) => itinerary,
        Err(PlannerError::Validation(details)) => {
            for message in &details.form_errors {
                eprintln!("error: {message}");
            }
            for (field, messages) in &details.field_errors {
                eprintln!("error: {field}: {}", messages.join(" "));
            }
            anyhow::bail!("invalid trip request");
        }
        Err(err) => {
            error!("Itinerary generation failed: {}", err);
            return Err(err.into());
        }
    };

    if matches.get_flag("json") {
        println!(
            "{}",
            serde_json::to_string_pretty(&itinerary).context("failed to render itinerary")?
        );
    } else {
        println!("{}", itinerary.render_text());
    }
    Ok(())
}

pub(crate) fn command() -> Command {
    Command::new("trip-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate day-by-day travel itineraries with an LLM")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("PROVIDER")
                .global(true)
                .help("Upstream API: gemini or openai (or set TRIP_PLANNER_PROVIDER)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model identifier (or set TRIP_PLANNER_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("API key for the provider (or set GEMINI_API_KEY / OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("API base URL (or set TRIP_PLANNER_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Request timeout in seconds (or set TRIP_PLANNER_TIMEOUT_SECS)"),
        )
        .arg(
            Arg::new("permissive")
                .long("permissive")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Only check JSON shape; skip list-size and day-numbering checks"),
        )
        .subcommand(
            Command::new("serve").about("Run the HTTP server").arg(
                Arg::new("bind")
                    .short('b')
                    .long("bind")
                    .value_name("ADDR")
                    .help("Address to listen on (or set TRIP_PLANNER_BIND)"),
            ),
        )
        .subcommand(
            Command::new("plan")
                .about("Generate one itinerary and print it")
                .arg(
                    Arg::new("city")
                        .help("Destination city")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .value_name("BUDGET")
                        .required(true)
                        .help("Total budget, e.g. \"$1000\""),
                )
                .arg(
                    Arg::new("days")
                        .short('d')
                        .long("days")
                        .value_name("DAYS")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Trip length in days (1-14)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the itinerary as JSON"),
                ),
        )
}

/// Apply command-line flags on top of the environment configuration.
pub(crate) fn apply_overrides(
    mut config: PlannerConfig,
    matches: &ArgMatches,
) -> crate::Result<PlannerConfig> {
    if let Some(provider) = matches.get_one::<String>("provider") {
        config.provider = provider.parse::<Provider>()?;
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = Some(model.clone());
    }
    if let Some(key) = matches.get_one::<String>("api-key") {
        config.set_api_key(key.clone());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = Some(base_url.clone());
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.timeout = Duration::from_secs(*timeout);
    }
    if matches.get_flag("permissive") {
        config.validator = Validator::SerdeFirst;
    }
    Ok(config)
}
