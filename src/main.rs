use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use whilelasts::application::scheduler::{TICK_PERIOD, Ticker};
use whilelasts::application::services::config_service::{share_url, token_from_input};
use whilelasts::application::services::time_calculator::{
    calculate_all_targets, current_instant_in_time_zone,
};
use whilelasts::application::services::{ConfigService, ResolvedConfig};
use whilelasts::application::services::config_codec::encode_config;
use whilelasts::domain::Clock;
use whilelasts::infrastructure::clock::{FixedClock, SystemClock};
use whilelasts::infrastructure::repositories::open_store;
use whilelasts::infrastructure::terminal::{Locale, ViewSession};
use whilelasts::infrastructure::timezone::timezone_catalog::{self, label_for};
use whilelasts::utils::setup_logging;

const DEFAULT_STORE: &str = "data/whilelasts.json";
const DEFAULT_BASE_URL: &str = "https://whilelasts.app";
const DEFAULT_AGE_AT_DEATH: i64 = 80;

#[derive(Parser, Debug)]
#[command(
    name = "whilelasts",
    version,
    about = "Live countdowns to your lifespan, next birthday, and the end of the year and month"
)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    /// Display language (en or ja); defaults to WHILELASTS_LOCALE, then LANG
    #[arg(long, global = true)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the live countdown (the default command)
    View {
        /// Share token or share link; falls back to the saved settings
        token: Option<String>,

        /// Stop after this many frames
        #[arg(long)]
        ticks: Option<u64>,

        /// Freeze the clock at an RFC 3339 instant
        #[arg(long)]
        at: Option<String>,
    },
    /// Validate and save settings, then print the share link
    Settings {
        /// Age at death, 1-150
        #[arg(long, allow_hyphen_values = true)]
        age: Option<i64>,

        /// YYYY-MM-DD
        #[arg(long)]
        birthday: String,

        /// IANA zone id, defaults to the saved zone or this machine's zone
        #[arg(long = "time-zone")]
        time_zone: Option<String>,
    },
    /// Print the share link for the saved settings
    Share,
    /// Search time zones by city or id
    Zones { query: Option<String> },
    /// Forget the saved settings
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let locale = cli.locale.unwrap_or_else(Locale::detect);
    let store_path = std::env::var("WHILELASTS_STORE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE));
    let base_url =
        std::env::var("WHILELASTS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let store = open_store(&store_path)
        .with_context(|| format!("Failed to open store at {}", store_path.display()))?;
    let service = ConfigService::new(store);

    match cli.command.unwrap_or(Command::View {
        token: None,
        ticks: None,
        at: None,
    }) {
        Command::View { token, ticks, at } => run_view(&service, locale, token, ticks, at).await,
        Command::Settings {
            age,
            birthday,
            time_zone,
        } => run_settings(&service, locale, &base_url, age, &birthday, time_zone),
        Command::Share => run_share(&service, locale, &base_url),
        Command::Zones { query } => {
            run_zones(query.as_deref().unwrap_or_default());
            Ok(())
        }
        Command::Reset => {
            service.reset();
            Ok(())
        }
    }
}

async fn run_view(
    service: &ConfigService,
    locale: Locale,
    token: Option<String>,
    ticks: Option<u64>,
    at: Option<String>,
) -> Result<()> {
    let resolved = service.resolve(token.as_deref().and_then(token_from_input));
    let config = match resolved {
        ResolvedConfig::FromUrl(config) => {
            info!("Showing countdown from share token");
            config
        }
        ResolvedConfig::FromStorage(config) => {
            info!("Showing countdown from saved settings");
            config
        }
        ResolvedConfig::NeedsSettings => {
            println!("{}", locale.messages().needs_settings);
            return Ok(());
        }
    };

    let clock: Arc<dyn Clock> = match at {
        Some(instant) => Arc::new(
            FixedClock::parse(&instant)
                .with_context(|| format!("Invalid --at instant: {instant}"))?,
        ),
        None => Arc::new(SystemClock),
    };

    let session = ViewSession::new(locale);
    let time_zone = config.time_zone();

    let mut ticker = Ticker::start(TICK_PERIOD, move |tick| {
        let now = current_instant_in_time_zone(clock.as_ref(), &time_zone);
        let targets = calculate_all_targets(&config, &now);

        if let Err(e) = session.present(&session.render(&config, &targets, &now)) {
            error!("Failed to draw countdown: {}", e);
            return ControlFlow::Break(());
        }

        if ticks.is_some_and(|limit| tick + 1 >= limit) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    tokio::select! {
        _ = ticker.wait() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl-c")?;
            info!("Interrupted, closing countdown");
        }
    }
    Ok(())
}

fn run_settings(
    service: &ConfigService,
    locale: Locale,
    base_url: &str,
    age: Option<i64>,
    birthday: &str,
    time_zone: Option<String>,
) -> Result<()> {
    let t = locale.messages();
    let saved = service.storage().load();

    let age = age
        .or_else(|| saved.as_ref().map(|config| i64::from(config.age_at_death())))
        .unwrap_or(DEFAULT_AGE_AT_DEATH);
    let time_zone = time_zone
        .or_else(|| saved.as_ref().map(|config| config.time_zone().name().to_string()))
        .unwrap_or_else(timezone_catalog::system_time_zone);

    let saved = match service.submit_settings(age, birthday, &time_zone) {
        Ok(saved) => saved,
        Err(errors) => {
            for e in &errors {
                eprintln!("{}", t.validation_message(e));
            }
            bail!("Settings were not saved ({} invalid field(s))", errors.len());
        }
    };

    println!("{}", t.settings_title);
    if saved.persisted {
        println!("{}", t.settings_saved);
    } else {
        warn!("Settings store refused the write");
        println!("{}", t.settings_not_persisted);
    }
    println!("{}: {}", t.time_zone, label_for(saved.config.time_zone().name()));
    println!("{}: {}", t.share_link, share_url(base_url, &saved.token));
    Ok(())
}

fn run_share(service: &ConfigService, locale: Locale, base_url: &str) -> Result<()> {
    let t = locale.messages();
    match service.resolve(None).config() {
        Some(config) => {
            let token = encode_config(config.config());
            println!("{}: {}", t.share_link, share_url(base_url, &token));
        }
        None => println!("{}", t.needs_settings),
    }
    Ok(())
}

fn run_zones(query: &str) {
    let system = timezone_catalog::system_time_zone();
    for entry in timezone_catalog::search(query) {
        let marker = if entry.id == system { "*" } else { " " };
        println!("{} {:<32} {}", marker, entry.id, entry.label);
    }
}
