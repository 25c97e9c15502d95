use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use skycast_core::{
    Config, ForecastMetric, ForecastWindow, Narrator, ReportKind, ServiceId, Session, Units,
    narrator::generator_from_config,
    provider::fetcher_from_config,
    session::{self, fetch_cycle},
};
use tracing::debug;

use crate::render;

/// Window for commands that only narrate; prompts read `WeatherSnapshot::upcoming`.
const NARRATED: ForecastWindow = ForecastWindow::CurrentDay;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard and AI weather assistant")]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Place {
    /// City name, e.g. "Atlanta".
    pub city: String,

    /// Unit system: metric or imperial. Defaults to the configured units.
    #[arg(long, short)]
    pub units: Option<Units>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key of a service.
    Configure {
        /// Service short name: "openweather" or "gemini".
        service: String,
    },

    /// Show current conditions and a forecast chart.
    Show {
        #[command(flatten)]
        place: Place,

        /// Forecast duration: current-day, 3-day or 5-day.
        #[arg(long, short, default_value = "current-day")]
        window: ForecastWindow,

        /// Charted metric: temperature or humidity.
        #[arg(long, short, default_value = "temperature")]
        metric: ForecastMetric,
    },

    /// Generate an AI weather report.
    Report {
        #[command(flatten)]
        place: Place,

        /// Report style: news, travel or technical.
        #[arg(long, short, default_value = "news")]
        kind: ReportKind,
    },

    /// Chat with the weather assistant about a city.
    Chat {
        #[command(flatten)]
        place: Place,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            // A broken config file must not block the command that rewrites it.
            Command::Configure { service } => configure(&mut Config::load_or_default()?, &service),
            Command::Show {
                place,
                window,
                metric,
            } => show(&Config::load()?, place, window, metric).await,
            Command::Report { place, kind } => report(&Config::load()?, place, kind).await,
            Command::Chat { place } => chat(&Config::load()?, place).await,
        }
    }
}

fn configure(config: &mut Config, service: &str) -> anyhow::Result<()> {
    let id = ServiceId::try_from(service)?;

    let api_key = Password::new(&format!("{id} API key:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.upsert_api_key(id, api_key.trim().to_string());

    if id == ServiceId::OpenWeather {
        let options = vec![Units::Metric, Units::Imperial];
        let start = options.iter().position(|u| *u == config.default_units).unwrap_or(0);
        config.default_units = Select::new("Default units:", options)
            .with_starting_cursor(start)
            .prompt()
            .context("Failed to read default units")?;
    }

    config.save()?;
    println!("Saved {id} configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    config: &Config,
    place: Place,
    window: ForecastWindow,
    metric: ForecastMetric,
) -> anyhow::Result<()> {
    let fetcher = fetcher_from_config(config)?;
    let units = place.units.unwrap_or(config.default_units);
    let mut session = Session::new();

    let snapshot = fetch_cycle(&fetcher, &mut session, &place.city, units, window).await?;

    println!("{}", render::current_conditions(snapshot));
    println!("{}", render::overview(snapshot));
    print!("{}", render::forecast(snapshot, metric));
    Ok(())
}

async fn report(config: &Config, place: Place, kind: ReportKind) -> anyhow::Result<()> {
    let fetcher = fetcher_from_config(config)?;
    let narrator = Narrator::new(generator_from_config(config)?);
    let units = place.units.unwrap_or(config.default_units);
    let mut session = Session::new();

    let snapshot = fetch_cycle(&fetcher, &mut session, &place.city, units, NARRATED).await?;
    println!("{}", render::current_conditions(snapshot));

    let text = session::report(&narrator, &session, kind).await?;
    println!("AI Weather Report ({})\n\n{text}", kind.title());
    Ok(())
}

async fn chat(config: &Config, place: Place) -> anyhow::Result<()> {
    let fetcher = fetcher_from_config(config)?;
    let narrator = Narrator::new(generator_from_config(config)?);
    let units = place.units.unwrap_or(config.default_units);
    let mut session = Session::new();

    match fetch_cycle(&fetcher, &mut session, &place.city, units, NARRATED).await {
        Ok(snapshot) => println!("{}", render::current_conditions(snapshot)),
        Err(err) => eprintln!("{err}"),
    }

    println!("Ask me anything about the current weather conditions or forecast!");
    println!("Type `/city <name>` to switch city, `exit` to leave.\n");

    loop {
        let input = match Text::new("You:").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read chat input"),
        };
        let input = input.trim();

        if is_exit(input) {
            break;
        }

        if let Some(city) = city_command(input) {
            match fetch_cycle(&fetcher, &mut session, city, units, NARRATED).await {
                Ok(snapshot) => println!("{}", render::current_conditions(snapshot)),
                Err(err) => eprintln!("{err}"),
            }
            continue;
        }

        match session::ask(&narrator, &mut session, input).await {
            Ok(answer) => println!("\nAssistant: {answer}\n"),
            Err(err) => eprintln!("{err}"),
        }
    }

    debug!(turns = session.transcript().len(), "chat session ended");
    session.end();
    Ok(())
}

fn is_exit(input: &str) -> bool {
    input.is_empty() || input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

/// City argument of a `/city <name>` chat line.
fn city_command(input: &str) -> Option<&str> {
    let rest = input.strip_prefix("/city")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}
