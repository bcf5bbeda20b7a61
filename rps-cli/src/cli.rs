use anyhow::{Context, Result};
use clap::{Parser, Subcommand, builder::PossibleValuesParser};
use inquire::{Password, PasswordDisplayMode, Text};
use rps_core::{
    Config, Coordinates, Credential, FetchState, HttpTransport, ProviderId, QuotePresenter,
    ReqwestTransport, Session, WeatherPresenter, WeatherSnapshot,
    display::{self, SettingsScreen},
    presenter::quote::TIP_KEYWORDS,
    provider::{jsongpt::JSONGPT_URL, quote_provider_from_config},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "rps", version, about = "Rock paper scissors companion")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure a provider, e.g. "openweather" or "jsongpt".
    Configure { provider: String },

    /// Check whether the weather is good for a game.
    Weather {
        /// Latitude; defaults to the configured location.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; defaults to the configured location.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Show today's tip.
    Tip {
        /// One of rock, paper, scissors; random if absent.
        #[arg(long, value_parser = PossibleValuesParser::new(TIP_KEYWORDS))]
        keyword: Option<String>,
    },

    /// Show the whole settings screen.
    Settings,

    /// Remember a signed-in account.
    Login {
        id: String,

        #[arg(long)]
        name: Option<String>,
    },

    /// Forget the signed-in account.
    Logout,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Configure { provider } => configure(&path, &provider),
            Command::Weather { lat, lon } => {
                let config = Config::load_from(&path)?;
                let at = match (lat, lon) {
                    (Some(lat), Some(lon)) => Coordinates::new(lat, lon),
                    _ => config.location.coordinates(),
                };
                show_weather(&config, at).await;
                Ok(())
            }
            Command::Tip { keyword } => {
                let config = Config::load_from(&path)?;
                show_tip(&config, keyword.as_deref()).await;
                Ok(())
            }
            Command::Settings => {
                let config = Config::load_from(&path)?;
                show_settings(&config).await;
                Ok(())
            }
            Command::Login { id, name } => {
                let mut config = Config::read_from(&path)?;
                let mut session = Session::new(config.account.take());
                session.sign_in(Credential::new(id, name));
                println!("{}", session.greeting());

                config.account = session.into_user();
                config.save_to(&path)
            }
            Command::Logout => {
                let mut config = Config::read_from(&path)?;
                let mut session = Session::new(config.account.take());
                session.sign_out();
                println!("{}", session.greeting());

                config.account = session.into_user();
                config.save_to(&path)
            }
        }
    }
}

fn configure(path: &Path, provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::read_from(path)?;

    match id {
        ProviderId::OpenWeather => {
            let key = Password::new("OpenWeather API key:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .without_confirmation()
                .prompt()
                .context("Failed to read API key")?;
            config.upsert_provider_api_key(id, key.trim().to_string());
        }
        ProviderId::JsonGpt => {
            let current = config.provider_base_url(id).unwrap_or(JSONGPT_URL).to_string();
            let url = Text::new("JSON-GPT endpoint:")
                .with_default(&current)
                .prompt()
                .context("Failed to read endpoint")?;
            config.set_provider_base_url(id, url.trim().to_string());
        }
    }

    config.save_to(path)?;
    info!(provider = %id, path = %path.display(), "saved provider settings");
    println!("Saved {id} settings to {}", path.display());
    Ok(())
}

fn transport() -> Arc<dyn HttpTransport> {
    Arc::new(ReqwestTransport::new())
}

async fn fetch_weather(config: &Config, at: Coordinates) -> Option<FetchState<WeatherSnapshot>> {
    let presenter = WeatherPresenter::from_config(config, transport());
    presenter.fetch(at).await;
    presenter.state()
}

async fn fetch_tip(config: &Config, keyword: Option<&str>) -> Option<FetchState<String>> {
    let presenter = QuotePresenter::new(quote_provider_from_config(config, transport()));
    presenter.tip(keyword).await;
    presenter.state()
}

async fn show_weather(config: &Config, at: Coordinates) {
    let state = fetch_weather(config, at).await;

    println!("{}", display::weather_status(state.as_ref()));
    if let Some(badge) = display::weather_badge(state.as_ref()) {
        println!("{} {}", badge.symbol(), badge.description());
    }
}

async fn show_tip(config: &Config, keyword: Option<&str>) {
    let state = fetch_tip(config, keyword).await;
    let dialog = display::tip_dialog(state.as_ref());

    println!("{}", dialog.title);
    println!("{}", dialog.body);
}

async fn show_settings(config: &Config) {
    let (weather, tip) = tokio::join!(
        fetch_weather(config, config.location.coordinates()),
        fetch_tip(config, None),
    );

    let session = Session::new(config.account.clone());
    let screen = SettingsScreen::build(
        &session,
        &config.location.label,
        weather.as_ref(),
        tip.as_ref(),
    );

    for line in screen.lines() {
        println!("{line}");
    }
}
