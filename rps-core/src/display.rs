//! Text for the settings screen, derived from the presenters' states.
//!
//! Nothing here renders; callers print or draw the strings however they like.

use crate::{
    account::Session,
    error::ErrorKind,
    model::WeatherSnapshot,
    presenter::FetchState,
    suitability,
};

pub const NOT_CONFIGURED_MESSAGE: &str =
    "API key for weather not found. Run `rps configure openweather`.";

/// Icon next to the weather question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Good,
    Bad,
    /// The weather client could not even be set up.
    Unavailable,
}

impl Badge {
    pub fn description(&self) -> &'static str {
        match self {
            Badge::Good => "Good weather for a match of rock paper scissors",
            Badge::Bad => "Bad weather for a match of rock paper scissors",
            Badge::Unavailable => "Weather client initialization failed",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Badge::Good => "✔",
            Badge::Bad | Badge::Unavailable => "⚠",
        }
    }
}

pub fn weather_status(state: Option<&FetchState<WeatherSnapshot>>) -> String {
    match state {
        None | Some(FetchState::Loading) => "Checking weather...".to_string(),
        Some(FetchState::Failed(failure)) if failure.kind == ErrorKind::NotConfigured => {
            NOT_CONFIGURED_MESSAGE.to_string()
        }
        Some(FetchState::Failed(failure)) => format!("Weather fetch error: {}", failure.message),
        Some(FetchState::Success(snapshot)) => current_conditions(snapshot),
    }
}

fn current_conditions(snapshot: &WeatherSnapshot) -> String {
    let temp = snapshot
        .temperature_c
        .map(|t| format!("{t:.1}°C"))
        .unwrap_or_else(|| "N/A".to_string());
    let description = snapshot
        .description
        .as_deref()
        .map(capitalize_first)
        .unwrap_or_else(|| "Unknown".to_string());

    format!("Currently: {temp}, {description}")
}

/// `None` while loading or after an ordinary failure.
pub fn weather_badge(state: Option<&FetchState<WeatherSnapshot>>) -> Option<Badge> {
    match state? {
        FetchState::Loading => None,
        FetchState::Success(snapshot) => Some(if suitability::evaluate(Some(snapshot)) {
            Badge::Good
        } else {
            Badge::Bad
        }),
        FetchState::Failed(failure) if failure.kind == ErrorKind::NotConfigured => {
            Some(Badge::Unavailable)
        }
        FetchState::Failed(_) => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipDialog {
    pub title: &'static str,
    pub body: String,
}

pub fn tip_dialog(state: Option<&FetchState<String>>) -> TipDialog {
    let body = match state {
        None => "Brought to you by PinguSoftware.".to_string(),
        Some(FetchState::Loading) => "Thinking...".to_string(),
        Some(FetchState::Success(quote)) => format!("\"{quote}\""),
        Some(FetchState::Failed(failure)) => format!(
            "I don't know anything about rock, paper or scissors: {}",
            failure.message
        ),
    };

    TipDialog {
        title: "Today's tip:",
        body,
    }
}

/// Everything the settings screen shows, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsScreen {
    pub greeting: String,
    pub account_action: &'static str,
    pub weather_question: String,
    pub weather_status: String,
    pub weather_badge: Option<Badge>,
    pub tip: Option<TipDialog>,
}

impl SettingsScreen {
    pub const CAMERA_PERMISSIONS: &'static str = "Camera Permissions";
    pub const LEARN_TO_PLAY: &'static str = "Learn to play";

    pub fn build(
        session: &Session,
        location_label: &str,
        weather: Option<&FetchState<WeatherSnapshot>>,
        tip: Option<&FetchState<String>>,
    ) -> Self {
        Self {
            greeting: session.greeting(),
            account_action: session.account_action().label(),
            weather_question: format!(
                "Is the weather good for playing rock paper scissors at {location_label}?"
            ),
            weather_status: weather_status(weather),
            weather_badge: weather_badge(weather),
            tip: tip.map(|state| tip_dialog(Some(state))),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.greeting.clone(),
            String::new(),
            format!("  {}", self.account_action),
            format!("  {}", Self::CAMERA_PERMISSIONS),
            format!("  {}", self.weather_question),
        ];

        let status = match self.weather_badge {
            Some(badge) => format!(
                "    {} {} ({})",
                badge.symbol(),
                self.weather_status,
                badge.description()
            ),
            None => format!("    {}", self.weather_status),
        };
        lines.push(status);
        lines.push(format!("  {}", Self::LEARN_TO_PLAY));

        if let Some(tip) = &self.tip {
            lines.push(String::new());
            lines.push(tip.title.to_string());
            lines.push(format!("  {}", tip.body));
        }

        lines
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
