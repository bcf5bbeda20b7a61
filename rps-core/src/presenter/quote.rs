use rand::seq::SliceRandom;
use std::sync::Arc;

use crate::{error::FetchError, provider::QuoteProvider};

use super::{FetchPresenter, FetchState, StartOutcome, StateReceiver};

pub const TIP_KEYWORDS: [&str; 3] = ["rock", "paper", "scissors"];

pub fn tip_prompt(keyword: &str) -> String {
    format!("generate 1 quote about {keyword}")
}

fn random_keyword() -> &'static str {
    TIP_KEYWORDS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(TIP_KEYWORDS[0])
}

/// The "today's tip" flow: one generated quote per request.
pub struct QuotePresenter {
    provider: Arc<dyn QuoteProvider>,
    flow: FetchPresenter<String>,
}

impl QuotePresenter {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            provider,
            flow: FetchPresenter::new("quote"),
        }
    }

    /// Ask for a tip about a randomly picked keyword, in the background.
    pub fn request_tip(&self) -> StartOutcome {
        self.request_tip_about(random_keyword())
    }

    /// `keyword` is expected to be one of [`TIP_KEYWORDS`].
    pub fn request_tip_about(&self, keyword: &str) -> StartOutcome {
        self.flow
            .start(load(Arc::clone(&self.provider), tip_prompt(keyword)))
    }

    /// Ask for a tip and wait for it. A random keyword is used when
    /// `keyword` is `None`.
    pub async fn tip(&self, keyword: Option<&str>) -> StartOutcome {
        let prompt = tip_prompt(keyword.unwrap_or_else(|| random_keyword()));
        self.flow.run(load(Arc::clone(&self.provider), prompt)).await
    }

    pub fn subscribe(&self) -> StateReceiver<String> {
        self.flow.subscribe()
    }

    pub fn state(&self) -> Option<FetchState<String>> {
        self.flow.state()
    }
}

async fn load(provider: Arc<dyn QuoteProvider>, prompt: String) -> Result<String, FetchError> {
    provider.quote(&prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind, http::testing::RecordingTransport, provider::jsongpt::JsonGptProvider,
    };

    fn presenter_with(transport: Arc<RecordingTransport>) -> QuotePresenter {
        QuotePresenter::new(Arc::new(JsonGptProvider::new(transport)))
    }

    #[test]
    fn prompt_mentions_keyword() {
        assert_eq!(tip_prompt("paper"), "generate 1 quote about paper");
    }

    #[tokio::test]
    async fn quoted_tip_is_unwrapped() {
        let transport = Arc::new(RecordingTransport::ok(r#"{"quotes": ["\"Be bold\""]}"#));
        let presenter = presenter_with(transport);

        presenter.tip(Some("rock")).await;

        assert_eq!(presenter.state(), Some(FetchState::Success("Be bold".to_string())));
    }

    #[tokio::test]
    async fn random_tip_uses_one_of_the_keywords() {
        let transport = Arc::new(RecordingTransport::ok(r#"{"quotes": ["Throw rock"]}"#));
        let presenter = presenter_with(transport.clone());

        presenter.tip(None).await;

        let prompt = transport.requests()[0]
            .param("prompt")
            .map(str::to_owned)
            .expect("prompt sent");
        assert!(TIP_KEYWORDS.iter().any(|k| prompt == tip_prompt(k)), "{prompt}");
    }

    #[tokio::test]
    async fn missing_quotes_fail() {
        let transport = Arc::new(RecordingTransport::ok(r#"{"quotes": []}"#));
        let presenter = presenter_with(transport);
        let mut rx = presenter.subscribe();

        assert_eq!(presenter.request_tip(), StartOutcome::Started);

        let state = rx
            .wait_for(|s| matches!(s, Some(FetchState::Failed(_))))
            .await
            .expect("presenter alive")
            .clone();
        let failure = state.and_then(|s| s.failure().cloned()).expect("failed");
        assert_eq!(failure.kind, ErrorKind::ParseFailure);
    }
}
