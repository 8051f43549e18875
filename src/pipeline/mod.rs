//! The chat pipeline: classify, compose, complete, extract, execute,
//! assemble. Strictly sequential; every stage's output feeds the next.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::exec::{ExecOutcome, PlotExecutor};
use crate::extract;
use crate::intent;
use crate::llm::{ChatMessage, ChatOptions, CompletionClient, LlmClient};
use crate::prompt;

/// What happened on the plotting side of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotAttempt {
    /// Not a visualization request; completion text passes through.
    NotRequested,
    /// Visualization was asked for but the model emitted no code block.
    NoCode,
    /// Code was extracted and run.
    Executed(ExecOutcome),
}

/// Upstream caller contract: response text plus optional artifact path.
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub text: String,
    pub plot_path: Option<PathBuf>,
}

/// Combine completion text and plot attempt into the final reply.
/// Total: every attempt maps to exactly one narrative.
pub fn assemble(completion: String, attempt: PlotAttempt) -> Reply {
    match attempt {
        PlotAttempt::NotRequested => Reply { text: completion, plot_path: None },
        PlotAttempt::Executed(ExecOutcome::Success(path)) => Reply {
            text: format!("{}\n\nPlot saved to {}.", completion, path.display()),
            plot_path: Some(path),
        },
        PlotAttempt::Executed(ExecOutcome::Failure(message)) => Reply {
            text: format!("{}\n\nPlot generation failed: {}", completion, message),
            plot_path: None,
        },
        PlotAttempt::NoCode => Reply {
            text: format!(
                "{}\n\nNo valid plot code was produced, so there is no image this time.",
                completion
            ),
            plot_path: None,
        },
    }
}

pub struct ChatPipeline {
    client: Arc<dyn CompletionClient>,
    executor: PlotExecutor,
    opts: ChatOptions,
}

impl ChatPipeline {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: Arc::new(LlmClient::from_config(cfg)?),
            executor: PlotExecutor::from_config(cfg),
            opts: ChatOptions::from_config(cfg),
        })
    }

    /// Test seam: any `CompletionClient` stands in for the endpoint.
    pub fn with_client(
        client: Arc<dyn CompletionClient>,
        executor: PlotExecutor,
        opts: ChatOptions,
    ) -> Self {
        Self { client, executor, opts }
    }

    /// Handle one user utterance against an owned conversation history.
    ///
    /// Upstream call failures are converted here into user-visible
    /// text; nothing below this method crashes the service.
    pub async fn respond(&self, mut history: Vec<ChatMessage>, user_input: &str) -> Reply {
        let visual = intent::wants_visualization(user_input);
        info!(visual, "handling chat turn");

        let messages = prompt::compose(visual, &mut history, user_input);

        let completion = match self.client.complete(&messages, &self.opts).await {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "completion call failed");
                return Reply {
                    text: format!("Error communicating with the model: {}", e),
                    plot_path: None,
                };
            }
        };

        let attempt = if !visual {
            PlotAttempt::NotRequested
        } else {
            match extract::extract_code(&completion) {
                None => PlotAttempt::NoCode,
                Some(code) => PlotAttempt::Executed(self.executor.execute(&code).await),
            }
        };

        assemble(completion, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_when_not_requested() {
        let reply = assemble("Paris.".into(), PlotAttempt::NotRequested);
        assert_eq!(reply.text, "Paris.");
        assert!(reply.plot_path.is_none());
    }

    #[test]
    fn success_appends_path_note_and_returns_path() {
        let path = PathBuf::from("plots/plot_20250101_120000.png");
        let reply = assemble(
            "Here is your chart.".into(),
            PlotAttempt::Executed(ExecOutcome::Success(path.clone())),
        );
        assert!(reply.text.starts_with("Here is your chart."));
        assert!(reply.text.contains("plot_20250101_120000.png"));
        assert_eq!(reply.plot_path, Some(path));
    }

    #[test]
    fn failure_appends_message_without_path() {
        let reply = assemble(
            "Trying.".into(),
            PlotAttempt::Executed(ExecOutcome::Failure("NameError: x".into())),
        );
        assert!(reply.text.contains("Plot generation failed: NameError: x"));
        assert!(reply.plot_path.is_none());
    }

    #[test]
    fn missing_code_gets_its_own_narrative() {
        let reply = assemble("I cannot draw that.".into(), PlotAttempt::NoCode);
        assert!(reply.text.contains("No valid plot code"));
        assert!(reply.plot_path.is_none());
    }
}
