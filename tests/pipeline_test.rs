use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use datachat::exec::PlotExecutor;
use datachat::llm::{ChatMessage, ChatOptions, CompletionClient};
use datachat::pipeline::ChatPipeline;

struct CannedClient(String);

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(&self, _messages: &[ChatMessage], _opts: &ChatOptions) -> Result<String> {
        Ok(self.0.clone())
    }
}

struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _messages: &[ChatMessage], _opts: &ChatOptions) -> Result<String> {
        anyhow::bail!("connection refused")
    }
}

fn plotting_available() -> bool {
    Command::new("python3")
        .args(["-c", "import matplotlib, numpy"])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn pipeline_with(client: Arc<dyn CompletionClient>, dir: &std::path::Path) -> ChatPipeline {
    let executor = PlotExecutor::new(
        dir.to_path_buf(),
        "python3".to_string(),
        Duration::from_secs(30),
        512,
    );
    let opts = ChatOptions {
        model: "test-model".to_string(),
        temperature: 0.6,
        max_tokens: 1024,
    };
    ChatPipeline::with_client(client, executor, opts)
}

#[tokio::test]
async fn visualization_request_ends_with_artifact_note() {
    if !plotting_available() {
        println!("Warning: python3 with matplotlib not available, skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let completion =
        "Here is a line of y=x.\n```python\nplt.plot(np.arange(10), np.arange(10))\n```";
    let pipeline = pipeline_with(Arc::new(CannedClient(completion.to_string())), dir.path());

    let reply = pipeline
        .respond(Vec::new(), "plot a line graph of y=x")
        .await;

    assert!(reply.text.contains("Plot saved to"));
    let path = reply.plot_path.expect("artifact path");
    assert!(path.exists());
}

#[tokio::test]
async fn plain_question_passes_completion_through() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_with(Arc::new(CannedClient("Paris.".to_string())), dir.path());

    let reply = pipeline
        .respond(Vec::new(), "what's the capital of France")
        .await;

    assert_eq!(reply.text, "Paris.");
    assert!(reply.plot_path.is_none());
}

#[tokio::test]
async fn codeless_visualization_reply_names_the_miss() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_with(
        Arc::new(CannedClient("I am unable to draw that.".to_string())),
        dir.path(),
    );

    let reply = pipeline.respond(Vec::new(), "chart my mood").await;

    assert!(reply.text.starts_with("I am unable to draw that."));
    assert!(reply.text.contains("No valid plot code"));
    assert!(reply.plot_path.is_none());
}

#[tokio::test]
async fn upstream_failure_becomes_user_visible_text() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_with(Arc::new(FailingClient), dir.path());

    let reply = pipeline.respond(Vec::new(), "plot anything").await;

    assert!(reply.text.starts_with("Error communicating with the model:"));
    assert!(reply.plot_path.is_none());
}

#[tokio::test]
async fn history_is_preserved_in_the_prompt_order() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = pipeline_with(Arc::new(CannedClient("ok".to_string())), dir.path());

    let history = vec![
        ChatMessage::new(datachat::llm::Role::User, "earlier question"),
        ChatMessage::new(datachat::llm::Role::Assistant, "earlier answer"),
    ];
    let reply = pipeline.respond(history, "follow-up").await;
    assert_eq!(reply.text, "ok");
}
