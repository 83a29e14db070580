// Text generation trait for fleet reports
use async_trait::async_trait;

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Send a prompt to the text service and return the generated text
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
