use async_trait::async_trait;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    fn name(&self) -> &str;

    /// Transmit a plain-text message
    async fn send(&self, message: &OutgoingMessage) -> Result<()>;
}
