use std::fmt;
use std::sync::Arc;
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use nd_core::{Error, Mailer, OutgoingMessage, Result, SmtpSettings};

/// Outcome of handing a digest to the mail transport.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryReport {
    Delivered { to: String },
    /// Nothing was sent, e.g. the user has no known address.
    Skipped { reason: String },
    Failed { to: String, reason: String },
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryReport::Delivered { .. })
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryReport::Delivered { to } => write!(f, "delivered to {}", to),
            DeliveryReport::Skipped { reason } => write!(f, "skipped: {}", reason),
            DeliveryReport::Failed { to, reason } => write!(f, "failed to deliver to {}: {}", to, reason),
        }
    }
}

/// Sends `message`, containing any transport failure in the returned report.
pub async fn deliver(mailer: &dyn Mailer, message: &OutgoingMessage) -> DeliveryReport {
    match mailer.send(message).await {
        Ok(()) => {
            tracing::info!("📬 Newsletter sent to {} via {}", message.to, mailer.name());
            DeliveryReport::Delivered { to: message.to.clone() }
        }
        Err(e) => {
            tracing::error!("❌ Failed to send email to {}: {}", message.to, e);
            DeliveryReport::Failed {
                to: message.to.clone(),
                reason: e.to_string(),
            }
        }
    }
}

/// SMTP delivery. With no host configured it runs in no-op mode and only logs.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("transport", &self.transport.as_ref().map(|_| "<smtp>"))
            .field("from", &self.from.to_string())
            .finish()
    }
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let from = settings
            .from
            .parse::<Mailbox>()
            .map_err(|e| Error::Config(format!("invalid sender address {:?}: {}", settings.from, e)))?;

        let transport = if settings.host.trim().is_empty() {
            tracing::warn!("SMTP host not configured; delivery will operate in no-op mode");
            None
        } else {
            let builder = if settings.starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            }
            .map_err(|e| Error::Delivery(format!("failed to configure SMTP transport: {}", e)))?
            .port(settings.port);

            let builder = match (&settings.username, settings.password()) {
                (Some(username), Some(password)) => {
                    builder.credentials(Credentials::new(username.clone(), password))
                }
                (Some(username), None) => {
                    tracing::warn!(
                        "SMTP username {} set but {} is empty; connecting without authentication",
                        username,
                        settings.password_env
                    );
                    builder
                }
                _ => builder,
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self { transport, from })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    fn build_message(&self, message: &OutgoingMessage) -> Result<Message> {
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| Error::Delivery(format!("invalid recipient {:?}: {}", message.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(header::ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| Error::Delivery(format!("failed to build email: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        if self.is_enabled() {
            "smtp"
        } else {
            "smtp (no-op)"
        }
    }

    async fn send(&self, message: &OutgoingMessage) -> Result<()> {
        let email = self.build_message(message)?;

        match &self.transport {
            Some(transport) => {
                transport
                    .send(email)
                    .await
                    .map_err(|e| Error::Delivery(e.to_string()))?;
            }
            None => {
                tracing::info!(
                    "[no-op] would send \"{}\" to {} ({} bytes)",
                    message.subject,
                    message.to,
                    message.body.len()
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> OutgoingMessage {
        OutgoingMessage {
            to: to.to_string(),
            subject: "Your Personalized Newsletter, Alex Parker".to_string(),
            body: "# Personalized Newsletter for Alex Parker\n".to_string(),
        }
    }

    #[derive(Debug)]
    struct BrokenMailer;

    #[async_trait]
    impl Mailer for BrokenMailer {
        fn name(&self) -> &str {
            "broken"
        }

        async fn send(&self, _message: &OutgoingMessage) -> Result<()> {
            Err(Error::Delivery("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_noop_mode_delivers() {
        let mailer = SmtpMailer::new(&SmtpSettings::default()).unwrap();
        assert!(!mailer.is_enabled());
        let report = deliver(&mailer, &message("alex.parker@example.com")).await;
        assert!(report.is_delivered());
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_reported() {
        let mailer = SmtpMailer::new(&SmtpSettings::default()).unwrap();
        let report = deliver(&mailer, &message("not an address")).await;
        assert!(matches!(report, DeliveryReport::Failed { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_contained() {
        let report = deliver(&BrokenMailer, &message("alex.parker@example.com")).await;
        assert_eq!(
            report,
            DeliveryReport::Failed {
                to: "alex.parker@example.com".to_string(),
                reason: "Delivery error: connection refused".to_string(),
            }
        );
        assert_eq!(report.to_string(), "failed to deliver to alex.parker@example.com: Delivery error: connection refused");
    }

    #[test]
    fn test_invalid_sender_is_a_config_error() {
        let settings = SmtpSettings {
            from: "nobody".to_string(),
            ..SmtpSettings::default()
        };
        assert!(matches!(SmtpMailer::new(&settings), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_configured_host_enables_transport() {
        let settings = SmtpSettings {
            host: "smtp.example.com".to_string(),
            ..SmtpSettings::default()
        };
        let mailer = SmtpMailer::new(&settings).unwrap();
        assert!(mailer.is_enabled());
        assert_eq!(mailer.name(), "smtp");
    }
}
