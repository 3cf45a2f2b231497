use anyhow::{anyhow, Context, Result};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::settings::AppConfig;

/// Thin SMTP wrapper. All sends are best-effort at the call site: callers
/// log failures and let the primary operation succeed.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    admin: Mailbox,
}

impl Mailer {
    /// Returns `None` when SMTP is not configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(host) = config.smtp_host.as_deref() else {
            return Ok(None);
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .context("Invalid SMTP host")?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let from: Mailbox = config
            .mail_from
            .parse()
            .context("Invalid MAIL_FROM address")?;

        let admin: Mailbox = config
            .admin_email
            .as_deref()
            .ok_or_else(|| anyhow!("ADMIN_EMAIL is required when SMTP is configured"))?
            .parse()
            .context("Invalid ADMIN_EMAIL address")?;

        Ok(Some(Mailer {
            transport: builder.build(),
            from,
            admin,
        }))
    }

    /// Notify the admin about a new contact-form submission.
    pub async fn send_contact_notification(
        &self,
        sender_name: &str,
        sender_email: &str,
        subject: Option<&str>,
        body: &str,
    ) -> Result<()> {
        let subject_line = match subject {
            Some(s) => format!("New message from {}: {}", sender_name, s),
            None => format!("New message from {}", sender_name),
        };

        let email = Message::builder()
            .from(self.from.clone())
            .to(self.admin.clone())
            .subject(subject_line)
            .header(ContentType::TEXT_PLAIN)
            .body(format!("From: {} <{}>\n\n{}", sender_name, sender_email, body))
            .context("Failed to build notification email")?;

        self.transport
            .send(email)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }

    /// Deliver an admin reply back to the original sender.
    pub async fn send_reply(
        &self,
        recipient_email: &str,
        original_subject: Option<&str>,
        body: &str,
    ) -> Result<()> {
        let to: Mailbox = recipient_email
            .parse()
            .context("Invalid recipient address")?;

        let subject_line = match original_subject {
            Some(s) => format!("Re: {}", s),
            None => "Re: your message".to_string(),
        };

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject_line)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("Failed to build reply email")?;

        self.transport
            .send(email)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}
