// SMTP transport setup and the mail sender task (channel).

use crate::config::EmailConfig;
use crate::error::DispatchError;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::mpsc;

/// One alert e-mail queued for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMail {
    pub subject: String,
    pub body: String,
}

/// STARTTLS transport against the configured relay. Credentials are only
/// verified on first delivery, not here.
pub fn smtp_transport(config: &EmailConfig) -> anyhow::Result<AsyncSmtpTransport<Tokio1Executor>> {
    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
        .port(config.smtp_port)
        .credentials(Credentials::new(
            config.sender_email.clone(),
            config.sender_password.clone(),
        ))
        .build();
    Ok(transport)
}

/// Parses the configured sender and recipient addresses. A malformed address
/// is a startup failure, not something to discover on the first alert.
pub fn mailboxes(config: &EmailConfig) -> anyhow::Result<(Mailbox, Mailbox)> {
    let from = config
        .sender_email
        .parse::<Mailbox>()
        .map_err(|e| anyhow::anyhow!("sender_email {:?}: {}", config.sender_email, e))?;
    let to = config
        .recipient_email
        .parse::<Mailbox>()
        .map_err(|e| anyhow::anyhow!("recipient_email {:?}: {}", config.recipient_email, e))?;
    Ok((from, to))
}

fn build_message(from: &Mailbox, to: &Mailbox, mail: OutboundMail) -> Result<Message, DispatchError> {
    Ok(Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(mail.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body)?)
}

/// Spawns the task that drains the mail queue and delivers each message.
/// Delivery failures are logged and the queue keeps draining. When the
/// dispatcher drops its sender, this task delivers what is left and exits.
pub fn spawn_mail_sender<T>(
    mut rx: mpsc::Receiver<OutboundMail>,
    transport: T,
    from: Mailbox,
    to: Mailbox,
) -> tokio::task::JoinHandle<()>
where
    T: AsyncTransport + Send + Sync + 'static,
    T::Ok: Send,
    T::Error: std::error::Error + Send + Sync,
{
    tokio::spawn(async move {
        while let Some(mail) = rx.recv().await {
            let subject = mail.subject.clone();
            let message = match build_message(&from, &to, mail) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        operation = "build_mail",
                        subject = %subject,
                        "alert e-mail dropped"
                    );
                    continue;
                }
            };
            match transport.send(message).await {
                Ok(_) => tracing::info!(
                    operation = "send_mail",
                    subject = %subject,
                    "alert e-mail sent"
                ),
                Err(e) => tracing::warn!(
                    error = %e,
                    operation = "send_mail",
                    subject = %subject,
                    "alert e-mail delivery failed"
                ),
            }
        }
        tracing::debug!("Mail sender shutting down");
    })
}
