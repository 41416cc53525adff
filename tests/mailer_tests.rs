// Mail sender task tests: address parsing, message formatting, queue drain

use hostmon::config::EmailConfig;
use hostmon::dispatcher::ALERT_SUBJECT;
use hostmon::mailer::{OutboundMail, mailboxes, smtp_transport, spawn_mail_sender};
use lettre::transport::stub::AsyncStubTransport;
use tokio::sync::mpsc;

fn email_config() -> EmailConfig {
    EmailConfig {
        smtp_server: "smtp.example.com".into(),
        smtp_port: 587,
        sender_email: "agent@example.com".into(),
        sender_password: "app-password".into(),
        recipient_email: "ops@example.com".into(),
    }
}

#[tokio::test]
async fn test_smtp_transport_builds_from_config() {
    assert!(smtp_transport(&email_config()).is_ok());
}

#[test]
fn test_mailboxes_parse_configured_addresses() {
    let (from, to) = mailboxes(&email_config()).expect("valid addresses");
    assert_eq!(from.email.to_string(), "agent@example.com");
    assert_eq!(to.email.to_string(), "ops@example.com");
}

#[test]
fn test_mailboxes_reject_malformed_recipient() {
    let mut config = email_config();
    config.recipient_email = "not-an-address".into();
    let err = mailboxes(&config).unwrap_err();
    assert!(err.to_string().contains("recipient_email"));
}

#[tokio::test]
async fn test_sender_builds_plain_text_message() {
    let transport = AsyncStubTransport::new_ok();
    let (tx, rx) = mpsc::channel(4);
    let (from, to) = mailboxes(&email_config()).unwrap();
    let sender = spawn_mail_sender(rx, transport.clone(), from, to);

    tx.send(OutboundMail {
        subject: ALERT_SUBJECT.to_string(),
        body: "High CPU usage: 95%".into(),
    })
    .await
    .unwrap();
    drop(tx);
    sender.await.unwrap();

    let messages = transport.messages().await;
    assert_eq!(messages.len(), 1);
    let (envelope, raw) = &messages[0];
    assert_eq!(envelope.to().len(), 1);
    assert_eq!(envelope.to()[0].to_string(), "ops@example.com");
    assert!(raw.contains("Subject: Hostmon Alert Notification"));
    assert!(raw.contains("High CPU usage: 95%"));
}

#[tokio::test]
async fn test_sender_drains_queue_in_order_then_exits() {
    let transport = AsyncStubTransport::new_ok();
    let (tx, rx) = mpsc::channel(4);
    let (from, to) = mailboxes(&email_config()).unwrap();
    let sender = spawn_mail_sender(rx, transport.clone(), from, to);

    for body in ["first breach", "second breach", "third breach"] {
        tx.send(OutboundMail {
            subject: ALERT_SUBJECT.to_string(),
            body: body.into(),
        })
        .await
        .unwrap();
    }
    drop(tx);
    sender.await.unwrap();

    let messages = transport.messages().await;
    assert_eq!(messages.len(), 3);
    assert!(messages[0].1.contains("first breach"));
    assert!(messages[2].1.contains("third breach"));
}
