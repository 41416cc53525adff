// Alert flood control and hand-off to the mail sender task.

use crate::config::AlertingConfig;
use crate::error::DispatchError;
use crate::mailer::OutboundMail;
use crate::models::{AlertCondition, AlertKind};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Subject line shared by every alert e-mail.
pub const ALERT_SUBJECT: &str = "Hostmon Alert Notification";

/// Counters for one dispatch round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: u64,
    pub suppressed: u64,
    pub cleared: u64,
}

/// Decides which breached conditions become e-mails.
///
/// Per alert kind, at most one e-mail per suppression window, measured from
/// the last enqueued mail. The window is not reset when a condition clears,
/// so a flapping metric cannot flood the relay.
pub struct AlertDispatcher {
    last_sent: HashMap<AlertKind, Instant>,
    active: HashSet<AlertKind>,
    window: Duration,
    notify_on_clear: bool,
    mail_tx: mpsc::Sender<OutboundMail>,
}

impl AlertDispatcher {
    pub fn new(config: &AlertingConfig, mail_tx: mpsc::Sender<OutboundMail>) -> Self {
        Self {
            last_sent: HashMap::new(),
            active: HashSet::new(),
            window: Duration::from_secs(config.suppression_window_secs),
            notify_on_clear: config.notify_on_clear,
            mail_tx,
        }
    }

    /// Processes one evaluation round. `now` is injected so suppression can be
    /// tested without waiting out the window.
    pub fn dispatch(&mut self, conditions: &[AlertCondition], now: Instant) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        let current: HashSet<AlertKind> = conditions.iter().map(|c| c.kind).collect();

        for kind in self.active.difference(&current) {
            tracing::info!(alert = kind.label(), "alert condition cleared");
            summary.cleared += 1;
            if self.notify_on_clear {
                let mail = OutboundMail {
                    subject: ALERT_SUBJECT.to_string(),
                    body: format!("Cleared: {}", kind.describe()),
                };
                if let Err(e) = self.try_enqueue(mail) {
                    tracing::warn!(error = %e, alert = kind.label(), "clear notice not queued");
                }
            }
        }

        for condition in conditions {
            let suppressed = self
                .last_sent
                .get(&condition.kind)
                .is_some_and(|sent| now.duration_since(*sent) < self.window);
            if suppressed {
                tracing::debug!(
                    alert = condition.kind.label(),
                    measured_value = condition.measured_value,
                    "alert suppressed inside window"
                );
                summary.suppressed += 1;
                continue;
            }
            tracing::warn!(
                alert = condition.kind.label(),
                measured_value = condition.measured_value,
                "{}",
                condition.message
            );
            let mail = OutboundMail {
                subject: ALERT_SUBJECT.to_string(),
                body: condition.message.clone(),
            };
            match self.try_enqueue(mail) {
                Ok(()) => {
                    self.last_sent.insert(condition.kind, now);
                    summary.sent += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        alert = condition.kind.label(),
                        "alert e-mail not queued"
                    );
                }
            }
        }

        self.active = current;
        summary
    }

    fn try_enqueue(&self, mail: OutboundMail) -> Result<(), DispatchError> {
        self.mail_tx.try_send(mail).map_err(|e| match e {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::SenderGone,
        })
    }
}
