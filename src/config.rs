use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    pub thresholds: Thresholds,
    pub email: EmailConfig,
    #[serde(default)]
    pub alerting: AlertingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// Scheduler period; ticks fire on the absolute grid start + n * period.
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// Blocking window for the delta-based CPU usage measurement. Counted
    /// against the period, so it must stay below sample_interval_ms.
    #[serde(default = "default_cpu_sample_ms")]
    pub cpu_sample_ms: u64,
    /// Mount point whose filesystem is watched.
    #[serde(default = "default_disk_mount")]
    pub disk_mount: String,
    /// How often to log app stats (ticks, alerts sent/suppressed) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_sample_interval_ms() -> u64 {
    10_000
}

fn default_cpu_sample_ms() -> u64 {
    1_000
}

fn default_disk_mount() -> String {
    "/".into()
}

fn default_stats_log_interval_secs() -> u64 {
    300
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            cpu_sample_ms: default_cpu_sample_ms(),
            disk_mount: default_disk_mount(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

/// Alert limits. All fields are required; a missing one is a startup error.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Thresholds {
    pub cpu_percent: f64,
    pub ram_used_percent: f64,
    pub disk_used_percent: f64,
    pub temperature_celsius: f64,
}

/// Outbound SMTP account. All fields are required.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub sender_password: String,
    pub recipient_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertingConfig {
    /// Minimum seconds between repeated e-mails for the same alert kind.
    #[serde(default = "default_suppression_window_secs")]
    pub suppression_window_secs: u64,
    /// Also e-mail when a previously alerting condition stops triggering.
    #[serde(default)]
    pub notify_on_clear: bool,
    /// Bounded hand-off queue between the scheduler and the mail sender.
    #[serde(default = "default_mail_queue_capacity")]
    pub mail_queue_capacity: usize,
    /// How long shutdown waits for queued alert e-mails before exiting anyway.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_suppression_window_secs() -> u64 {
    900
}

fn default_mail_queue_capacity() -> usize {
    32
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            suppression_window_secs: default_suppression_window_secs(),
            notify_on_clear: false,
            mail_queue_capacity: default_mail_queue_capacity(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("config file {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.monitoring.sample_interval_ms > 0,
            "monitoring.sample_interval_ms must be > 0, got {}",
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.cpu_sample_ms > 0,
            "monitoring.cpu_sample_ms must be > 0, got {}",
            self.monitoring.cpu_sample_ms
        );
        anyhow::ensure!(
            self.monitoring.cpu_sample_ms < self.monitoring.sample_interval_ms,
            "monitoring.cpu_sample_ms ({}) must be below sample_interval_ms ({})",
            self.monitoring.cpu_sample_ms,
            self.monitoring.sample_interval_ms
        );
        anyhow::ensure!(
            !self.monitoring.disk_mount.is_empty(),
            "monitoring.disk_mount must be non-empty"
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        for (name, value) in [
            ("thresholds.cpu_percent", self.thresholds.cpu_percent),
            ("thresholds.ram_used_percent", self.thresholds.ram_used_percent),
            (
                "thresholds.disk_used_percent",
                self.thresholds.disk_used_percent,
            ),
        ] {
            anyhow::ensure!(
                value > 0.0 && value <= 100.0,
                "{} must be within (0, 100], got {}",
                name,
                value
            );
        }
        anyhow::ensure!(
            self.thresholds.temperature_celsius > 0.0,
            "thresholds.temperature_celsius must be > 0, got {}",
            self.thresholds.temperature_celsius
        );
        anyhow::ensure!(
            !self.email.smtp_server.is_empty(),
            "email.smtp_server must be non-empty"
        );
        anyhow::ensure!(
            self.email.smtp_port > 0,
            "email.smtp_port must be between 1 and 65535, got {}",
            self.email.smtp_port
        );
        anyhow::ensure!(
            !self.email.sender_email.is_empty(),
            "email.sender_email must be non-empty"
        );
        anyhow::ensure!(
            !self.email.sender_password.is_empty(),
            "email.sender_password must be non-empty"
        );
        anyhow::ensure!(
            !self.email.recipient_email.is_empty(),
            "email.recipient_email must be non-empty"
        );
        anyhow::ensure!(
            self.alerting.suppression_window_secs > 0,
            "alerting.suppression_window_secs must be > 0, got {}",
            self.alerting.suppression_window_secs
        );
        anyhow::ensure!(
            self.alerting.mail_queue_capacity > 0,
            "alerting.mail_queue_capacity must be > 0, got {}",
            self.alerting.mail_queue_capacity
        );
        Ok(())
    }
}
