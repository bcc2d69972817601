mod channels;

pub use channels::{DiscordWebhookNotifier, LogChannel, MemoryChannel};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A toast shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            title: title.into(),
            message: message.into(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, message)
    }
}

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
    fn name(&self) -> &str;
}

/// Errors from the notification system.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Discord webhook error: {0}")]
    Discord(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Configuration for the notification service.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub discord_webhook_url: Option<String>,
    /// How many recent notifications the in-memory feed keeps
    pub feed_size: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            discord_webhook_url: None,
            feed_size: 50,
        }
    }
}

impl NotificationConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self, NotificationError> {
        let feed_size = match std::env::var("NOTIFICATION_FEED_SIZE") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                NotificationError::Config(format!("NOTIFICATION_FEED_SIZE must be a number, got '{}'", raw))
            })?,
            Err(_) => 50,
        };

        Ok(Self {
            discord_webhook_url: std::env::var("DISCORD_WEBHOOK_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            feed_size,
        })
    }
}

/// Dispatches notifications to every configured channel and keeps the recent feed.
pub struct NotificationService {
    channels: Vec<Box<dyn NotificationChannel>>,
    feed: MemoryChannel,
}

impl NotificationService {
    pub fn new(config: &NotificationConfig) -> Self {
        let feed = MemoryChannel::new(config.feed_size);
        let mut channels: Vec<Box<dyn NotificationChannel>> =
            vec![Box::new(LogChannel), Box::new(feed.clone())];

        if let Some(ref webhook_url) = config.discord_webhook_url {
            channels.push(Box::new(DiscordWebhookNotifier::new(webhook_url.clone())));
            tracing::info!("Discord webhook notifications enabled");
        }

        Self {
            channels,
            feed,
        }
    }

    /// Log and in-memory feed only
    pub fn local() -> Self {
        Self::new(&NotificationConfig::default())
    }

    /// Add an extra channel, e.g. a test probe
    pub fn with_channel(mut self, channel: Box<dyn NotificationChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Send to all channels, awaiting completion. Channel failures are logged, never returned.
    pub async fn send_async(&self, notification: &Notification) {
        dispatch(&self.channels, notification).await;
    }

    pub async fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send_async(&Notification::success(title, message)).await;
    }

    pub async fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send_async(&Notification::error(title, message)).await;
    }

    pub async fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.send_async(&Notification::info(title, message)).await;
    }

    /// Most recent notifications, newest first
    pub async fn recent(&self, limit: usize) -> Vec<Notification> {
        self.feed.recent(limit).await
    }
}

async fn dispatch(channels: &[Box<dyn NotificationChannel>], notification: &Notification) {
    for channel in channels.iter() {
        match channel.send(notification).await {
            Ok(()) => tracing::debug!("Sent notification via {}", channel.name()),
            Err(e) => {
                tracing::warn!("Failed to send notification via {}: {}", channel.name(), e)
            }
        }
    }
}
