use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::{Notification, NotificationChannel, NotificationError, NotificationLevel};

/// Writes every notification to the tracing log.
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        match notification.level {
            NotificationLevel::Error => {
                tracing::warn!("{}: {}", notification.title, notification.message)
            }
            _ => tracing::info!("{}: {}", notification.title, notification.message),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Bounded ring of recent notifications. Clones share the same buffer.
#[derive(Clone)]
pub struct MemoryChannel {
    capacity: usize,
    buffer: Arc<RwLock<VecDeque<Notification>>>,
}

impl MemoryChannel {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffer: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    /// Newest first
    pub async fn recent(&self, limit: usize) -> Vec<Notification> {
        let buffer = self.buffer.read().await;
        buffer.iter().rev().take(limit).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.buffer.read().await.len()
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let mut buffer = self.buffer.write().await;
        while buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(notification.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Discord webhook notifier.
pub struct DiscordWebhookNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordWebhookNotifier {
    pub fn new(webhook_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { webhook_url, client }
    }
}

fn embed_color(level: NotificationLevel) -> u32 {
    match level {
        NotificationLevel::Success => 0x00ff00,
        NotificationLevel::Error => 0xff0000,
        NotificationLevel::Info => 0x0099ff,
    }
}

#[async_trait]
impl NotificationChannel for DiscordWebhookNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let payload = serde_json::json!({
            "embeds": [{
                "title": notification.title,
                "description": notification.message,
                "color": embed_color(notification.level),
                "timestamp": notification.timestamp.to_rfc3339(),
            }]
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::Discord(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotificationError::Discord(format!("HTTP {}", response.status())));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "discord-webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_channel_is_bounded() {
        let channel = MemoryChannel::new(3);
        for i in 0..5 {
            channel
                .send(&Notification::info(format!("n{}", i), "msg"))
                .await
                .unwrap();
        }
        assert_eq!(channel.len().await, 3);
        let recent = channel.recent(10).await;
        assert_eq!(recent[0].title, "n4");
        assert_eq!(recent[2].title, "n2");
    }

    #[tokio::test]
    async fn test_clones_share_buffer() {
        let channel = MemoryChannel::new(10);
        let other = channel.clone();
        other.send(&Notification::success("t", "m")).await.unwrap();
        assert_eq!(channel.recent(1).await.len(), 1);
    }

    #[test]
    fn test_embed_colors() {
        assert_eq!(embed_color(NotificationLevel::Error), 0xff0000);
        assert_ne!(embed_color(NotificationLevel::Success), embed_color(NotificationLevel::Info));
    }
}
