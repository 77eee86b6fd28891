//! Discord channel gateway.
//!
//! Every Discord side effect the core performs - creating a ticket channel,
//! renaming it through its lifecycle, sealing it on close, posting messages,
//! collecting the transcript - goes through the [`ChannelGateway`] trait. The
//! production implementation drives Discord's REST API through
//! `serenity::http::Http`; no gateway client is run.

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, ChannelType, CreateChannel, EditChannel, GetMessages, GuildId, PermissionOverwrite,
    PermissionOverwriteType, Permissions, RoleId, UserId,
};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::server::{config::Config, error::AppError};

/// One message of a ticket channel's history.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub at: DateTime<Utc>,
    pub author: String,
    pub content: String,
}

/// Channel resource operations consumed by the ticket lifecycle.
///
/// Implementations must be cheap to share; the service layer holds them as
/// `Arc<dyn ChannelGateway>`.
#[async_trait]
pub trait ChannelGateway: Send + Sync {
    /// Creates a ticket channel visible only to the owner and staff.
    ///
    /// # Arguments
    /// - `name` - Channel name, e.g. `order-001`
    /// - `owner_id` - Discord ID of the requesting actor
    ///
    /// # Returns
    /// - `Ok(u64)` - ID of the created channel
    /// - `Err(AppError)` - Discord API failure
    async fn create_ticket_channel(&self, name: &str, owner_id: u64) -> Result<u64, AppError>;

    /// Renames a channel.
    async fn rename_channel(&self, channel_id: u64, name: &str) -> Result<(), AppError>;

    /// Posts a plain message into a channel.
    async fn post_message(&self, channel_id: u64, content: &str) -> Result<(), AppError>;

    /// Fetches a channel's recent history, oldest first.
    async fn fetch_transcript(&self, channel_id: u64) -> Result<Vec<TranscriptLine>, AppError>;

    /// Strips public visibility from a channel after close.
    async fn seal_channel(&self, channel_id: u64) -> Result<(), AppError>;

    /// Current name of a channel.
    async fn channel_name(&self, channel_id: u64) -> Result<String, AppError>;

    /// Posts a line to the ticket log channel; a no-op when none is configured.
    async fn log(&self, content: &str) -> Result<(), AppError>;
}

/// Production gateway backed by the Discord REST API.
pub struct DiscordChannelGateway {
    http: Arc<Http>,
    guild_id: GuildId,
    category_id: Option<ChannelId>,
    staff_role_ids: Vec<RoleId>,
    log_channel_id: Option<ChannelId>,
}

impl DiscordChannelGateway {
    /// Creates a new gateway over the given Discord HTTP client.
    ///
    /// # Arguments
    /// - `http` - Arc-wrapped Discord HTTP client
    /// - `config` - Application configuration (guild, category, staff roles,
    ///   log channel)
    ///
    /// # Returns
    /// - `DiscordChannelGateway` - New gateway instance
    pub fn new(http: Arc<Http>, config: &Config) -> Self {
        Self {
            http,
            guild_id: GuildId::new(config.guild_id),
            category_id: config.ticket_category_id.map(ChannelId::new),
            staff_role_ids: config.staff_role_ids.iter().copied().map(RoleId::new).collect(),
            log_channel_id: config.ticket_log_channel_id.map(ChannelId::new),
        }
    }

    /// Permission overwrites for a fresh ticket channel: @everyone denied,
    /// the owner and every staff role allowed.
    fn ticket_overwrites(&self, owner_id: u64) -> Vec<PermissionOverwrite> {
        // @everyone shares its ID with the guild
        let mut overwrites = vec![PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(RoleId::new(self.guild_id.get())),
        }];

        overwrites.push(PermissionOverwrite {
            allow: Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::ATTACH_FILES,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(UserId::new(owner_id)),
        });

        for role_id in &self.staff_role_ids {
            overwrites.push(PermissionOverwrite {
                allow: Permissions::VIEW_CHANNEL
                    | Permissions::SEND_MESSAGES
                    | Permissions::MANAGE_MESSAGES,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(*role_id),
            });
        }

        overwrites
    }
}

#[async_trait]
impl ChannelGateway for DiscordChannelGateway {
    async fn create_ticket_channel(&self, name: &str, owner_id: u64) -> Result<u64, AppError> {
        let mut builder = CreateChannel::new(name)
            .kind(ChannelType::Text)
            .permissions(self.ticket_overwrites(owner_id));

        if let Some(category_id) = self.category_id {
            builder = builder.category(category_id);
        }

        let channel = self.guild_id.create_channel(&self.http, builder).await?;

        Ok(channel.id.get())
    }

    async fn rename_channel(&self, channel_id: u64, name: &str) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .edit(&self.http, EditChannel::new().name(name))
            .await?;

        Ok(())
    }

    async fn post_message(&self, channel_id: u64, content: &str) -> Result<(), AppError> {
        ChannelId::new(channel_id).say(&self.http, content).await?;

        Ok(())
    }

    async fn fetch_transcript(&self, channel_id: u64) -> Result<Vec<TranscriptLine>, AppError> {
        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().limit(100))
            .await?;

        // Discord returns newest first
        let lines = messages
            .into_iter()
            .rev()
            .map(|message| TranscriptLine {
                at: DateTime::from_timestamp(message.timestamp.unix_timestamp(), 0)
                    .unwrap_or(DateTime::UNIX_EPOCH),
                author: message.author.tag(),
                content: message.content,
            })
            .collect();

        Ok(lines)
    }

    async fn seal_channel(&self, channel_id: u64) -> Result<(), AppError> {
        ChannelId::new(channel_id)
            .create_permission(
                &self.http,
                PermissionOverwrite {
                    allow: Permissions::empty(),
                    deny: Permissions::VIEW_CHANNEL,
                    kind: PermissionOverwriteType::Role(RoleId::new(self.guild_id.get())),
                },
            )
            .await?;

        Ok(())
    }

    async fn channel_name(&self, channel_id: u64) -> Result<String, AppError> {
        let channel = self.http.get_channel(ChannelId::new(channel_id)).await?;

        Ok(channel
            .guild()
            .map(|guild_channel| guild_channel.name)
            .unwrap_or_default())
    }

    async fn log(&self, content: &str) -> Result<(), AppError> {
        if let Some(log_channel_id) = self.log_channel_id {
            log_channel_id.say(&self.http, content).await?;
        }

        Ok(())
    }
}
