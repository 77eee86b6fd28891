//! In-memory collaborator doubles for service tests.
//!
//! `RecordingGateway` stands in for the Discord channel gateway and records
//! every side effect; `StaticDirectory` serves identity lookups from fixed
//! maps. Both share state across clones so tests can keep a handle after
//! passing them into a service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serenity::async_trait;

use crate::server::error::AppError;
use crate::server::service::directory::IdentityDirectory;
use crate::server::service::discord::{ChannelGateway, TranscriptLine};

/// Channel gateway double that records every call.
pub struct RecordingGateway {
    next_channel_id: AtomicU64,
    /// (channel_id, name) pairs for created channels.
    pub created: Mutex<Vec<(u64, String)>>,
    /// (channel_id, new_name) pairs, in call order.
    pub renames: Mutex<Vec<(u64, String)>>,
    /// (channel_id, content) pairs, in call order.
    pub messages: Mutex<Vec<(u64, String)>>,
    /// Channels whose public visibility was stripped.
    pub sealed: Mutex<Vec<u64>>,
    /// Lines posted to the ticket log channel.
    pub logs: Mutex<Vec<String>>,
    /// Preset history returned by `fetch_transcript`.
    pub transcript: Mutex<Vec<TranscriptLine>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            next_channel_id: AtomicU64::new(500),
            created: Mutex::new(Vec::new()),
            renames: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            sealed: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
            transcript: Mutex::new(Vec::new()),
        }
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelGateway for RecordingGateway {
    async fn create_ticket_channel(&self, name: &str, _owner_id: u64) -> Result<u64, AppError> {
        let channel_id = self.next_channel_id.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .unwrap()
            .push((channel_id, name.to_string()));
        Ok(channel_id)
    }

    async fn rename_channel(&self, channel_id: u64, name: &str) -> Result<(), AppError> {
        self.renames
            .lock()
            .unwrap()
            .push((channel_id, name.to_string()));
        Ok(())
    }

    async fn post_message(&self, channel_id: u64, content: &str) -> Result<(), AppError> {
        self.messages
            .lock()
            .unwrap()
            .push((channel_id, content.to_string()));
        Ok(())
    }

    async fn fetch_transcript(&self, _channel_id: u64) -> Result<Vec<TranscriptLine>, AppError> {
        Ok(self.transcript.lock().unwrap().clone())
    }

    async fn seal_channel(&self, channel_id: u64) -> Result<(), AppError> {
        self.sealed.lock().unwrap().push(channel_id);
        Ok(())
    }

    async fn channel_name(&self, channel_id: u64) -> Result<String, AppError> {
        let renames = self.renames.lock().unwrap();
        Ok(renames
            .iter()
            .rev()
            .find(|(id, _)| *id == channel_id)
            .map(|(_, name)| name.clone())
            .unwrap_or_default())
    }

    async fn log(&self, content: &str) -> Result<(), AppError> {
        self.logs.lock().unwrap().push(content.to_string());
        Ok(())
    }
}

/// Identity directory double serving fixed username/ID/description maps.
///
/// Clones share the same maps, so a test can mutate descriptions after
/// handing the directory to a service.
#[derive(Clone)]
pub struct StaticDirectory {
    /// lowercase username -> external ID
    users: Arc<Mutex<HashMap<String, String>>>,
    /// external ID -> profile description
    descriptions: Arc<Mutex<HashMap<String, String>>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            descriptions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Adds a resolvable user.
    pub fn with_user(self, username: &str, external_id: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(username.to_lowercase(), external_id.to_string());
        self
    }

    /// Sets the profile description served for an external ID.
    pub fn set_description(&self, external_id: &str, description: &str) {
        self.descriptions
            .lock()
            .unwrap()
            .insert(external_id.to_string(), description.to_string());
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityDirectory for StaticDirectory {
    async fn resolve_external_id(&self, username: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&username.to_lowercase())
            .cloned())
    }

    async fn fetch_description(&self, external_id: &str) -> Result<String, AppError> {
        Ok(self
            .descriptions
            .lock()
            .unwrap()
            .get(external_id)
            .cloned()
            .unwrap_or_default())
    }
}
