//! Verification correlator.
//!
//! Holds short-lived verification intents (who claims to be which external
//! user, via which method) and matches them against asynchronous external
//! confirmations: a game-entry signal, a profile-description check, or an
//! OAuth callback. Decoupling intent from confirmation keeps the interaction
//! path fast and lets the confirmation arrive from a different process than
//! the one that registered the intent.
//!
//! Attempts live in an owned in-memory map keyed by Discord actor ID. Starting
//! a new attempt supersedes the previous one entirely; expiry is a per-attempt
//! deadline checked at confirmation time and enforced by the periodic sweep,
//! so there is no per-attempt timer to cancel or leak.

pub mod phrase;

use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::server::{
    data::verification::VerificationLogRepository,
    error::{verify::VerifyError, AppError},
    model::ticket::Actor,
    model::verification::{
        NewVerificationLogParam, VerificationAttempt, VerificationRecord, VerifyMethod,
    },
    service::directory::IdentityDirectory,
};

/// Service correlating verification intents with external confirmations.
///
/// Cheap to clone; the attempt map and sequence counter are shared through
/// `Arc`.
#[derive(Clone)]
pub struct VerificationService {
    db: DatabaseConnection,
    directory: Arc<dyn IdentityDirectory>,
    attempts: Arc<RwLock<HashMap<u64, VerificationAttempt>>>,
    seq: Arc<AtomicU64>,
    expiry: Duration,
}

impl VerificationService {
    /// Creates a new VerificationService instance.
    ///
    /// # Arguments
    /// - `db` - Database connection for the verification log
    /// - `directory` - Identity directory for external ID resolution
    /// - `expiry` - How long an unconfirmed attempt stays live
    ///
    /// # Returns
    /// - `VerificationService` - New service instance
    pub fn new(
        db: DatabaseConnection,
        directory: Arc<dyn IdentityDirectory>,
        expiry: Duration,
    ) -> Self {
        Self {
            db,
            directory,
            attempts: Arc::new(RwLock::new(HashMap::new())),
            seq: Arc::new(AtomicU64::new(0)),
            expiry,
        }
    }

    /// Registers a verification attempt for an actor.
    ///
    /// Any prior attempt for the same actor is superseded outright - method,
    /// username and phrase are all replaced, and the expiry deadline restarts.
    /// Description attempts receive a generated challenge phrase the user must
    /// place in their external profile.
    ///
    /// # Arguments
    /// - `actor` - The actor claiming an external identity
    /// - `method` - Chosen verification method
    /// - `external_username` - The claimed external username
    ///
    /// # Returns
    /// - `VerificationAttempt` - Snapshot of the registered attempt
    pub async fn start_attempt(
        &self,
        actor: &Actor,
        method: VerifyMethod,
        external_username: &str,
    ) -> VerificationAttempt {
        let now = Instant::now();
        let attempt = VerificationAttempt {
            actor_id: actor.id,
            actor_name: actor.name.clone(),
            method,
            external_username: external_username.to_string(),
            phrase: match method {
                VerifyMethod::Description => Some(phrase::generate_phrase()),
                _ => None,
            },
            registered: true,
            confirmed: false,
            seq: self.seq.fetch_add(1, Ordering::SeqCst),
            started_at: now,
            deadline: now + self.expiry,
        };

        self.attempts
            .write()
            .await
            .insert(actor.id, attempt.clone());

        attempt
    }

    /// The actor's current attempt, if it is still live.
    pub async fn pending_attempt(&self, actor_id: u64) -> Option<VerificationAttempt> {
        let now = Instant::now();
        self.attempts
            .read()
            .await
            .get(&actor_id)
            .filter(|attempt| attempt.is_pending_at(now))
            .cloned()
    }

    /// Matches an external signal that carries only a username - a game-entry
    /// event or an OAuth callback - against the pending attempts.
    ///
    /// The username comparison is trimmed and case-insensitive. When several
    /// actors have pending attempts under the same username, the earliest
    /// registered attempt wins; the others stay pending until their own
    /// expiry. On a match the attempt is marked confirmed and a verification
    /// log row is appended with the directory-resolved external ID.
    ///
    /// # Arguments
    /// - `external_username` - Username carried by the external signal
    ///
    /// # Returns
    /// - `Ok(u64)` - Discord actor ID of the confirmed attempt
    /// - `Err(VerifyError::NotFound)` - No live attempt matches
    pub async fn confirm_by_username(&self, external_username: &str) -> Result<u64, VerifyError> {
        let normalized = external_username.trim().to_lowercase();
        let now = Instant::now();

        let confirmed = {
            let mut attempts = self.attempts.write().await;
            let candidate = attempts
                .values_mut()
                .filter(|attempt| {
                    attempt.is_pending_at(now)
                        && attempt.external_username.trim().to_lowercase() == normalized
                })
                .min_by_key(|attempt| attempt.seq);

            match candidate {
                Some(attempt) => {
                    attempt.confirmed = true;
                    attempt.clone()
                }
                None => return Err(VerifyError::NotFound),
            }
        };

        self.append_log(&confirmed).await;

        Ok(confirmed.actor_id)
    }

    /// Confirms a description attempt against the supplied profile text.
    ///
    /// The stored challenge phrase must appear in the text exactly
    /// (case-sensitive substring). A mismatch mutates nothing, so the user can
    /// fix their profile and retry within the expiry window.
    ///
    /// # Arguments
    /// - `actor_id` - Discord actor ID
    /// - `description` - Current external profile description text
    ///
    /// # Returns
    /// - `Ok(())` - Phrase found; attempt confirmed and logged
    /// - `Err(VerifyError::NoPendingAttempt)` - No live description attempt
    /// - `Err(VerifyError::PhraseMismatch)` - Phrase not present in the text
    pub async fn confirm_description(
        &self,
        actor_id: u64,
        description: &str,
    ) -> Result<(), VerifyError> {
        let now = Instant::now();

        let confirmed = {
            let mut attempts = self.attempts.write().await;
            let attempt = attempts
                .get_mut(&actor_id)
                .filter(|attempt| {
                    attempt.method == VerifyMethod::Description && attempt.is_pending_at(now)
                })
                .ok_or(VerifyError::NoPendingAttempt)?;

            let phrase = attempt
                .phrase
                .as_deref()
                .ok_or(VerifyError::NoPendingAttempt)?;

            if !description.contains(phrase) {
                return Err(VerifyError::PhraseMismatch);
            }

            attempt.confirmed = true;
            attempt.clone()
        };

        self.append_log(&confirmed).await;

        Ok(())
    }

    /// Runs the full description check for an actor: resolves the claimed
    /// username, fetches the current profile description from the directory,
    /// and confirms against it.
    ///
    /// # Arguments
    /// - `actor_id` - Discord actor ID
    ///
    /// # Returns
    /// - `Ok(String)` - The verified external username
    /// - `Err(AppError::VerifyErr)` - No pending attempt or phrase mismatch
    /// - `Err(AppError::NotFound)` - Username unknown to the directory
    /// - `Err(AppError)` - Directory request failed
    pub async fn check_description(&self, actor_id: u64) -> Result<String, AppError> {
        let attempt = self
            .pending_attempt(actor_id)
            .await
            .filter(|attempt| attempt.method == VerifyMethod::Description)
            .ok_or(VerifyError::NoPendingAttempt)?;

        let external_id = self
            .directory
            .resolve_external_id(&attempt.external_username)
            .await?
            .ok_or_else(|| AppError::NotFound("External user not found".to_string()))?;

        let description = self.directory.fetch_description(&external_id).await?;

        self.confirm_description(actor_id, &description).await?;

        Ok(attempt.external_username)
    }

    /// Removes attempts whose deadline has passed without confirmation.
    ///
    /// Idempotent; confirmed attempts are never swept by expiry.
    ///
    /// # Returns
    /// - `usize` - Number of attempts removed
    pub async fn sweep_expired(&self) -> usize {
        let mut attempts = self.attempts.write().await;
        let now = Instant::now();
        let before = attempts.len();
        attempts.retain(|_, attempt| attempt.confirmed || !attempt.is_expired_at(now));
        before - attempts.len()
    }

    /// Persisted verification records for an actor, newest first.
    pub async fn history(&self, actor_id: u64) -> Result<Vec<VerificationRecord>, AppError> {
        VerificationLogRepository::new(&self.db)
            .find_by_discord_id(actor_id)
            .await
    }

    /// Appends a verification log row for a confirmed attempt.
    ///
    /// The external ID comes from the identity directory; when resolution
    /// fails the row is written with an empty ID rather than dropped. Log
    /// failures themselves are logged and swallowed - confirmation has already
    /// happened and is not rolled back.
    async fn append_log(&self, attempt: &VerificationAttempt) {
        let external_id = match self
            .directory
            .resolve_external_id(&attempt.external_username)
            .await
        {
            Ok(Some(id)) => id,
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!(
                    "Failed to resolve external ID for '{}': {}",
                    attempt.external_username,
                    e
                );
                String::new()
            }
        };

        let result = VerificationLogRepository::new(&self.db)
            .append(NewVerificationLogParam {
                discord_id: attempt.actor_id,
                discord_name: attempt.actor_name.clone(),
                external_username: attempt.external_username.clone(),
                external_id,
                method: attempt.method.label().to_string(),
            })
            .await;

        if let Err(e) = result {
            tracing::error!(
                "Failed to append verification log for {}: {}",
                attempt.actor_id,
                e
            );
        }
    }
}
