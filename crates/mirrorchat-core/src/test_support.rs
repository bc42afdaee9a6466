//! In-memory fakes shared by the orchestrator tests.
//!
//! Every fake appends to one shared [`CallLog`] so tests can assert on the
//! exact order of boundary calls.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use uuid::Uuid;

use mirrorchat_types::error::RepositoryError;
use mirrorchat_types::identity::{AuthError, VerifiedIdentity};
use mirrorchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
use mirrorchat_types::message::{ChatMessage, MessageRole, Partition};
use mirrorchat_types::profile::{Profile, ProfileUpdate};

use crate::auth::verifier::TokenVerifier;
use crate::chat::repository::MessageRepository;
use crate::llm::provider::LlmProvider;
use crate::profile::repository::ProfileRepository;

pub const GOOD_TOKEN: &str = "good-token";
pub const USER_ID: &str = "uid-1";

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Token verifier
// ---------------------------------------------------------------------------

pub struct FakeVerifier {
    log: CallLog,
}

impl FakeVerifier {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl TokenVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.log.push("verify");
        if token == GOOD_TOKEN {
            Ok(VerifiedIdentity::new(USER_ID))
        } else {
            Err(AuthError::Invalid("unknown token".to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Message store
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct FakeMessages {
    log: CallLog,
    rows: Arc<Mutex<Vec<ChatMessage>>>,
    fail_appends: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl FakeMessages {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            rows: Arc::default(),
            fail_appends: Arc::default(),
            fail_deletes: Arc::default(),
        }
    }

    pub fn all(&self, partition: &Partition) -> Vec<ChatMessage> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.partition == partition)
            .cloned()
            .collect()
    }

    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

impl MessageRepository for FakeMessages {
    async fn append_message(
        &self,
        partition: &Partition,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        self.log.push(format!("append:{role}"));
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut rows = self.rows.lock().unwrap();
        // Strictly increasing timestamps keep ordering deterministic.
        let message = ChatMessage {
            id: Uuid::now_v7(),
            partition: partition.clone(),
            role,
            content: content.to_string(),
            created_at: Utc::now() + Duration::milliseconds(rows.len() as i64),
        };
        rows.push(message.clone());
        Ok(message)
    }

    async fn recent_messages(
        &self,
        partition: &Partition,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.log.push("history");
        let mut rows = self.all(partition);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn delete_messages(&self, partition: &Partition) -> Result<u64, RepositoryError> {
        self.log.push("delete_messages");
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| &m.partition != partition);
        Ok((before - rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Profile store
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct FakeProfiles {
    log: CallLog,
    docs: Arc<Mutex<HashMap<Partition, Profile>>>,
    fail_reads: Arc<AtomicBool>,
    fail_merges: Arc<AtomicBool>,
}

impl FakeProfiles {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            docs: Arc::default(),
            fail_reads: Arc::default(),
            fail_merges: Arc::default(),
        }
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_merges(&self) {
        self.fail_merges.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, partition: &Partition, value: serde_json::Value) {
        let profile: Profile = serde_json::from_value(value).unwrap();
        self.docs.lock().unwrap().insert(partition.clone(), profile);
    }

    pub fn current(&self, partition: &Partition) -> Option<Profile> {
        self.docs.lock().unwrap().get(partition).cloned()
    }
}

impl ProfileRepository for FakeProfiles {
    async fn get_profile(&self, partition: &Partition) -> Result<Option<Profile>, RepositoryError> {
        self.log.push("get_profile");
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        Ok(self.current(partition))
    }

    async fn merge_profile(
        &self,
        partition: &Partition,
        update: &ProfileUpdate,
    ) -> Result<Profile, RepositoryError> {
        self.log.push("merge_profile");
        if self.fail_merges.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        let mut docs = self.docs.lock().unwrap();
        let profile = docs.entry(partition.clone()).or_default();
        profile.merge(update);
        Ok(profile.clone())
    }

    async fn delete_profile(&self, partition: &Partition) -> Result<bool, RepositoryError> {
        self.log.push("delete_profile");
        Ok(self.docs.lock().unwrap().remove(partition).is_some())
    }
}

// ---------------------------------------------------------------------------
// LLM provider
// ---------------------------------------------------------------------------

/// Replies in order from a script. `Err(msg)` becomes a provider error; an
/// exhausted script is also a provider error.
pub struct ScriptedProvider {
    log: CallLog,
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(log: CallLog, script: Vec<Result<&str, &str>>) -> Self {
        Self {
            log,
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.log.push("generate");
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(CompletionResponse {
                content,
                model: "scripted-model".to_string(),
                finish_reason: Some("STOP".to_string()),
                usage: Usage::default(),
            }),
            Some(Err(message)) => Err(LlmError::Provider { message }),
            None => Err(LlmError::Provider {
                message: "script exhausted".to_string(),
            }),
        }
    }
}
