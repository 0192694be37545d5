//! In-memory doubles for the core ports, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use campusbot_types::chat::{History, Turn};
use campusbot_types::error::RepositoryError;
use campusbot_types::llm::{GenerateRequest, LlmError, ModelResponse};

use crate::history::store::HistoryStore;
use crate::llm::provider::LlmProvider;

/// `HistoryStore` over a HashMap. A `None` document stands for a malformed one.
#[derive(Default)]
pub struct MemoryHistoryStore {
    docs: Mutex<HashMap<String, Option<History>>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    load_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session_id: &str, history: History) {
        self.docs
            .lock()
            .unwrap()
            .insert(session_id.to_string(), Some(history));
    }

    pub fn insert_malformed(&self, session_id: &str) {
        self.docs.lock().unwrap().insert(session_id.to_string(), None);
    }

    pub fn get(&self, session_id: &str) -> Option<History> {
        self.docs.lock().unwrap().get(session_id).cloned().flatten()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

impl HistoryStore for MemoryHistoryStore {
    async fn load(&self, session_id: &str) -> Result<Option<History>, RepositoryError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        match self.docs.lock().unwrap().get(session_id) {
            None => Ok(None),
            Some(None) => Err(RepositoryError::Malformed(
                "history is not a list".to_string(),
            )),
            Some(Some(history)) => Ok(Some(history.clone())),
        }
    }

    async fn save(&self, session_id: &str, history: &[Turn]) -> Result<(), RepositoryError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("quota exceeded".to_string()));
        }
        self.docs
            .lock()
            .unwrap()
            .insert(session_id.to_string(), Some(history.to_vec()));
        Ok(())
    }
}

/// `LlmProvider` that replays queued results and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    results: Mutex<VecDeque<Result<ModelResponse, LlmError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose next call answers with `text`.
    pub fn replying(text: &str) -> Self {
        let provider = Self::new();
        provider.push(Ok(ModelResponse::from_text(text)));
        provider
    }

    pub fn push(&self, result: Result<ModelResponse, LlmError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<ModelResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Provider {
                    message: "no scripted response".to_string(),
                })
            })
    }
}
