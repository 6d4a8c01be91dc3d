#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use quadrant_core::{
    ai::{AiBoundary, AiError},
    params::{AddTask, UpdateSettings},
    store::{DocumentStore, MemoryStore},
    Session, SessionBuilder, Task,
};

/// Answers by task name, read from the `Task: <name>` first line of the
/// prompt. Unknown names get the default reply.
pub struct ScriptedBoundary {
    replies: HashMap<String, Result<String, AiError>>,
    default: Result<String, AiError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBoundary {
    pub fn new(default: Result<&str, AiError>) -> Self {
        Self {
            replies: HashMap::new(),
            default: default.map(str::to_string),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, task_name: &str, reply: Result<&str, AiError>) -> Self {
        self.replies
            .insert(task_name.to_string(), reply.map(str::to_string));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiBoundary for ScriptedBoundary {
    async fn generate(&self, _credential: &str, prompt: &str) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let name = prompt
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Task: "))
            .unwrap_or_default();
        self.replies
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

pub const DO_REPLY: &str = r#"{"quadrant": "do", "reasoning": "Due soon and it matters"}"#;

/// Helper function to create a session over an in-memory store.
pub async fn create_test_session(
    ai: Arc<ScriptedBoundary>,
) -> (Arc<MemoryStore>, Session) {
    let store = Arc::new(MemoryStore::new());
    let session = session_on(store.clone(), "student", ai).await;
    (store, session)
}

/// Opens another session on an existing store.
pub async fn session_on(
    store: Arc<MemoryStore>,
    user: &str,
    ai: Arc<ScriptedBoundary>,
) -> Session {
    SessionBuilder::new()
        .with_store(store as Arc<dyn DocumentStore>)
        .with_user(user)
        .with_ai_boundary(ai)
        .build()
        .await
        .expect("Failed to create session")
}

pub async fn set_api_key(session: &Session) {
    session
        .update_settings(&UpdateSettings {
            api_key: Some("test-key".to_string()),
            coaching_enabled: None,
        })
        .await
        .expect("Failed to store API key");
}

pub async fn add(session: &Session, name: &str) -> Task {
    session
        .add_task(&AddTask {
            name: name.to_string(),
            due_date: None,
        })
        .await
        .expect("Failed to add task")
}
