//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

use agent_admin::list::{AgentFilters, ControllerOptions, ListController, ListSource};
use agent_admin::models::agent::Agent;
use agent_admin::models::pagination::{ListData, ListQuery, ListResponse};
use agent_admin::ui::{ConfirmFuture, ConfirmOptions, Confirmer, Notifier, NotifyKind};
use agent_admin::{AdminConfig, AppError, AppResult, AppState};

// ============================================================================
// UI doubles
// ============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<(NotifyKind, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self, kind: NotifyKind) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NotifyKind::Error)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotifyKind, message: &str) {
        self.seen.lock().unwrap().push((kind, message.to_string()));
    }
}

pub struct RecordingConfirmer {
    answer: bool,
    prompts: Mutex<Vec<ConfirmOptions>>,
}

impl RecordingConfirmer {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<ConfirmOptions> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirmer for RecordingConfirmer {
    fn confirm(&self, options: ConfirmOptions) -> ConfirmFuture<'_> {
        self.prompts.lock().unwrap().push(options);
        let answer = self.answer;
        Box::pin(async move { answer })
    }
}

// ============================================================================
// Scripted list source
// ============================================================================

struct Call {
    query: ListQuery,
    cancel: CancellationToken,
    reply: Option<oneshot::Sender<AppResult<ListResponse<Agent>>>>,
}

/// List source whose responses are handed out by the test, in any order.
#[derive(Default)]
pub struct ScriptedSource {
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSource {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn query(&self, index: usize) -> ListQuery {
        self.calls.lock().unwrap()[index].query.clone()
    }

    pub fn was_cancelled(&self, index: usize) -> bool {
        self.calls.lock().unwrap()[index].cancel.is_cancelled()
    }

    /// Deliver a response to call `index`. False when the fetch was already
    /// dropped.
    pub fn respond(&self, index: usize, result: AppResult<ListResponse<Agent>>) -> bool {
        let reply = self.calls.lock().unwrap()[index].reply.take();
        match reply {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    /// Let spawned tasks run until `n` fetches have been issued.
    pub async fn wait_for_calls(&self, n: usize) {
        for _ in 0..1000 {
            if self.call_count() >= n {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("expected {n} fetches, saw {}", self.call_count());
    }
}

impl ListSource for ScriptedSource {
    type Item = Agent;
    type Filters = AgentFilters;
    const NAME: &'static str = "Scripted";

    fn fetch(
        &self,
        query: ListQuery,
        cancel: CancellationToken,
    ) -> impl Future<Output = AppResult<ListResponse<Agent>>> + Send {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(Call {
            query,
            cancel,
            reply: Some(tx),
        });
        async move { rx.await.unwrap_or(Err(AppError::Cancelled)) }
    }
}

pub fn scripted_controller(notifier: Arc<RecordingNotifier>) -> ListController<ScriptedSource> {
    ListController::new(ScriptedSource::default(), ControllerOptions::default(), notifier)
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn agent_json(id: i64, name: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "prompt": "You are helpful.",
        "ai_model_id": 1,
        "temperature": 0.7,
        "tools": "[]",
        "knowledge_bases": [],
        "metadata": "{}",
        "is_active": active,
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

pub fn agent(id: i64, name: &str) -> Agent {
    serde_json::from_value(agent_json(id, name, true)).unwrap()
}

pub fn list_body(page: u32, page_size: u32, total_items: u64, items: Vec<Value>) -> Value {
    json!({
        "current_page": page,
        "page_size": page_size,
        "total_items": total_items,
        "total_pages": total_items.div_ceil(u64::from(page_size)),
        "data": { "items": items }
    })
}

pub fn page_of(page: u32, page_size: u32, total_items: u64, agents: Vec<Agent>) -> ListResponse<Agent> {
    ListResponse {
        current_page: page,
        page_size,
        total_items,
        total_pages: total_items.div_ceil(u64::from(page_size)),
        data: ListData {
            items: agents,
            extra: Map::new(),
        },
    }
}

pub fn test_config(server: &MockServer) -> AdminConfig {
    AdminConfig {
        base_url: server.uri(),
        api_token: Some("test-token".into()),
        ..AdminConfig::default()
    }
}

pub fn app_state(
    server: &MockServer,
    notifier: Arc<RecordingNotifier>,
    confirmer: Arc<RecordingConfirmer>,
) -> AppState {
    AppState::new(test_config(server), notifier, confirmer).unwrap()
}
