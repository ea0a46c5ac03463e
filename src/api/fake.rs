//! In-memory `CategoryApi` for tests. Behaves like the real server and keeps
//! a log of every call it received. Calls can be held open to stand in for a
//! slow server.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::sync::watch;

use super::{ApiError, Category, CategoryApi, CategoryId, RecordFlag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetAll,
    Insert(String),
    Update(CategoryId, String, RecordFlag),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GetAll,
    Insert,
    Update,
}

#[derive(Default)]
struct FakeState {
    categories: Vec<Category>,
    next_id: u32,
    failing: HashSet<Op>,
    calls: Vec<Call>,
}

pub struct FakeApi {
    state: Mutex<FakeState>,
    /// `false` while calls are held
    gate: watch::Sender<bool>,
}

impl FakeApi {
    pub fn with_categories(categories: Vec<Category>) -> Self {
        let next_id = categories
            .iter()
            .filter_map(|c| c.id.as_str().parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(FakeState {
                categories,
                next_id,
                ..FakeState::default()
            }),
            gate: watch::Sender::new(true),
        }
    }

    /// Make every following call wait until [`FakeApi::release`]
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    async fn pass_gate(&self) {
        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;
    }

    pub fn fail(&self, op: Op) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.state.lock().unwrap().failing.remove(&op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// What the server currently holds
    pub fn stored(&self) -> Vec<Category> {
        self.state.lock().unwrap().categories.clone()
    }
}

#[async_trait]
impl CategoryApi for FakeApi {
    async fn get_all(&self) -> Result<Vec<Category>, ApiError> {
        self.state.lock().unwrap().calls.push(Call::GetAll);
        self.pass_gate().await;

        let state = self.state.lock().unwrap();
        if state.failing.contains(&Op::GetAll) {
            return Err(ApiError::Status(503));
        }
        Ok(state.categories.clone())
    }

    async fn insert(&self, name: &str) -> Result<(), ApiError> {
        self.state.lock().unwrap().calls.push(Call::Insert(name.to_string()));
        self.pass_gate().await;

        let mut state = self.state.lock().unwrap();
        if state.failing.contains(&Op::Insert) {
            return Err(ApiError::Rejected("insert failed".to_string()));
        }
        let id = state.next_id.to_string();
        state.next_id += 1;
        state.categories.push(Category::new(id, name));
        Ok(())
    }

    async fn update(&self, id: &CategoryId, name: &str, flag: RecordFlag) -> Result<(), ApiError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(Call::Update(id.clone(), name.to_string(), flag));
        self.pass_gate().await;

        let mut state = self.state.lock().unwrap();
        if state.failing.contains(&Op::Update) {
            return Err(ApiError::Rejected("update failed".to_string()));
        }
        match flag {
            RecordFlag::Update => {
                if let Some(category) = state.categories.iter_mut().find(|c| &c.id == id) {
                    category.name = name.to_string();
                }
            }
            RecordFlag::Delete => state.categories.retain(|c| &c.id != id),
        }
        Ok(())
    }
}
