//! Shared test utilities for smartfit integration tests.
//!
//! Provides a [`ScriptedGenerator`] that replays queued replies instead of
//! calling a real AI service, plus fixture profiles and plans.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use smartfit_core::generator::{GenerationError, GenerationRequest, TextGenerator};
use smartfit_store::{KeyValueStore, MemoryStore, StoreError};
use smartfit_store::models::{
    DayPlan, Exercise, ExperienceLevel, Gender, Goal, Location, UserData, WorkoutPlan,
};

/// One queued reply.
#[derive(Debug)]
pub enum Reply {
    /// Return this text.
    Text(String),
    /// Fail with this error.
    Error(GenerationError),
    /// Sleep, then apply the inner reply.
    Delayed(Duration, Box<Reply>),
}

/// A [`TextGenerator`] that pops one [`Reply`] per call and records every
/// request it sees. Calls past the end of the script fail with
/// [`GenerationError::EmptyResponse`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `text` once.
    pub fn answering(text: impl Into<String>) -> Self {
        Self::new([Reply::Text(text.into())])
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.replies.lock().unwrap().pop_front();
        let mut reply = next.unwrap_or(Reply::Error(GenerationError::EmptyResponse));
        loop {
            match reply {
                Reply::Text(text) => return Ok(text),
                Reply::Error(e) => return Err(e),
                Reply::Delayed(delay, inner) => {
                    tokio::time::sleep(delay).await;
                    reply = *inner;
                }
            }
        }
    }
}

/// A 500 from the service, tagged so tests can tell attempts apart.
pub fn server_error(tag: &str) -> GenerationError {
    GenerationError::Api {
        status: 500,
        message: tag.to_owned(),
    }
}

/// A [`MemoryStore`] whose writes to the listed keys fail with an I/O
/// error, like a full or read-only disk.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    read_only: Vec<String>,
}

impl FailingStore {
    pub fn rejecting(keys: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            read_only: keys.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only.iter().any(|k| k == key) {
            return Err(StoreError::Io {
                path: format!("{key}.json").into(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Male, 70 kg, 175 cm, hypertrophy, beginner, 60 min, Segunda/Quarta/Sexta
/// at the gym, chest and back with chest as focus.
pub fn sample_user() -> UserData {
    UserData {
        gender: Gender::Male,
        weight: 70,
        height: 175,
        goal: Goal::Hypertrophy,
        experience: ExperienceLevel::Beginner,
        duration: 60,
        days: vec!["Segunda".into(), "Quarta".into(), "Sexta".into()],
        location: Location::Gym,
        target_muscles: vec!["Peito".into(), "Costas".into()],
        focus_muscle: "Peito".into(),
    }
}

pub fn exercise(id: &str, name: &str, muscle: &str) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        muscle: muscle.into(),
        sets: 3,
        reps: "10-12".into(),
        notes: "Controle a descida.".into(),
    }
}

/// A plan with one day per entry of `days`, three exercises each. Ids run
/// `ex_1`, `ex_2`, ... across the whole plan.
pub fn sample_plan(days: &[&str]) -> WorkoutPlan {
    let mut next_id = 0;
    let mut id = || {
        next_id += 1;
        format!("ex_{next_id}")
    };
    days.iter()
        .map(|day| DayPlan {
            day: (*day).to_owned(),
            focus: "Peito e Costas".into(),
            exercises: vec![
                exercise(&id(), "Supino Reto", "Peito"),
                exercise(&id(), "Remada Curvada", "Costas"),
                exercise(&id(), "Crucifixo", "Peito"),
            ],
        })
        .collect::<Vec<_>>()
        .into()
}

/// [`sample_plan`] for [`sample_user`]'s days, as the JSON text the service
/// would return.
pub fn sample_plan_json() -> String {
    serde_json::to_string(&sample_plan(&["Segunda", "Quarta", "Sexta"]))
        .unwrap_or_else(|e| panic!("fixture plan must serialize: {e}"))
}

/// `n` alternatives for a chest exercise, as service JSON.
pub fn alternatives_json(n: usize) -> String {
    let list: Vec<Exercise> = (1..=n)
        .map(|i| exercise(&format!("alt_{i}"), &format!("Alternativa {i}"), "Peito"))
        .collect();
    serde_json::to_string(&list).unwrap_or_else(|e| panic!("fixture must serialize: {e}"))
}
