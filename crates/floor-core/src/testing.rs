//! Test doubles shared by the unit tests of this crate.
use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;
use time::{Date, Month};
use tokio::time::Instant;

use floor_model::{
    ContextId, DutyStatus, LocalStamp, ManualClock, StaffId, StaffShift, TimeOfDay,
};

use crate::{
    gateway::{Operation, OperationError, RemoteGateway},
    hooks::{StaffBoard, ViewHooks},
    task::{RunContext, RunOutcome, Task},
};

pub fn date(s: &str) -> Date {
    let mut parts = s.split('-').map(|p| p.parse::<i32>().unwrap());
    let (y, m, d) = (
        parts.next().unwrap(),
        parts.next().unwrap(),
        parts.next().unwrap(),
    );
    Date::from_calendar_date(y, Month::try_from(m as u8).unwrap(), d as u8).unwrap()
}

pub fn stamp(d: &str, t: &str) -> LocalStamp {
    LocalStamp::new(date(d), t.parse::<TimeOfDay>().unwrap())
}

pub fn manual_clock(d: &str, t: &str) -> ManualClock {
    ManualClock::new(date(d), t.parse::<TimeOfDay>().unwrap())
}

/// Gateway answering from a script; `Ok(Null)` once the script runs dry.
#[derive(Default)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<Result<Value, OperationError>>>,
    calls: Mutex<Vec<(Operation, Value)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.script.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, err: OperationError) {
        self.script.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<(Operation, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn call(
        &self,
        operation: Operation,
        payload: Value,
        _timeout: Option<Duration>,
    ) -> Result<Value, OperationError> {
        self.calls.lock().unwrap().push((operation, payload));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

#[derive(Default)]
pub struct RecordingHooks {
    refreshed: Mutex<Vec<ContextId>>,
    reloads: AtomicUsize,
}

impl RecordingHooks {
    pub fn refreshed(&self) -> Vec<ContextId> {
        self.refreshed.lock().unwrap().clone()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ViewHooks for RecordingHooks {
    async fn refresh(&self, context: ContextId) {
        self.refreshed.lock().unwrap().push(context);
    }

    async fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MemoryBoard {
    staff: Vec<StaffShift>,
    statuses: Mutex<HashMap<StaffId, DutyStatus>>,
}

impl MemoryBoard {
    pub fn new(staff: Vec<StaffShift>) -> Self {
        Self {
            staff,
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn status(&self, id: &str) -> Option<DutyStatus> {
        self.statuses
            .lock()
            .unwrap()
            .get(&StaffId::from(id))
            .copied()
    }
}

impl StaffBoard for MemoryBoard {
    fn visible_staff(&self) -> Vec<StaffShift> {
        self.staff.clone()
    }

    fn apply_status(&self, staff: &StaffId, status: DutyStatus) {
        self.statuses.lock().unwrap().insert(staff.clone(), status);
    }
}

/// Task recording the instant of every run.
pub struct CountingTask {
    name: &'static str,
    runs: Mutex<Vec<Instant>>,
    busy_for: Duration,
    panic_on_first: bool,
    started: AtomicUsize,
}

impl CountingTask {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self::build(name, Duration::ZERO, false))
    }

    /// Each run sleeps `busy_for` before completing.
    pub fn slow(name: &'static str, busy_for: Duration) -> Arc<Self> {
        Arc::new(Self::build(name, busy_for, false))
    }

    /// The first run panics, later runs complete.
    pub fn panicking(name: &'static str) -> Arc<Self> {
        Arc::new(Self::build(name, Duration::ZERO, true))
    }

    fn build(name: &'static str, busy_for: Duration, panic_on_first: bool) -> Self {
        Self {
            name,
            runs: Mutex::new(Vec::new()),
            busy_for,
            panic_on_first,
            started: AtomicUsize::new(0),
        }
    }

    /// Number of runs that started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Instants of runs that completed.
    pub fn runs(&self) -> Vec<Instant> {
        self.runs.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }
}

#[async_trait]
impl Task for CountingTask {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, _ctx: &RunContext) -> RunOutcome {
        let n = self.started.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_first && n == 0 {
            panic!("boom");
        }
        if !self.busy_for.is_zero() {
            tokio::time::sleep(self.busy_for).await;
        }
        self.runs.lock().unwrap().push(Instant::now());
        RunOutcome::Completed
    }
}
