use crate::logging_driver::DriverOp;
use quarry_core::driver::{QuerySql, Response};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// Test-side view of everything a [`LoggingDriver`](crate::LoggingDriver)
/// saw.
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
    connects: Arc<AtomicUsize>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>, connects: Arc<AtomicUsize>) -> Self {
        Self { ops, connects }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Number of connections the driver has opened
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&QuerySql) -> bool,
    {
        self.ops.lock().unwrap().iter().any(|op| predicate(&op.query))
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&QuerySql) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.query))
            .count()
    }

    /// Number of logged statements starting with `verb`, e.g. `"UPDATE"`
    pub fn count_verb(&self, verb: &str) -> usize {
        self.count(|query| query.sql.starts_with(verb))
    }

    /// SQL text of every logged statement, oldest first
    pub fn sql(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .map(|op| op.query.sql.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the oldest statement from the log
    pub fn pop(&self) -> Option<(QuerySql, Option<Response>)> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            let op = ops.remove(0);
            Some((op.query, op.response))
        }
    }
}
