#![allow(dead_code)]

use quarry::{async_trait, ExecOptions, Executor, QuerySql, Result, ResultSet, Schema};
use std::{
    collections::VecDeque,
    sync::Mutex,
};

/// One statement dispatched through the executor.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub schema: String,
    pub query: QuerySql,
    pub options: ExecOptions,
}

/// An executor that records every statement and answers with queued
/// results. Once the queue is empty it answers `0 rows affected`.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    schema: Schema,
    log: Mutex<Vec<Dispatched>>,
    responses: Mutex<VecDeque<ResultSet>>,
}

impl FakeExecutor {
    pub fn new(schema: Schema) -> FakeExecutor {
        FakeExecutor {
            schema,
            ..FakeExecutor::default()
        }
    }

    pub fn respond(&self, result: ResultSet) -> &Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    pub fn dispatched(&self) -> Vec<Dispatched> {
        self.log.lock().unwrap().clone()
    }

    /// SQL text of every dispatched statement, in order.
    pub fn sql(&self) -> Vec<String> {
        self.dispatched().into_iter().map(|d| d.query.sql).collect()
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Executor for FakeExecutor {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn execute(
        &self,
        schema: &str,
        query: QuerySql,
        options: ExecOptions,
    ) -> Result<ResultSet> {
        self.log.lock().unwrap().push(Dispatched {
            schema: schema.to_string(),
            query,
            options,
        });

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ResultSet::count(0)))
    }
}
