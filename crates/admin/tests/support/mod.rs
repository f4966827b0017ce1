//! In-memory stand-in for the CMS API shared by the admin integration
//! tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use carecms_client::{ClientError, MasterGateway};
use carecms_core::mutation::MutationCommand;
use carecms_core::query::{ListResult, QueryDescriptor};
use carecms_core::types::{record_id, Record, RecordId, ID_FIELD};

#[derive(Default)]
struct FakeState {
    records: HashMap<String, Vec<Record>>,
    queries: Vec<QueryDescriptor>,
    commands: Vec<MutationCommand>,
    sign_ups: Vec<MutationCommand>,
    list_delays: VecDeque<Duration>,
    failing_lists: usize,
    failing_ids: HashSet<RecordId>,
    next_id: i64,
}

/// Records every call and answers from an in-memory table per model.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        let gateway = Self::default();
        gateway.state.lock().unwrap().next_id = 1000;
        Arc::new(gateway)
    }

    /// Seed `model` with rows.
    pub fn seed(&self, model: &str, rows: Value) {
        let rows = rows
            .as_array()
            .expect("rows must be an array")
            .iter()
            .map(|v| v.as_object().cloned().expect("row must be an object"))
            .collect();
        self.state
            .lock()
            .unwrap()
            .records
            .insert(model.to_string(), rows);
    }

    /// Seed `model` with `count` rows named `"{prefix} {n}"` under `field`.
    pub fn seed_numbered(&self, model: &str, field: &str, prefix: &str, count: i64) {
        let rows: Vec<Value> = (1..=count)
            .map(|n| json!({"id": n, field: format!("{prefix} {n}"), "is_active": 1}))
            .collect();
        self.seed(model, Value::Array(rows));
    }

    /// Delay list responses, one entry per upcoming call, in call order.
    pub fn delay_lists(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().unwrap().list_delays.extend(delays);
    }

    /// Fail the next `n` list calls with a server error.
    pub fn fail_lists(&self, n: usize) {
        self.state.lock().unwrap().failing_lists = n;
    }

    /// Reject every upsert that targets `id`.
    pub fn fail_upserts_for(&self, id: RecordId) {
        self.state.lock().unwrap().failing_ids.insert(id);
    }

    pub fn queries(&self) -> Vec<QueryDescriptor> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn commands(&self) -> Vec<MutationCommand> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn sign_ups(&self) -> Vec<MutationCommand> {
        self.state.lock().unwrap().sign_ups.clone()
    }

    pub fn rows(&self, model: &str) -> Vec<Record> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(model)
            .cloned()
            .unwrap_or_default()
    }
}

fn matches_keyword(row: &Record, fields: &[String], keyword: &str) -> bool {
    if keyword.is_empty() {
        return true;
    }
    let needle = keyword.to_lowercase();
    fields.iter().any(|field| {
        row.get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| v.to_lowercase().contains(&needle))
    })
}

#[async_trait]
impl MasterGateway for FakeGateway {
    async fn list(&self, query: &QueryDescriptor) -> Result<ListResult, ClientError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.queries.push(query.clone());
            state.list_delays.pop_front()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if state.failing_lists > 0 {
            state.failing_lists -= 1;
            return Err(ClientError::Server {
                status: Some(500),
                message: Some("Internal Server Error".into()),
            });
        }

        let search_fields = query
            .search
            .as_ref()
            .map(|s| s.fields.clone())
            .unwrap_or_default();
        let matching: Vec<Record> = state
            .records
            .get(&query.model_name)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| {
                query
                    .where_condition
                    .iter()
                    .flatten()
                    .all(|(field, value)| row.get(field) == Some(value))
            })
            .filter(|row| matches_keyword(row, &search_fields, query.keyword()))
            .collect();

        let count = matching.len() as u64;
        let rows = match query.pagination {
            Some(p) => matching
                .into_iter()
                .skip(((p.page() - 1) * p.page_size()) as usize)
                .take(p.page_size() as usize)
                .collect(),
            None => matching,
        };
        Ok(ListResult { rows, count })
    }

    async fn upsert(&self, command: &MutationCommand) -> Result<Record, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.clone());

        if let Some(id) = &command.id {
            if state.failing_ids.contains(id) {
                return Err(ClientError::Server {
                    status: Some(200),
                    message: Some(format!("Record {id} is locked")),
                });
            }
        }

        let next_id = state.next_id;
        let rows = state
            .records
            .entry(command.model_name.clone())
            .or_default();
        match &command.id {
            Some(id) => {
                let row = rows
                    .iter_mut()
                    .find(|row| record_id(row).as_ref() == Some(id))
                    .ok_or_else(|| ClientError::Server {
                        status: Some(404),
                        message: Some("Record not found".into()),
                    })?;
                for (key, value) in &command.input_data {
                    row.insert(key.clone(), value.clone());
                }
                Ok(row.clone())
            }
            None => {
                let mut row = command.input_data.clone();
                row.insert(ID_FIELD.to_string(), json!(next_id));
                rows.push(row.clone());
                state.next_id += 1;
                Ok(row)
            }
        }
    }

    async fn sign_up(&self, command: &MutationCommand) -> Result<(), ClientError> {
        self.state.lock().unwrap().sign_ups.push(command.clone());
        Ok(())
    }
}
