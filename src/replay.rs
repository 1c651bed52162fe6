/// Replaying recorded actions
///
/// An actions file is either a JSON array of action records, or JSON lines
/// (one record per non-empty line) when its extension is `.jsonl`.

use serde_json::Value;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::action::ActionRecord;
use crate::config::ConfigError;
use crate::pipeline::DispatchError;
use crate::store::Store;

/// Outcome of a replay
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Number of dispatch calls that succeeded
    pub dispatched: usize,
    /// Failed dispatch calls, by position in the input
    pub failures: Vec<(usize, DispatchError)>,
}

impl ReplayReport {
    /// Check if every action was dispatched successfully
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parse actions from JSON text
pub fn parse_actions(json: &str, json_lines: bool) -> Result<Vec<ActionRecord>, ConfigError> {
    let values: Vec<Value> = if json_lines {
        json.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?
    } else {
        serde_json::from_str(json)?
    };

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            ActionRecord::from_value(value).map_err(|e| ConfigError::Action {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Read actions from a file
pub fn load_actions(path: impl AsRef<Path>) -> Result<Vec<ActionRecord>, ConfigError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| ConfigError::io(path.display().to_string(), e))?;
    let json_lines = path.extension().is_some_and(|ext| ext == "jsonl");
    parse_actions(&json, json_lines)
}

/// Dispatch every action in order, continuing past failures
pub fn replay(store: &Store, actions: Vec<ActionRecord>) -> ReplayReport {
    let mut report = ReplayReport::default();

    for (index, action) in actions.into_iter().enumerate() {
        let action_type = action.action_type().to_string();
        match store.dispatch(action) {
            Ok(()) => report.dispatched += 1,
            Err(e) => {
                warn!(index, action = %action_type, error = %e, "dispatch failed");
                report.failures.push((index, e));
            }
        }
    }

    info!(
        dispatched = report.dispatched,
        failed = report.failures.len(),
        "replay finished"
    );
    report
}
