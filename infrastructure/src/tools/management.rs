//! Management dispatch — the bridge into the task subsystem.
//!
//! The task/reminder subsystem is a separate bounded context with its own
//! storage; this handler only validates the action envelope and delegates
//! through [`ManagementService`]. An in-memory implementation backs tests
//! and single-process deployments.

use std::sync::Mutex;

use serde_json::{Map, Value, json};

use herald_domain::ErrorCode;

/// Keys that stay at the top level of the envelope; everything else is
/// folded into the task arguments.
const ENVELOPE_KEYS: &[&str] = &["action", "task_type", "trace_id", "correlation_id", "action_id"];

/// Port into the management bounded context.
pub trait ManagementService: Send + Sync {
    fn execute(&self, envelope: &Map<String, Value>) -> Result<Value, ErrorCode>;
}

/// Build the task envelope from raw command arguments.
///
/// `action` is mandatory; unknown top-level keys are folded into `args`
/// so flat `key=value` invocations from the routers arrive in one shape.
pub fn build_task_envelope(args: &Map<String, Value>) -> Result<Map<String, Value>, ErrorCode> {
    let Some(action) = args.get("action").and_then(|v| v.as_str()) else {
        return Err(ErrorCode::ArgMissing("action".to_string()));
    };

    let mut task_args = match args.get("args") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in args {
        if key == "args" || ENVELOPE_KEYS.contains(&key.as_str()) {
            continue;
        }
        task_args.insert(key.clone(), value.clone());
    }

    let mut envelope = Map::new();
    envelope.insert("action".into(), json!(action));
    envelope.insert("args".into(), Value::Object(task_args));
    for key in &ENVELOPE_KEYS[1..] {
        if let Some(value) = args.get(*key)
            && !value.is_null()
        {
            envelope.insert((*key).to_string(), value.clone());
        }
    }
    Ok(envelope)
}

/// Handler for `management.execute`.
pub fn execute(
    args: &Map<String, Value>,
    service: &dyn ManagementService,
) -> Result<Value, ErrorCode> {
    let envelope = build_task_envelope(args)?;
    service.execute(&envelope)
}

#[derive(Debug, Clone)]
struct TaskRecord {
    id: u64,
    title: String,
    status: &'static str,
}

/// Minimal in-memory task store for tests and single-process use.
#[derive(Debug, Default)]
pub struct InMemoryManagement {
    tasks: Mutex<Vec<TaskRecord>>,
}

impl InMemoryManagement {
    fn set_status(&self, envelope: &Map<String, Value>, status: &'static str) -> Result<Value, ErrorCode> {
        let id = envelope
            .get("args")
            .and_then(|a| a.get("task_id"))
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| ErrorCode::ArgMissing("task_id".to_string()))?;
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ErrorCode::NotFound)?;
        task.status = status;
        Ok(json!({"id": task.id, "title": task.title, "status": task.status}))
    }
}

impl ManagementService for InMemoryManagement {
    fn execute(&self, envelope: &Map<String, Value>) -> Result<Value, ErrorCode> {
        let action = envelope
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let result = match action {
            "create_task" => {
                let title = envelope
                    .get("args")
                    .and_then(|a| a.get("title"))
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| ErrorCode::ArgMissing("title".to_string()))?;
                let mut tasks = self.tasks.lock().unwrap();
                let id = tasks.len() as u64 + 1;
                tasks.push(TaskRecord {
                    id,
                    title: title.to_string(),
                    status: "created",
                });
                json!({"id": id, "title": title, "status": "created"})
            }
            "start_task" => self.set_status(envelope, "started")?,
            "complete_task" => self.set_status(envelope, "completed")?,
            "list_tasks" => {
                let tasks = self.tasks.lock().unwrap();
                json!(
                    tasks
                        .iter()
                        .map(|t| json!({"id": t.id, "title": t.title, "status": t.status}))
                        .collect::<Vec<_>>()
                )
            }
            _ => return Err(ErrorCode::Tool("E_UNKNOWN_ACTION".to_string())),
        };
        Ok(json!({"action": action, "result": result}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn test_envelope_requires_action() {
        let result = build_task_envelope(&args(&[("title", "Demo")]));
        assert_eq!(result, Err(ErrorCode::ArgMissing("action".to_string())));
    }

    #[test]
    fn test_envelope_folds_flat_keys_into_args() {
        let envelope =
            build_task_envelope(&args(&[("action", "create_task"), ("title", "Demo"), ("trace_id", "t-1")]))
                .unwrap();
        assert_eq!(envelope["action"], "create_task");
        assert_eq!(envelope["args"]["title"], "Demo");
        assert_eq!(envelope["trace_id"], "t-1");
        assert!(envelope["args"].get("trace_id").is_none());
    }

    #[test]
    fn test_create_start_complete_round_trip() {
        let service = InMemoryManagement::default();

        let created = execute(&args(&[("action", "create_task"), ("title", "Demo")]), &service).unwrap();
        assert_eq!(created["action"], "create_task");
        assert_eq!(created["result"]["status"], "created");

        let started = execute(&args(&[("action", "start_task"), ("task_id", "1")]), &service).unwrap();
        assert_eq!(started["result"]["status"], "started");

        let completed =
            execute(&args(&[("action", "complete_task"), ("task_id", "1")]), &service).unwrap();
        assert_eq!(completed["result"]["status"], "completed");
    }

    #[test]
    fn test_unknown_action_is_business_error() {
        let service = InMemoryManagement::default();
        let result = execute(&args(&[("action", "explode")]), &service);
        assert_eq!(result, Err(ErrorCode::Tool("E_UNKNOWN_ACTION".to_string())));
    }

    #[test]
    fn test_missing_task_is_not_found() {
        let service = InMemoryManagement::default();
        let result = execute(&args(&[("action", "start_task"), ("task_id", "99")]), &service);
        assert_eq!(result, Err(ErrorCode::NotFound));
    }
}
