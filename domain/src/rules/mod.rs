//! Deterministic text rules — normalization, slot extraction and the two
//! regex router tiers.
//!
//! The quick table ([`quick`]) is the zero-cost pre-check tried before any
//! network stage; the legacy table ([`legacy`]) is the terminal fallback
//! that works with every remote dependency down. Both emit commands from
//! the shared [`tool`](crate::tool) vocabulary only.

pub mod hints;
pub mod legacy;
pub mod normalize;
pub mod quick;
pub mod slots;

use serde_json::{Map, Value};

/// Parse trailing `key=value` tokens of a management phrase.
///
/// Every token must contain `=`; one bad token rejects the whole phrase so
/// a half-parsed management command never reaches execution.
pub(crate) fn parse_management_args(action: &str, rest: Option<&str>) -> Option<Map<String, Value>> {
    let mut args = Map::new();
    args.insert("action".to_string(), Value::String(action.to_string()));
    if let Some(rest) = rest {
        for token in rest.split_whitespace() {
            let (key, value) = token.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            args.insert(
                key.to_string(),
                Value::String(normalize::clean_str(value)),
            );
        }
    }
    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_args_parsed() {
        let args = parse_management_args("start_task", Some("task_id=7")).unwrap();
        assert_eq!(args["action"], "start_task");
        assert_eq!(args["task_id"], "7");
    }

    #[test]
    fn test_management_args_reject_bare_token() {
        assert!(parse_management_args("start_task", Some("task_id=7 oops")).is_none());
        assert!(parse_management_args("start_task", Some("=7")).is_none());
    }

    #[test]
    fn test_management_args_without_rest() {
        let args = parse_management_args("list_tasks", None).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args["action"], "list_tasks");
    }
}
