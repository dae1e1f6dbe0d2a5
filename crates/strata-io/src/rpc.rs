//! Dispatch of JSON remote calls onto the open databases.
//!
//! A request is `{ "target": …, "method": …, "arguments": [ … ] }`. The
//! response is an existence probe result, the method's return value, or
//! `{ "error": … }`. Scalar return values are wrapped as `{ "response": v }`
//! so every response is a JSON object or array.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::WorldDatabase;
use crate::error::PersistError;

/// The target name that lists open databases.
pub const SERVER_DATABASE: &str = "ServerDatabase";

/// A remote call envelope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JsonCall {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,
}

impl JsonCall {
    pub fn probe(target: &str) -> Self {
        Self {
            target: Some(target.to_string()),
            ..Self::default()
        }
    }

    pub fn new(target: &str, method: &str, arguments: Vec<Value>) -> Self {
        Self {
            target: Some(target.to_string()),
            method: Some(method.to_string()),
            arguments,
        }
    }
}

/// The set of databases reachable by remote calls, keyed by label.
#[derive(Debug, Default)]
pub struct Scope {
    databases: BTreeMap<String, WorldDatabase>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, database: WorldDatabase) {
        self.databases.insert(database.label().to_string(), database);
    }

    pub fn get(&self, label: &str) -> Option<&WorldDatabase> {
        self.databases.get(label)
    }

    /// Labels of the open databases.
    pub fn open_databases(&self) -> Vec<String> {
        self.databases.keys().cloned().collect()
    }

    /// Parse a request body and answer it with a response body.
    pub fn handle_json(&self, body: &str) -> String {
        let response = match serde_json::from_str::<JsonCall>(body) {
            Ok(call) => self.dispatch(&call),
            Err(err) => json!({ "error": err.to_string() }),
        };
        response.to_string()
    }

    pub fn dispatch(&self, call: &JsonCall) -> Value {
        let Some(target) = call.target.as_deref() else {
            return json!({ "targetExists": false });
        };
        let is_server = target == SERVER_DATABASE;
        let database = self.databases.get(target);
        if !is_server && database.is_none() {
            log::debug!("rpc: unknown target '{target}'");
            return json!({ "targetExists": false });
        }
        let Some(method) = call.method.as_deref() else {
            return json!({ "targetExists": true });
        };

        let result = match database {
            Some(db) => invoke_database(db, method, &call.arguments),
            None => match method {
                "openDatabases" => Some(Ok(json!(self.open_databases()))),
                _ => None,
            },
        };
        match result {
            None => {
                log::debug!("rpc: '{target}' has no method '{method}'");
                json!({ "targetExists": true, "methodExists": false })
            }
            Some(Ok(value)) => wrap_response(value),
            Some(Err(err)) => {
                log::warn!("rpc: {target}.{method} failed: {err}");
                json!({ "error": err.to_string() })
            }
        }
    }
}

fn wrap_response(value: Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) | Value::Null => value,
        scalar => json!({ "response": scalar }),
    }
}

fn string_arg(
    method: &str,
    arguments: &[Value],
    index: usize,
    name: &str,
) -> Result<String, PersistError> {
    arguments
        .get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| PersistError::BadArguments {
            method: method.to_string(),
            message: format!("argument {index} ('{name}') must be a string"),
        })
}

fn add_file(db: &WorldDatabase, arguments: &[Value]) -> Result<Value, PersistError> {
    let data = match arguments.first() {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(PersistError::BadArguments {
                method: "addFile".to_string(),
                message: "missing 'data'".to_string(),
            })
        }
    };
    let name = string_arg("addFile", arguments, 1, "filename")?;
    db.add_file(&name, &data)?;
    Ok(json!({ "success": "File was added to database" }))
}

/// `None` when the method does not exist.
fn invoke_database(
    db: &WorldDatabase,
    method: &str,
    arguments: &[Value],
) -> Option<Result<Value, PersistError>> {
    let result = match method {
        "getFileNames" => db.file_names().map(|names| json!(names)),
        "getFile" => {
            string_arg(method, arguments, 0, "filename").and_then(|name| db.get_json(&name))
        }
        "addFile" => add_file(db, arguments),
        "removeFile" => string_arg(method, arguments, 0, "filename")
            .and_then(|name| db.remove_file(&name))
            .map(|_| json!({ "success": "File was removed from database" })),
        "removeAllFiles" => db.remove_all_files().map(|_| json!(true)),
        _ => return None,
    };
    Some(result)
}
