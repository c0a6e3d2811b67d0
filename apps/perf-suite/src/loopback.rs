//! In-process command client
//!
//! Every command is serialized to bytes, parsed by an embedded responder,
//! and the reply is serialized and parsed again on the way back, so a round
//! trip costs two encodes and two decodes like a real wire exchange.

use serde_json::{json, Map, Value};
use thiserror::Error;

/// Largest document the responder advertises in its handshake reply
pub const MAX_DOCUMENT_SIZE: u64 = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum LoopbackError {
    #[error("Command must be a JSON object")]
    NotADocument,

    #[error("Command document is empty")]
    EmptyCommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// One simulated connection
#[derive(Debug, Default)]
pub struct LoopbackClient {
    id: usize,
    commands_sent: u64,
}

impl LoopbackClient {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            commands_sent: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Commands successfully answered on this connection.
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    /// Send one command and return the decoded reply.
    pub fn command(&mut self, command: &Value) -> Result<Value, LoopbackError> {
        let request = serde_json::to_vec(command)?;
        let response = respond(&request)?;
        let reply: Value = serde_json::from_slice(&response)?;
        self.commands_sent += 1;
        Ok(reply)
    }

    pub fn ping(&mut self) -> Result<(), LoopbackError> {
        self.command(&json!({ "ping": 1 })).map(|_| ())
    }
}

/// The responder side: decode a request, dispatch on its first key, and
/// encode the reply.
fn respond(request: &[u8]) -> Result<Vec<u8>, LoopbackError> {
    let command: Map<String, Value> = match serde_json::from_slice(request)? {
        Value::Object(map) => map,
        _ => return Err(LoopbackError::NotADocument),
    };
    let Some(name) = command.keys().next() else {
        return Err(LoopbackError::EmptyCommand);
    };

    let reply = match name.as_str() {
        "ping" => json!({ "ok": 1 }),
        "ismaster" | "hello" => json!({
            "ismaster": true,
            "maxBsonObjectSize": MAX_DOCUMENT_SIZE,
            "maxWireVersion": 17,
            "ok": 1
        }),
        other => return Err(LoopbackError::UnknownCommand(other.to_string())),
    };

    Ok(serde_json::to_vec(&reply)?)
}
