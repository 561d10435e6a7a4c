//! Shared types used across the tool host.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Function calling
// ---------------------------------------------------------------------------

/// A tool call request from the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Result of executing a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub output: String,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}
