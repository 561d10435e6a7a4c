pub mod traits;
pub mod weather;

pub use traits::{Tool, ToolDefinition};
pub use weather::{WeatherFromCoordsTool, WeatherTool, GET_WEATHER, GET_WEATHER_FROM_COORDS};

use crate::open_meteo::OpenMeteoClient;
use crate::types::{ToolCall, ToolResult};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by registry dispatch.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No registered tool has the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The handler itself failed.
    #[error("Tool '{tool}' failed: {source:#}")]
    Execution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn Tool>,
}

/// Ordered collection of tools, populated at startup and read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|t| &t.definition.name))
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tool. Names are not checked for uniqueness; the first
    /// registration of a name wins on dispatch.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.push(RegisteredTool {
            definition: tool.definition(),
            handler: Arc::new(tool),
        });
    }

    /// Descriptors in registration order.
    pub fn list(&self) -> impl Iterator<Item = &ToolDefinition> + Clone + '_ {
        self.tools.iter().map(|t| &t.definition)
    }

    /// All descriptors in function-calling wire form.
    pub fn function_schemas(&self) -> serde_json::Value {
        serde_json::Value::Array(self.list().map(ToolDefinition::function_schema).collect())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.list().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke the named tool, propagating handler failures.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.definition.name == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        debug!("Dispatching tool '{}'", name);
        tool.handler
            .execute(args)
            .await
            .map_err(|source| ToolError::Execution {
                tool: name.to_string(),
                source,
            })
    }

    /// Execute a tool call, folding every failure into an unsuccessful result.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.dispatch(&call.name, call.arguments.clone()).await {
            Ok(output) => ToolResult {
                tool_call_id: call.id.clone(),
                output,
                success: true,
            },
            Err(e) => ToolResult {
                tool_call_id: call.id.clone(),
                output: format!("Error: {}", e),
                success: false,
            },
        }
    }
}

/// Build the registry with both weather tools sharing one client.
pub fn weather_registry(client: OpenMeteoClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WeatherFromCoordsTool::new(client.clone()));
    registry.register(WeatherTool::new(client));
    registry
}
