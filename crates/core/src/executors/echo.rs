use async_trait::async_trait;
use serde_json::Value;

use crate::agent::{Agent, AgentError};
use crate::overrides::Overrides;

/// Returns the overrides it was given as a JSON object.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoAgent;

#[async_trait]
impl Agent for EchoAgent {
    async fn run(&self, overrides: &Overrides) -> Result<Value, AgentError> {
        Ok(Value::Object(
            overrides
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ))
    }
}
