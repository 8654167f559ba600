//! Wraps a plain Rust function into an engine-compatible [`ToolHandle`].

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use oda_engine::{EngineResult, ToolHandle};
use serde_json::Value;

type BoxedInvoke =
    Box<dyn Fn(Value) -> Pin<Box<dyn Future<Output = EngineResult<Value>> + Send>> + Send + Sync>;

/// A [`ToolHandle`] built from a plain closure.
///
/// Synchronous functions are wrapped by returning `futures::future::ready(..)`
/// from the closure; asynchronous ones return any `Send` future directly.
pub struct FunctionTool {
    name: String,
    invoke: BoxedInvoke,
}

impl FunctionTool {
    /// Wrap `f` under `name`.
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EngineResult<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            invoke: Box::new(move |args| Box::pin(f(args))),
        }
    }
}

#[async_trait]
impl ToolHandle for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, args: Value) -> EngineResult<Value> {
        (self.invoke)(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::ready;
    use serde_json::json;

    #[tokio::test]
    async fn wraps_a_synchronous_function() {
        let tool = FunctionTool::new("echo", |args| ready(Ok(args)));
        let out = tool.invoke(json!({"x": 1})).await.unwrap();
        assert_eq!(out, json!({"x": 1}));
    }

    #[tokio::test]
    async fn wraps_an_asynchronous_function() {
        let tool = FunctionTool::new("double", |args| async move {
            let n = args.as_i64().unwrap_or(0);
            Ok(json!(n * 2))
        });
        let out = tool.invoke(json!(21)).await.unwrap();
        assert_eq!(out, json!(42));
    }
}
