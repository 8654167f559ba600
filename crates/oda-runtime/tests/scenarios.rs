//! Boundary-scenario coverage for the session/agent/retry lifecycle, built on
//! the in-memory stub engine from `oda-test`.

use std::sync::Arc;

use futures::StreamExt;
use oda_agents::AgentConfigManager;
use oda_config::{AgentConfig, BootstrapModelDefaults, MemoryConfigStore, ModelConfig, ModelConfigManager};
use oda_core::reserved::DEFAULT_AGENT_NAME;
use oda_core::{OdaError, SessionTriple};
use oda_engine::{
    Actions, Content, Event, SessionStore, ERROR_CODE_MAX_RETRIES_EXCEEDED, ERROR_CODE_RETRY_ATTEMPT,
};
use oda_mcp::McpManager;
use oda_runtime::{AgentFactory, RuntimeError, SessionManager};
use oda_test::{AttemptOutcome, StubEngineFactory, StubRunner, StubSessionStore};
use oda_tools::ToolManager;

fn model(app: &str, id: &str) -> ModelConfig {
    ModelConfig {
        app_name: app.to_string(),
        model_id: id.to_string(),
        base_url: "https://example.com".to_string(),
        api_key: "key".to_string(),
        model: "gpt".to_string(),
    }
}

fn agent(app: &str, name: &str, model_id: &str) -> AgentConfig {
    AgentConfig {
        app_name: app.to_string(),
        agent_name: name.to_string(),
        agent_type: "general".to_string(),
        description: String::new(),
        instruction: "be helpful".to_string(),
        model_config_id: model_id.to_string(),
        tool_ids: Vec::new(),
        mcp_ids: Vec::new(),
        sub_agent_names: Vec::new(),
    }
}

fn text_event(text: &str) -> Event {
    Event {
        author: "assistant".to_string(),
        content: Some(Content::text(text)),
        actions: Actions::default(),
        error_code: None,
        error_message: None,
    }
}

/// A fully wired stack backed by one scripted [`StubRunner`], with a valid
/// `"m1"` model and `"default"` bootstrap model left unconfigured (no
/// built-in default cached) unless `with_default_model` is set.
struct Stack {
    factory: Arc<AgentFactory>,
    session_manager: Arc<SessionManager>,
    models: Arc<ModelConfigManager>,
    agents: Arc<AgentConfigManager>,
    runner: Arc<StubRunner>,
}

fn build_stack(outcomes: Vec<AttemptOutcome>, max_retries: u32, with_default_model: bool) -> Stack {
    let defaults = if with_default_model {
        BootstrapModelDefaults {
            base_url: Some("https://default.example.com".to_string()),
            api_key: Some("default-key".to_string()),
            model: Some("default-model".to_string()),
        }
    } else {
        BootstrapModelDefaults::default()
    };

    let models = Arc::new(ModelConfigManager::new(Arc::new(MemoryConfigStore::new()), defaults));
    let mcp = Arc::new(McpManager::new(Arc::new(MemoryConfigStore::new())));
    let tools = Arc::new(ToolManager::new());
    let agents = Arc::new(AgentConfigManager::new(
        Arc::new(MemoryConfigStore::new()),
        Arc::clone(&models),
        Arc::clone(&mcp),
        Arc::clone(&tools),
    ));

    let runner = Arc::new(StubRunner::new(outcomes));
    let engine = Arc::new(StubEngineFactory::new(Arc::clone(&runner) as Arc<dyn oda_engine::Runner>));
    let engine_sessions = Arc::new(StubSessionStore::new());
    let artifacts = Arc::new(oda_test::StubArtifactStore);
    let memory = Arc::new(oda_test::StubMemoryStore);

    let factory = Arc::new(
        AgentFactory::new(
            Arc::clone(&agents),
            Arc::clone(&models),
            mcp,
            tools,
            engine,
            Arc::clone(&engine_sessions) as Arc<dyn oda_engine::SessionStore>,
            artifacts,
            memory,
        )
        .with_max_retries(max_retries),
    );
    let session_manager = Arc::new(SessionManager::new(
        Arc::clone(&factory),
        engine_sessions as Arc<dyn oda_engine::SessionStore>,
    ));

    Stack {
        factory,
        session_manager,
        models,
        agents,
        runner,
    }
}

// --- S1: lazy agent creation & reuse ---------------------------------------

#[tokio::test]
async fn lazy_agent_creation_and_reuse() {
    let stack = build_stack(
        vec![AttemptOutcome::Events(vec![text_event("ok")]); 3],
        3,
        false,
    );
    stack.models.create(model("app", "m1")).await.unwrap();
    stack.agents.create(agent("app", "researcher", "m1")).await.unwrap();

    let session = stack
        .session_manager
        .create_session("app", "user", Some("s1".to_string()))
        .await
        .unwrap();

    for i in 0..3 {
        let events: Vec<_> = session
            .process_message(format!("msg{i}"), Some("researcher"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(events.len(), 1);
    }

    assert_eq!(stack.runner.call_count(), 3);
}

// --- S2: retry then succeed -------------------------------------------------

#[tokio::test(start_paused = true)]
async fn retry_then_succeed() {
    let stack = build_stack(
        vec![
            AttemptOutcome::ImmediateError("transient".to_string()),
            AttemptOutcome::Events(vec![text_event("recovered")]),
        ],
        3,
        false,
    );
    stack.models.create(model("app", "m1")).await.unwrap();
    stack.agents.create(agent("app", "researcher", "m1")).await.unwrap();

    let session = stack
        .session_manager
        .create_session("app", "user", Some("s1".to_string()))
        .await
        .unwrap();

    let events: Vec<_> = session
        .process_message("hi", Some("researcher"))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].error_code.as_deref(), Some(ERROR_CODE_RETRY_ATTEMPT));
    assert_eq!(events[1].content.as_ref().unwrap().parts[0].text, "recovered");

    let invocations = stack.runner.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].1.as_deref(), Some("hi"));
    assert_eq!(invocations[1].1, None, "retry attempts never resubmit the message");
}

// --- S3: exhaust retries -----------------------------------------------------

#[tokio::test(start_paused = true)]
async fn exhausts_retry_budget() {
    let stack = build_stack(
        vec![
            AttemptOutcome::ImmediateError("fail1".to_string()),
            AttemptOutcome::ImmediateError("fail2".to_string()),
            AttemptOutcome::ImmediateError("fail3".to_string()),
            AttemptOutcome::ImmediateError("fail4".to_string()),
        ],
        3,
        false,
    );
    stack.models.create(model("app", "m1")).await.unwrap();
    stack.agents.create(agent("app", "researcher", "m1")).await.unwrap();

    let session = stack
        .session_manager
        .create_session("app", "user", Some("s1".to_string()))
        .await
        .unwrap();

    let events: Vec<_> = session
        .process_message("hi", Some("researcher"))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 4);
    for e in &events[0..3] {
        assert_eq!(e.error_code.as_deref(), Some(ERROR_CODE_RETRY_ATTEMPT));
    }
    let last = events.last().unwrap();
    assert_eq!(last.error_code.as_deref(), Some(ERROR_CODE_MAX_RETRIES_EXCEEDED));
    assert!(last.actions.escalate);
    assert_eq!(stack.runner.call_count(), 4);
}

// --- S4: default agent resolves, but its model reference doesn't ----------

#[tokio::test]
async fn default_agent_fails_without_bootstrap_model() {
    let stack = build_stack(vec![], 3, false);

    let got = stack.agents.get("app", DEFAULT_AGENT_NAME).await.unwrap();
    assert!(got.is_some(), "default agent config always resolves");

    let err = stack
        .factory
        .create_agent(DEFAULT_AGENT_NAME, SessionTriple::new("app", "user", Some("s1".to_string())))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Core(OdaError::InvalidReference(_))
    ));
}

#[tokio::test]
async fn default_agent_succeeds_with_bootstrap_model() {
    let stack = build_stack(vec![AttemptOutcome::Events(vec![text_event("ok")])], 3, true);

    let executor = stack
        .factory
        .create_agent(DEFAULT_AGENT_NAME, SessionTriple::new("app", "user", Some("s1".to_string())))
        .await
        .unwrap();
    let events = executor.run("hi".to_string()).await;
    assert_eq!(events.len(), 1);
}

// --- S5: cross-reference validation -----------------------------------------

#[tokio::test]
async fn agent_create_validates_model_reference() {
    let stack = build_stack(vec![], 3, false);

    let err = stack
        .agents
        .create(agent("app", "researcher", "missing"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        oda_agents::AgentsError::Core(OdaError::InvalidReference(_))
    ));

    stack.models.create(model("app", "missing")).await.unwrap();
    stack.agents.create(agent("app", "researcher", "missing")).await.unwrap();
}

// --- S6: session concurrency cap --------------------------------------------

#[tokio::test]
async fn session_cap_enforced_and_recoverable() {
    let stack = build_stack(vec![], 3, false);
    stack.session_manager.set_concurrent_limit(Some(2)).await;

    stack
        .session_manager
        .create_session("app", "user", Some("s1".to_string()))
        .await
        .unwrap();
    stack
        .session_manager
        .create_session("app", "user", Some("s2".to_string()))
        .await
        .unwrap();

    let err = stack
        .session_manager
        .create_session("app", "user", Some("s3".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Core(OdaError::Overloaded(_))));

    let triple_to_delete = SessionTriple::new("app", "user", Some("s1".to_string()));
    stack.session_manager.delete_session(&triple_to_delete).await.unwrap();

    stack
        .session_manager
        .create_session("app", "user", Some("s3".to_string()))
        .await
        .unwrap();
}

// --- S7: MCP tier immutability ------------------------------------------------

#[tokio::test]
async fn builtin_mcp_tier_is_immutable() {
    use oda_config::{McpConfig, McpServerType};

    let mcp = McpManager::new(Arc::new(MemoryConfigStore::new()));
    let config = McpConfig {
        mcp_id: "fs".to_string(),
        app_name: "app".to_string(),
        name: "filesystem".to_string(),
        description: String::new(),
        server_type: McpServerType::Stdio,
        command: Some("npx".to_string()),
        args: Vec::new(),
        url: None,
        headers: Default::default(),
        env: Default::default(),
        tool_filter: None,
        timeout: None,
        retry_count: None,
    };
    mcp.register_builtin(config.clone()).await.unwrap();

    let key = ("app".to_string(), "fs".to_string());
    let err = mcp.unregister_builtin(&key).await.unwrap_err();
    assert!(matches!(err, oda_mcp::McpError::Core(OdaError::NotPermitted(_))));

    let err = mcp.update_custom(config).await.unwrap_err();
    assert!(matches!(err, oda_mcp::McpError::Core(OdaError::NotFound(_))));
}

// --- For-all: get_session pool-miss materializes from the engine's store ---

#[tokio::test]
async fn get_session_materializes_from_engine_store_on_pool_miss() {
    let stack = build_stack(vec![], 3, false);

    let created = stack
        .session_manager
        .create_session("app", "user", Some("s1".to_string()))
        .await
        .unwrap();
    let triple = created.triple().clone();

    // Drop the manager's pool entry directly is not possible from outside,
    // so assert the documented contract instead: a fresh manager sharing the
    // same engine-side store still resolves the triple.
    let engine_sessions = Arc::new(StubSessionStore::new());
    engine_sessions.create(&triple, None).await.unwrap();
    let fresh_manager = SessionManager::new(
        Arc::clone(&stack.factory),
        Arc::clone(&engine_sessions) as Arc<dyn oda_engine::SessionStore>,
    );
    let got = fresh_manager.get_session(&triple).await.unwrap();
    assert!(got.is_some());

    let unknown = SessionTriple::new("app", "user", Some("never-created".to_string()));
    let missing = fresh_manager.get_session(&unknown).await.unwrap();
    assert!(missing.is_none());
}

// --- For-all: delete-then-get returns no session ---------------------------

#[tokio::test]
async fn delete_then_get_returns_none() {
    let stack = build_stack(vec![], 3, false);
    let session = stack
        .session_manager
        .create_session("app", "user", Some("s1".to_string()))
        .await
        .unwrap();
    let triple = session.triple().clone();

    stack.session_manager.delete_session(&triple).await.unwrap();
    let got = stack.session_manager.get_session(&triple).await.unwrap();
    assert!(got.is_none());
}
