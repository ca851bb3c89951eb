use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ftoolbox::prelude::*;
use serde_json::{Map, Value, json};

struct TempDatabase {
    path: PathBuf,
}

impl TempDatabase {
    fn seeded(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("ftoolbox-{label}-{nanos}.db"));
        let seed = SqliteSource::open("seed", &path).expect("seed source should open");
        seed.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, email TEXT);
             INSERT INTO users (id, name, email) VALUES
                 (1, 'ada', 'ada@example.com'),
                 (5, 'grace', NULL),
                 (7, 'linus', 'linus@example.com');",
        )
        .expect("seed should apply");
        Self { path }
    }

    fn config(&self, tools: Value, runtime: Value) -> ToolboxConfig {
        let raw = json!({
            "sources": { "app-db": { "kind": "sqlite", "path": self.path } },
            "tools": tools,
            "runtime": runtime,
        });
        ToolboxConfig::from_json_str(&raw.to_string()).expect("config should parse")
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn lookup_tool(extra: Value) -> Value {
    let mut tool = json!({
        "kind": "sqlite-sql",
        "source": "app-db",
        "description": "Looks up a user by id",
        "statement": "SELECT id, name, email FROM {{.table}} WHERE id = ?",
        "parameters": [{ "name": "id", "type": "integer", "description": "User id" }],
        "templateParameters": [{ "name": "table", "type": "string", "description": "Table" }]
    });
    if let (Some(object), Value::Object(extra)) = (tool.as_object_mut(), extra) {
        object.extend(extra);
    }
    tool
}

#[tokio::test(flavor = "multi_thread")]
async fn configured_tool_answers_through_the_runtime() {
    let db = TempDatabase::seeded("lookup");
    let config = db.config(json!({ "lookup_user": lookup_tool(json!({})) }), json!({}));
    let toolbox = build_toolbox(&config).expect("toolbox should build");

    let ctx = context("session-1");
    let call = session_tool_call(&ctx, "lookup_user", &json!({ "id": 5, "table": "users" }));
    let result = toolbox
        .runtime
        .execute(call, ctx)
        .await
        .expect("lookup should succeed");

    assert_eq!(result.tool_call_id, "session-1-lookup_user");
    assert_eq!(result.output, r#"[{"id":5,"name":"grace","email":null}]"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn schema_manifest_lists_standard_then_template_parameters() {
    let db = TempDatabase::seeded("manifest");
    let config = db.config(json!({ "lookup_user": lookup_tool(json!({})) }), json!({}));
    let toolbox = build_toolbox(&config).expect("toolbox should build");

    let tool = toolbox.tool("lookup_user").expect("tool should be registered");
    let names = tool
        .manifest()
        .parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["id", "table"]);

    let schemas = toolbox.schema_manifests();
    assert_eq!(schemas.len(), 1);
    assert_eq!(schemas[0].name, "lookup_user");
    assert_eq!(schemas[0].input_schema.required, vec!["id", "table"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_argument_is_rejected_before_execution() {
    let db = TempDatabase::seeded("missing");
    let config = db.config(json!({ "lookup_user": lookup_tool(json!({})) }), json!({}));
    let toolbox = build_toolbox(&config).expect("toolbox should build");

    let error = toolbox
        .runtime
        .execute(
            tool_call("call-1", "lookup_user", &json!({ "table": "users" })),
            context("session-1"),
        )
        .await
        .expect_err("missing id should fail");

    assert_eq!(error.kind, ToolErrorKind::InvalidArguments);
    assert_eq!(error.tool_name.as_deref(), Some("lookup_user"));
    assert_eq!(error.tool_call_id.as_deref(), Some("call-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn tools_requiring_auth_reject_unverified_callers() {
    let db = TempDatabase::seeded("auth");
    let config = db.config(
        json!({ "lookup_user": lookup_tool(json!({ "authRequired": ["corp-sso"] })) }),
        json!({}),
    );
    let toolbox = build_toolbox(&config).expect("toolbox should build");
    let arguments = json!({ "id": 1, "table": "users" });

    let error = toolbox
        .runtime
        .execute(tool_call("call-1", "lookup_user", &arguments), context("anonymous"))
        .await
        .expect_err("unverified caller should be rejected");
    assert_eq!(error.kind, ToolErrorKind::Unauthorized);

    let verified = context("employee").with_verified_auth_service("corp-sso");
    let result = toolbox
        .runtime
        .execute(tool_call("call-2", "lookup_user", &arguments), verified)
        .await
        .expect("verified caller should succeed");
    assert_eq!(result.output, r#"[{"id":1,"name":"ada","email":"ada@example.com"}]"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn auth_sourced_parameters_read_verified_claims() {
    let db = TempDatabase::seeded("claims");
    let tool = json!({
        "kind": "sqlite-sql",
        "source": "app-db",
        "description": "Returns the caller's profile",
        "statement": "SELECT name FROM users WHERE id = ?",
        "parameters": [{
            "name": "id",
            "type": "integer",
            "description": "Caller id",
            "authServices": [{ "name": "corp-sso", "field": "uid" }]
        }]
    });
    let config = db.config(json!({ "whoami": tool }), json!({}));
    let toolbox = build_toolbox(&config).expect("toolbox should build");

    let mut claims = Map::new();
    claims.insert("uid".to_string(), json!(7));
    let ctx = context("employee").with_claims("corp-sso", claims);

    let result = toolbox
        .runtime
        .execute(tool_call("call-1", "whoami", &json!({ "id": 1 })), ctx)
        .await
        .expect("claims lookup should succeed");
    assert_eq!(result.output, r#"[{"name":"linus"}]"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_queries_time_out_and_are_cancelled() {
    let db = TempDatabase::seeded("timeout");
    let tool = json!({
        "kind": "sqlite-sql",
        "source": "app-db",
        "description": "Counts for a long time",
        "statement": "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 50000000) SELECT x FROM c"
    });
    let config = db.config(
        json!({ "count_up": tool }),
        json!({ "timeoutMs": 5, "observability": false }),
    );
    let toolbox = build_toolbox(&config).expect("toolbox should build");

    let error = toolbox
        .runtime
        .execute(tool_call("call-1", "count_up", &json!({})), context("session-1"))
        .await
        .expect_err("query should time out");

    assert_eq!(error.kind, ToolErrorKind::Timeout);
    assert!(error.is_retryable());
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_tools_are_reported_as_not_found() {
    let db = TempDatabase::seeded("unknown");
    let config = db.config(json!({}), json!({}));
    let toolbox = build_toolbox(&config).expect("toolbox should build");

    let error = toolbox
        .runtime
        .execute(tool_call("call-1", "drop_tables", &json!({})), context("session-1"))
        .await
        .expect_err("unknown tool should fail");
    assert_eq!(error.kind, ToolErrorKind::NotFound);
}

#[test]
fn build_fails_on_first_invalid_tool() {
    let db = TempDatabase::seeded("invalid");
    let config = db.config(
        json!({
            "broken": {
                "kind": "sqlite-sql",
                "source": "app-db",
                "description": "Duplicate names",
                "statement": "SELECT {{.id}} FROM users WHERE id = ?",
                "parameters": [{ "name": "id", "type": "integer", "description": "Id" }],
                "templateParameters": [{ "name": "id", "type": "string", "description": "Id" }]
            }
        }),
        json!({}),
    );

    let error = build_toolbox(&config).err().expect("duplicate names should fail");
    assert_eq!(error.kind, ToolboxErrorKind::Tool);
}
