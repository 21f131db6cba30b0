/// Tool registry and dispatcher
///
/// The catalogue is built once at startup and never mutated. Dispatch never
/// produces a JSON-RPC error: every failure, including an unknown tool name,
/// comes back as a tool result with `isError` set.

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::TenancyMode;
use crate::domain::Organization;
use crate::mcp::protocol::{CallToolParams, ToolCallResult, ToolDefinition};
use crate::storage::DocumentStore;
use crate::tools::{self, GetDocArgs, ListDocsArgs, SearchDocsArgs};

/// Argument naming the organization in [`TenancyMode::Argument`]
pub const ORG_ARGUMENT: &str = "org";

/// How a request's organization was (or will be) resolved
#[derive(Debug, Clone, PartialEq)]
pub enum OrgScope {
    /// Already resolved by the transport (URL path or `--org`)
    Pinned(Organization),
    /// Each tool call supplies its own `org` argument
    PerCall,
}

/// The tools this server offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocTool {
    ListDocs,
    GetDoc,
    SearchDocs,
}

impl DocTool {
    pub const ALL: [DocTool; 3] = [DocTool::ListDocs, DocTool::GetDoc, DocTool::SearchDocs];

    pub fn name(self) -> &'static str {
        match self {
            DocTool::ListDocs => "list_docs",
            DocTool::GetDoc => "get_doc",
            DocTool::SearchDocs => "search_docs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            DocTool::ListDocs => "List all published documentation for the organization",
            DocTool::GetDoc => "Get the full content of a published document by its slug",
            DocTool::SearchDocs => {
                "Search published documentation by title, description and content (up to 10 results)"
            }
        }
    }

    fn input_schema(self) -> Value {
        match self {
            DocTool::ListDocs => schema_of::<ListDocsArgs>(),
            DocTool::GetDoc => schema_of::<GetDocArgs>(),
            DocTool::SearchDocs => schema_of::<SearchDocsArgs>(),
        }
    }
}

/// JSON schema for an argument struct, trimmed to what MCP clients expect
fn schema_of<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({}));
    if let Value::Object(object) = &mut schema {
        object.remove("$schema");
        object.remove("title");
        object.insert("type".to_string(), json!("object"));
        object.entry("properties").or_insert_with(|| json!({}));
    }
    schema
}

/// Add the required `org` argument to a tool schema
fn with_org_argument(mut schema: Value) -> Value {
    if let Value::Object(object) = &mut schema {
        if let Some(Value::Object(properties)) = object.get_mut("properties") {
            properties.insert(
                ORG_ARGUMENT.to_string(),
                json!({"type": "string", "description": "Organization slug"}),
            );
        }
        let required = object.entry("required").or_insert_with(|| json!([]));
        if let Value::Array(required) = required {
            required.insert(0, json!(ORG_ARGUMENT));
        }
    }
    schema
}

/// Immutable catalogue of tools plus the dispatch logic
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tenancy: TenancyMode,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(tenancy: TenancyMode) -> Self {
        let definitions = DocTool::ALL
            .into_iter()
            .map(|tool| {
                let schema = tool.input_schema();
                ToolDefinition {
                    name: tool.name().to_string(),
                    description: tool.description().to_string(),
                    input_schema: match tenancy {
                        TenancyMode::Argument => with_org_argument(schema),
                        TenancyMode::Path => schema,
                    },
                }
            })
            .collect();

        Self {
            tenancy,
            definitions,
        }
    }

    pub fn tenancy(&self) -> TenancyMode {
        self.tenancy
    }

    /// Full catalogue, as returned by `tools/list`
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// Run a tool call to completion; never fails at the protocol level
    pub async fn call(
        &self,
        store: &dyn DocumentStore,
        scope: &OrgScope,
        params: CallToolParams,
    ) -> ToolCallResult {
        let CallToolParams { name, mut arguments } = params;

        let Some(tool) = DocTool::from_name(&name) else {
            warn!("Call to unknown tool: {}", name);
            return ToolCallResult::error(format!("Unknown tool: {}", name));
        };

        let org = match scope {
            OrgScope::Pinned(org) => org.clone(),
            OrgScope::PerCall => {
                let slug = match arguments.remove(ORG_ARGUMENT) {
                    Some(Value::String(slug)) => slug,
                    _ => {
                        return ToolCallResult::error(format!(
                            "Missing required argument '{}' (organization slug)",
                            ORG_ARGUMENT
                        ))
                    }
                };
                match store.find_organization_by_slug(&slug).await {
                    Ok(Some(org)) => org,
                    Ok(None) => {
                        return ToolCallResult::success(format!("Organization '{}' not found.", slug))
                    }
                    Err(e) => {
                        warn!("Organization lookup for '{}' failed: {}", slug, e);
                        return ToolCallResult::error(format!("Failed to look up organization: {}", e));
                    }
                }
            }
        };

        debug!("Calling {} for organization {}", name, org.slug);

        let outcome = match tool {
            DocTool::ListDocs => match parse_arguments::<ListDocsArgs>(tool, arguments) {
                Ok(_) => tools::list_docs(store, &org).await,
                Err(result) => return result,
            },
            DocTool::GetDoc => match parse_arguments::<GetDocArgs>(tool, arguments) {
                Ok(args) => tools::get_doc(store, &org, args).await,
                Err(result) => return result,
            },
            DocTool::SearchDocs => match parse_arguments::<SearchDocsArgs>(tool, arguments) {
                Ok(args) => tools::search_docs(store, &org, args).await,
                Err(result) => return result,
            },
        };

        match outcome {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!("{} failed for {}: {}", name, org.slug, e);
                ToolCallResult::error(format!("{} failed: {}", name, e))
            }
        }
    }
}

/// Deserialize tool arguments into the same struct their schema came from
fn parse_arguments<T: DeserializeOwned>(
    tool: DocTool,
    arguments: Map<String, Value>,
) -> Result<T, ToolCallResult> {
    serde_json::from_value(Value::Object(arguments)).map_err(|e| {
        ToolCallResult::error(format!("Invalid arguments for {}: {}", tool.name(), e))
    })
}
