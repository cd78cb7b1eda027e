//! CLI command implementations
//!
//! Each command loads the config, installs logging, opens the gateway and
//! does one thing. Nothing here talks to SQLite directly.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::gateway::{DictionaryStore, QueryOutcome, SqliteGateway, SAMPLE_ROWS};
use crate::http_server::HttpServer;
use crate::observability::init_logging;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json, write_response};

/// Operation selector of a one-shot query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOp {
    All,
    Get,
    Filter,
    Insert,
    Update,
    Delete,
}

/// `{"op": ..., "id"?: ..., "body"?: ...}` read by `query`
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub op: QueryOp,
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub body: Value,
}

impl QueryRequest {
    pub fn from_value(value: Value) -> CliResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| CliError::invalid_request(format!("Invalid query request: {}", e)))
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Seed { config } => seed(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Query { config } => query(&config),
    }
}

fn load(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    init_logging(&config.log_level);
    Ok(config)
}

/// `init` and `seed` only make sense against a database that outlives the process
fn require_persistent(config: &Config, command: &str) -> CliResult<()> {
    if config.is_in_memory() {
        return Err(CliError::config_error(format!(
            "'{}' needs a file database_path; ':memory:' would discard the result",
            command
        )));
    }
    Ok(())
}

/// Open the configured database, creating the schema if needed
pub fn open_gateway(config: &Config) -> CliResult<SqliteGateway> {
    let gateway = if config.is_in_memory() {
        SqliteGateway::open_in_memory(config.dictionary.clone())?
    } else {
        SqliteGateway::open(&config.database_path, config.dictionary.clone())?
    };
    Ok(gateway)
}

/// Create the table and unique indexes
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    require_persistent(&config, "init")?;
    open_gateway(&config)?;
    info!(database = %config.database_path, table = %config.dictionary.table, "dictionary initialized");

    write_response(json!({
        "initialized": true,
        "database_path": config.database_path,
        "table": config.dictionary.table,
    }))
}

/// Replace the table contents with the sample rows
pub fn seed(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    require_persistent(&config, "seed")?;
    let gateway = open_gateway(&config)?;

    let inserted = gateway.seed_raw(&SAMPLE_ROWS)?;
    info!(inserted, "sample rows inserted");

    write_response(json!({ "seeded": inserted }))
}

/// Serve the REST API until the listener fails
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = load(config_path)?;
    let gateway = Arc::new(open_gateway(&config)?);

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::new(http_config, gateway);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Execute one operation from stdin and print its outcome
pub fn query(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let gateway = open_gateway(&config)?;

    let request = QueryRequest::from_value(read_request()?)?;
    let outcome = execute(&gateway, &request);

    write_json(&outcome)
}

/// Dispatch a query request to a store
pub fn execute<S: DictionaryStore>(store: &S, request: &QueryRequest) -> QueryOutcome {
    let result = match request.op {
        QueryOp::All => store.fetch_all(),
        QueryOp::Get => store.fetch_by_id(&request.id),
        QueryOp::Filter => store.fetch_by_filter(&request.body),
        QueryOp::Insert => store.insert(&request.body),
        QueryOp::Update => store.update_by_id(&request.id, &request.body),
        QueryOp::Delete => store.delete_by_id(&request.id),
    };

    QueryOutcome::from_result(result, store.config())
}
