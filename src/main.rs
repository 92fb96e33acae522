//! multidb - run one SQL statement through the pooled facade.
//!
//! Statements print their rows-affected count; with `--query` the rows of
//! every result set are printed as JSON lines.

use multidb::config::Config;
use multidb::db::{Database, Rows, Value};
use multidb::{Context, DbError};
use serde_json::{Map, Value as JsonValue, json};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only results.
    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn print_rows(rows: &mut Rows) {
    loop {
        let columns = rows.columns();
        while rows.next() {
            let Ok(values) = rows.slice_scan() else { break };
            let record: Map<String, JsonValue> = columns
                .iter()
                .cloned()
                .zip(values.iter().map(Value::to_json))
                .collect();
            println!("{}", JsonValue::Object(record));
        }
        if !rows.next_result_set() {
            break;
        }
    }
}

async fn run(config: &Config) -> Result<(), DbError> {
    let db_config = config.to_db_config()?;
    let query_timeout = config.query_timeout_duration()?;

    let db = Database::open(db_config).await?;
    info!(id = db.id(), engine = %db.engine(), "Connected");

    // The query budget starts once the connection is up.
    let ctx = match query_timeout {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::background(),
    };

    let args: Vec<Value> = config.args.iter().cloned().map(Value::from).collect();
    let result = if config.query {
        db.query_context(&ctx, &config.sql, &args)
            .await
            .and_then(|mut rows| {
                print_rows(&mut rows);
                rows.err().cloned().map_or(Ok(()), Err)
            })
    } else {
        db.exec_context(&ctx, &config.sql, &args)
            .await
            .map(|result| {
                println!(
                    "{}",
                    json!({
                        "rows_affected": result.rows_affected,
                        "last_insert_id": result.last_insert_id,
                    })
                );
            })
    };

    db.close();
    result
}

#[tokio::main]
async fn main() {
    let config = Config::parse_args();
    init_tracing(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting multidb");

    if let Err(e) = run(&config).await {
        error!(error = %e, "Statement failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
