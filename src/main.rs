//! stream-toolkit command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI ──▶ config (TOML + flags) ──▶ logging
//!    │
//!    ├── reads ──▶ retry_with_backoff (per page / per read) ──▶ TableWalker / StreamQuery ──▶ RpcClient ──▶ full node
//!    │
//!    ├── writes ─▶ StreamCalls ──▶ Submitter (sign locally) ──▶ RpcClient ──▶ full node
//!    │
//!    └── faucet ─▶ FaucetClient ──▶ faucet service
//! ```
//!
//! Results are printed as pretty JSON on stdout; logs go to stderr. An
//! interrupted `entries --all` prints what it read and the cursor to pass
//! back through `--cursor`.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use stream_toolkit::config::{load_config, ToolkitConfig};
use stream_toolkit::faucet::FaucetClient;
use stream_toolkit::keys::SuiKeypair;
use stream_toolkit::observability::logging::init_logging;
use stream_toolkit::resilience::{collect_entries_with_retries, retry_with_backoff};
use stream_toolkit::rpc::{Address, DynamicFieldName, ObjectId, RpcClient};
use stream_toolkit::stream::{CreateStream, StreamCalls, StreamQuery, Submitter};
use stream_toolkit::walker::{Cursor, FieldPath, StorageHandle, TableWalker};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "stream-toolkit")]
#[command(about = "Query and manage payment streams on a Sui network", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured JSON-RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Incoming,
    Outgoing,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive and print the signer address
    Address,
    /// Request test coins from the faucet
    Faucet {
        /// Recipient (defaults to the signer)
        #[arg(long)]
        address: Option<Address>,
    },
    /// Resolve the storage handle of a table inside an object
    Resolve {
        root: ObjectId,
        /// Dot-separated field path, e.g. incoming_stream.id
        path: FieldPath,
    },
    /// List entries under a storage handle
    Entries {
        handle: ObjectId,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long)]
        limit: Option<NonZeroUsize>,
        /// Follow cursors until the table is exhausted
        #[arg(long)]
        all: bool,
    },
    /// Fetch the value stored under one key
    Value {
        handle: ObjectId,
        /// Move type of the key, e.g. address
        key_type: String,
        /// Key value; parsed as JSON when possible
        key_value: String,
    },
    /// Stream IDs indexed by an account
    Streams {
        #[arg(value_enum)]
        direction: Direction,
        address: Address,
    },
    /// Create a payment stream funded by a coin object
    Create {
        #[arg(long)]
        coin: ObjectId,
        #[arg(long)]
        recipient: Address,
        #[arg(long)]
        deposit: u64,
        /// Start time, unix seconds
        #[arg(long)]
        start: u64,
        /// Stop time, unix seconds
        #[arg(long)]
        stop: u64,
        #[arg(long, default_value_t = 1)]
        interval: u64,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        remark: String,
        #[arg(long)]
        closeable: bool,
        #[arg(long)]
        modifiable: bool,
    },
    /// Close a stream as its sender
    Close { stream: ObjectId },
    /// Enable the configured coin type (admin)
    RegisterCoin { manager_cap: ObjectId, fee_point: u64 },
    /// Split a coin into new coins of the given amounts
    SplitCoin {
        coin: ObjectId,
        #[arg(required = true)]
        amounts: Vec<u64>,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ToolkitConfig::default(),
    };
    if let Some(url) = cli.rpc_url {
        config.network.rpc_url = url;
    }

    init_logging(&config.observability);
    tracing::debug!(rpc_url = %config.network.rpc_url, "Configuration loaded");

    run(cli.command, &config).await
}

async fn run(command: Commands, config: &ToolkitConfig) -> CliResult<()> {
    let retries = &config.retries;

    match command {
        Commands::Address => {
            let keypair = load_keypair(config)?;
            print_json(&serde_json::json!({ "address": keypair.address() }))
        }
        Commands::Faucet { address } => {
            let recipient = match address {
                Some(addr) => addr,
                None => load_keypair(config)?.address(),
            };
            let faucet = FaucetClient::new(&config.network)?;
            let coins = faucet.request_gas(&recipient).await?;
            print_json(&coins)
        }
        Commands::Resolve { root, path } => {
            let walker = TableWalker::new(RpcClient::new(&config.network)?);
            let handle = retry_with_backoff(retries, "resolve", || {
                walker.resolve_storage_handle(&root, &path)
            })
            .await?;
            print_json(&handle)
        }
        Commands::Entries {
            handle,
            cursor,
            limit,
            all,
        } => {
            let walker = TableWalker::new(RpcClient::new(&config.network)?);
            let handle = StorageHandle::new(handle);
            let cursor = cursor.map(Cursor::from);
            if all {
                match collect_entries_with_retries(retries, &walker, &handle, cursor, limit).await {
                    Ok(entries) => print_json(&entries),
                    Err(partial) => {
                        print_json(&serde_json::json!({
                            "entries": &partial.entries,
                            "resume_from": &partial.resume_from,
                        }))?;
                        Err(partial.into())
                    }
                }
            } else {
                let page = retry_with_backoff(retries, "list_entries", || {
                    walker.list_entries(&handle, cursor.as_ref(), limit)
                })
                .await?;
                print_json(&page)
            }
        }
        Commands::Value {
            handle,
            key_type,
            key_value,
        } => {
            let walker = TableWalker::new(RpcClient::new(&config.network)?);
            let handle = StorageHandle::new(handle);
            let value = serde_json::from_str(&key_value).unwrap_or(Value::String(key_value));
            let key = DynamicFieldName::new(key_type, value);
            let fetched: Value = retry_with_backoff(retries, "fetch_value", || {
                walker.fetch_value(&handle, &key)
            })
            .await?;
            print_json(&fetched)
        }
        Commands::Streams { direction, address } => {
            let global_config = global_config_id(config)?;
            let query = StreamQuery::new(
                TableWalker::new(RpcClient::new(&config.network)?),
                global_config,
            )
            .with_retries(retries.clone());
            let streams = match direction {
                Direction::Incoming => query.incoming_streams(&address).await?,
                Direction::Outgoing => query.outgoing_streams(&address).await?,
            };
            print_json(&streams)
        }
        Commands::Create {
            coin,
            recipient,
            deposit,
            start,
            stop,
            interval,
            name,
            remark,
            closeable,
            modifiable,
        } => {
            let params = CreateStream {
                global_config: global_config_id(config)?,
                coin,
                name,
                remark,
                recipient,
                deposit_amount: deposit,
                start_time: start,
                stop_time: stop,
                interval,
                closeable,
                modifiable,
            };
            let call = stream_calls(config)?.create(&params)?;
            let result = submitter(config)?.submit(&call).await?;
            print_json(&result)
        }
        Commands::Close { stream } => {
            let global_config = global_config_id(config)?;
            let call = stream_calls(config)?.close_from_sender(&global_config, &stream);
            let result = submitter(config)?.submit(&call).await?;
            print_json(&result)
        }
        Commands::RegisterCoin {
            manager_cap,
            fee_point,
        } => {
            let global_config = global_config_id(config)?;
            let call = stream_calls(config)?.register_coin(&manager_cap, &global_config, fee_point);
            let result = submitter(config)?.submit(&call).await?;
            print_json(&result)
        }
        Commands::SplitCoin { coin, amounts } => {
            let result = submitter(config)?.split_coin(&coin, &amounts).await?;
            print_json(&result)
        }
    }
}

fn load_keypair(config: &ToolkitConfig) -> CliResult<SuiKeypair> {
    Ok(SuiKeypair::from_env(
        &config.keys.mnemonic_env,
        config.keys.derivation_path.as_deref(),
    )?)
}

fn submitter(config: &ToolkitConfig) -> CliResult<Submitter> {
    Ok(Submitter::new(
        RpcClient::new(&config.network)?,
        load_keypair(config)?,
        config.contract.gas_budget,
    ))
}

fn stream_calls(config: &ToolkitConfig) -> CliResult<StreamCalls> {
    let package = required_id("contract.package_id", &config.contract.package_id)?;
    Ok(StreamCalls::new(package, config.contract.coin_type.clone()))
}

fn global_config_id(config: &ToolkitConfig) -> CliResult<ObjectId> {
    required_id("contract.global_config_id", &config.contract.global_config_id)
}

fn required_id(field: &str, value: &str) -> CliResult<ObjectId> {
    if value.is_empty() {
        return Err(format!("{} is not configured", field).into());
    }
    Ok(value.parse()?)
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
