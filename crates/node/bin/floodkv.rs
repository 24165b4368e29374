use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use floodkv_node::logging::init_logging;
use floodkv_node::logging::LogLevel;
use floodkv_node::native::config::Config;
use floodkv_node::native::config::DEFAULT_HTTP_ADDR;
use floodkv_node::native::endpoint::run_service;
use floodkv_node::processor::ProcessorBuilder;
use floodkv_node::processor::ProcessorConfig;
use floodkv_node::registry::TraversalOrder;
use floodkv_node::seed::Seed;
use floodkv_node::util::loader::ResourceLoader;
use floodkv_rpc::client::Client;
use floodkv_rpc::types::ConnectRequest;
use floodkv_rpc::types::StoreRequest;

#[derive(Parser, Debug)]
#[command(about, version, author)]
struct Cli {
    #[arg(long, value_enum, default_value_t = LogLevel::Info, env = "FLOODKV_LOG_LEVEL")]
    log_level: LogLevel,

    #[arg(long, short = 'c', env = "FLOODKV_CONFIG")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    Run(RunArgs),
    InitConfig(InitConfigArgs),
    Status(StatusArgs),
    Get(GetArgs),
    Store(StoreArgs),
    Connect(ConnectArgs),
    Lookup(LookupArgs),
}

#[derive(Args, Debug)]
#[command(about = "Run a node daemon")]
struct RunArgs {
    #[arg(
        long,
        short = 'b',
        env = "FLOODKV_HTTP_ADDR",
        help = "bind address, overrides the config file"
    )]
    http_addr: Option<String>,

    #[arg(long, env = "FLOODKV_ADDRESS", help = "address announced to the overlay")]
    address: Option<String>,

    #[arg(long, env = "FLOODKV_SEED", help = "seed file or url with neighbors to register")]
    seed: Option<String>,

    #[arg(long, value_enum, help = "peer traversal order, overrides the config file")]
    traversal: Option<TraversalOrder>,
}

#[derive(Args, Debug)]
#[command(about = "Write a config file with defaults")]
struct InitConfigArgs {
    #[arg(long, short = 'l', default_value = "~/.floodkv/config.yaml")]
    location: String,
}

#[derive(Args, Debug)]
struct ClientArgs {
    #[arg(
        long,
        short = 'u',
        default_value = "http://127.0.0.1:9000",
        help = "floodkv node endpoint url",
        env = "FLOODKV_ENDPOINT_URL"
    )]
    endpoint_url: String,
}

impl ClientArgs {
    fn new_client(&self) -> Client {
        Client::new(self.endpoint_url.as_str())
    }
}

#[derive(Args, Debug)]
#[command(about = "Report peer count and storage entry count of a node")]
struct StatusArgs {
    #[command(flatten)]
    client_args: ClientArgs,
}

#[derive(Args, Debug)]
#[command(about = "Read a locally stored value from a node")]
struct GetArgs {
    #[command(flatten)]
    client_args: ClientArgs,

    key: String,
}

#[derive(Args, Debug)]
#[command(about = "Store a key/value into a node")]
struct StoreArgs {
    #[command(flatten)]
    client_args: ClientArgs,

    key: String,
    value: String,
}

#[derive(Args, Debug)]
#[command(about = "Register a neighbor endpoint on a node")]
struct ConnectArgs {
    #[command(flatten)]
    client_args: ClientArgs,

    endpoint: String,
}

#[derive(Args, Debug)]
#[command(about = "Resolve which node holds a key via flood search")]
struct LookupArgs {
    #[command(flatten)]
    client_args: ClientArgs,

    key: String,

    #[arg(long, help = "initial hop budget, node default when absent")]
    hops: Option<u32>,
}

async fn daemon_run(config: Config) -> anyhow::Result<()> {
    let processor_config = ProcessorConfig::from(config.clone());
    let processor = Arc::new(ProcessorBuilder::from_config(&processor_config).build()?);

    if let Some(source) = &config.seed {
        let seed = Seed::load(source).await?;
        for peer in &seed.peers {
            processor.connect(&peer.url)?;
        }
        tracing::info!("registered {} seed peers", seed.peers.len());
    }

    run_service(config.http_addr, processor).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Command::Run(args) => {
            let mut config = match &cli.config_file {
                Some(path) => Config::read_fs(path)?,
                None => Config::new(DEFAULT_HTTP_ADDR),
            };
            if let Some(http_addr) = args.http_addr {
                config.http_addr = http_addr;
            }
            if let Some(address) = args.address {
                config.address = Some(address);
            }
            if let Some(seed) = args.seed {
                config.seed = Some(seed);
            }
            if let Some(traversal) = args.traversal {
                config.traversal = traversal;
            }
            daemon_run(config).await
        }
        Command::InitConfig(args) => {
            let path = Config::new(DEFAULT_HTTP_ADDR).write_fs(&args.location)?;
            println!("Initial config written to: {path}");
            Ok(())
        }
        Command::Status(args) => {
            let info = args.client_args.new_client().status().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Command::Get(args) => {
            let resp = args.client_args.new_client().get(&args.key).await?;
            println!("{}", resp.value);
            Ok(())
        }
        Command::Store(args) => {
            let resp = args
                .client_args
                .new_client()
                .store(&StoreRequest {
                    key: args.key,
                    value: args.value,
                })
                .await?;
            println!("New key added {}", resp.key);
            Ok(())
        }
        Command::Connect(args) => {
            let resp = args
                .client_args
                .new_client()
                .connect(&ConnectRequest {
                    endpoint: args.endpoint,
                })
                .await?;
            println!("Endpoint added {}", resp.endpoint);
            Ok(())
        }
        Command::Lookup(args) => {
            let resp = args
                .client_args
                .new_client()
                .lookup(&args.key, args.hops)
                .await?;
            println!("{}", resp.node);
            Ok(())
        }
    }
}
