//! # stock
//!
//! Command-line front end for the stock inventory API.
//!
//! Reads the API location from `STOCK_API_BASE_URL` / `STOCK_API_TIMEOUT_MS`
//! (overridable with `--base-url` / `--timeout-ms`), runs one product
//! operation and prints the result.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stock_core::{
    ApiConfig, ConfigUpdate, CreateProductData, HttpClient, ProductApi, ReqwestTransport,
    SearchParams, SortOrder, UpdateProductData,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod output;

/// Manage products in the stock inventory API
#[derive(Debug, Parser)]
#[command(name = "stock", version, about = "Manage products in the stock inventory API")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL (defaults to $STOCK_API_BASE_URL or http://localhost:3333)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every product
    List,
    /// Show one product
    Get { id: Uuid },
    /// Filter, sort and page products
    Search(SearchArgs),
    /// Create a product
    Create(CreateArgs),
    /// Change some fields of a product
    Update(UpdateArgs),
    /// Delete a product
    Delete { id: Uuid },
    /// Check whether a product can be fetched
    Exists { id: Uuid },
    /// Print the number of products
    Count,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Case-insensitive text to look for in name and description
    #[arg(long, short)]
    search: Option<String>,
    /// name, price, quantity, createdAt or updatedAt
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(long, value_enum)]
    sort_order: Option<Order>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    price: f64,
    #[arg(long, allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: Uuid,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    price: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    quantity: Option<i64>,
}

impl From<SearchArgs> for SearchParams {
    fn from(args: SearchArgs) -> Self {
        SearchParams {
            page: args.page,
            limit: args.limit,
            search: args.search,
            sort_by: args.sort_by,
            sort_order: args.sort_order.map(|o| match o {
                Order::Asc => SortOrder::Asc,
                Order::Desc => SortOrder::Desc,
            }),
        }
    }
}

impl From<CreateArgs> for CreateProductData {
    fn from(args: CreateArgs) -> Self {
        CreateProductData {
            name: args.name,
            description: args.description,
            price: args.price,
            quantity: args.quantity,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

/// Layer the command-line flags over `config`.
fn build_api(cli: &Cli, mut config: ApiConfig) -> ProductApi<ReqwestTransport> {
    config.apply(ConfigUpdate {
        base_url: cli.base_url.clone(),
        timeout: cli.timeout_ms.map(Duration::from_millis),
        headers: None,
    });
    tracing::debug!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis() as u64, "using api");
    ProductApi::with_defaults(HttpClient::new(ReqwestTransport::new(), config))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut api = build_api(&cli, ApiConfig::from_env()?);

    match cli.command {
        Command::List => {
            let products = api.get_all_products().await?;
            print!("{}", output::product_table(&products));
        }
        Command::Get { id } => {
            let product = api.get_product_by_id(id).await?;
            print!("{}", output::product_detail(&product));
        }
        Command::Search(args) => {
            let products = api.search_products(&args.into()).await?;
            print!("{}", output::product_table(&products));
        }
        Command::Create(args) => {
            let reply = api.create_product(&args.into()).await?;
            println!("{}", reply.message);
            if let Some(product) = reply.product {
                print!("{}", output::product_detail(&product));
            }
        }
        Command::Update(args) => {
            let data = UpdateProductData {
                name: args.name,
                description: args.description,
                price: args.price,
                quantity: args.quantity,
            };
            if data.is_empty() {
                anyhow::bail!("nothing to update: pass at least one of --name, --description, --price, --quantity");
            }
            let reply = api.update_product(args.id, &data).await?;
            println!("{}", reply.message);
            print!("{}", output::product_detail(&reply.updated_product));
        }
        Command::Delete { id } => {
            let reply = api.delete_product(id).await?;
            println!("{}", reply.message);
        }
        Command::Exists { id } => {
            println!("{}", if api.product_exists(id).await { "yes" } else { "no" });
        }
        Command::Count => {
            println!("{}", api.count_products().await);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}
