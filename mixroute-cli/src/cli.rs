use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mixroute_common::{
    encoding::{decode_path, encode_route_to_path},
    math::{CurrencyAmount, Percent},
    models::{Address, Protocol, TradeType},
    route::{Route, SwapRoute},
    simulation::quoter::LocalQuoter,
    trade::Trade,
    venue::Venue,
    Bytes,
};
use num_bigint::BigUint;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RouteFile;

/// Mixroute CLI - encodes swap routes across pair and pool venues and quotes trades over them
///
/// Routes are read from YAML files describing the chain, the input and output currencies, the
/// tokens involved and the venues in swap order.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging. Overridden by RUST_LOG when set.
    #[clap(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, PartialEq, Debug)]
pub enum Command {
    /// Prints the byte path of a route.
    Encode(EncodeArgs),
    /// Quotes a trade over a route with the venues' own state and prints a JSON summary.
    Quote(QuoteArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EncodeArgs {
    /// Path to the YAML route file.
    #[clap(short = 'r', long, env = "MIXROUTE_ROUTE")]
    route: String,

    /// Encode the path output first, as exact output execution consumes it.
    #[clap(long)]
    exact_output: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct QuoteArgs {
    /// Path to the YAML route file.
    #[clap(short = 'r', long, env = "MIXROUTE_ROUTE")]
    route: String,

    /// Known amount in raw units: the input for exact-input, the output for exact-output.
    #[clap(short = 'a', long)]
    amount: BigUint,

    /// exact-input or exact-output.
    #[clap(short = 't', long, default_value = "exact-input")]
    trade_type: TradeType,

    /// Slippage tolerance in basis points.
    #[clap(short = 's', long, default_value = "50")]
    slippage_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountSummary {
    pub currency: String,
    pub raw: String,
    pub exact: String,
}

impl From<&CurrencyAmount> for AmountSummary {
    fn from(amount: &CurrencyAmount) -> Self {
        Self {
            currency: amount.currency().symbol().to_string(),
            raw: amount.quotient().to_string(),
            exact: amount.to_exact(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub protocol: Protocol,
    pub venues: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeSummary {
    pub protocol: Protocol,
    pub trade_type: TradeType,
    pub path: Bytes,
    pub input_amount: AmountSummary,
    pub output_amount: AmountSummary,
    pub mid_price: String,
    pub execution_price: String,
    pub price_impact: String,
    pub slippage_tolerance: String,
    pub minimum_amount_out: AmountSummary,
    pub maximum_amount_in: AmountSummary,
    pub sections: Vec<SectionSummary>,
}

/// Runs of consecutive venues sharing a protocol. Homogeneous routes form a single run.
fn sections(route: &Route) -> Vec<SectionSummary> {
    let runs = match route {
        Route::Mixed(mixed) => mixed.partition_by_protocol(),
        other => vec![other.venues().to_vec()],
    };
    runs.into_iter()
        .filter_map(|run| {
            let protocol = run.first().map(Venue::protocol)?;
            let venues = run
                .iter()
                .map(|venue| venue.address().clone())
                .collect();
            Some(SectionSummary { protocol, venues })
        })
        .collect()
}

pub fn encode(args: &EncodeArgs) -> anyhow::Result<Bytes> {
    let route = RouteFile::from_yaml(&args.route)?.build_route()?;
    debug!(protocol = %route.protocol(), hops = route.venues().len(), "Loaded route");
    let path = encode_route_to_path(&route, args.exact_output)?;
    for hop in decode_path(&path)? {
        debug!(%hop, "Encoded hop");
    }
    Ok(path)
}

pub async fn quote(
    route: Route,
    amount: BigUint,
    trade_type: TradeType,
    slippage_bps: u32,
) -> anyhow::Result<TradeSummary> {
    let currency = match trade_type {
        TradeType::ExactInput => route.input().clone(),
        TradeType::ExactOutput => route.output().clone(),
    };
    let amount = CurrencyAmount::from_raw_amount(currency, amount);
    let slippage = Percent::from_bps(i64::from(slippage_bps));

    let trade = Trade::from_route(&LocalQuoter, route, amount, trade_type)
        .await
        .context("Failed to quote trade")?;
    let route = trade.route()?;
    info!(
        input = %trade.input_amount(),
        output = %trade.output_amount(),
        impact = %trade.price_impact(),
        "Quoted trade"
    );

    Ok(TradeSummary {
        protocol: route.protocol(),
        trade_type,
        path: encode_route_to_path(route, trade_type == TradeType::ExactOutput)?,
        input_amount: trade.input_amount().into(),
        output_amount: trade.output_amount().into(),
        mid_price: route.mid_price().to_string(),
        execution_price: trade.execution_price().to_string(),
        price_impact: trade.price_impact().to_string(),
        slippage_tolerance: slippage.to_string(),
        minimum_amount_out: (&trade.minimum_amount_out(&slippage, None)?).into(),
        maximum_amount_in: (&trade.maximum_amount_in(&slippage, None)?).into(),
        sections: sections(route),
    })
}

pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set up logging subscriber: {e}"))?;

    info!("Running with version: {}", env!("CARGO_PKG_VERSION"));
    match cli.command {
        Command::Encode(args) => {
            println!("{}", encode(&args)?);
        }
        Command::Quote(args) => {
            let route = RouteFile::from_yaml(&args.route)?.build_route()?;
            let summary = quote(route, args.amount, args.trade_type, args.slippage_bps).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
