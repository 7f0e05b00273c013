// Engine main entry point
use anyhow::Context;
use clap::{Parser, Subcommand};
use engine::analysis::gauge::{Gauge, GaugeScale};
use engine::analysis::hourly::DEFAULT_WINDOW_SIZE;
use engine::analysis::stability::stability_series;
use engine::config::settings::EngineSettings;
use engine::data::coingecko::CoinGeckoClient;
use engine::data::offline::OfflineSource;
use engine::services::reliability_service::ReliabilityService;
use serde::Serialize;
use shared::models::OhlcPeriod;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hour-of-day reliability analysis for crypto candles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch candles once and print the hourly reliability snapshot
    Hours {
        /// Coin id, e.g. "bitcoin"; defaults to ENGINE_DEFAULT_COIN
        #[arg(long)]
        coin: Option<String>,
        /// OHLC period: daily, weekly, monthly, 3months, 6months, yearly
        #[arg(long)]
        period: Option<OhlcPeriod>,
    },
    /// Poll the provider and print one JSON line per snapshot until Ctrl-C
    Watch {
        #[arg(long = "coin", required = true)]
        coins: Vec<String>,
    },
    /// Analyze a timestamp,open,high,low,close CSV file without touching the network
    AnalyzeCsv {
        path: PathBuf,
        /// Label for the snapshot
        #[arg(long, default_value = "csv")]
        coin: String,
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,
    },
    /// Print the short-horizon price stability series
    Stability {
        #[arg(long)]
        coin: Option<String>,
    },
    /// Map the 24h price change onto a 0-100 gauge
    Gauge {
        /// Coin ids; defaults to ENGINE_DEFAULT_COIN
        #[arg(long = "coin")]
        coins: Vec<String>,
        /// Use the N largest coins by market cap on the grouped 10-95 scale
        #[arg(long, conflicts_with = "coins")]
        top: Option<u32>,
        /// Use the currently trending coins
        #[arg(long, conflicts_with_all = ["coins", "top"])]
        trending: bool,
    },
    /// List trending coins
    Trending,
    /// List coin categories
    Categories,
    /// Print the overview for one coin
    Overview {
        #[arg(long)]
        coin: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn connect() -> anyhow::Result<CoinGeckoClient> {
    let settings = EngineSettings::from_env().context("Loading provider settings from the environment")?;
    info!(base_url = %settings.base_url, vs_currency = %settings.vs_currency, "Using market data provider");
    Ok(CoinGeckoClient::new(settings)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::AnalyzeCsv { path, coin, window } => {
            // Provider fields stay empty; nothing is fetched.
            let settings = EngineSettings::new(String::new(), String::new());
            let service = ReliabilityService::new(OfflineSource, &settings).with_window_size(window);
            let snapshot = service
                .load_csv(&coin, &path)
                .await
                .with_context(|| format!("Reading candles from {}", path.display()))?;
            print_json(&snapshot)?;
        }
        Command::Hours { coin, period } => {
            let client = connect()?;
            let settings = client.settings().clone();
            let coin = coin.unwrap_or_else(|| settings.default_coin.clone());
            let service = ReliabilityService::new(client, &settings)
                .with_period(period.unwrap_or(settings.ohlc_period));
            print_json(&service.refresh(&coin).await?)?;
        }
        Command::Watch { coins } => {
            let client = connect()?;
            let settings = client.settings().clone();
            let service = ReliabilityService::new(client, &settings);
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                }
            };
            let rounds = service
                .watch(
                    &coins,
                    |snapshot| match serde_json::to_string(&snapshot) {
                        Ok(line) => println!("{}", line),
                        Err(e) => tracing::error!(coin_id = %snapshot.coin_id, error = %e, "Failed to encode snapshot"),
                    },
                    shutdown,
                )
                .await;
            info!(rounds, "Watch finished");
        }
        Command::Stability { coin } => {
            let client = connect()?;
            let coin = coin.unwrap_or_else(|| client.settings().default_coin.clone());
            let prices = client.market_chart(&coin, 1).await?;
            print_json(&stability_series(&prices))?;
        }
        Command::Gauge { coins, top, trending } => {
            let client = connect()?;
            let gauges: Vec<Gauge> = if trending {
                let vs_currency = client.settings().vs_currency.clone();
                client
                    .trending()
                    .await?
                    .iter()
                    .map(|coin| Gauge::from_trending(coin, &vs_currency, GaugeScale::Single))
                    .collect()
            } else if let Some(limit) = top {
                client
                    .top_markets(limit)
                    .await?
                    .iter()
                    .map(|coin| Gauge::from_market(coin, GaugeScale::Grouped))
                    .collect()
            } else {
                let coins = if coins.is_empty() {
                    vec![client.settings().default_coin.clone()]
                } else {
                    coins
                };
                client
                    .markets(&coins)
                    .await?
                    .iter()
                    .map(|coin| Gauge::from_market(coin, GaugeScale::Single))
                    .collect()
            };
            print_json(&gauges)?;
        }
        Command::Trending => {
            let client = connect()?;
            print_json(&client.trending().await?)?;
        }
        Command::Categories => {
            let client = connect()?;
            print_json(&client.categories().await?)?;
        }
        Command::Overview { coin } => {
            let client = connect()?;
            let coin = coin.unwrap_or_else(|| client.settings().default_coin.clone());
            let overview = client.coin_overview(&coin).await?;
            let vs_currency = &client.settings().vs_currency;
            match overview.current_price(vs_currency) {
                Some(price) => info!(coin_id = %overview.id, price, vs_currency = %vs_currency, "Current price"),
                None => info!(coin_id = %overview.id, vs_currency = %vs_currency, "No current price reported"),
            }
            print_json(&overview)?;
        }
    }
    Ok(())
}
