use btctrader::core::config::ExchangeConfig;
use btctrader::{BookEvent, BookFactory, BookSpec};
use std::env;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

/// Print top-of-book changes for one venue until interrupted
///
/// `BTCTRADER_EXCHANGE` picks the venue (default `bitfloor`) and
/// `BTCTRADER_PRODUCT` the product (default `1`, bitfloor's BTCUSD).
/// Endpoint overrides come from `{EXCHANGE}_HOST` / `{EXCHANGE}_PORT`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let exchange = env::var("BTCTRADER_EXCHANGE").unwrap_or_else(|_| "bitfloor".to_string());
    let product = env::var("BTCTRADER_PRODUCT").unwrap_or_else(|_| "1".to_string());

    let prefix = exchange.to_uppercase();
    let mut config = ExchangeConfig::read_only();
    if let Ok(host) = env::var(format!("{}_HOST", prefix)) {
        config = config.host(host);
    }
    if let Ok(port) = env::var(format!("{}_PORT", prefix)) {
        config = config.port(port.parse()?);
    }

    let tracker = BookFactory::create(
        BookSpec::new(exchange.as_str(), product)
            .with_config(config)
            .with_refresh_interval(Duration::from_millis(1000)),
    )?;
    let mut events = tracker.subscribe();
    let handle = tracker.spawn();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(BookEvent::Changed(level)) => println!("{}: {}", exchange, level),
                Ok(BookEvent::Cleared(side)) => {
                    println!("{}: {} side empty", exchange, side.book_side());
                }
                Ok(BookEvent::Error(err)) => eprintln!("{}: {}", exchange, err),
                Err(RecvError::Lagged(missed)) => {
                    eprintln!("{}: skipped {} events", exchange, missed);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.shutdown().await;
    Ok(())
}
