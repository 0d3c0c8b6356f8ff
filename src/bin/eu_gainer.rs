use eu_gainer::config::{Config, DEFAULT_PROVIDER_URL};
use eu_gainer::dashboard::settings::DashboardSettings;
use eu_gainer::dashboard::Dashboard;
use eu_gainer::fetchers::base::PriceFetcher;
use eu_gainer::fetchers::yahoo::YahooChartFetcher;
use eu_gainer::models::gain::GainerQuery;
use eu_gainer::server;
use eu_gainer::services::gainer_service::GainerService;

use anyhow::Context;
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use std::sync::Arc;
use std::time::Duration;

fn parse_arg<T: std::str::FromStr>(matches: &ArgMatches, name: &str) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = matches
        .value_of(name)
        .with_context(|| format!("missing value for --{}", name))?;
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("invalid value for --{}: {} ({})", name, raw, e))
}

fn fetch_args<'a>() -> Vec<Arg<'a>> {
    vec![
        Arg::with_name("retries")
            .long("retries")
            .value_name("N")
            .help("Fetch attempts per ticker")
            .takes_value(true)
            .default_value("6"),
        Arg::with_name("retry-delay-ms")
            .long("retry-delay-ms")
            .value_name("MILLIS")
            .help("Fixed delay between fetch attempts")
            .takes_value(true)
            .default_value("400"),
        Arg::with_name("concurrency")
            .long("concurrency")
            .value_name("N")
            .help("Tickers fetched concurrently (1 = sequential)")
            .takes_value(true)
            .default_value("4"),
        Arg::with_name("provider-url")
            .long("provider-url")
            .value_name("URL")
            .help("Base URL of the chart data provider")
            .takes_value(true)
            .default_value(DEFAULT_PROVIDER_URL),
        Arg::with_name("timeout-secs")
            .long("timeout-secs")
            .value_name("SECONDS")
            .help("HTTP request timeout")
            .takes_value(true)
            .default_value("30"),
    ]
}

fn query_args<'a>() -> Vec<Arg<'a>> {
    vec![
        Arg::with_name("interval")
            .short('i')
            .long("interval")
            .value_name("MINUTES")
            .help("Gain horizon in minutes")
            .takes_value(true)
            .default_value("5"),
        Arg::with_name("min-gain")
            .short('g')
            .long("min-gain")
            .value_name("PERCENT")
            .help("Minimum gain in percent (inclusive)")
            .takes_value(true)
            .default_value("2.0"),
        Arg::with_name("top-n")
            .short('n')
            .long("top-n")
            .value_name("N")
            .help("Maximum number of results")
            .takes_value(true)
            .default_value("10"),
    ]
}

fn build_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    Ok(Config::new()
        .with_fetch_retries(parse_arg(matches, "retries")?)
        .with_retry_delay(Duration::from_millis(parse_arg(matches, "retry-delay-ms")?))
        .with_fetch_concurrency(parse_arg(matches, "concurrency")?)
        .with_provider_url(&parse_arg::<String>(matches, "provider-url")?)
        .with_request_timeout(Duration::from_secs(parse_arg(matches, "timeout-secs")?)))
}

fn build_fetcher(config: &Config) -> anyhow::Result<Arc<dyn PriceFetcher + Send + Sync>> {
    let fetcher = YahooChartFetcher::new(&config.provider_url, config.request_timeout)?;
    Ok(Arc::new(fetcher))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("EU Gainer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Intraday gainer screener for European equities")
        .subcommand(
            SubCommand::with_name("serve")
                .about("Run the screener HTTP service")
                .arg(
                    Arg::with_name("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Listen address")
                        .takes_value(true)
                        .default_value("0.0.0.0:8000"),
                )
                .args(fetch_args()),
        )
        .subcommand(
            SubCommand::with_name("scan")
                .about("Run one screener query and print the JSON result")
                .args(query_args())
                .args(fetch_args()),
        )
        .subcommand(
            SubCommand::with_name("dashboard")
                .about("Poll a running screener and render the terminal dashboard")
                .arg(
                    Arg::with_name("api-url")
                        .short('u')
                        .long("api-url")
                        .value_name("URL")
                        .help("Base URL of the screener service")
                        .takes_value(true)
                        .default_value("http://127.0.0.1:8000"),
                )
                .arg(
                    Arg::with_name("refresh-sec")
                        .short('r')
                        .long("refresh-sec")
                        .value_name("SECONDS")
                        .help("Auto refresh period (10-120)")
                        .takes_value(true)
                        .default_value("30"),
                )
                .arg(
                    Arg::with_name("no-auto-refresh")
                        .long("no-auto-refresh")
                        .help("Render once and exit (otherwise keys n/p/a/+/-/]/[/r/q adjust the view)")
                        .takes_value(false),
                )
                .arg(
                    Arg::with_name("ticker")
                        .short('t')
                        .long("ticker")
                        .value_name("SYMBOL")
                        .help("Ticker to chart (defaults to the top gainer)")
                        .takes_value(true),
                )
                .args(query_args())
                .args(fetch_args()),
        );

    let matches = app.get_matches();

    if let Some(matches) = matches.subcommand_matches("serve") {
        let config = build_config(matches)?.with_bind_addr(&parse_arg::<String>(matches, "bind")?);
        let config = Arc::new(config);
        info!("Tracking {} tickers across {} sessions", config.tickers.len(), config.sessions.len());

        let fetcher = build_fetcher(&config)?;
        let service = Arc::new(GainerService::new(config.clone(), fetcher));
        let addr = config.bind_socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        server::serve(listener, service).await?;
    } else if let Some(matches) = matches.subcommand_matches("scan") {
        let config = Arc::new(build_config(matches)?);
        let fetcher = build_fetcher(&config)?;
        let service = GainerService::new(config, fetcher);

        let query = GainerQuery::new(
            parse_arg(matches, "interval")?,
            parse_arg(matches, "min-gain")?,
            parse_arg(matches, "top-n")?,
        );
        let result = service.calculate_gainers(&query).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if let Some(matches) = matches.subcommand_matches("dashboard") {
        let config = Arc::new(build_config(matches)?);
        let fetcher = build_fetcher(&config)?;

        let settings = DashboardSettings::new(&parse_arg::<String>(matches, "api-url")?)
            .with_interval_minutes(parse_arg(matches, "interval")?)
            .with_min_gain(parse_arg(matches, "min-gain")?)
            .with_top_n(parse_arg(matches, "top-n")?)
            .with_refresh_secs(parse_arg(matches, "refresh-sec")?)
            .with_auto_refresh(!matches.is_present("no-auto-refresh"))
            .with_chart_ticker(matches.value_of("ticker"));

        let mut dashboard = Dashboard::new(settings, config, fetcher)?;
        dashboard.run().await?;
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}
