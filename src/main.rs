use clap::Parser;
use skycast::config::Config;
use skycast::render::render_outcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SkyCast: weather lookup with an AI search fallback
///
/// Looks up current conditions and a 3-day forecast for a city or a pair of
/// coordinates. Serves a browser front end with --serve.
///
/// Examples:
///   skycast Paris
///   skycast --city "New York" --json
///   skycast --lat 40.7 --lon -74.0
///   skycast --serve --port 8080
#[derive(Parser)]
#[command(name = "skycast", version, about, long_about = None)]
struct Cli {
    /// City name or "lat,lon" (positional). Example: skycast Stockholm
    #[arg(index = 1)]
    location_positional: Option<String>,

    /// City name (named). Example: --city "New York"
    #[arg(long)]
    city: Option<String>,

    /// Latitude (-90 to 90).
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Print the outcome as JSON instead of a text card.
    #[arg(long)]
    json: bool,

    /// Run the web server instead of a single lookup.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, short = 'p', default_value_t = 3000)]
    port: u16,

    /// Config file (JSON). Defaults to ~/.skycast/config.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Primary weather endpoint base URL.
    #[arg(long)]
    primary_url: Option<String>,

    /// Primary endpoint timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Completion model identifier.
    #[arg(long)]
    model: Option<String>,

    /// Environment variable holding the API key.
    #[arg(long)]
    api_key_env: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(if cli.serve { "info" } else { "warn" });

    let config = load_config(&cli).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let orchestrator = config.build_orchestrator().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.serve {
        let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start runtime: {}", e);
            std::process::exit(1);
        });
        if let Err(e) = runtime.block_on(skycast::server::start(&cli.host, cli.port, orchestrator)) {
            eprintln!("Server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let location = resolve_location(&cli);

    match orchestrator.fetch(&location) {
        Ok(outcome) => {
            if cli.json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", render_outcome(&outcome));
            }
        }
        Err(e) => {
            tracing::debug!("Lookup failed: {:?}", e);
            eprintln!("Error: {}", e);
            eprintln!("  {}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, skycast::ConfigError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.primary_url {
        config.primary_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.primary_timeout_secs = secs;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(var) = &cli.api_key_env {
        config.api_key_env = var.clone();
        config.api_key = None;
    }
    Ok(config)
}

fn resolve_location(cli: &Cli) -> String {
    // Priority: --city > positional > --lat/--lon > error

    if let Some(ref city) = cli.city {
        return city.clone();
    }

    if let Some(ref loc) = cli.location_positional {
        return loc.clone();
    }

    if let (Some(lat), Some(lon)) = (&cli.lat, &cli.lon) {
        return coordinate_query(lat, lon).unwrap_or_else(|msg| {
            eprintln!("Error: {}", msg);
            std::process::exit(1);
        });
    }

    eprintln!("Error: No location specified.");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  skycast Stockholm");
    eprintln!("  skycast --city \"New York\"");
    eprintln!("  skycast --lat 40.7 --lon -74.0");
    eprintln!("  skycast --serve");
    std::process::exit(1);
}

/// "lat,lon" exactly as typed, after checking both parse and are in range.
fn coordinate_query(lat: &str, lon: &str) -> Result<String, String> {
    let (lat, lon) = (lat.trim(), lon.trim());
    let in_range = |text: &str, limit: f64| {
        text.parse::<f64>()
            .map(|v| (-limit..=limit).contains(&v))
            .unwrap_or(false)
    };
    if !in_range(lat, 90.0) || !in_range(lon, 180.0) {
        return Err("Invalid coordinates. Lat: -90..90, Lon: -180..180".to_string());
    }
    Ok(format!("{},{}", lat, lon))
}
