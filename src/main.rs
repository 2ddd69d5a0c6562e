use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use home_market::a11y::audit_document;
use home_market::backend::{BackendClient, JsonFileSource, ListingSource, NewListing};
use home_market::cards::{render_search_page, CardContext, CardLayout};
use home_market::config::Settings;
use home_market::currency::{
    format_price, load_rates, Currency, HttpRateSource, RateSource, RateTable, StaticRateSource,
};
use home_market::search::{run_search, FilterState};
use home_market::validation::validate_listing;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "home-market", about = "Property search, pricing and page tooling")]
struct Cli {
    /// TOML configuration file
    #[arg(long, short, env = "HOME_MARKET_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the search results page for a search URL
    Search {
        /// Page URL or path, e.g. "/search?q=Accra&type=house"
        #[arg(default_value = "/search")]
        url: String,
        /// Read listings from a JSON export instead of the backend
        #[arg(long)]
        listings: Option<PathBuf>,
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
        #[arg(long, short, default_value = "search.html")]
        out: PathBuf,
        /// Also save the matching listings as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Format a price in a display currency with diaspora equivalents
    Price {
        amount: f64,
        #[arg(long, default_value = "GHS")]
        from: String,
        #[arg(long)]
        to: Option<String>,
    },
    /// Run the accessibility audit over an HTML page
    Audit { file: PathBuf },
    /// Validate a listing form payload, optionally submitting it
    Validate {
        file: PathBuf,
        #[arg(long)]
        submit: bool,
    },
    /// Approve a pending listing
    Approve {
        id: String,
        #[arg(long)]
        by: String,
        #[arg(long)]
        notes: Option<String>,
        /// Admin session token from the auth provider
        #[arg(long, env = "HOME_MARKET_ACCESS_TOKEN")]
        token: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Grid,
    List,
}

impl From<LayoutArg> for CardLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Grid => CardLayout::Grid,
            LayoutArg::List => CardLayout::List,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            url,
            listings,
            layout,
            out,
            json,
        } => {
            search(&settings, &url, listings, layout.map(Into::into), &out, json.as_deref()).await
        }
        Command::Price { amount, from, to } => price(&settings, amount, &from, to.as_deref()).await,
        Command::Audit { file } => audit(&file).await,
        Command::Validate { file, submit } => validate(&settings, &file, submit).await,
        Command::Approve {
            id,
            by,
            notes,
            token,
        } => {
            let mut client = BackendClient::new(&settings.backend)?;
            if let Some(token) = token {
                client = client.with_access_token(token);
            }
            let property = client.approve_property(&id, &by, notes.as_deref()).await?;
            println!("✅ Approved {} ({})", property.id, property.title);
            Ok(())
        }
    }
}

async fn rates(settings: &Settings) -> RateTable {
    let source: Box<dyn RateSource> = match &settings.rates.endpoint {
        Some(endpoint) => match HttpRateSource::new(endpoint.clone(), settings.rates.timeout()) {
            Ok(source) => Box::new(source),
            Err(e) => {
                warn!("Could not build rate client: {}", e);
                Box::new(StaticRateSource)
            }
        },
        None => Box::new(StaticRateSource),
    };
    load_rates(&*source).await
}

async fn search(
    settings: &Settings,
    url: &str,
    listings: Option<PathBuf>,
    layout: Option<CardLayout>,
    out: &std::path::Path,
    json: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let state = FilterState::mount_with_currency(url, settings.display.default_currency)
        .with_context(|| format!("Invalid search URL {}", url))?;

    let source: Box<dyn ListingSource> = match listings {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(BackendClient::new(&settings.backend)?),
    };
    info!("🏠 Loading listings from {}", source.source_name());
    let properties = source
        .fetch_listings()
        .await
        .context("Failed to load listings")?;

    let rates = rates(settings).await;
    let filters = state.filters().clone();
    let results = run_search(&filters, &properties, &rates, settings.display.page_size);
    info!(
        "Found {} matching properties (page {} of {})",
        results.total, results.page, results.pages
    );

    let mut ctx = CardContext::new(filters.currency, &rates, &settings.display.alternate_currencies);
    ctx.placeholder_image = &settings.display.placeholder_image;
    let layout = layout.unwrap_or(settings.display.layout);
    let html = render_search_page(&results, &state, layout, &ctx);

    let report = audit_document(&html);
    for issue in &report.issues {
        warn!("a11y {}", issue);
    }

    tokio::fs::write(out, &html)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!("💾 Saved search page to {}", out.display());

    if let Some(json_path) = json {
        let body = serde_json::to_string_pretty(&results.items)?;
        tokio::fs::write(json_path, body).await?;
        info!("💾 Saved {} listings to {}", results.items.len(), json_path.display());
    }

    Ok(())
}

async fn price(settings: &Settings, amount: f64, from: &str, to: Option<&str>) -> anyhow::Result<()> {
    let from: Currency = from.parse().map_err(anyhow::Error::msg)?;
    let target = match to {
        Some(code) => code.parse::<Currency>().map_err(anyhow::Error::msg)?,
        None => settings.display.default_currency,
    };

    let rates = rates(settings).await;
    let formatted = format_price(amount, from, target, &rates, &settings.display.alternate_currencies);
    println!("{}", formatted.primary);
    for alternate in formatted.alternates {
        println!("  ≈ {}", alternate);
    }
    Ok(())
}

async fn audit(file: &std::path::Path) -> anyhow::Result<()> {
    let html = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let report = audit_document(&html);

    if report.is_clean() {
        println!("✅ No accessibility issues found in {}", file.display());
        return Ok(());
    }
    for issue in &report.issues {
        println!("{}", issue);
    }
    if report.has_errors() {
        bail!("{} accessibility errors found", report.errors().count());
    }
    Ok(())
}

async fn validate(settings: &Settings, file: &std::path::Path, submit: bool) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let listing: NewListing = serde_json::from_str(&raw).context("Listing payload is not valid JSON")?;

    if let Err(errors) = validate_listing(&listing) {
        for error in &errors.errors {
            println!("✗ {} {}", error.field, error.message);
        }
        bail!("Listing has {} invalid fields", errors.errors.len());
    }
    println!("✅ Listing is valid");

    if submit {
        let client = BackendClient::new(&settings.backend)?;
        let created = client.create_property(&listing).await?;
        println!("Created listing {}", created.id);
    }
    Ok(())
}
