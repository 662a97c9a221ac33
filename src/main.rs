use clap::{Parser, Subcommand};
use std::path::PathBuf;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_DATA: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// List listings ranked by score (default if no subcommand)
    List {
        /// Sort key: score, price, bedrooms, zone, travel, epc, address,
        /// viewing_date
        #[arg(short, long)]
        sort: Option<String>,

        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,

        /// Include dismissed listings
        #[arg(long)]
        all: bool,
    },
    /// Interactive table (sort, filter, dismiss, score breakdowns)
    Tui,
    /// Open a listing in the browser by its index number
    Open {
        /// Index number of the listing to open (1-based, as shown in list)
        index: usize,
    },
    /// Geocode an address and report distance to the reference point and
    /// the nearest Underground station
    Locate {
        /// Address or postcode to look up
        #[arg(required = true)]
        address: Vec<String>,

        /// Emit the report as JSON (paste-ready for the catalog)
        #[arg(long)]
        json: bool,

        /// Bypass the lookup response cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "flat-scout")]
#[command(about = "Property listing ranking CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/flat-scout/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List {
        sort: None,
        tsv: false,
        all: false,
    });
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before any config exists.
    if matches!(command, Commands::Init) {
        if let Err(e) = flat_scout::config::run_init_wizard(config_path) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match flat_scout::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.clone().unwrap_or_default();
    if let Err(errors) = flat_scout::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if let Commands::Locate {
        address,
        json,
        no_cache,
    } = &command
    {
        let query = address.join(" ");
        let cache = if *no_cache {
            // Fresh lookups were asked for; drop stale answers too.
            if let Err(e) = flat_scout::geo::clear_cache() {
                eprintln!("Warning: failed to clear lookup cache: {}", e);
            }
            None
        } else {
            Some(flat_scout::geo::GeoCache::new(
                flat_scout::geo::get_cache_path(),
            ))
        };

        let client = match flat_scout::geo::GeoClient::new(cache) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to create lookup client: {}", e);
                std::process::exit(EXIT_NETWORK);
            }
        };

        let reference = config.reference_point();
        match client.enrich(&query, &reference).await {
            Ok(Some(report)) => {
                if *json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(out) => println!("{}", out),
                        Err(e) => {
                            eprintln!("Failed to serialize report: {}", e);
                            std::process::exit(EXIT_DATA);
                        }
                    }
                } else {
                    let use_colors = flat_scout::output::should_use_colors();
                    println!(
                        "{}",
                        flat_scout::output::format_enrichment_report(
                            &report,
                            reference.label(),
                            use_colors
                        )
                    );
                }
            }
            Ok(None) => {
                eprintln!("No geocoding match for '{}'.", query);
                std::process::exit(EXIT_DATA);
            }
            Err(e) => {
                eprintln!("Lookup failed: {}", e);
                std::process::exit(EXIT_NETWORK);
            }
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Everything below needs the scored catalog.
    let dismiss_path = flat_scout::dismiss::get_dismiss_path();
    let dismiss_state = match flat_scout::dismiss::load_dismiss_state(&dismiss_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Warning: {}. Starting with an empty dismiss list.", e);
            flat_scout::dismiss::DismissState::new()
        }
    };

    let (active, dismissed) = match flat_scout::fetch::load_and_score(
        &config,
        &scoring,
        &dismiss_state,
        cli.verbose,
    ) {
        Ok(lists) => lists,
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    match command {
        Commands::List { sort, tsv, all } => {
            let mut entries = active;
            if all {
                entries.extend(dismissed);
            }

            let key = match sort {
                Some(ref key_str) => match flat_scout::scoring::SortKey::parse(key_str) {
                    Some(key) => key,
                    None => {
                        eprintln!(
                            "Unknown sort key '{}'. Valid keys: score, price, bedrooms, zone, travel, epc, address, viewing_date",
                            key_str
                        );
                        std::process::exit(EXIT_CONFIG);
                    }
                },
                None => flat_scout::scoring::SortKey::Score,
            };
            flat_scout::scoring::sort_listings(&mut entries, key);

            if tsv {
                let out = flat_scout::output::format_tsv(&entries);
                if !out.is_empty() {
                    println!("{}", out);
                }
            } else {
                let use_colors = flat_scout::output::should_use_colors();
                if cli.verbose && !entries.is_empty() {
                    // Verbose mode: detailed output with score breakdowns
                    for entry in &entries {
                        println!(
                            "{}",
                            flat_scout::output::format_listing_detail(entry, use_colors)
                        );
                        println!();
                    }
                } else {
                    println!(
                        "{}",
                        flat_scout::output::format_scored_table(&entries, use_colors)
                    );
                }
            }
        }
        Commands::Open { index } => {
            // Validate index bounds (1-based)
            if index < 1 || index > active.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    active.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let entry = &active[index - 1];
            match entry.listing.url.as_deref() {
                Some(url) => {
                    if let Err(e) = flat_scout::browser::open_url(url) {
                        eprintln!("Failed to open browser: {}", e);
                        std::process::exit(EXIT_NETWORK);
                    }
                    println!("Opening {} in browser: {}", entry.listing.label(), url);
                }
                None => {
                    eprintln!("No URL on record for {}.", entry.listing.label());
                    std::process::exit(EXIT_DATA);
                }
            }
        }
        Commands::Tui => {
            let app = flat_scout::tui::App::new(
                active,
                dismissed,
                dismiss_state,
                dismiss_path,
                config,
                scoring,
                cli.verbose,
            );
            if let Err(e) = flat_scout::tui::run_tui(app).await {
                eprintln!("TUI error: {}", e);
                std::process::exit(EXIT_DATA);
            }
        }
        Commands::Locate { .. } | Commands::Init => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
