use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config};
use crate::scoring::{ScoringConfig, Weights};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Print text with a typewriter effect, one character at a time.
fn typewriter(text: &str) {
    use std::thread;
    use std::time::Duration;
    for c in text.chars() {
        print!("{}", c);
        std::io::stdout().flush().ok();
        thread::sleep(Duration::from_millis(18));
    }
    println!();
}

fn prompt_f64(message: &str, default: f64, accept: impl Fn(f64) -> bool) -> Result<f64> {
    loop {
        let input = prompt_with_default(message, &format!("{}", default))?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && accept(v) => return Ok(v),
            _ => println!("  Invalid value. Try again."),
        }
    }
}

fn prompt_u32(message: &str, default: u32, accept: impl Fn(u32) -> bool) -> Result<u32> {
    loop {
        let input = prompt_with_default(message, &format!("{}", default))?;
        match input.parse::<u32>() {
            Ok(v) if accept(v) => return Ok(v),
            _ => println!("  Invalid value. Try again."),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    typewriter("Flat Scout Configuration Wizard");
    println!("===============================");
    println!();

    let suggested = ScoringConfig::suggested();
    let configure_scoring = prompt_yes_no("Configure scoring? (n accepts defaults)", true)?;

    let scoring = if configure_scoring {
        println!();
        typewriter("Hard constraints first. A listing that fails one scores 0 outright, no matter how good the rest looks.");
        let min_bedrooms = prompt_u32("Minimum bedrooms", 2, |_| true)?;

        typewriter("Tenure filter: by default only Freehold and Share of freehold pass. Answer n to also accept leasehold flats.");
        let strict_tenure = prompt_yes_no("Freehold / share of freehold only?", true)?;
        let allowed_tenure = if strict_tenure {
            vec!["Freehold".to_string(), "Share of freehold".to_string()]
        } else {
            vec![
                "Freehold".to_string(),
                "Share of freehold".to_string(),
                "Leasehold".to_string(),
            ]
        };

        println!();
        typewriter("The price band. Anything inside target +- tolerance gets full marks; outside, the score drops off at twice the overshoot.");
        let target = prompt_f64("Target price", 380_000.0, |v| v > 0.0)?;
        let tolerance = prompt_f64("Tolerance (fraction, e.g. 0.10 = +-10%)", 0.10, |v| {
            (0.0..1.0).contains(&v)
        })?;

        println!();
        typewriter("Bedrooms beyond the cap don't earn extra score.");
        let cap = prompt_u32("Bedroom cap", 4, |v| v >= 1)?;

        println!();
        typewriter("Weights decide how much each factor matters. They're combined as-is; keep them summing to about 1 so scores stay on the 0-10 scale.");
        let use_default_weights = prompt_yes_no(
            "Weights - use defaults? (price 0.3, bedrooms 0.2, zone 0.2, travel 0.1, epc 0.1, subjective 0.1)",
            true,
        )?;
        let weights = if use_default_weights {
            suggested.weights.clone()
        } else {
            let mut weights = Weights::default();
            let entries: [(&str, &mut Option<f64>, f64); 7] = [
                ("price", &mut weights.price, 0.3),
                ("bedrooms", &mut weights.bedrooms, 0.2),
                ("zone", &mut weights.zone, 0.2),
                ("travel", &mut weights.travel, 0.1),
                ("epc", &mut weights.epc, 0.1),
                ("bank", &mut weights.bank, 0.0),
                ("subjective", &mut weights.subjective, 0.1),
            ];
            for (name, slot, default) in entries {
                let value = prompt_f64(&format!("  Weight for {}", name), default, |_| true)?;
                if value != 0.0 {
                    *slot = Some(value);
                }
            }
            weights
        };

        ScoringConfig {
            constraints: crate::scoring::Constraints {
                min_bedrooms: Some(min_bedrooms),
                allowed_tenure: Some(allowed_tenure),
            },
            price: crate::scoring::PriceBand {
                target: Some(target),
                tolerance: Some(tolerance),
            },
            bedrooms: crate::scoring::BedroomScale { cap: Some(cap) },
            weights,
        }
    } else {
        suggested
    };

    // Catalog location
    println!();
    typewriter("Where do your listings live? A JSON array of listing objects; you maintain it by hand and the locate command helps fill in distances.");
    let listings_default = crate::config::get_config_dir().join("listings.json");
    let listings_str = prompt_with_default(
        "Listings catalog path",
        &listings_default.display().to_string(),
    )?;

    // Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        listings: Some(PathBuf::from(listings_str)),
        scoring: Some(scoring),
        reference: None, // Bank by default; set `reference:` in the file to change it
    };

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    typewriter("Add listings to the catalog file, then run `flat-scout` to see them ranked. `flat-scout locate <address>` fills in distances for new candidates.");

    Ok(())
}
