mod error;
mod fetch;
mod mix;
mod model;
mod optimize;
mod parser;
mod pipeline;
mod sources;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use fetch::HttpFetcher;
use mix::MixOutcome;
use model::Dataset;
use optimize::{Filter, OptimizeTarget};
use parser::HtmlTableParser;

#[derive(Parser)]
#[command(
    name = "s1_scraper",
    about = "Schedule I economy dataset scraper (ranks, effects, drugs, ingredients, mixing rules)"
)]
struct Cli {
    /// Defaults to `scrape` into data.json
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all wiki tables and write the dataset
    Scrape {
        #[arg(short, long, default_value = sources::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
    /// Simulate a mix against a scraped dataset
    Mix {
        /// Base drug name (exact)
        #[arg(short, long)]
        drug: String,
        /// Ingredients in the order they are added
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        #[arg(long, default_value = sources::DEFAULT_OUTPUT)]
        data: PathBuf,
    },
    /// Search for the best mix over drugs and ingredient sequences
    Optimize {
        /// Base drugs to try (default: all)
        #[arg(short, long = "drug")]
        drugs: Vec<String>,
        /// Ingredients to draw from (default: all)
        #[arg(short, long = "ingredient")]
        ingredients: Vec<String>,
        /// Effects the mix must have
        #[arg(long)]
        require: Vec<String>,
        /// Effects the mix must not have
        #[arg(long)]
        block: Vec<String>,
        /// Longest ingredient sequence tried
        #[arg(short, long, default_value_t = 4)]
        max_ingredients: usize,
        /// Ranking, first target decides (default: profit, cost, ingredients)
        #[arg(short, long = "target", value_enum)]
        targets: Vec<OptimizeTarget>,
        #[arg(long, default_value = sources::DEFAULT_OUTPUT)]
        data: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Scrape {
        output: PathBuf::from(sources::DEFAULT_OUTPUT),
    });

    let result = match command {
        Commands::Scrape { output } => {
            let fetcher = HttpFetcher::new()?;
            let data = pipeline::run(&fetcher, &HtmlTableParser)
                .await
                .context("Scrape aborted, nothing written")?;
            data.write(&output)?;
            println!(
                "Wrote {}: {} ranks, {} effects, {} drugs, {} ingredients",
                output.display(),
                data.ranks.len(),
                data.effects.len(),
                data.drugs.len(),
                data.ingredients.len()
            );
            Ok(())
        }
        Commands::Mix {
            drug,
            ingredients,
            data,
        } => {
            let data = Dataset::load(&data)?;
            run_mix(&data, &drug, &ingredients)
        }
        Commands::Optimize {
            drugs,
            ingredients,
            require,
            block,
            max_ingredients,
            targets,
            data,
        } => {
            let data = Dataset::load(&data)?;
            let mut filter = Filter::new(&data);
            filter.with_max_ingredients(max_ingredients);
            if !targets.is_empty() {
                filter.with_targets(targets);
            }
            if drugs.is_empty() {
                filter.add_all_drugs();
            }
            for name in &drugs {
                filter.add_drug(name)?;
            }
            if ingredients.is_empty() {
                filter.add_all_ingredients();
            }
            for name in &ingredients {
                filter.add_ingredient(name)?;
            }
            for name in &require {
                filter.add_required_effect(name)?;
            }
            for name in &block {
                filter.add_blocked_effect(name)?;
            }

            match optimize::find_optimal_mix(&filter) {
                Some(outcome) => {
                    println!("Best mix found:");
                    print_outcome(&outcome);
                }
                None => println!("No mix satisfies the filter"),
            }
            Ok(())
        }
    };

    info!("Done in {}", format_duration(t0.elapsed()));
    result
}

fn run_mix(data: &Dataset, drug: &str, ingredients: &[String]) -> anyhow::Result<()> {
    let drug = data
        .drug_by_name(drug)
        .ok_or_else(|| anyhow!("Drug '{}' not found in dataset", drug))?;
    let ingredients = ingredients
        .iter()
        .map(|name| {
            data.ingredient_by_name(name)
                .ok_or_else(|| anyhow!("Ingredient '{}' not found in dataset", name))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    print_outcome(&mix::evaluate(data, drug, ingredients));
    Ok(())
}

fn print_outcome(outcome: &MixOutcome) {
    let names = |items: Vec<&str>| if items.is_empty() { "-".to_string() } else { items.join(", ") };

    println!("Base drug:   {}", outcome.drug.name);
    println!(
        "Ingredients: {}",
        names(outcome.ingredients.iter().map(|i| i.name.as_str()).collect())
    );
    println!(
        "Effects:     {}",
        names(outcome.effects.iter().map(|e| e.name.as_str()).collect())
    );
    println!("Multiplier:  {:.2}", outcome.multiplier);
    println!("Cost:        {}", outcome.cost);
    println!("Sell price:  {}", outcome.sell_price);
    println!("Profit:      {}", outcome.profit);
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
