use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::prompts::render_email_html;
use server::{Config, ShopOrchestrator};
use shop_state::{EmailCopy, ShopState};
use std::time::Instant;
use tracing::debug;

/// ShopGenie - Product Recommendation Assistant
#[derive(Parser)]
#[command(name = "shop-genie")]
#[command(about = "Finds reviews, compares products and emails the best pick", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full recommendation workflow for a shopping query
    Recommend {
        /// What you are shopping for, e.g. "best smartphones under $1000"
        #[arg(long)]
        query: String,

        /// Address the recommendation email is sent to
        #[arg(long)]
        email: String,

        /// Print the final state as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show which settings resolved from the environment (secrets masked)
    CheckConfig,

    /// Render the recommendation email locally without calling any service
    PreviewEmail {
        /// Product name shown as the top pick
        #[arg(long)]
        product: String,

        /// One-line reason for the recommendation
        #[arg(long)]
        justification: String,

        /// Email heading
        #[arg(long, default_value = "Our Top Recommendation for You")]
        heading: String,

        /// Review video link; the review button is omitted without one
        #[arg(long)]
        youtube_link: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { query, email, json } => handle_recommend(&query, &email, json).await?,
        Commands::CheckConfig => handle_check_config()?,
        Commands::PreviewEmail {
            product,
            justification,
            heading,
            youtube_link,
        } => handle_preview_email(&product, &justification, heading, youtube_link.as_deref()),
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(query: &str, email: &str, json: bool) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    debug!("Loaded {:?}", config);
    let orchestrator = ShopOrchestrator::from_config(&config)?;

    let start = Instant::now();
    let state = orchestrator.run(query, email).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_summary(&state);
        println!("{} Finished in {:.1?}", "✓".green(), start.elapsed());
    }
    Ok(())
}

/// Handle the 'check-config' command
fn handle_check_config() -> Result<()> {
    let config = Config::from_env().context("Configuration is incomplete")?;

    println!("{}", "Resolved configuration:".bold().blue());
    for (name, value) in config.describe() {
        println!("{}{}: {}", "• ".green(), name, value);
    }
    Ok(())
}

/// Handle the 'preview-email' command
fn handle_preview_email(product: &str, justification: &str, heading: String, youtube_link: Option<&str>) {
    let copy = EmailCopy {
        subject: format!("Our pick for you: {product}"),
        heading,
        justification_line: justification.to_string(),
    };
    println!("{}", render_email_html(&copy, product, youtube_link));
}

/// Helper function to format and print a finished run
fn print_summary(state: &ShopState) {
    println!("{}", format!("Recommendation for '{}':", state.query()).bold().blue());

    for article in &state.blogs_content {
        println!("{}Source: {} ({})", "• ".cyan(), article.title, article.url);
    }

    if state.product_schema.is_empty() {
        println!("{}", "No products could be extracted.".yellow());
        return;
    }
    println!("Products found:");
    for (rank, product) in state.product_schema.iter().enumerate() {
        println!(
            "{}. {} - Score: {:.1}",
            (rank + 1).to_string().green(),
            product.title,
            product.score
        );
    }

    if !state.comparison.is_empty() {
        println!("Comparison:");
        for entry in &state.comparison {
            println!(
                "  - {}: overall {:.1}, performance {:.1}, battery {:.1}, camera {:.1}, display {:.1}",
                entry.name,
                entry.ratings.overall,
                entry.ratings.performance,
                entry.ratings.battery_life,
                entry.ratings.camera_quality,
                entry.ratings.display_quality
            );
        }
    }

    match &state.best_product {
        Some(best) if !best.name.trim().is_empty() => {
            println!("{} {}", "Best pick:".bold().green(), best.name.bold());
            println!("   {}", best.justification);
        }
        _ => println!("{}", "No best product could be chosen.".yellow()),
    }

    if let Some(link) = &state.youtube_link {
        println!("{}Review video: {}", "• ".cyan(), link);
    }

    match &state.notification {
        Some(sent) => println!("{}Emailed \"{}\" to {}", "• ".cyan(), sent.subject, sent.recipient),
        None => println!("{}", "No email was sent.".yellow()),
    }
}
