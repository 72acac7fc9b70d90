mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Dataset;
use pipeline::{EvaluationMode, Metrics, PageCursor};
use recommender::{AppConfig, RecommendationItem, RecommendationOrchestrator, RecommendationPage};
use session::{BrowseCommand, BrowseSession};
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};

/// movie-recs - Genre-based movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations ranked by a trained rating classifier", long_about = None)]
struct Cli {
    /// Path to the movies CSV (overrides the config file)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Recommendations per page (overrides the config file)
    #[arg(long)]
    page_size: Option<usize>,

    /// How window metrics get their predictions: sanity-check or model-predictions
    #[arg(long)]
    evaluation: Option<EvaluationMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the genres available for selection
    Genres,

    /// Show one page of recommendations for a genre
    Recommend {
        /// Genre to recommend from (exact name, see `genres`)
        #[arg(long)]
        genre: String,

        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: usize,

        /// Show overview, languages and homepage for each movie
        #[arg(long)]
        details: bool,
    },

    /// Page through recommendations interactively
    Browse {
        /// Genre to start with
        #[arg(long)]
        genre: Option<String>,
    },

    /// Train the classifier and print the training report
    Train,
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
    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Genres => handle_genres(&config)?,
        Commands::Recommend {
            genre,
            page,
            details,
        } => handle_recommend(&config, genre, page, details).await?,
        Commands::Browse { genre } => handle_browse(&config, genre).await?,
        Commands::Train => handle_train(&config).await?,
    }

    Ok(())
}

/// Config file and environment first, then command-line overrides
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(data) = &cli.data {
        config.dataset_path = data.clone();
    }
    if let Some(page_size) = cli.page_size {
        config.recommendations.page_size = page_size;
    }
    if let Some(mode) = cli.evaluation {
        config.recommendations.evaluation = mode;
    }

    config.validate()?;
    Ok(config)
}

/// Load, train and print a short summary
async fn initialize(config: &AppConfig) -> Result<RecommendationOrchestrator> {
    println!(
        "Loading {} and training classifier...",
        config.dataset_path.display()
    );
    let start = Instant::now();
    let orchestrator = RecommendationOrchestrator::initialize(config).await?;

    let report = orchestrator.dataset().report();
    println!(
        "{} Ready in {:.2?}: {} movies, {} genres",
        "✓".green(),
        start.elapsed(),
        report.rows,
        orchestrator.genres().len()
    );
    if report.unparsed_genres > 0 || report.unparsed_languages > 0 {
        println!(
            "{} {} genre and {} language cells could not be parsed and were left empty",
            "!".yellow(),
            report.unparsed_genres,
            report.unparsed_languages
        );
    }
    Ok(orchestrator)
}

/// Handle the 'genres' command
fn handle_genres(config: &AppConfig) -> Result<()> {
    let dataset = Dataset::load(&config.dataset_path).with_context(|| {
        format!("Failed to load dataset from {}", config.dataset_path.display())
    })?;

    println!("{}", "Genres:".bold().blue());
    for genre in dataset.vocabulary().iter() {
        println!(
            "  {} {}",
            genre,
            format!("({} movies)", dataset.rows_with_genre(genre).len()).dimmed()
        );
    }

    let report = dataset.report();
    if report.unparsed_genres > 0 {
        println!(
            "{} {} rows had an unparseable genre list",
            "!".yellow(),
            report.unparsed_genres
        );
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    config: &AppConfig,
    genre: String,
    page: usize,
    details: bool,
) -> Result<()> {
    let orchestrator = initialize(config).await?;
    let page_size = config.recommendations.page_size;
    let cursor = PageCursor::at(page.saturating_mul(page_size), page_size);

    let page = orchestrator.recommend(&genre, &cursor).await?;
    print_page(&page, details);
    print_metrics(&page.metrics, config.recommendations.evaluation);
    Ok(())
}

/// Handle the 'train' command
async fn handle_train(config: &AppConfig) -> Result<()> {
    let orchestrator = initialize(config).await?;
    let Some(report) = orchestrator.training_report() else {
        return Ok(());
    };

    println!("{}", "Training report:".bold().blue());
    println!(
        "{}Epochs run: {} (best: {})",
        "• ".green(),
        report.epochs_run,
        report.best_epoch
    );
    println!(
        "{}Stopped early: {}",
        "• ".green(),
        if report.stopped_early { "yes" } else { "no" }
    );
    println!(
        "{}Rows: {} training, {} validation",
        "• ".green(),
        report.training_rows,
        report.validation_rows
    );
    println!(
        "{}Best validation loss: {:.4}",
        "• ".cyan(),
        report.best_validation_loss
    );
    println!(
        "{}Validation accuracy: {:.3}",
        "• ".cyan(),
        report.validation_accuracy
    );
    match report.validation_auc {
        Some(auc) => println!("{}Validation ROC AUC: {:.3}", "• ".cyan(), auc),
        None => println!("{}Validation ROC AUC: n/a (single class)", "• ".cyan()),
    }
    Ok(())
}

/// Handle the 'browse' command
async fn handle_browse(config: &AppConfig, genre: Option<String>) -> Result<()> {
    let orchestrator = initialize(config).await?;
    let mut session = BrowseSession::new(orchestrator.cursor());
    if let Some(genre) = genre {
        session.select_genre(genre);
        show_page(&orchestrator, &mut session, config).await?;
    }

    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&session);
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match BrowseCommand::parse(&line) {
            Some(BrowseCommand::Quit) => break,
            Some(BrowseCommand::Help) => print_help(),
            Some(BrowseCommand::Genres) => {
                println!("{}", orchestrator.genres().join(", "));
            }
            Some(BrowseCommand::Genre(genre)) => {
                session.select_genre(genre);
                show_page(&orchestrator, &mut session, config).await?;
            }
            Some(BrowseCommand::Next) => {
                if session.genre().is_none() {
                    println!("Pick a genre first: genre <name>");
                    continue;
                }
                session.advance();
                show_page(&orchestrator, &mut session, config).await?;
            }
            Some(BrowseCommand::Reset) => {
                if session.genre().is_none() {
                    continue;
                }
                session.reset();
                println!("{} Back to the first page", "✓".green());
                show_page(&orchestrator, &mut session, config).await?;
            }
            Some(BrowseCommand::History) => print_history(session.history()),
            None => {
                if !line.trim().is_empty() {
                    println!("Unknown command, type 'help' for the list");
                }
            }
        }
    }
    Ok(())
}

async fn show_page(
    orchestrator: &RecommendationOrchestrator,
    session: &mut BrowseSession,
    config: &AppConfig,
) -> Result<()> {
    let Some(genre) = session.genre().map(str::to_string) else {
        return Ok(());
    };

    let page = orchestrator.recommend(&genre, session.cursor()).await?;
    print_page(&page, false);
    print_metrics(&page.metrics, config.recommendations.evaluation);
    session.record(&page);
    Ok(())
}

fn print_prompt(session: &BrowseSession) {
    use std::io::Write;

    let label = session.genre().unwrap_or("no genre");
    print!("{} ", format!("[{label}]>").bold());
    // Prompt is best effort
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!("{}", "Commands:".bold().blue());
    println!("  genre <name>   recommend from a genre");
    println!("  genres         list genres");
    println!("  next           show more movies");
    println!("  reset          back to the first page");
    println!("  history        everything shown so far");
    println!("  quit");
}

/// Helper function to format and print a page of recommendations
fn print_page(page: &RecommendationPage, details: bool) {
    if page.is_empty() {
        if page.total_matches == 0 {
            println!("No movies found for genre '{}'.", page.genre);
        } else {
            println!(
                "No more movies for '{}' ({} in total).",
                page.genre, page.total_matches
            );
        }
        return;
    }

    println!(
        "{}",
        format!(
            "{} recommendations {}-{} of {}:",
            page.genre,
            page.offset + 1,
            page.offset + page.items.len(),
            page.total_matches
        )
        .bold()
        .blue()
    );
    for (i, item) in page.items.iter().enumerate() {
        print_item(page.offset + i + 1, item, details);
    }
}

fn print_item(rank: usize, item: &RecommendationItem, details: bool) {
    println!(
        "{}. {} ({}) [{}] - Score: {:.3}",
        rank.to_string().green(),
        item.title.bold(),
        item.release_date,
        item.genres,
        item.score
    );
    if let Some(poster) = &item.poster_url {
        println!("   Poster: {}", poster.dimmed());
    }
    if details {
        println!("   Languages: {}", item.spoken_languages);
        if !item.homepage.is_empty() {
            println!("   Homepage: {}", item.homepage);
        }
        println!("   {}", item.overview);
    }
}

fn print_metrics(metrics: &Metrics, mode: EvaluationMode) {
    println!("{}", format!("Metrics ({mode}):").bold());
    println!("{}Accuracy:  {:.2}", "• ".cyan(), metrics.accuracy);
    println!("{}Precision: {:.2}", "• ".cyan(), metrics.precision);
    println!("{}Recall:    {:.2}", "• ".cyan(), metrics.recall);
    println!("{}F1-score:  {:.2}", "• ".cyan(), metrics.f1);
}

fn print_history(history: &[RecommendationItem]) {
    if history.is_empty() {
        println!("No recommendations shown yet.");
        return;
    }
    println!("{}", "History:".bold().blue());
    for (i, item) in history.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, item.title, item.genres);
    }
}
