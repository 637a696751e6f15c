use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, RatingsProvider, UserId};
use evaluator::{EvaluationConfig, EvaluationReport, Evaluator, RawHeldOut};
use recommender::{RecommenderConfig, UserBasedRecommender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "User-based collaborative filtering recommender and evaluator", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Length of each recommendation list
    #[arg(long, default_value_t = RecommenderConfig::DEFAULT_TOP_N)]
    top_n: usize,

    /// Number of similar users consulted per recommendation
    #[arg(long, default_value_t = RecommenderConfig::DEFAULT_NEIGHBOR_COUNT)]
    neighbors: usize,

    /// Catalog size used as the coverage denominator
    #[arg(long, default_value_t = EvaluationConfig::DEFAULT_CATALOG_SIZE)]
    catalog_size: usize,

    /// Seed for the leave-one-out split
    #[arg(long, default_value_t = EvaluationConfig::DEFAULT_LOOCV_SEED)]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Keep movies the user has already rated
        #[arg(long)]
        include_watched: bool,
    },

    /// Show the users most similar to a user
    Similar {
        /// User ID to find neighbors for
        #[arg(long)]
        user_id: UserId,
    },

    /// Score the recommender with hit rate, ARHR, coverage, diversity and novelty
    Evaluate {
        /// CSV of held-out ratings (userId,movieId,rating); defaults to a leave-one-out split
        #[arg(long)]
        held_out: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let recommender_config = RecommenderConfig::default()
        .with_top_n(cli.top_n)
        .with_neighbor_count(cli.neighbors);

    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_dir(&cli.data_dir).context("Failed to load MovieLens dataset")?,
    );
    let (users, movies, ratings) = data_index.counts();
    println!(
        "{} Loaded {} ratings from {} users over {} movies in {:?}",
        "✓".green(),
        ratings,
        users,
        movies,
        start.elapsed()
    );

    match cli.command {
        Commands::Recommend {
            user_id,
            include_watched,
        } => handle_recommend(data_index, recommender_config, user_id, include_watched)?,
        Commands::Similar { user_id } => handle_similar(data_index, recommender_config, user_id)?,
        Commands::Evaluate { held_out, json } => {
            let config = EvaluationConfig::default()
                .with_catalog_size(cli.catalog_size)
                .with_loocv_seed(cli.seed)
                .with_recommender(recommender_config);
            handle_evaluate(data_index, config, held_out.as_deref(), json)?
        }
    }

    Ok(())
}

fn ensure_user_exists(data_index: &DataIndex, user_id: UserId) -> Result<()> {
    if data_index.get_user_ratings(user_id).is_empty() {
        return Err(anyhow!("User {} has no ratings", user_id));
    }
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
    user_id: UserId,
    include_watched: bool,
) -> Result<()> {
    ensure_user_exists(&data_index, user_id)?;

    let recommender = UserBasedRecommender::new(data_index.clone()).with_config(config);
    let start = Instant::now();
    let Some(movie_ids) = recommender.recommend(user_id, !include_watched) else {
        println!("{}", format!("No recommendations for user {}", user_id).yellow());
        return Ok(());
    };
    debug!("Recommended {} movies in {:?}", movie_ids.len(), start.elapsed());

    println!("{}", format!("Recommendations for user {}:", user_id).bold().blue());
    let mut rank = 0;
    for movie_id in movie_ids {
        // Movies without a catalog entry are skipped so ranks stay contiguous
        let Some(title) = data_index.fetch_movie_title(movie_id)? else {
            debug!("Skipping movie {} with no title", movie_id);
            continue;
        };
        rank += 1;
        let genres = data_index
            .get_movie(movie_id)
            .map(|movie| movie.genres.replace('|', ", "))
            .unwrap_or_default();
        println!("{}. {} [{}]", rank.to_string().green(), title, genres);
    }
    if rank == 0 {
        println!("{}", "No recommended movie has a known title".yellow());
    }
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
    user_id: UserId,
) -> Result<()> {
    ensure_user_exists(&data_index, user_id)?;

    let recommender = UserBasedRecommender::new(data_index.clone()).with_config(config);
    let neighbors = recommender.similar_users(user_id);

    println!("{}", format!("Users most similar to user {}:", user_id).bold().blue());
    for (i, neighbor) in neighbors.iter().enumerate() {
        println!(
            "{}. user {} - similarity {:.4} ({} ratings)",
            (i + 1).to_string().green(),
            neighbor.user_id,
            neighbor.score,
            data_index.get_user_ratings(neighbor.user_id).len()
        );
    }
    if neighbors.is_empty() {
        println!("{}", "No other users to compare against".yellow());
    }
    Ok(())
}

fn read_held_out(path: &Path) -> Result<Vec<RawHeldOut>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open held-out file {}", path.display()))?;
    let entries = reader
        .deserialize()
        .collect::<std::result::Result<Vec<RawHeldOut>, _>>()
        .with_context(|| format!("Failed to parse held-out file {}", path.display()))?;
    Ok(entries)
}

/// Handle the 'evaluate' command
fn handle_evaluate(
    data_index: Arc<DataIndex>,
    config: EvaluationConfig,
    held_out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let evaluator = Evaluator::new(data_index).with_config(config);

    let start = Instant::now();
    let report = match held_out {
        Some(path) => {
            let entries = read_held_out(path)?;
            info!("Read {} held-out entries from {}", entries.len(), path.display());
            evaluator.evaluate_against(&entries)
        }
        None => evaluator.evaluate(),
    };
    info!("Evaluation finished in {:?}", start.elapsed());

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &EvaluationReport) {
    println!("{}", "Evaluation results:".bold().blue());
    println!(
        "{}Users evaluated: {} ({} held-out ratings)",
        "• ".cyan(),
        report.users_evaluated,
        report.held_out_entries
    );
    println!("{}Hit rate: {:.4}", "• ".green(), report.hit_rate);
    println!(
        "{}Average reciprocal hit rate: {:.4}",
        "• ".green(),
        report.average_reciprocal_hit_rate
    );
    println!(
        "{}Coverage: {:.2}% of {} movies",
        "• ".green(),
        report.coverage_percent(),
        report.config.catalog_size
    );
    println!("{}Diversity (Gini-Simpson): {:.4}", "• ".green(), report.diversity);
    println!("{}Novelty: {:.4}", "• ".green(), report.novelty);
}
