use clap::{Parser, Subcommand};
use redb::Database;
use spotlight_backend::config::Config;
use spotlight_backend::models::db_operations::{
    comments_db_operations, posts_db_operations, stores_db_operations, DbError,
};
use spotlight_backend::setup::db_setup;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for initial application setup.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the .env configuration file.
    #[arg(long, required = true, value_name = "FILE")]
    env_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Prints record totals of the spotlight database.
    Stats,
}

#[derive(Subcommand, Debug)]
enum DbAction {
    /// Creates the database file and every table. Safe to run again.
    Setup,
}

fn main() {
    let cli = Cli::parse();

    let config = Config::from_env(&cli.env_file)
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    match &cli.command {
        Commands::Db { action } => match action {
            DbAction::Setup => setup_spotlight_database(&config),
        },
        Commands::Stats => print_stats(&config),
    }
}

fn setup_spotlight_database(config: &Config) {
    let db_path = config.spotlight_db_path();
    if db_path.exists() {
        println!("ℹ️ Spotlight database already exists at '{}'. Checking its tables...", db_path.display());
    } else {
        println!("\nSetting up spotlight database at '{}'...", db_path.display());
    }

    match db_setup::create_spotlight_db(&db_path) {
        Ok(_) => println!("✅ Spotlight database setup completed successfully."),
        Err(e) => eprintln!("❌ Error setting up spotlight database: {}", e),
    }
}

struct Stats {
    stores: u64,
    posts: u64,
    comments: comments_db_operations::CommentTotals,
    published: spotlight_backend::models::CategoryCounts,
}

fn collect_stats(db: &Database) -> Result<Stats, DbError> {
    Ok(Stats {
        stores: stores_db_operations::count_stores(db)?,
        posts: posts_db_operations::count_posts(db)?,
        comments: comments_db_operations::count_comments(db)?,
        published: posts_db_operations::count_published_by_category(db)?,
    })
}

fn print_stats(config: &Config) {
    let db_path = config.spotlight_db_path();
    let db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!(
                "❌ Could not open '{}': {}. Run 'setup_cli --env-file <path> db setup' first.",
                db_path.display(),
                e
            );
            return;
        }
    };

    match collect_stats(&db) {
        Ok(stats) => {
            println!("\n--- Spotlight Database ---");
            println!("{:<22} {}", "Stores", stats.stores);
            println!("{:<22} {}", "Posts", stats.posts);
            println!("{:<22} {}", "  published domestic", stats.published.domestic);
            println!("{:<22} {}", "  published overseas", stats.published.overseas);
            println!("{:<22} {}", "  published special", stats.published.special);
            println!("{:<22} {}", "Comments (active)", stats.comments.active);
            println!("{:<22} {}", "Comments (deleted)", stats.comments.deleted);
            println!("--------------------------");
        }
        Err(e) => eprintln!("❌ Error reading database statistics: {}", e),
    }
}
