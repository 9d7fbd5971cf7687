use clap::{Parser, Subcommand};
use filecdn_core::constants::{
    LIMIT_PARAM, SEARCH_QUERY_PARAM, SORT_FIELDS_PARAM, SORT_ORDER_PARAM, START_PARAM,
};
use filecdn_core::{
    public_base_url_from_env_value, root_dir_from_env_value, CoreConfig, ListingService,
    QueryParams,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "filecdn")]
#[command(about = "Browse a filecdn root from the command line")]
struct Cli {
    /// Directory to serve (defaults to $FILECDN_ROOT_DIR, then "files_root")
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Base URL for generated links (defaults to $FILECDN_PUBLIC_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List a directory as the server would
    Ls {
        /// Path relative to the root (empty for the root itself)
        #[arg(default_value = "")]
        path: String,
        /// Search expression, e.g. "name:report type:pdf"
        #[arg(long)]
        q: Option<String>,
        /// Sort fields, e.g. "type name"
        #[arg(long)]
        sf: Option<String>,
        /// Sort order ("d" for descending)
        #[arg(long)]
        so: Option<String>,
        /// 1-based index of the first item
        #[arg(long)]
        start: Option<String>,
        /// Page size
        #[arg(long)]
        limit: Option<String>,
    },
    /// Show metadata for a single file or directory
    Stat {
        /// Path relative to the root
        path: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'filecdn --help' for commands");
        return Ok(());
    };

    let root = cli
        .root
        .unwrap_or_else(|| root_dir_from_env_value(std::env::var("FILECDN_ROOT_DIR").ok()));
    let base_url = cli.base_url.unwrap_or_else(|| {
        public_base_url_from_env_value(std::env::var("FILECDN_PUBLIC_URL").ok())
    });
    let service = ListingService::new(Arc::new(CoreConfig::new(root, base_url)?));

    match command {
        Commands::Ls {
            path,
            q,
            sf,
            so,
            start,
            limit,
        } => {
            let mut params = QueryParams::new();
            for (key, value) in [
                (SEARCH_QUERY_PARAM, q),
                (SORT_FIELDS_PARAM, sf),
                (SORT_ORDER_PARAM, so),
                (START_PARAM, start),
                (LIMIT_PARAM, limit),
            ] {
                if let Some(value) = value {
                    params.push(key, value);
                }
            }

            match service.list_directory(&path, &params) {
                Ok(listing) => println!("{}", serde_json::to_string_pretty(&listing)?),
                Err(e) => eprintln!("Error listing '{}': {}", path, e),
            }
        }
        Commands::Stat { path } => match service.entry(&path) {
            Ok(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            Err(e) => eprintln!("Error reading '{}': {}", path, e),
        },
    }

    Ok(())
}
