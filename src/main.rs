use catalog_navigator::{
    CatalogNavigatorError, CatalogSnapshot, Category, Navigator, NavigatorEvent, ResultEntry,
    SnapshotStorage, SortKey, ViewState, parse_media_data, parse_media_metadata,
};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Browse a media-streaming catalog from the command line
#[derive(Debug, Parser)]
#[command(name = "catalog-navigator", version, about)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    view: ViewArgs,

    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where the catalog comes from
#[derive(Debug, Args)]
struct SourceArgs {
    /// Media data payload (`{"collections": [...], "media": [...]}`)
    #[arg(long, value_name = "FILE", global = true)]
    media_data: Option<PathBuf>,

    /// Watch metadata payload (`{"mediaMetadata": [...]}`)
    #[arg(long, value_name = "FILE", global = true)]
    metadata: Option<PathBuf>,

    /// Profile whose stored snapshot is browsed, or written by `import`
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Directory holding profile snapshots instead of the platform cache directory
    #[arg(long, value_name = "DIR", global = true)]
    snapshot_dir: Option<PathBuf>,
}

/// View parameters applied before running the command
#[derive(Debug, Args)]
struct ViewArgs {
    /// continueWatching, movies or series
    #[arg(long, default_value = "movies", global = true)]
    category: String,

    /// Browse into a collection
    #[arg(long, value_name = "ID", global = true)]
    collection: Option<String>,

    /// Keep entries with this genre (repeatable)
    #[arg(long = "genre", value_name = "GENRE", global = true)]
    genres: Vec<String>,

    /// Keep entries from this decade, e.g. "1990's" (repeatable)
    #[arg(long = "era", value_name = "ERA", global = true)]
    eras: Vec<String>,

    /// Keep entries from this producer; "All" disables the filter
    #[arg(long, global = true)]
    producer: Option<String>,

    /// Keep entries rated 8.0 or higher
    #[arg(long, global = true)]
    top_rated: bool,

    /// Show movies individually instead of grouped by collection
    #[arg(long, global = true)]
    flat: bool,

    /// title, year or rating
    #[arg(long, default_value = "title", global = true)]
    sort_by: SortKey,

    #[arg(long, global = true)]
    descending: bool,

    /// Case-insensitive text search
    #[arg(long, global = true)]
    search: Option<String>,
}

impl ViewArgs {
    fn to_view_state(&self) -> ViewState {
        ViewState {
            current_category: Category::from(self.category.as_str()),
            selected_collection_id: self.collection.clone().unwrap_or_default(),
            selected_genres: self.genres.iter().cloned().collect(),
            selected_eras: self.eras.iter().cloned().collect(),
            selected_producer: self.producer.clone().unwrap_or_default(),
            show_top_rated: self.top_rated,
            group_by_collection: !self.flat,
            sort_by: self.sort_by,
            sort_ascending: !self.descending,
            search_text: self.search.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the result list for the current view
    List {
        /// Output the entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every genre in the catalog
    Genres,

    /// List every producer in the catalog, "All" first
    Producers,

    /// Print the display title of a media item
    Title { media_id: String },

    /// Episode sequencing within a series
    #[command(subcommand)]
    Episode(EpisodeCommand),

    /// Store the given payload files as the snapshot of --profile
    Import,
}

#[derive(Debug, Subcommand)]
enum EpisodeCommand {
    /// Episode `offset` positions after the given one
    Next {
        media_id: String,

        /// Negative values walk backwards
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        offset: i32,
    },

    /// First, middle or final episode
    Type { media_id: String },

    /// Final episode of the collection passed with --collection
    Final,
}

/// Reads a payload file, exiting with a readable message if it is missing
fn read_payload(path: &Path) -> Result<String, CatalogNavigatorError> {
    if !path.is_file() {
        eprintln!("Error: Payload file does not exist: {}", path.display());
        process::exit(1);
    }
    Ok(fs::read_to_string(path)?)
}

fn open_storage(source: &SourceArgs) -> Result<SnapshotStorage, CatalogNavigatorError> {
    let storage = match &source.snapshot_dir {
        Some(dir) => SnapshotStorage::open_at(dir)?,
        None => SnapshotStorage::open()?,
    };
    Ok(storage)
}

/// Loads the catalog from payload files, or from the stored profile snapshot
fn load_catalog(navigator: &mut Navigator, source: &SourceArgs) -> Result<(), CatalogNavigatorError> {
    if let Some(media_path) = &source.media_data {
        navigator.load_media_data(parse_media_data(&read_payload(media_path)?)?);
        let metadata = match &source.metadata {
            Some(path) => parse_media_metadata(&read_payload(path)?)?,
            None => Vec::new(),
        };
        navigator.merge_metadata(metadata);
        return Ok(());
    }

    let Some(profile) = &source.profile else {
        eprintln!("Error: Either --media-data or --profile is required");
        process::exit(1);
    };

    let storage = open_storage(source)?;
    let Some(snapshot) = storage.load(profile)? else {
        eprintln!(
            "Error: No snapshot stored for profile '{}' in {}",
            profile,
            storage.snapshot_dir().display()
        );
        process::exit(1);
    };

    let (payload, metadata) = snapshot.into_parts();
    navigator.load_media_data(payload);
    navigator.merge_metadata(metadata);
    Ok(())
}

fn print_entry(navigator: &Navigator, entry: &ResultEntry) {
    match entry {
        ResultEntry::Collection(collection) => {
            println!(
                "{:<12} [{}] {} ({}) {:.1}",
                collection.id,
                collection.collection_type.as_str(),
                collection.collection_title,
                collection.year,
                collection.collection_rating
            );
        }
        ResultEntry::Media(media) => {
            let title = navigator
                .media_title(&media.id)
                .unwrap_or_else(|| media.title.clone());
            let progress = navigator.media_progress(&media.id);
            if progress > 0.0 {
                println!(
                    "{:<12} {} ({}) {:.1}  {:.0}% watched",
                    media.id,
                    title,
                    media.year,
                    media.rating,
                    progress * 100.0
                );
            } else {
                println!(
                    "{:<12} {} ({}) {:.1}",
                    media.id, title, media.year, media.rating
                );
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CatalogNavigatorError> {
    if matches!(cli.command, Command::Import)
        && (cli.source.profile.is_none() || cli.source.media_data.is_none())
    {
        eprintln!("Error: import requires both --profile and --media-data");
        process::exit(1);
    }

    let mut navigator = Navigator::with_view(cli.view.to_view_state());
    navigator.set_listener(|event| {
        if let NavigatorEvent::ResultChanged { count } = event {
            debug!(count, "Result list updated");
        }
    });
    load_catalog(&mut navigator, &cli.source)?;

    match cli.command {
        Command::List { json } => {
            let result = navigator.result();
            if json {
                println!("{}", serde_json::to_string_pretty(result)?);
            } else if result.is_empty() {
                println!("No entries.");
            } else {
                for entry in result {
                    print_entry(&navigator, entry);
                }
            }
        }
        Command::Genres => {
            for genre in navigator.unique_genres() {
                println!("{}", genre.text);
            }
        }
        Command::Producers => {
            for producer in navigator.unique_producers() {
                println!("{}", producer);
            }
        }
        Command::Title { media_id } => match navigator.media_title(&media_id) {
            Some(title) => println!("{}", title),
            None => {
                eprintln!("Error: Unknown media item: {}", media_id);
                process::exit(1);
            }
        },
        Command::Episode(EpisodeCommand::Next { media_id, offset }) => {
            match navigator.next_episode(&media_id, offset) {
                Some(next) => println!("{}", next),
                None => println!("No episode at offset {} from {}", offset, media_id),
            }
        }
        Command::Episode(EpisodeCommand::Type { media_id }) => {
            println!("{}", navigator.episode_type(&media_id));
        }
        Command::Episode(EpisodeCommand::Final) => match navigator.final_episode() {
            Some(last) => println!("{}", last),
            None => println!("No final episode (is --collection set?)"),
        },
        Command::Import => {
            let profile = cli.source.profile.as_deref().unwrap_or_default();
            let storage = open_storage(&cli.source)?;
            storage.store(profile, &CatalogSnapshot::capture(navigator.catalog()))?;
            println!(
                "Stored snapshot for '{}': {} collection(s), {} media item(s), {} metadata record(s)",
                profile,
                navigator.collections().len(),
                navigator.media().len(),
                navigator.metadata().len()
            );
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("\nError: {}", e);
        process::exit(1);
    }
}
