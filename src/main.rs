use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use lyricount::{
    cli,
    config::{self, Config},
    error,
    management::ResultCache,
    service::WordCounter,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// More diagnostic output on stderr (-v debug, -vv trace)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the albums of an artist
    Albums(AlbumsOptions),

    /// Count how often a word appears in an album
    Count(CountOptions),

    /// Show cached results
    Cached(CachedOptions),

    /// Drop a cached result so it is counted again
    Forget(ForgetOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    /// Artist name to search for
    pub artist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CountOptions {
    /// Artist name
    pub artist: String,

    /// Album id or album name
    pub album: String,

    /// Word to count
    pub word: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ForgetOptions {
    /// Artist name
    pub artist: String,

    /// Album name as shown by `cached`
    pub album: String,

    /// Counted word
    pub word: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CachedOptions {
    /// Only show results whose artist contains this text
    #[clap(long)]
    pub artist: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "lyricount=warn",
        1 => "lyricount=debug",
        _ => "lyricount=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn connect(config: &Config) -> Arc<WordCounter> {
    match WordCounter::connect(config).await {
        Ok(counter) => Arc::new(counter),
        Err(e) => error!("Cannot start. Err: {}", e),
    }
}

fn open_cache(config: &Config) -> ResultCache {
    match ResultCache::open(&config.cache_path) {
        Ok(cache) => cache,
        Err(e) => error!(
            "Cannot open the result cache at {}. Err: {}",
            config.cache_path.display(),
            e
        ),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::from_env();

    match cli.command {
        Command::Albums(opt) => {
            let counter = connect(&config).await;
            cli::albums(&counter, opt.artist).await
        }
        Command::Count(opt) => {
            let cache = Arc::new(open_cache(&config));
            cli::count(&config, cache, opt.artist, opt.album, opt.word).await
        }
        Command::Cached(opt) => cli::cached(&open_cache(&config), opt.artist),
        Command::Forget(opt) => {
            cli::forget(&open_cache(&config), opt.artist, opt.album, opt.word)
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
