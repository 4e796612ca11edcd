use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tidlcli::{
    cli::{self, ArtistView},
    config, error,
    tidal::FavoriteKind,
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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize this device with your TIDAL account
    Login,

    /// Log out and remove the stored credentials
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show a track
    Track(TrackOptions),

    /// Show an album and its tracks
    Album(CatalogueOptions),

    /// Show an artist
    Artist(ArtistOptions),

    /// Show the tracks of a mix, or list your mixes
    Mix(MixOptions),

    /// Show or edit playlists
    Playlist(PlaylistOptions),

    /// Search the catalogue
    Search(SearchOptions),

    /// Print the stream URLs of a track or video
    Stream(StreamOptions),

    /// List, add or remove favorites
    Favorites(FavoritesOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CatalogueOptions {
    id: u64,

    /// Use the client id only, without a stored login
    #[clap(long)]
    demo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    id: u64,

    /// Also list contributors
    #[clap(long)]
    contributors: bool,

    /// Also list credits
    #[clap(long)]
    credits: bool,

    #[clap(long)]
    demo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    id: u64,

    /// Listing shown below the artist
    #[clap(long, value_enum, default_value_t = ArtistView::Top)]
    view: ArtistView,

    #[clap(long)]
    demo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MixOptions {
    /// Mix to show; omit to list your own mixes
    id: Option<String>,

    #[clap(long)]
    demo: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Show or edit playlists",
    args_conflicts_with_subcommands = true // disallow mixing a uuid with edit subcommands
)]
pub struct PlaylistOptions {
    /// Playlist uuid; lists your playlists when omitted
    uuid: Option<String>,

    #[clap(long)]
    demo: bool,

    #[command(subcommand)]
    command: Option<PlaylistSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// Create a playlist
    Create {
        title: String,
        #[clap(long, default_value = "")]
        description: String,
    },
    /// Delete a playlist
    Delete { uuid: String },
    /// Append tracks to a playlist
    Add {
        uuid: String,
        #[clap(required = true, num_args = 1..)]
        track_ids: Vec<u64>,
        /// Add tracks that are already in the playlist
        #[clap(long)]
        allow_duplicates: bool,
    },
    /// Remove the entry at an index
    Remove { uuid: String, index: u64 },
    /// Move an entry to another index
    Move { uuid: String, index: u64, to: u64 },
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    term: String,

    /// Results per kind
    #[clap(long, default_value_t = 10)]
    limit: u64,

    #[clap(long)]
    demo: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct StreamOptions {
    id: u64,

    /// The id is a video id
    #[clap(long)]
    video: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FavoritesOptions {
    /// albums, artists, tracks, videos or playlists
    kind: FavoriteKind,

    /// Add ids to the favorites; can be repeated
    #[clap(long, action = ArgAction::Append, conflicts_with = "remove")]
    add: Vec<String>,

    /// Remove an id from the favorites
    #[clap(long)]
    remove: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tidlcli={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    match cli.command {
        Command::Login => cli::login().await,
        Command::Logout => cli::logout().await,
        Command::Whoami => cli::whoami().await,
        Command::Track(opt) => cli::track(opt.id, opt.contributors, opt.credits, opt.demo).await,
        Command::Album(opt) => cli::album(opt.id, opt.demo).await,
        Command::Artist(opt) => cli::artist(opt.id, opt.view, opt.demo).await,
        Command::Mix(opt) => cli::mix(opt.id, opt.demo).await,

        Command::Playlist(opt) => match opt.command {
            Some(PlaylistSubcommand::Create { title, description }) => {
                cli::playlist_create(title, description).await
            }
            Some(PlaylistSubcommand::Delete { uuid }) => cli::playlist_delete(uuid).await,
            Some(PlaylistSubcommand::Add {
                uuid,
                track_ids,
                allow_duplicates,
            }) => cli::playlist_add(uuid, track_ids, allow_duplicates).await,
            Some(PlaylistSubcommand::Remove { uuid, index }) => cli::playlist_remove(uuid, index).await,
            Some(PlaylistSubcommand::Move { uuid, index, to }) => {
                cli::playlist_move(uuid, index, to).await
            }
            None => cli::playlist(opt.uuid, opt.demo).await,
        },

        Command::Search(opt) => cli::search(opt.term, opt.limit, opt.demo).await,
        Command::Stream(opt) => cli::stream(opt.id, opt.video).await,
        Command::Favorites(opt) => cli::favorites(opt.kind, opt.add, opt.remove).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
