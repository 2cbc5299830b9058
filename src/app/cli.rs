use clap::Parser;
use std::path::PathBuf;

/// mocmarks - rate, comment and jump between positions in MOC 🔖
#[derive(Parser, Debug, Default)]
#[command(name = "mocmarks", version, about)]
pub struct Args {
    /// Bookmark database (default: data dir/mocmarks/bookmarks.sqlite)
    #[arg(long, env = "MOCMARKS_DB")]
    pub db: Option<PathBuf>,

    /// Player binary (default: mocp)
    #[arg(long, env = "MOCMARKS_PLAYER")]
    pub player: Option<String>,

    /// Config file (default: ~/.config/mocmarks/config.toml)
    #[arg(long, env = "MOCMARKS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,
}
