use anyhow::{Context, Result};
use clap::Parser;
use mocmarks::app::cli::Args;
use mocmarks::app::config::{AppConfig, UserConfig};
use mocmarks::app::lock::InstanceLock;
use mocmarks::app::{App, Controller};
use mocmarks::logging;
use mocmarks::player::MocpPlayer;
use mocmarks::store::BookmarkStore;
use mocmarks::ui::{terminal, TerminalScreen};
use tracing::{info, warn};

const LOG_RETENTION_DAYS: u32 = 14;

fn main() -> Result<()> {
    human_panic::setup_panic!();
    // Leave raw mode before the panic report is printed
    let report = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        terminal::restore();
        report(info);
    }));

    let args = Args::parse();

    if args.generate_config {
        let content = toml::to_string_pretty(&UserConfig::default())?;
        println!("{}", content);
        return Ok(());
    }

    // Only a broken terminal stops us; everything else degrades to a toast
    let mut startup_warnings = Vec::new();

    let log_dir = AppConfig::get_data_dir();
    let _log_guard = match logging::init_logging(&log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            startup_warnings.push(format!("⚠ Logging disabled: {}", e));
            None
        }
    };
    if let Err(e) = logging::cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS) {
        warn!("Failed to clean up old logs in {}: {}", log_dir.display(), e);
    }
    info!("mocmarks {} starting", env!("CARGO_PKG_VERSION"));

    let (mut config, config_warning) = AppConfig::load_or_default(args.config.as_deref());
    startup_warnings.extend(config_warning);
    AppConfig::apply_args(&mut config, &args);

    for (key, first, second) in config.keys.conflicts() {
        warn!("Key {:?} is bound to both {:?} and {:?}", key, first, second);
    }

    let db_path = AppConfig::database_path(&config);
    // Without the lock there is no single-writer guarantee, so the file is left alone
    let (_lock, opened) = match InstanceLock::acquire(&db_path) {
        Ok(Some(lock)) => (Some(lock), BookmarkStore::open(&db_path)),
        Ok(None) => anyhow::bail!(
            "Another mocmarks instance is using {} (remove {} if it is not running)",
            db_path.display(),
            InstanceLock::lock_path(&db_path).display()
        ),
        Err(e) => (None, Err(e)),
    };
    let store = match opened {
        Ok(store) => store,
        Err(e) => {
            warn!("Failed to open {}: {}; using a temporary store", db_path.display(), e);
            startup_warnings.push(format!(
                "⚠ {} unavailable, changes won't be saved",
                db_path.display()
            ));
            BookmarkStore::open_in_memory()?
        }
    };

    let player = MocpPlayer::new(config.player_binary.clone(), config.settle_delay());
    let mut app = App::new(store, Box::new(player), &config);
    if !startup_warnings.is_empty() {
        app.show_toast(&startup_warnings.join("  "));
    }

    let screen = TerminalScreen::new().context("Failed to initialize terminal")?;
    let mut controller = Controller::new(app, screen);
    let result = controller.run();
    drop(controller);

    result.context("Terminal I/O failed")?;
    info!("mocmarks exiting");
    Ok(())
}
