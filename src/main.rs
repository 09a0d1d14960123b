use clap::{Parser, ValueEnum};
use log::{error, info};
use safevoice::core::builtin::builtin_menu;
use safevoice::core::config::{self, CliOverrides, ResolvedConfig};
use safevoice::core::menu::{Menu, load_menu_file};
use safevoice::core::navigator::Navigator;
use safevoice::core::places::FixedLocation;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "safevoice",
    about = "Offline USSD-style safety menu on a simulated basic phone"
)]
struct Args {
    /// Custom menu definition (TOML)
    #[arg(long)]
    menu: Option<PathBuf>,

    /// How long action responses stay on screen, in milliseconds
    #[arg(long)]
    revert_delay_ms: Option<u64>,

    /// Disable key tones and spoken announcements
    #[arg(long)]
    mute: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Debug)]
    log_level: LogLevel,

    #[arg(long, default_value = "safevoice.log")]
    log_file: PathBuf,

    /// Validate the menu, print a summary and exit
    #[arg(long)]
    check: bool,

    /// Print the built-in menu as TOML and exit
    #[arg(long)]
    dump_menu: bool,
}

fn load_menu(config: &ResolvedConfig) -> io::Result<Menu> {
    let menu = match &config.menu_file {
        Some(path) => load_menu_file(path),
        None => builtin_menu().compile(),
    };
    menu.map_err(|e| {
        error!("Menu rejected: {}", e);
        io::Error::other(e)
    })
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    if args.dump_menu {
        let toml = builtin_menu().to_toml().map_err(io::Error::other)?;
        print!("{toml}");
        return Ok(());
    }

    // The terminal belongs to the TUI, so logs go to a file
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
    }

    info!("SafeVoice starting up");

    let file_config = config::load_config().map_err(io::Error::other)?;
    let cli = CliOverrides {
        menu_file: args.menu,
        revert_delay_ms: args.revert_delay_ms,
        mute: args.mute,
    };
    let resolved = config::resolve(&file_config, &cli);
    info!("Resolved config: {:?}", resolved);

    let menu = load_menu(&resolved)?;

    if args.check {
        let source = resolved
            .menu_file
            .as_ref()
            .map_or_else(|| "built-in menu".to_string(), |p| p.display().to_string());
        println!(
            "{}: OK ({} screens, {} actions, root \"{}\")",
            source,
            menu.screen_count(),
            menu.action_count(),
            menu.root()
        );
        return Ok(());
    }

    let navigator = Navigator::new(menu)
        .with_revert_delay(resolved.revert_delay)
        .with_location(Box::new(FixedLocation(resolved.position)))
        .with_places(resolved.places.clone());

    safevoice::tui::run(&resolved, navigator)
}
