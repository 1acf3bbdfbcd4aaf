use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use simplelog::*;

use std::time::Duration;

use keywake::keys;
use keywake::{KbdOut, Ticker};

#[cfg(all(target_os = "windows", feature = "gui"))]
mod gui_win;

#[cfg(target_os = "windows")]
use keywake::oskbd::WinInput as OsBackend;
#[cfg(not(target_os = "windows"))]
use keywake::oskbd::SimInput as OsBackend;

pub struct ValidatedArgs {
    key_name: String,
    vk: u16,
    interval: Duration,
    paused: bool,
}

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// keywake: keeps a session awake by tapping a key on a timer
///
/// Every interval, keywake injects a press and release of a harmless key
/// (F15 by default) so that idle detection never triggers. The loop can be
/// paused and resumed without restarting the program.
struct Args {
    /// Key to tap on each tick (e.g. f15, f12, a).
    #[arg(short, long, default_value = "f15")]
    key: String,

    /// Seconds between keystrokes.
    #[arg(short, long, default_value_t = 300)]
    interval: u64,

    /// Start with the tick loop paused.
    #[arg(short, long)]
    paused: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,
}

/// Parse CLI arguments and initialize logging.
fn cli_init() -> Result<ValidatedArgs> {
    let args = Args::parse();

    let log_lvl = match (args.debug, args.trace) {
        (_, true) => LevelFilter::Trace,
        (true, false) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    };

    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_rfc3339();
    CombinedLogger::init(vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Mixed,
        ColorChoice::AlwaysAnsi,
    )])
    .expect("logger can init");
    log::info!("keywake v{} starting", env!("CARGO_PKG_VERSION"));

    let entry = match keys::resolve(args.key.as_str()) {
        Ok(entry) => entry,
        Err(e) => bail!("invalid --key value {:?}: {e}", args.key),
    };
    if args.interval < 1 {
        bail!("--interval must be at least 1 second");
    }

    Ok(ValidatedArgs {
        key_name: args.key,
        vk: entry.vk,
        interval: Duration::from_secs(args.interval),
        paused: args.paused,
    })
}

/// Refuse to run when another instance already holds the named mutex.
#[cfg(target_os = "windows")]
fn ensure_single_instance() -> Result<()> {
    use winapi::shared::winerror::ERROR_ALREADY_EXISTS;
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::synchapi::CreateMutexW;

    let name: Vec<u16> = "keywake-single-instance\0".encode_utf16().collect();
    // The mutex handle is intentionally held for the lifetime of the process.
    unsafe {
        CreateMutexW(std::ptr::null_mut(), 0, name.as_ptr());
        if GetLastError() == ERROR_ALREADY_EXISTS {
            bail!("another keywake instance is already running");
        }
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn ensure_single_instance() -> Result<()> {
    Ok(())
}

fn main_impl() -> Result<()> {
    let args = cli_init()?;
    ensure_single_instance()?;

    #[cfg(target_os = "windows")]
    info!("using SendInput for keyboard IO");
    #[cfg(not(target_os = "windows"))]
    info!("no real input backend on this platform; events are logged only");

    info!(
        "tapping {:?} every {}s{}",
        args.key_name,
        args.interval.as_secs(),
        if args.paused { " (starting paused)" } else { "" },
    );

    let kbd = KbdOut::new(OsBackend::new());
    let ticker = Ticker::start(kbd, args.vk, args.interval, args.paused);

    run_ui(ticker)
}

#[cfg(all(target_os = "windows", feature = "gui"))]
fn run_ui(ticker: Ticker) -> Result<()> {
    gui_win::run_tray(ticker)
}

/// Line-oriented control surface for running without the tray.
#[cfg(not(all(target_os = "windows", feature = "gui")))]
fn run_ui(mut ticker: Ticker) -> Result<()> {
    use std::io::BufRead;

    info!("commands: pause, resume, quit");
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // stdin closed; keep ticking until the process is killed
            loop {
                std::thread::park();
            }
        }
        match line.trim() {
            "pause" => ticker.pause(),
            "resume" => ticker.resume(),
            "quit" | "exit" | "stop" => {
                ticker.stop();
                return Ok(());
            }
            "" => {}
            other => info!("unknown command {other:?}; use pause, resume or quit"),
        }
    }
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e}\n");
    }
    ret
}
