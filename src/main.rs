use std::io::{self, stdout, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use taskdeck::app::LogicThread;
use taskdeck::config::Config;
use taskdeck::render::RenderState;
use taskdeck::{tlog, ui, Result};

const FRAME_DURATION: Duration = Duration::from_micros(16_666); // 60fps

/// Taskdeck - terminal task list backed by a REST API
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(version, about, long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    TASKDECK_DEBUG=1     Enable debug logging (alternative to --debug)"
)]
pub struct Cli {
    /// API endpoint (overrides the configured value)
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Enable debug logging (writes to ~/.taskdeck/taskdeck.log)
    #[arg(short = 'd', long)]
    pub debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    taskdeck::log::init_with_debug(cli.debug);

    if cli.debug {
        tlog!("Taskdeck starting (debug mode enabled)");
    } else {
        tlog!("Taskdeck starting");
    }

    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = Some(endpoint);
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let (state_tx, state_rx) = crossbeam_channel::bounded::<RenderState>(1);

    let shutdown_clone = shutdown.clone();
    let logic_handle = thread::spawn(move || LogicThread::run(config, state_tx, shutdown_clone));

    let mut terminal = setup_terminal()?;
    let result = render_loop(&mut terminal, state_rx, &shutdown);

    shutdown.store(true, Ordering::SeqCst);
    let _ = logic_handle.join();
    restore_terminal(&mut terminal)?;
    result
}

fn render_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state_rx: Receiver<RenderState>,
    shutdown: &AtomicBool,
) -> Result<()> {
    let mut state = RenderState::default();
    let mut last_version: u64 = 0;
    let mut last_frame = Instant::now();
    let mut dirty = true;

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match state_rx.try_recv() {
            Ok(s) => {
                dirty = dirty || s.version != last_version;
                state = s;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if last_frame.elapsed() < FRAME_DURATION {
            thread::sleep(Duration::from_micros(500));
            continue;
        }
        last_frame = Instant::now();

        if dirty {
            terminal.draw(|f| ui::draw(f, &state))?;
            last_version = state.version;
            dirty = false;
        }
    }
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(disable_raw_mode()?)
}
