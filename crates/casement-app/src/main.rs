mod cli;

use std::io::BufRead;
use std::sync::Arc;
use std::thread;

use casement_common::{EventQueue, TaskChannel, WindowKind};
use casement_config::CasementConfig;
use casement_tiling::LayoutEngine;
use tracing_subscriber::EnvFilter;

use casement_app::display::{Display, HeadlessRenderer, Renderer, Surface, TerminalRenderer};
use casement_app::program::{self, Echo, ExitReason};
use casement_app::session::Session;

const DEFAULT_FILTER: &str = "casement=info";

fn init_logging(cli_level: Option<&str>, config: &CasementConfig) {
    let directive = cli_level
        .map(str::to_string)
        .unwrap_or_else(|| format!("casement={}", config.logging.level.as_filter()));
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Feed stdin to the display line by line, then signal end of input.
fn spawn_input_reader(display: Arc<Display>, channel: TaskChannel) -> std::io::Result<()> {
    thread::Builder::new()
        .name("casement-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!("stdin read failed: {e}");
                        break;
                    }
                };
                let display = Arc::clone(&display);
                if channel
                    .post_task(move || {
                        display.deliver_text(&line);
                    })
                    .is_err()
                {
                    return;
                }
            }
            let _ = channel.post_task(move || display.end_of_input());
        })?;
    Ok(())
}

fn main() {
    let args = cli::parse();

    // Logging is configured from the config file, so load it first and
    // report any problem once the subscriber is up.
    let loaded = casement_config::load_config(args.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();
    init_logging(args.log_level.as_deref(), &config);
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if args.dump_config {
        println!("{}", casement_config::config_to_json(&config));
        return;
    }
    if let Some(path) = &args.write_config {
        if let Err(e) = casement_config::save_config_to_path(&config, path) {
            tracing::error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    tracing::info!("casement v{} starting", env!("CARGO_PKG_VERSION"));

    let (channel, task_loop) = TaskChannel::new();
    let events = Arc::new(EventQueue::new());
    let renderer: Box<dyn Renderer> = if args.headless {
        Box::new(HeadlessRenderer::new(config.metrics.clone()).0)
    } else {
        Box::new(TerminalRenderer::stdout(config.metrics.clone()))
    };
    let surface = Surface::new(
        renderer,
        events,
        channel.clone(),
        LayoutEngine {
            border_width: config.layout.border_width,
        },
    );
    let display = Display::new(surface, config.display.width, config.display.height);
    tracing::info!(
        title = %config.display.title,
        width = config.display.width,
        height = config.display.height,
        "display ready"
    );

    let mut session = Session::new(Arc::clone(&display), config.runtime.clone());
    let root_kind = WindowKind::from(args.root);
    let program_channel = channel.clone();
    let program_thread = thread::Builder::new()
        .name("casement-program".into())
        .spawn(move || {
            let mut echo = Echo::new(root_kind);
            let reason = program::drive(&mut echo, &mut session);
            session.finish();
            program_channel.quit();
            reason
        });
    let program_thread = match program_thread {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!("Failed to start the program thread: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = spawn_input_reader(Arc::clone(&display), channel) {
        tracing::error!("Failed to start the input reader: {e}");
        display.shutdown();
    }

    // The UI loop owns this thread until the program quits it.
    task_loop.run();

    match program_thread.join() {
        Ok(ExitReason::Failed(message)) => {
            tracing::error!("Program failed: {message}");
            std::process::exit(1);
        }
        Ok(reason) => tracing::info!(?reason, "Shutdown complete"),
        Err(_) => {
            tracing::error!("Program thread panicked");
            std::process::exit(1);
        }
    }
}
