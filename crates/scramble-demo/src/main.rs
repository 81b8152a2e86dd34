#![forbid(unsafe_code)]

//! Scramble demo binary entry point.

use std::io;
use std::process;
use std::time::Duration;

use scramble_core::{Clock, MonotonicClock};
use scramble_demo::app::{App, Control};
use scramble_demo::cli::Opts;
use scramble_demo::logging;
use scramble_demo::session::Session;
use scramble_demo::settings::{DemoError, Settings};

fn main() {
    let opts = Opts::parse();
    if let Err(err) = run(&opts) {
        eprintln!("scramble-demo: {err}");
        process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<(), DemoError> {
    logging::init(opts.log_path.as_deref())?;
    let settings = Settings::load(opts.config_path.as_deref())?;
    let mut app = App::new(&opts.word, &opts.intro, settings, opts.seed);

    let session = Session::enter()?;
    let clock = MonotonicClock::new();
    let frame = Duration::from_millis(opts.frame_ms);
    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));
    let mut stdout = io::stdout();

    loop {
        let now = clock.now_mono();
        if exit_after.is_some_and(|limit| now >= limit) {
            tracing::info!(elapsed_ms = now.as_millis() as u64, "exit-after elapsed");
            break;
        }
        app.tick(now);
        app.render(&mut stdout, session.size()?)?;

        if let Some(key) = session.next_key(frame)?
            && app.handle_key(key.code, clock.now_mono()) == Control::Quit
        {
            break;
        }
    }

    drop(session);
    tracing::info!(runs = app.completed_runs(), "demo finished");
    Ok(())
}
