//! Kids Sync month calendar CLI.
//!
//! # Usage
//! ```ignore
//! kidscal -e events.json             // Current month with events
//! kidscal -e events.json 2024-04-15  // April 2024
//! kidscal -3 -e events.json          // Three months
//! kidscal --json 2024-02             // Grid as JSON
//! ```

use kidscal::args::{Args, get_date_range, get_display_months, get_events_path, get_reference_date};
use kidscal::error::Result;
use kidscal::event::Event;
use kidscal::formatter::{print_month, print_months, render_json};
use kidscal::source::{EventSource, JsonFileSource};
use kidscal::types::{CalContext, MonthGrid};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("kidscal: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by RUST_LOG (default: warnings only).
fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("kidscal: failed to set up logging: {}", e);
    }
}

fn run(args: &Args) -> Result<()> {
    let ctx = CalContext::new(args)?;
    let reference = get_reference_date(args)?;
    let range = get_date_range(args)?;

    let events = match get_events_path(args) {
        Some(path) => {
            if let Some(range) = &range {
                debug!(
                    start = %range.start_param(),
                    end = %range.end_param(),
                    "loading events in range"
                );
            }
            JsonFileSource::new(path).events(range.as_ref())?
        }
        None => Vec::new(),
    };
    report_undated(&events);

    let grids: Vec<MonthGrid> = get_display_months(args, reference)
        .into_iter()
        .map(|month| MonthGrid::build(month, &events))
        .collect();
    debug!(
        months = grids.len(),
        placed = grids.iter().map(MonthGrid::event_count).sum::<usize>(),
        "built month grids"
    );

    if args.json {
        println!("{}", render_json(&grids)?);
    } else if let [grid] = grids.as_slice() {
        print_month(&ctx, grid);
    } else {
        print_months(&ctx, &grids);
    }

    Ok(())
}

/// Events whose dateTime has no readable day never reach the grid.
fn report_undated(events: &[Event]) {
    for event in events.iter().filter(|e| e.day_key().is_none()) {
        warn!(
            id = %event.id,
            date_time = %event.date_time,
            "event has no usable date, not shown"
        );
    }
}
