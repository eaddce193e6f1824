//! Command line driver for the agenda calendar core.
//!
//! # Responsibility
//! - Build a widget from flags or a JSON config and a JSON event file.
//! - Replay scripted view inputs and print the emitted commands.

mod render;

use agenda_core::{
    AgendaCalendar, AgendaCalendarConfig, CalendarEvent, CalendarPickerController, Day,
    EventBus, SyncEvent,
};
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::info;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Render an agenda calendar and replay view interactions")]
struct Cli {
    /// JSON configuration file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// First date to show (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to show (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Locale tag, e.g. "en-US" or "fr_FR"
    #[arg(long)]
    locale: Option<String>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// JSON file holding an array of events
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write rolling logs to this absolute directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Input to replay: tap:DATE, section:POS, touch, today, event:POS
    #[arg(long = "step")]
    steps: Vec<Step>,
}

/// One scripted view input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Tap(NaiveDate),
    Section(usize),
    Touch,
    Today,
    Event(usize),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (name, arg) = match value.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (value, None),
        };
        let position = |arg: Option<&str>| -> Result<usize> {
            arg.ok_or_else(|| anyhow!("step `{name}` needs a position"))?
                .parse()
                .with_context(|| format!("invalid position in step `{value}`"))
        };
        match name {
            "tap" => {
                let date = arg.ok_or_else(|| anyhow!("step `tap` needs a date"))?;
                Ok(Self::Tap(
                    date.parse()
                        .with_context(|| format!("invalid date in step `{value}`"))?,
                ))
            }
            "section" => Ok(Self::Section(position(arg)?)),
            "event" => Ok(Self::Event(position(arg)?)),
            "touch" => Ok(Self::Touch),
            "today" => Ok(Self::Today),
            other => bail!("unknown step `{other}`"),
        }
    }
}

/// Prints controller callbacks.
struct PrintingController;

impl CalendarPickerController for PrintingController {
    fn on_day_selected(&mut self, day: &Day) {
        println!("  controller: day selected {}", day.date);
    }

    fn on_event_selected(&mut self, event: &CalendarEvent) {
        println!("  controller: event selected \"{}\"", event.title);
    }

    fn on_scroll_to_date(&mut self, date: NaiveDate) {
        println!("  controller: scrolled to {date}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = agenda_core::default_log_level();
        agenda_core::init_logging(level.as_str(), log_dir)
            .with_context(|| format!("failed to start logging in {}", log_dir.display()))?;
    }

    let config = load_config(&cli)?;
    let events = load_events(cli.events.as_ref())?;

    let bus = EventBus::new();
    let commands = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commands);
    let _recorder = bus.subscribe("cli", move |event: &SyncEvent| {
        if event.is_command() {
            sink.borrow_mut().push(event.clone());
        }
        Ok(())
    });

    let mut widget = AgendaCalendar::init_with_bus(
        &config,
        bus,
        events,
        Some(Box::new(PrintingController)),
        Vec::new(),
    )
    .context("failed to build the agenda calendar")?;
    info!(
        "event=cli_widget_ready module=cli status=ok rows={} steps={}",
        widget.row_count(),
        cli.steps.len()
    );

    render::print_grid(&widget);
    render::print_agenda(&widget);
    render::print_commands("init", &commands.borrow());
    commands.borrow_mut().clear();

    for step in &cli.steps {
        println!("\n> {step:?}");
        match step {
            Step::Tap(date) => widget.day_tapped(*date),
            Step::Section(position) => widget.sticky_header_changed(*position),
            Step::Touch => widget.agenda_touched(),
            Step::Today => widget.today_requested(),
            Step::Event(position) => widget.event_tapped(*position),
        };
        render::print_commands("step", &commands.borrow());
        commands.borrow_mut().clear();
        apply_scrolls(&mut widget, step);
    }

    if !cli.steps.is_empty() {
        println!();
        render::print_grid(&widget);
    }
    widget.teardown();
    Ok(())
}

/// Simulates both views finishing their scroll to the requested position.
fn apply_scrolls(widget: &mut AgendaCalendar, step: &Step) {
    let agenda_target = match step {
        Step::Section(position) => Some(*position),
        _ => widget
            .model()
            .selected_day()
            .and_then(|day| widget.coordinator().agenda_index().position_of_first(day.date).ok()),
    };
    if let Some(position) = agenda_target {
        widget.report_agenda_top(position);
    }
}

fn load_config(cli: &Cli) -> Result<AgendaCalendarConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            AgendaCalendarConfig::from_json_str(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => {
            let (Some(from), Some(to)) = (cli.from, cli.to) else {
                bail!("either --config or both --from and --to are required");
            };
            AgendaCalendarConfig::new(from, to)
        }
    };

    if let Some(from) = cli.from {
        config.min_date = from;
    }
    if let Some(to) = cli.to {
        config.max_date = to;
    }
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }
    if cli.today.is_some() {
        config.today = cli.today;
    }
    config.validate().context("invalid calendar settings")?;
    Ok(config)
}

fn load_events(path: Option<&PathBuf>) -> Result<Vec<CalendarEvent>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid events file {}", path.display()))
}
