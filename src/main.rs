mod app;
mod domain;
mod notifications;
mod persistence;
mod planner;
mod render;
mod report;
mod store;
mod ticker;
mod timer;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use domain::dates::{add_days, parse_iso, today};
use domain::{Difficulty, ViewMode};
use notifications::{deliver, deliver_with_alert, Notice};
use persistence::{get_data_dir, init_local_data_dir, FileStore};
use planner::PlanRequest;
use std::io::{self, Write};
use std::path::PathBuf;
use timer::{StopReason, MAX_SESSION_MINUTES};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studyflow")]
#[command(about = "A smart student planner: even study schedules, progress tracking and a focus timer", long_about = None)]
struct Cli {
    /// Data directory (overrides STUDYFLOW_DIR and .studyflow lookup)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .studyflow directory in the current directory
    Init,
    /// Generate a study plan for a subject
    Plan {
        /// Subject name
        name: String,
        /// Deadline (YYYY-MM-DD), must be after today
        #[arg(short, long)]
        deadline: String,
        /// easy, medium or hard
        #[arg(short = 'l', long, default_value = "medium")]
        difficulty: Difficulty,
        /// Hours you can study per day
        #[arg(long, default_value_t = 2.0)]
        hours: f64,
    },
    /// Show a day's schedule
    Schedule {
        /// Date to show (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// timetable or cards. Defaults to the saved view.
        #[arg(long)]
        view: Option<ViewMode>,
    },
    /// List tasks for a day with their ids
    Tasks {
        /// Date to browse from (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Days to move from that date, e.g. 1 for the next day or -1 for the previous
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },
    /// Toggle a task between completed and pending
    Toggle {
        /// Task id or a unique prefix of it
        id: String,
    },
    /// Mark every task on a day as completed
    DoneAll {
        /// Date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete all subjects and tasks
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show overall, per-subject and today's progress
    Progress,
    /// Set the default schedule view
    View {
        /// timetable or cards
        mode: ViewMode,
    },
    /// Set focus timer durations in minutes
    Settings {
        #[arg(long, value_parser = minutes_parser())]
        study: Option<u32>,
        #[arg(long = "break", value_parser = minutes_parser())]
        break_minutes: Option<u32>,
    },
    /// Run the focus timer until Ctrl-C
    Timer {
        /// Study session length for this run and later ones
        #[arg(long, value_parser = minutes_parser())]
        study: Option<u32>,
        /// Break length for this run and later ones
        #[arg(long = "break", value_parser = minutes_parser())]
        break_minutes: Option<u32>,
        /// Stop after this many sessions (study and break both count)
        #[arg(short, long)]
        sessions: Option<u32>,
    },
    /// Generate a Markdown progress report
    Report {
        /// Date to generate report for (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "studyflow=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Session lengths from 1 minute up to a day
fn minutes_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(MAX_SESSION_MINUTES))
}

/// Point the browsed date at `date`, or back at today
fn browse(app: &mut AppState, date: Option<String>) -> Result<()> {
    match date {
        Some(s) => app.browse_date = parse_iso(&s)?,
        None => app.reset_browse_date(),
    }
    Ok(())
}

fn date_or_today(date: Option<String>) -> Result<chrono::NaiveDate> {
    match date {
        Some(s) => parse_iso(&s),
        None => Ok(today()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Commands::Init) = cli.command {
        let current_dir = std::env::current_dir().context("Could not determine current directory")?;
        let data_dir = init_local_data_dir(&current_dir)?;
        println!("Initialized studyflow directory: {}", data_dir.display());
        println!();
        println!("StudyFlow will now use this local directory for plans and settings.");
        println!("Run 'studyflow plan <subject> --deadline YYYY-MM-DD' to get started.");
        return Ok(());
    }

    let data_dir = get_data_dir(cli.dir.as_deref())?;
    let mut kv = FileStore::open(&data_dir)?;
    tracing::debug!(dir = %data_dir.display(), "using data directory");

    let mut app = AppState::load(&kv, today());

    match cli.command {
        // Handled before the data directory is opened
        Some(Commands::Init) => {}
        Some(Commands::Plan {
            name,
            deadline,
            difficulty,
            hours,
        }) => {
            let request = PlanRequest {
                name,
                deadline: parse_iso(&deadline)?,
                difficulty,
                daily_hours: hours,
            };
            deliver(&app.submit_plan(&request));
        }
        Some(Commands::Schedule { date, view }) => {
            browse(&mut app, date)?;
            let view = view.unwrap_or(app.view);
            print!("{}", render::schedule(view, &app.date_label(), &app.store, app.browse_date));
        }
        Some(Commands::Tasks { date, offset }) => {
            browse(&mut app, date)?;
            app.shift_date(offset);
            print!("{}", render::task_list(&app.date_label(), &app.browsed_tasks()));
        }
        Some(Commands::Toggle { id }) => {
            let task_id = app
                .store
                .find_task_by_prefix(&id)
                .with_context(|| format!("No single task matches '{}'", id))?;
            if let Some(notice) = app.toggle_task(task_id) {
                deliver(&notice);
            }
        }
        Some(Commands::DoneAll { date }) => {
            let date = date_or_today(date)?;
            deliver(&app.mark_all_done(date));
        }
        Some(Commands::Clear { yes }) => {
            if !yes {
                deliver(&Notice::error(
                    "This deletes every subject and task. Re-run with --yes to confirm.",
                ));
                return Ok(());
            }
            deliver(&app.clear_all());
        }
        Some(Commands::Progress) => {
            print!("{}", render::progress(&app.summary()));
        }
        Some(Commands::View { mode }) => {
            app.switch_view(mode);
            deliver(&Notice::info(format!("View set to {}", mode.as_str())));
        }
        Some(Commands::Settings {
            study,
            break_minutes,
        }) => {
            let current = app.timer.settings();
            let settings = app.update_timer_settings(
                study.unwrap_or(current.study_duration_minutes),
                break_minutes.unwrap_or(current.break_duration_minutes),
            );
            deliver(&Notice::success(format!(
                "Timer set to {} min study, {} min break",
                settings.study_duration_minutes, settings.break_duration_minutes
            )));
        }
        Some(Commands::Timer {
            study,
            break_minutes,
            sessions,
        }) => {
            if study.is_some() || break_minutes.is_some() {
                let current = app.timer.settings();
                app.update_timer_settings(
                    study.unwrap_or(current.study_duration_minutes),
                    break_minutes.unwrap_or(current.break_duration_minutes),
                );
                app.save(&mut kv)?;
            }
            run_timer(&mut app, sessions)?;
        }
        Some(Commands::Report { date, output }) => {
            let report_date = date_or_today(date)?;
            println!("Generating report for {}...", report_date);
            let report_path = report::generate_report(&app.store, report_date, output, &data_dir)?;
            println!("Report generated: {}", report_path.display());
        }
        None => {
            print!("{}", render::schedule(app.view, &app.date_label(), &app.store, app.browse_date));
            println!();
            print!("{}", render::progress(&app.summary()));
            println!();
            println!("Tomorrow: {} task(s)", app.store.tasks_for_date(add_days(app.today, 1)).len());
        }
    }

    if app.needs_save() {
        app.save(&mut kv)?;
    }

    Ok(())
}

fn run_timer(app: &mut AppState, sessions: Option<u32>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start timer runtime")?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    app.reset_timer();
    let reason = runtime.block_on(timer::run(
        &mut *app,
        sessions,
        shutdown,
        |notice: &Notice| {
            println!();
            deliver_with_alert(notice);
        },
        |app: &AppState| {
            print!("\r{}   ", render::timer_line(&app.timer));
            let _ = io::stdout().flush();
        },
    ));
    println!();

    match reason {
        StopReason::SessionLimit => deliver(&Notice::info(format!(
            "Finished after {} session(s).",
            app.timer.completed_sessions()
        ))),
        StopReason::Interrupted => deliver(&Notice::info(format!(
            "Timer stopped at {}.",
            render::timer_line(&app.timer)
        ))),
    }
    Ok(())
}
