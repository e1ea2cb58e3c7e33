// src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dialoguer::{Input, Select};
use leetcode_tracker::database::{init_data_dir, migrate_legacy_file};
use leetcode_tracker::models::{normalize_difficulty_input, parse_date};
use leetcode_tracker::{Config, NewProblem, Printer, ProblemEdit, Tracker, TrackerError};
use log::{debug, info};

#[derive(Parser)]
#[command(name = "leetcode-tracker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding leetcode_list.json and classification.json
    #[arg(long, global = true, env = "LEETCODE_TRACKER_DATA")]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a newly solved problem
    Add(AddArgs),
    /// Log another practice of a tracked problem
    Update {
        id: i64,
        #[command(flatten)]
        edit: EditArgs,
    },
    /// List every tracked problem
    List,
    /// Show one problem
    Show { id: i64 },
    /// Problems practiced today
    Today,
    /// Suggest what to practice today
    Recommend,
    /// Category staleness and review scores
    Scores,
    /// Problems ranked by review urgency
    Review {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Problem ids filed under a category
    Related { category: String },
    /// Categories a problem is filed under
    Categories { id: i64 },
    /// Replace a problem's categories (none detaches it)
    Tag { id: i64, categories: Vec<String> },
    /// Remove a problem from one category
    Untag { id: i64, category: String },
    /// Open a problem's link in the browser
    Open { id: i64 },
    /// Convert a legacy records file to the current format
    Migrate {
        input: PathBuf,
        /// Defaults to the records file in the data directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace an output that already holds current-format records
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    id: i64,
    /// easy / medium / hard, or 1 / 2 / 3
    #[arg(long, default_value = "")]
    difficulty: String,
    /// minutes:seconds or minutes
    #[arg(long, default_value = "0:00")]
    time: String,
    #[arg(long, default_value = "")]
    tag: String,
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    date: Option<String>,
    #[arg(long, default_value = "")]
    url: String,
}

#[derive(Args)]
struct EditArgs {
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long)]
    time: Option<String>,
    #[arg(long)]
    tag: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
    info!("Starting LeetCode tracker...");

    let config = Config::load().context("Failed to load config")?;
    let printer = Printer::new(config.color && !cli.no_color);
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref())?;
    let paths = init_data_dir(&data_dir)
        .with_context(|| format!("Failed to prepare data directory {:?}", data_dir))?;
    debug!("Data paths: {:?}", paths);

    // Migration runs before opening: the records file may still be legacy.
    if let Some(Commands::Migrate { input, output, force }) = cli.command {
        let output = output.unwrap_or(paths.records);
        let count = migrate_legacy_file(&input, &output, force)?;
        printer.print(&printer.notice(&format!("Migrated {} records to {:?}", count, output)));
        return Ok(());
    }

    let today = Local::now().date_naive();
    let mut tracker = Tracker::open(&paths).context("Failed to open tracker data")?;

    match cli.command {
        Some(command) => run_command(command, &mut tracker, &printer, today),
        None => run_menu(&mut tracker, &printer, today),
    }
}

fn run_command(
    command: Commands,
    tracker: &mut Tracker,
    printer: &Printer,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Commands::Add(args) => {
            let problem = NewProblem {
                id: args.id,
                date: args.date.as_deref().map(parse_date).transpose()?,
                difficulty: normalize_difficulty_input(&args.difficulty),
                time_cost: args.time,
                tag: args.tag,
                reference_url: args.url,
            };
            let added = tracker.add(problem, today)?;
            printer.print(&format!("Added:\n{}", added));
        }
        Commands::Update { id, edit } => {
            let edit = ProblemEdit {
                date: edit.date.as_deref().map(parse_date).transpose()?,
                difficulty: edit.difficulty.map(|d| normalize_difficulty_input(&d)),
                time_cost: edit.time,
                tag: edit.tag,
            };
            let updated = tracker.update(id, edit, today)?;
            printer.print(&format!("Updated:\n{}", updated));
        }
        Commands::List => list_all(tracker, printer),
        Commands::Show { id } => {
            let record = tracker.records().find(id).ok_or(TrackerError::NotFound(id))?;
            printer.print(&record.to_string());
        }
        Commands::Today => show_today(tracker, printer, today),
        Commands::Recommend => recommend(tracker, printer, today),
        Commands::Scores => show_scores(tracker, printer, today),
        Commands::Review { limit } => {
            let mut queue = tracker.review_queue(today);
            queue.truncate(limit);
            printer.print(&printer.render_ranked(&queue, "Review Queue"));
        }
        Commands::Related { category } => {
            let ids = tracker.index().problems_in(&category);
            if ids.is_empty() {
                printer.print(&printer.warning(&format!("No problems under {:?}", category)));
            } else {
                let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
                printer.print(&format!("{}: {}", category, ids.join(", ")));
            }
        }
        Commands::Categories { id } => {
            let categories: Vec<String> = tracker.index().categories_of(id).into_iter().collect();
            if categories.is_empty() {
                printer.print(&printer.warning(&format!("Problem {} has no categories", id)));
            } else {
                printer.print(&format!("{}: {}", id, categories.join(", ")));
            }
        }
        Commands::Tag { id, categories } => {
            tracker.index_mut().replace_categories(id, categories)?;
            let now: Vec<String> = tracker.index().categories_of(id).into_iter().collect();
            printer.print(&printer.notice(&format!("Problem {} categories: [{}]", id, now.join(", "))));
        }
        Commands::Untag { id, category } => {
            tracker.index_mut().remove(id, &category)?;
            printer.print(&printer.notice(&format!("Removed {} from {:?}", id, category)));
        }
        Commands::Open { id } => {
            let record = tracker.records().find(id).ok_or(TrackerError::NotFound(id))?;
            open_link(&record.reference_url)?;
        }
        Commands::Migrate { .. } => unreachable!("migrate is handled before the tracker opens"),
    }
    Ok(())
}

fn open_link(url: &str) -> Result<()> {
    if url.is_empty() {
        anyhow::bail!("This problem has no link");
    }
    webbrowser::open(url).map_err(|e| TrackerError::Browser(e.to_string()))?;
    Ok(())
}

fn list_all(tracker: &Tracker, printer: &Printer) {
    let records: Vec<_> = tracker.records().records().iter().collect();
    printer.print(&printer.render_records(&records, "Problems"));
}

fn show_today(tracker: &Tracker, printer: &Printer, today: NaiveDate) {
    printer.print(&printer.render_today(&tracker.today(today)));
}

fn recommend(tracker: &Tracker, printer: &Printer, today: NaiveDate) {
    let recommendation = tracker.recommend(today, &mut rand::rng());
    printer.print(&printer.render_recommendation(&recommendation));
}

fn show_scores(tracker: &Tracker, printer: &Printer, today: NaiveDate) {
    printer.print(&printer.render_category_scores(&tracker.category_scores(today)));
}

// --- Interactive Menu ---

const MENU_OPTIONS: [&str; 7] = [
    "Add a new problem",
    "Update a practiced problem",
    "List all problems",
    "What should I practice today?",
    "Category score table",
    "Today's practice log",
    "Quit",
];

fn run_menu(tracker: &mut Tracker, printer: &Printer, today: NaiveDate) -> Result<()> {
    loop {
        printer.print(&printer.render_menu("LeetCode Tracker", &MENU_OPTIONS));
        let choice = Select::new()
            .with_prompt("Choose an action")
            .items(&MENU_OPTIONS)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => prompt_add(tracker, printer, today),
            1 => prompt_update(tracker, printer, today),
            2 => {
                list_all(tracker, printer);
                Ok(())
            }
            3 => {
                recommend(tracker, printer, today);
                Ok(())
            }
            4 => {
                show_scores(tracker, printer, today);
                Ok(())
            }
            5 => {
                show_today(tracker, printer, today);
                Ok(())
            }
            _ => {
                printer.print("Bye!");
                return Ok(());
            }
        };

        // Bad input sends the user back to the menu; storage failures end the session.
        if let Err(err) = outcome {
            match err.downcast_ref::<TrackerError>() {
                Some(tracker_err) if tracker_err.is_user_error() => {
                    printer.print(&printer.error(&tracker_err.to_string()));
                }
                _ => return Err(err),
            }
        }
    }
}

fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

fn prompt_date(prompt: &str) -> Result<Option<NaiveDate>> {
    let raw = prompt_text(prompt)?;
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(parse_date(&raw)?))
}

fn prompt_add(tracker: &mut Tracker, printer: &Printer, today: NaiveDate) -> Result<()> {
    let date = prompt_date("Date (YYYY-MM-DD, empty for today)")?;
    let id: i64 = Input::new().with_prompt("LeetCode problem id").interact_text()?;
    let difficulty = prompt_text("Difficulty (1-easy, 2-medium, 3-hard)")?;
    let time_cost = prompt_text("Time spent (min:sec)")?;
    let tag = prompt_text("Tag (greedy / two pointers / tree ...)")?;
    let reference_url = prompt_text("Link (optional)")?;

    let problem = NewProblem {
        id,
        date,
        difficulty: normalize_difficulty_input(&difficulty),
        time_cost,
        tag,
        reference_url,
    };
    let added = tracker.add(problem, today)?;
    printer.print(&printer.notice(&format!("Added:\n{}", added)));
    Ok(())
}

fn prompt_update(tracker: &mut Tracker, printer: &Printer, today: NaiveDate) -> Result<()> {
    let id: i64 = Input::new().with_prompt("Problem id to update").interact_text()?;
    let current = tracker.records().find(id).ok_or(TrackerError::NotFound(id))?.clone();
    printer.print(&current.to_string());

    let date = prompt_date(&format!(
        "New date (current {}, empty for today)",
        current.date
    ))?;
    let difficulty = prompt_text(&format!(
        "Difficulty (1-easy, 2-medium, 3-hard; current {})",
        current.difficulty
    ))?;
    let time_cost = prompt_text(&format!("Time spent (min:sec; current {})", current.time_cost))?;
    let tag = prompt_text(&format!("Tag (current {})", current.tag))?;

    let edit = ProblemEdit {
        date,
        difficulty: Some(normalize_difficulty_input(&difficulty)),
        time_cost: Some(time_cost),
        tag: Some(tag),
    };
    let updated = tracker.update(id, edit, today)?;
    printer.print(&printer.notice(&format!("Updated:\n{}", updated)));
    Ok(())
}
