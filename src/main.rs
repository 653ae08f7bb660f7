use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use dailyflow::commands::{self, auth, schedule, storage, summary};
use dailyflow::models::{ProfileUpdate, Schedule};
use dailyflow::utils::config;
use dailyflow::AppState;

#[derive(Parser)]
#[command(name = "dailyflow")]
#[command(about = "Personal schedules with AI daily summaries", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// KEY=value file holding OPENAI_API_KEY and WEATHER_API_KEY
    #[arg(long, default_value = ".env", global = true)]
    env_file: PathBuf,

    /// Optional settings JSON (model, endpoints, timeouts, retention)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding settings and DAILYFLOW_DB
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long, value_parser = commands::parse_date)]
        birth: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Check credentials and print the user id
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show a user's profile
    Profile {
        #[arg(long)]
        user: i64,
    },
    /// Replace a user's profile fields
    UpdateProfile {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_parser = commands::parse_date)]
        birth: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Change password
    Passwd {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Delete an account with all its schedules and summaries
    DeleteAccount {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        password: String,
    },
    /// Add a schedule
    Add {
        #[arg(long)]
        user: i64,
        #[command(flatten)]
        fields: ScheduleFields,
    },
    /// Replace an existing schedule
    Edit {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: ScheduleFields,
    },
    /// Delete one schedule
    Remove {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        id: i64,
    },
    /// Delete every schedule on a date
    ClearDay {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        date: String,
    },
    /// Show one schedule
    Show {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        id: i64,
    },
    /// List schedules for a date (defaults to today)
    Day {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        date: Option<String>,
    },
    /// List schedules for a month (defaults to the current one)
    Month {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Print per-day counts instead of the schedules
        #[arg(long)]
        counts: bool,
    },
    /// Search titles, locations and memos
    Search {
        #[arg(long)]
        user: i64,
        keyword: String,
    },
    /// List schedules in a category
    Category {
        #[arg(long)]
        user: i64,
        name: String,
    },
    /// List all of a user's schedules
    All {
        #[arg(long)]
        user: i64,
    },
    /// Today's AI summary
    Summary {
        #[arg(long)]
        user: i64,
    },
    /// Today's fortune
    Fortune {
        #[arg(long)]
        user: i64,
    },
    /// Current weather for a city or the user's address
    Weather {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        location: Option<String>,
    },
    /// Database row counts and size
    Stats,
    /// Whether the completion and weather APIs are configured
    Status,
    /// Purge cached summaries older than the retention window
    Cleanup {
        #[arg(long)]
        days: Option<i64>,
    },
}

#[derive(Args)]
struct ScheduleFields {
    #[arg(long)]
    title: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    /// HH:MM
    #[arg(long)]
    start: String,
    /// HH:MM
    #[arg(long)]
    end: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    memo: String,
    #[arg(long, default_value = "")]
    category: String,
}

impl From<ScheduleFields> for schedule::ScheduleRequest {
    fn from(fields: ScheduleFields) -> Self {
        Self {
            title: fields.title,
            date: fields.date,
            start_time: fields.start,
            end_time: fields.end,
            location: fields.location,
            memo: fields.memo,
            category: fields.category,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    config::load_env_file(&cli.env_file);
    let mut settings = config::load_settings(cli.config.as_deref());
    if let Some(db) = &cli.db {
        settings.database.path = db.to_string_lossy().into_owned();
    }

    let state = AppState::initialize(settings)?;
    run(&state, cli.command, cli.json).await.map_err(anyhow::Error::msg)
}

async fn run(state: &AppState, command: Command, json: bool) -> Result<(), String> {
    match command {
        Command::Register {
            username,
            password,
            name,
            email,
            birth,
            address,
        } => {
            let id = auth::register(
                state,
                auth::RegisterRequest {
                    username,
                    confirm_password: password.clone(),
                    password,
                    name,
                    email,
                    date_of_birth: birth,
                    address,
                },
            )?;
            println!("Registered user {}", id);
        }
        Command::Login { username, password } => {
            let id = auth::login(state, &username, &password)?;
            println!("{}", id);
        }
        Command::Profile { user } => {
            let profile = auth::get_profile(state, user)?;
            if json {
                print_json(&profile)?;
            } else {
                println!("{} ({})", profile.name, profile.username);
                println!("Email:   {}", profile.email);
                if let Some(birth) = profile.date_of_birth {
                    println!("Born:    {}", birth);
                }
                println!("Address: {}", profile.address);
            }
        }
        Command::UpdateProfile {
            user,
            name,
            email,
            birth,
            address,
        } => {
            auth::update_profile(
                state,
                user,
                ProfileUpdate {
                    name,
                    email,
                    date_of_birth: birth,
                    address,
                },
            )?;
            println!("Profile updated");
        }
        Command::Passwd { user, old, new } => {
            auth::change_password(state, user, &old, &new, &new)?;
            println!("Password changed");
        }
        Command::DeleteAccount { user, password } => {
            auth::delete_account(state, user, &password)?;
            println!("Account deleted");
        }
        Command::Add { user, fields } => {
            let id = schedule::add_schedule(state, user, fields.into())?;
            println!("Added schedule {}", id);
        }
        Command::Edit { user, id, fields } => {
            schedule::update_schedule(state, user, id, fields.into())?;
            println!("Updated schedule {}", id);
        }
        Command::Remove { user, id } => {
            schedule::delete_schedule(state, user, id)?;
            println!("Deleted schedule {}", id);
        }
        Command::ClearDay { user, date } => {
            let removed = schedule::delete_schedules_for_date(state, user, &date)?;
            println!("Deleted {} schedule(s) on {}", removed, date);
        }
        Command::Show { user, id } => {
            let item = schedule::get_schedule(state, user, id)?;
            print_schedules(std::slice::from_ref(&item), json)?;
        }
        Command::Day { user, date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive().to_string());
            print_schedules(&schedule::get_schedules_for_date(state, user, &date)?, json)?;
        }
        Command::Month {
            user,
            year,
            month,
            counts,
        } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            if counts {
                let counts = schedule::get_schedule_counts_for_month(state, user, year, month)?;
                if json {
                    print_json(&counts)?;
                } else {
                    for day in counts {
                        println!("{}  {}", day.date, day.count);
                    }
                }
            } else {
                print_schedules(&schedule::get_schedules_for_month(state, user, year, month)?, json)?;
            }
        }
        Command::Search { user, keyword } => {
            print_schedules(&schedule::search_schedules(state, user, &keyword)?, json)?;
        }
        Command::Category { user, name } => {
            print_schedules(&schedule::get_schedules_by_category(state, user, &name)?, json)?;
        }
        Command::All { user } => {
            print_schedules(&schedule::get_all_schedules(state, user)?, json)?;
        }
        Command::Summary { user } => {
            warn_if_degraded(state);
            println!("{}", summary::get_daily_summary(state, user).await?);
        }
        Command::Fortune { user } => {
            warn_if_degraded(state);
            println!("{}", summary::get_todays_fortune(state, user).await?);
        }
        Command::Weather { user, location } => {
            warn_if_degraded(state);
            println!("{}", summary::get_weather(state, user, location.as_deref()).await?);
        }
        Command::Stats => {
            let stats = storage::get_storage_stats(state)?;
            if json {
                print_json(&stats)?;
            } else {
                println!("Users:     {}", stats.users_count);
                println!("Schedules: {}", stats.schedules_count);
                println!("Summaries: {}", stats.summaries_count);
                println!("Size:      {} bytes", stats.total_size_bytes);
            }
        }
        Command::Status => {
            let status = summary::get_service_status(state);
            if json {
                print_json(&status)?;
            } else {
                println!("Completion API: {}", configured_label(status.completion));
                println!("Weather API:    {}", configured_label(status.weather));
            }
        }
        Command::Cleanup { days } => {
            let removed = storage::cleanup_old_summaries(state, days)?;
            println!("Removed {} cached summaries", removed);
        }
    }
    Ok(())
}

fn configured_label(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "not configured (fallback text)"
    }
}

fn warn_if_degraded(state: &AppState) {
    let status = summary::get_service_status(state);
    if !status.completion {
        eprintln!("note: OPENAI_API_KEY is not set; showing fallback text");
    }
    if !status.weather {
        eprintln!("note: WEATHER_API_KEY is not set; weather is unavailable");
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn print_schedules(schedules: &[Schedule], json: bool) -> Result<(), String> {
    if json {
        return print_json(&schedules);
    }
    if schedules.is_empty() {
        println!("No schedules.");
        return Ok(());
    }
    for s in schedules {
        let mut line = format!(
            "[{}] {} {}-{} {}",
            s.id,
            s.date,
            s.start_time.format("%H:%M"),
            s.end_time.format("%H:%M"),
            s.title
        );
        if !s.location.is_empty() {
            line.push_str(&format!(" @ {}", s.location));
        }
        if !s.category.is_empty() {
            line.push_str(&format!(" #{}", s.category));
        }
        println!("{}", line);
        if !s.memo.is_empty() {
            println!("      {}", s.memo);
        }
    }
    Ok(())
}
