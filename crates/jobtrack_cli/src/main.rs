//! `jobtrack` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration (file, env, flags) and bootstrap logging/storage.
//! - Map subcommands onto `jobtrack_core` services and print plain text.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use jobtrack_core::notes::{dated_line, note_entries};
use jobtrack_core::{
    init_logging, open_db, ApplicationDraft, ApplicationId, ApplicationPatch, ApplicationRecord,
    ApplicationService, ApplicationStatus, Caller, DateRange, DirectorySink, ExportFormat,
    ReminderService, Role, SortKey, SqliteApplicationStore, SqliteCompletionStore,
    SqliteNotificationRepository, StatusFilter, TrackerConfig, ViewQuery,
};
use log::info;
use std::path::PathBuf;

/// Notification ids use the same UUID format as record ids.
type NotificationId = ApplicationId;

type CliService<'conn> =
    ApplicationService<SqliteApplicationStore<'conn>, SqliteNotificationRepository<'conn>>;
type CliReminders<'svc, 'conn> = ReminderService<
    'svc,
    SqliteApplicationStore<'conn>,
    SqliteNotificationRepository<'conn>,
    SqliteCompletionStore<'conn>,
>;

#[derive(Debug, Parser)]
#[command(name = "jobtrack", version, about = "Track job applications from the terminal")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "JOBTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file; overrides config and environment.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Act with admin privileges (sees every owner's rows).
    #[arg(long, global = true)]
    admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record a new application.
    Add(AddArgs),
    /// List applications.
    List(ListArgs),
    /// Show one application with its note history.
    Show { id: ApplicationId },
    /// Change fields of one application.
    Update(UpdateArgs),
    /// Delete one application.
    Delete { id: ApplicationId },
    /// Dashboard statistics.
    Stats,
    /// Cross-owner overview (admin only).
    AdminStats,
    /// Pending reminders, highest priority first.
    Reminders,
    /// Mark a reminder done and apply its follow-up action.
    Complete { reminder_id: String },
    /// E-mail all due follow-ups in one message.
    Digest,
    /// Recent in-app notifications.
    Notifications {
        #[arg(long)]
        limit: Option<u32>,
        /// Mark this notification as read instead of listing.
        #[arg(long)]
        mark_read: Option<NotificationId>,
    },
    /// Write an export file into the configured export directory.
    Export {
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        #[arg(long, default_value = "all")]
        range: DateRange,
        /// Output directory; defaults to `export_dir` from config.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct AddArgs {
    company: String,
    role: String,
    #[arg(long, default_value = "Applied")]
    status: ApplicationStatus,
    /// Defaults to today.
    #[arg(long)]
    applied: Option<NaiveDate>,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    salary: Option<String>,
    #[arg(long = "type")]
    job_type: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    follow_up: Option<NaiveDate>,
    #[arg(long)]
    url: Option<String>,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive match on company or role.
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    #[arg(long, default_value = "date-desc")]
    sort: SortKey,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: ApplicationId,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    role: Option<String>,
    #[arg(long)]
    status: Option<ApplicationStatus>,
    #[arg(long)]
    applied: Option<NaiveDate>,
    /// Append a dated line to the notes.
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    salary: Option<String>,
    #[arg(long = "type")]
    job_type: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long, conflicts_with = "clear_follow_up")]
    follow_up: Option<NaiveDate>,
    #[arg(long)]
    clear_follow_up: bool,
    #[arg(long)]
    url: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_source = match cli.config.as_deref() {
        Some(path) if path.exists() => "file",
        _ => "default",
    };
    let mut config = TrackerConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if cli.admin {
        config.role = Role::Admin;
    }

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!("event=config_load module=cli status=ok source={config_source}");

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    let service = ApplicationService::new(
        SqliteApplicationStore::new(&conn),
        SqliteNotificationRepository::new(&conn),
    )
    .with_notification_email(config.notification_email.clone());
    let reminders = ReminderService::new(&service, SqliteCompletionStore::new(&conn));
    let caller = config.caller();
    let today = Local::now().date_naive();

    info!(
        "event=cli_command module=cli status=start role={}",
        caller.role
    );
    run(cli.command, &config, &caller, &service, &reminders, today)
}

fn run(
    command: Command,
    config: &TrackerConfig,
    caller: &Caller,
    service: &CliService<'_>,
    reminders: &CliReminders<'_, '_>,
    today: NaiveDate,
) -> Result<()> {
    match command {
        Command::Add(args) => {
            let draft = ApplicationDraft {
                company: args.company,
                role: args.role,
                status: args.status,
                applied_date: Some(args.applied.unwrap_or(today)),
                notes: args.notes.unwrap_or_default(),
                location: args.location,
                salary: args.salary,
                job_type: args.job_type,
                contact_person: args.contact,
                follow_up_date: args.follow_up,
                job_url: args.url,
            };
            let record = service.create(caller, draft)?;
            println!("added {}", record.id);
        }
        Command::List(args) => {
            let query = ViewQuery {
                search: args.search,
                status: args.status,
                sort: args.sort,
            };
            let records = service.view(caller, &query)?;
            if records.is_empty() {
                println!("no applications");
            }
            for record in &records {
                print_row(record);
            }
        }
        Command::Show { id } => {
            let record = service.get(caller, id)?;
            print_detail(&record);
        }
        Command::Update(args) => {
            let id = args.id;
            let patch = build_patch(service, caller, args, today)?;
            if patch.is_empty() {
                bail!("nothing to update");
            }
            let record = service.update(caller, id, &patch)?;
            println!("updated {} ({})", record.id, record.status);
        }
        Command::Delete { id } => {
            service.delete(caller, id)?;
            println!("deleted {id}");
        }
        Command::Stats => {
            let stats = service.stats(caller, today)?;
            println!("total: {}", stats.total);
            for status in ApplicationStatus::ALL {
                println!("  {:<9} {}", status, stats.count_for(status));
            }
            println!("interview rate: {:.1}%", stats.conversion_rate);
            println!("success rate: {:.1}%", stats.success_rate);
            println!("rejection rate: {:.1}%", stats.rejection_rate);
            println!("last 30 days: {}", stats.recent_count);
            println!("avg per week: {:.1}", stats.avg_per_week);
            if !stats.top_companies.is_empty() {
                println!("top companies:");
                for entry in &stats.top_companies {
                    println!("  {} ({})", entry.company, entry.count);
                }
            }
        }
        Command::AdminStats => {
            let overview = service.admin_overview(caller, today)?;
            println!("total: {}", overview.total);
            println!("users: {}", overview.unique_users);
            println!("last 7 days: {}", overview.recent_week_count);
            for (status, count) in &overview.status_counts {
                println!("  {status:<9} {count}");
            }
        }
        Command::Reminders => {
            let pending = reminders.pending(caller, today)?;
            if pending.is_empty() {
                println!("no pending reminders");
            }
            for reminder in &pending {
                println!(
                    "[{:<6}] {}  {}  (due {})",
                    reminder.priority, reminder.id, reminder.message, reminder.due_date
                );
            }
        }
        Command::Complete { reminder_id } => {
            let outcome = reminders.complete(caller, &reminder_id, today)?;
            println!("completed {} on {}", outcome.kind, outcome.record.company);
            if let Some(next) = outcome.record.follow_up_date {
                println!("next follow-up: {next}");
            }
        }
        Command::Digest => {
            if service.notification_email().is_none() {
                bail!("notification_email is not configured");
            }
            let sent = reminders.send_follow_up_digest(caller, today)?;
            println!("follow-ups in digest: {sent}");
        }
        Command::Notifications { limit, mark_read } => {
            if let Some(id) = mark_read {
                if !service.mark_notification_read(caller, id)? {
                    bail!("notification not found: {id}");
                }
                println!("marked {id} as read");
                return Ok(());
            }
            for item in service.notifications(caller, limit)? {
                let flag = if item.is_read { " " } else { "*" };
                println!(
                    "{flag} {} [{}] {}: {}",
                    item.id,
                    item.kind.as_str(),
                    item.title,
                    item.message
                );
            }
        }
        Command::Export { format, range, out } => {
            let mut sink = DirectorySink::new(out.unwrap_or_else(|| config.export_dir.clone()));
            let receipt = service.export(caller, format, range, Utc::now(), &mut sink)?;
            match receipt.location {
                Some(path) => println!(
                    "exported {} applications to {}",
                    receipt.record_count,
                    path.display()
                ),
                None => println!(
                    "exported {} applications as {}",
                    receipt.record_count, receipt.filename
                ),
            }
        }
    }
    Ok(())
}

fn build_patch(
    service: &CliService<'_>,
    caller: &Caller,
    args: UpdateArgs,
    today: NaiveDate,
) -> Result<ApplicationPatch> {
    let notes = match args.note {
        Some(text) => {
            let mut record = service.get(caller, args.id)?;
            record.append_note(&dated_line(today, &text, None));
            Some(record.notes)
        }
        None => None,
    };
    let follow_up_date = if args.clear_follow_up {
        Some(None)
    } else {
        args.follow_up.map(Some)
    };

    Ok(ApplicationPatch {
        company: args.company,
        role: args.role,
        status: args.status,
        applied_date: args.applied,
        notes,
        location: args.location.map(Some),
        salary: args.salary.map(Some),
        job_type: args.job_type.map(Some),
        contact_person: args.contact.map(Some),
        follow_up_date,
        job_url: args.url.map(Some),
    })
}

fn print_row(record: &ApplicationRecord) {
    println!(
        "{}  {}  {:<9}  {} - {}",
        record.id, record.applied_date, record.status, record.company, record.role
    );
}

fn print_detail(record: &ApplicationRecord) {
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    println!("{} - {}", record.company, record.role);
    println!("id:         {}", record.id);
    println!("owner:      {}", record.user_id);
    println!("status:     {}", record.status);
    println!("applied:    {}", record.applied_date);
    println!("location:   {}", show(&record.location));
    println!("salary:     {}", show(&record.salary));
    println!("type:       {}", show(&record.job_type));
    println!("contact:    {}", show(&record.contact_person));
    println!(
        "follow-up:  {}",
        record
            .follow_up_date
            .map_or_else(|| "-".to_string(), |date| date.to_string())
    );
    println!("url:        {}", show(&record.job_url));

    let entries = note_entries(&record.notes);
    if entries.is_empty() {
        return;
    }
    println!("notes:");
    for entry in entries {
        let date = entry
            .date
            .map_or_else(|| "          ".to_string(), |date| date.to_string());
        let markers = entry
            .markers
            .iter()
            .map(|marker| marker.token())
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {date}  {} {markers}", entry.text);
    }
}
