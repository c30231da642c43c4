use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use shared_types::validation::parse_date;
use shared_types::{Currency, ExpenseForm, SplitForm, UpdateProfileRequest, User};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use edufinance_app::chart::TextChartRenderer;
use edufinance_app::clock::SystemClock;
use edufinance_app::config::{self, AppConfig};
use edufinance_app::controllers::analysis;
use edufinance_app::controllers::auth::SignUpForm;
use edufinance_app::controllers::dashboard::default_due_date;
use edufinance_app::controllers::profile::avatar_data_uri;
use edufinance_app::controllers::{
    AnalysisPage, AuthPage, DashboardPage, ExpensesPage, ProfilePage, ShellPage, SplitPage,
    TipsPage,
};
use edufinance_app::identity::{IdentityProvider, LocalIdentityProvider};
use edufinance_app::storage::{sqlite, KeyValueBackend, MemoryBackend, SqliteBackend};
use edufinance_app::{render, AppContext, Mount, Page, PageSettings, Store};

#[derive(Parser, Debug)]
#[command(author, version, about = "Personal finance tracker for students", long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    log_file_path: Option<String>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spending overview, budget and upcoming bills
    Dashboard,
    Expenses {
        #[command(subcommand)]
        action: ExpensesCommand,
    },
    /// Spending over a date range
    Analysis {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Trailing number of days, e.g. 7, 30 or 90
        #[arg(
            long,
            conflicts_with_all = ["from", "to"],
            value_parser = clap::value_parser!(u32).range(1..=analysis::MAX_RANGE_DAYS as i64)
        )]
        days: Option<u32>,
        #[arg(long, default_value = "all")]
        category: String,
    },
    Split {
        #[command(subcommand)]
        action: SplitCommand,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    Tips {
        #[command(subcommand)]
        action: TipsCommand,
    },
    Reminders {
        #[command(subcommand)]
        action: RemindersCommand,
    },
    Export {
        #[command(subcommand)]
        action: ExportCommand,
    },
    Theme {
        #[command(subcommand)]
        action: ThemeCommand,
    },
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ExpensesCommand {
    List,
    Add {
        amount: String,
        #[arg(long, default_value = "Food")]
        category: String,
        /// yyyy-mm-dd, defaults to the selected date
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Edit {
        id: String,
        amount: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Date preselected for new expenses
    SelectDate {
        date: String,
    },
}

#[derive(Subcommand, Debug)]
enum SplitCommand {
    Balances,
    List,
    Add {
        description: String,
        amount: String,
        #[arg(long, default_value = "me")]
        paid_by: String,
        /// Participant ids, e.g. me,f1,f2
        #[arg(long = "with", value_delimiter = ',', required = true)]
        split_with: Vec<String>,
        #[arg(long)]
        date: Option<String>,
    },
    Settle {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        budget: Option<f64>,
        #[arg(long)]
        currency: Option<Currency>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        phone: Option<String>,
        /// Image file to use as avatar
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Remove all stored data except sign-in accounts
    ClearData {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum TipsCommand {
    List,
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
enum RemindersCommand {
    List,
    Add {
        title: String,
        amount: String,
        /// yyyy-mm-dd, defaults to a week from today
        #[arg(long)]
        due: Option<String>,
    },
    Pay {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ExportCommand {
    Csv {
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    Summary,
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    Show,
    Toggle,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    Signup {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        budget: String,
        #[arg(long, default_value = "Birr")]
        currency: Currency,
    },
    Login {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        remember: bool,
    },
    Logout,
    Status,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file
    Init {
        #[arg(long)]
        force: bool,
    },
    Show,
}

fn init_tracing(log_file_path: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("edufinance.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

fn build_context(config: &AppConfig, ephemeral: bool) -> anyhow::Result<AppContext> {
    let backend: Arc<dyn KeyValueBackend> = if ephemeral {
        Arc::new(MemoryBackend::new())
    } else {
        let db_path = match &config.storage.path {
            Some(path) => path.clone(),
            None => sqlite::default_db_path()?,
        };
        Arc::new(
            SqliteBackend::open(&db_path)
                .with_context(|| format!("Failed to open storage at {}", db_path.display()))?,
        )
    };

    let store = Store::new(backend, Some(config.storage.quota_bytes));
    let identity: Arc<dyn IdentityProvider> = Arc::new(LocalIdentityProvider::new(
        store.clone(),
        std::time::Duration::from_millis(config.identity.startup_delay_ms),
    ));

    Ok(AppContext::new(
        store,
        identity,
        Arc::new(SystemClock),
        config.toast_duration(),
        PageSettings::from(config),
    ))
}

async fn mount<P: Page>(page: P) -> Mount<P> {
    let mut mount = Mount::new(page);
    mount.init().await;
    mount
}

fn print_toast(ctx: &AppContext) {
    if let Some(toast) = ctx.toaster.current() {
        println!("{}", toast.message);
    }
}

fn date_arg(raw: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    raw.map(parse_date).transpose().map_err(anyhow::Error::from)
}

fn currency_of(ctx: &AppContext) -> Currency {
    ctx.store
        .load::<User>(shared_types::keys::USER, &shared_types::defaults::default_user())
        .currency
}

async fn run(command: Command, ctx: &AppContext) -> anyhow::Result<()> {
    let charts = TextChartRenderer::default();

    match command {
        Command::Dashboard => {
            let page = mount(DashboardPage::new(ctx.clone())).await;
            print!("{}", render::dashboard(&page.view(), &charts));
        }

        Command::Expenses { action } => {
            let mut page = mount(ExpensesPage::new(ctx.clone())).await;
            let currency = currency_of(ctx);
            match action {
                ExpensesCommand::List => print!("{}", render::expense_table(&page.list(), currency)),
                ExpensesCommand::Add {
                    amount,
                    category,
                    date,
                    notes,
                } => {
                    let form = ExpenseForm {
                        date: date_arg(date.as_deref())?,
                        category,
                        amount,
                        notes,
                    };
                    let expense = page.add(&form)?;
                    println!("Added {}", expense.id);
                }
                ExpensesCommand::Edit {
                    id,
                    amount,
                    category,
                    date,
                    notes,
                } => {
                    let existing = page
                        .expenses
                        .iter()
                        .find(|e| e.id == id)
                        .cloned()
                        .ok_or_else(|| anyhow!("No expense with id {id}"))?;
                    let form = ExpenseForm {
                        date: date_arg(date.as_deref())?,
                        category: category.unwrap_or(existing.category),
                        amount,
                        notes: notes.unwrap_or(existing.notes),
                    };
                    page.edit(&id, &form)?;
                }
                ExpensesCommand::Delete { id } => {
                    if !page.delete(&id) {
                        println!("No expense with id {id}");
                    }
                }
                ExpensesCommand::SelectDate { date } => {
                    let date = parse_date(&date)?;
                    if page.select_date(date) {
                        println!("New expenses will default to {date}");
                    }
                }
            }
        }

        Command::Analysis {
            from,
            to,
            days,
            category,
        } => {
            let mut page = mount(AnalysisPage::new(ctx.clone())).await;
            if let Some(days) = days {
                page.preset(days)?;
            }
            let start = date_arg(from.as_deref())?.unwrap_or(page.range().start);
            let end = date_arg(to.as_deref())?.unwrap_or(page.range().end);
            page.set_range(start, end)?;
            page.set_category(&category);
            print!("{}", render::analysis(&page.view(), currency_of(ctx), &charts));
        }

        Command::Split { action } => {
            let mut page = mount(SplitPage::new(ctx.clone())).await;
            let currency = currency_of(ctx);
            match action {
                SplitCommand::Balances => {
                    print!("{}", render::balances(&page.balances(), currency));
                    let (owed, owing) = page.totals();
                    println!(
                        "  Owed to you {}, you owe {}",
                        analytics::format_currency(owed, currency),
                        analytics::format_currency(owing, currency)
                    );
                }
                SplitCommand::List => {
                    print!(
                        "{}",
                        render::split_history(&page.history(), currency, |id| page.participant_name(id))
                    );
                }
                SplitCommand::Add {
                    description,
                    amount,
                    paid_by,
                    split_with,
                    date,
                } => {
                    let form = SplitForm {
                        description,
                        total_amount: amount,
                        paid_by,
                        date: date_arg(date.as_deref())?,
                        split_between: split_with,
                    };
                    let split = page.add(&form)?;
                    println!("Added {}", split.id);
                }
                SplitCommand::Settle { id } => {
                    if !page.settle(&id) {
                        println!("Nothing to settle for {id}");
                    }
                }
                SplitCommand::Delete { id } => {
                    if !page.delete(&id) {
                        println!("No split with id {id}");
                    }
                }
            }
        }

        Command::Profile { action } => {
            let mut page = mount(ProfilePage::new(ctx.clone())).await;
            match action {
                ProfileCommand::Show => {
                    page.sync_from_remote().await;
                    print!("{}", render::profile(&page.user));
                }
                ProfileCommand::Set {
                    name,
                    email,
                    budget,
                    currency,
                    notifications,
                    phone,
                    avatar,
                } => {
                    let avatar = match avatar {
                        Some(path) => {
                            let bytes = std::fs::read(&path)
                                .with_context(|| format!("Failed to read {}", path.display()))?;
                            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                            Some(avatar_data_uri(&bytes, file_name).ok_or_else(|| {
                                anyhow!("Avatar must be a png, jpeg, gif or webp image under 256 KiB")
                            })?)
                        }
                        None => None,
                    };
                    page.update(UpdateProfileRequest {
                        name,
                        email,
                        budget,
                        currency,
                        notifications,
                        phone,
                        avatar,
                    })
                    .await?;
                    print!("{}", render::profile(&page.user));
                }
                ProfileCommand::ClearData { yes } => {
                    if !yes {
                        bail!("This removes all expenses, splits and settings. Re-run with --yes to confirm");
                    }
                    let removed = page.clear_all_data();
                    println!("Removed {removed} stored entries");
                }
            }
        }

        Command::Tips { action } => {
            let mut page = mount(TipsPage::new(ctx.clone())).await;
            if let TipsCommand::Toggle { id } = &action {
                match page.toggle(id) {
                    Some(true) => println!("Marked {id} as done"),
                    Some(false) => println!("Marked {id} as not done"),
                    None => bail!("No tip with id {id}"),
                }
            }
            print!(
                "{}",
                render::tips(&page.tips, |id| page.is_completed(id), page.progress_percent())
            );
        }

        Command::Reminders { action } => {
            let mut page = mount(DashboardPage::new(ctx.clone())).await;
            let currency = page.user.currency;
            match action {
                RemindersCommand::List => {}
                RemindersCommand::Add { title, amount, due } => {
                    let due = date_arg(due.as_deref())?.unwrap_or_else(|| default_due_date(ctx.today()));
                    page.add_reminder(&title, &amount, due)?;
                }
                RemindersCommand::Pay { id } => {
                    if !page.pay_reminder(&id) {
                        println!("No reminder with id {id}");
                    }
                }
                RemindersCommand::Delete { id } => {
                    if !page.delete_reminder(&id) {
                        println!("No reminder with id {id}");
                    }
                }
            }
            print!("{}", render::reminders(&page.reminders, currency));
            if let Some(days) = page.days_until_next_due() {
                println!("  Next bill due in {days} days");
            }
        }

        Command::Export { action } => {
            let page = mount(ExpensesPage::new(ctx.clone())).await;
            match action {
                ExportCommand::Csv { output: Some(path) } => {
                    let path = if path.is_dir() {
                        path.join(page.csv_file_name())
                    } else {
                        path
                    };
                    std::fs::write(&path, page.export_csv()?)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                ExportCommand::Csv { output: None } => print!("{}", page.export_csv()?),
                ExportCommand::Summary => println!("{}", page.summary_text()),
            }
            return Ok(());
        }

        Command::Theme { action } => {
            let mut page = mount(ShellPage::new(ctx.clone())).await;
            if let ThemeCommand::Toggle = action {
                page.toggle_theme();
            }
            println!("Theme: {}", page.theme);
            return Ok(());
        }

        Command::Auth { action } => {
            let mut page = mount(AuthPage::new(ctx.clone())).await;
            match action {
                AuthCommand::Signup {
                    email,
                    password,
                    name,
                    budget,
                    currency,
                } => {
                    let form = SignUpForm {
                        name,
                        email,
                        password,
                        budget,
                        currency,
                    };
                    page.sign_up(&form).await?;
                }
                AuthCommand::Login {
                    email,
                    password,
                    remember,
                } => {
                    page.sign_in(&email, &password, remember).await?;
                }
                AuthCommand::Logout => page.sign_out().await,
                AuthCommand::Status => match &page.session {
                    Some(session) if session.is_authenticated => {
                        println!("Signed in as {}", session.email)
                    }
                    _ => println!("Not signed in"),
                },
            }
        }

        Command::Config { action } => return run_config(action, None),
    }

    print_toast(ctx);
    Ok(())
}

fn run_config(action: ConfigCommand, path: Option<PathBuf>) -> anyhow::Result<()> {
    let config_path = path.unwrap_or_else(config::get_config_path);
    match action {
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", config_path.display());
            }
            config::write_default(&config_path)?;
            println!("Wrote {}", config_path.display());
        }
        ConfigCommand::Show => {
            let (config, used) = AppConfig::load(Some(&config_path))?;
            println!("# {}", used.display());
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_file_path.as_deref());

    let command = match args.command {
        Command::Config { action } => return run_config(action, args.config),
        command => command,
    };

    let (config, config_path) =
        AppConfig::load(args.config.as_deref()).context("Failed to load config")?;
    tracing::info!("Using config at {:?}", config_path);

    let ctx = build_context(&config, args.ephemeral)?;
    run(command, &ctx).await
}
