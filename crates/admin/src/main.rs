//! `carecms-admin` -- command-line front end for the CMS back office.
//!
//! Drives the same list controllers, form submitters and detail loaders
//! the screens use, against the configured API.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default                 | Description                          |
//! |----------------------------|----------|-------------------------|--------------------------------------|
//! | `CMS_API_ENV`              | no       | `testing`               | `testing` or `production`            |
//! | `CMS_API_BASE_URL`         | no       | per environment         | Overrides the API base URL           |
//! | `CMS_REQUEST_TIMEOUT_SECS` | no       | `30`                    | Per-request timeout                  |
//! | `CMS_SEARCH_DEBOUNCE_MS`   | no       | `500`                   | Search quiescence window             |
//! | `CMS_DEFAULT_PAGE_SIZE`    | no       | `10`                    | Initial page size of list screens    |
//! | `CMS_SESSION_FILE`         | no       | `.carecms-session.json` | Where the login session is persisted |

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carecms_admin::config::AdminConfig;
use carecms_admin::controller::PagedListController;
use carecms_admin::details;
use carecms_admin::notify::NotificationBus;
use carecms_admin::screens::{self, ScreenSpec};
use carecms_admin::session::SessionContext;
use carecms_admin::submit::{FormSubmitter, SubmitError};
use carecms_client::MasterApi;
use carecms_core::forms::{FormMode, LanguageDraft};
use carecms_core::types::{is_active, RecordId};

#[derive(Debug, Parser)]
#[command(name = "carecms-admin", about = "CMS back-office client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available screens.
    Screens,
    /// Show one page of a screen.
    List {
        screen: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one record, with child collections for clinics and practitioners.
    Show { screen: String, id: String },
    /// Switch a record's active flag.
    Toggle {
        screen: String,
        id: String,
        state: Switch,
    },
    /// Create a language master.
    CreateLanguage {
        name: String,
        #[arg(long)]
        inactive: bool,
    },
    /// Start a session.
    Login {
        #[arg(long)]
        email: String,
    },
    /// End the current session.
    Logout,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carecms_admin=info,carecms_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AdminConfig::from_env().context("invalid configuration")?;
    let mut session = SessionContext::load(&config.session_file)?;

    tracing::info!(
        environment = ?config.client.environment,
        base_url = %config.client.base_url,
        "Starting carecms-admin",
    );

    match &cli.command {
        Command::Screens => {
            for screen in screens::ALL {
                println!("{:<24} {:<34} {}", screen.key, screen.model_name, screen.title);
            }
            return Ok(());
        }
        Command::Login { email } => {
            let user = session.login(json!({ "email": email }))?;
            println!("Logged in at {}", user.logged_in_at);
            return Ok(());
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    session.require()?;
    let api = MasterApi::new(&config.client)?;

    match cli.command {
        Command::List {
            screen,
            page,
            page_size,
            search,
        } => {
            let screen = find_screen(&screen)?;
            let controller = PagedListController::builder(api, screen)
                .page_size(page_size.unwrap_or(config.default_page_size))
                .build();
            controller.search(search).await?;
            if page > 1 {
                controller.set_page(page).await?;
            }
            let state = controller.snapshot();
            for (index, row) in state.rows.iter().enumerate() {
                println!("{:>4}  {}", state.serial(index), serde_json::to_string(row)?);
            }
            println!(
                "Page {} of {} ({} records)",
                state.current_page,
                state.total_pages(),
                state.total_count,
            );
        }
        Command::Show { screen, id } => {
            let screen = find_screen(&screen)?;
            let id = parse_id(&id);
            let value = match screen.model_name {
                "clinics" => serde_json::to_value(details::load_clinic(&api, &id).await?)?,
                "practitioners" => {
                    serde_json::to_value(details::load_practitioner(&api, &id).await?)?
                }
                model => {
                    let record =
                        details::fetch_by_id(&api, model, &id, screen.relations()).await?;
                    json!({ "record": record, "is_active": is_active(&record) })
                }
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Toggle { screen, id, state } => {
            let screen = find_screen(&screen)?;
            if !screen.has_toggle {
                bail!("screen '{}' has no active toggle", screen.key);
            }
            let controller = PagedListController::new(api, screen);
            let update = controller
                .toggle(parse_id(&id), matches!(state, Switch::On))
                .await?;
            println!("{update:?}");
        }
        Command::CreateLanguage { name, inactive } => {
            let submitter = FormSubmitter::new(api, NotificationBus::default());
            let draft = LanguageDraft {
                name,
                is_active: !inactive,
            };
            match submitter.submit(&draft, &FormMode::Create).await {
                Ok((_, outcome)) => println!("{outcome:?}"),
                Err(SubmitError::Validation(errors)) => {
                    for (field, message) in errors.iter() {
                        eprintln!("{field}: {message}");
                    }
                    bail!("validation failed");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Screens | Command::Login { .. } | Command::Logout => {}
    }

    Ok(())
}

fn find_screen(name: &str) -> anyhow::Result<&'static ScreenSpec> {
    screens::find(name).with_context(|| format!("unknown screen '{name}'"))
}

/// Numeric ids go over the wire as numbers, anything else as text.
fn parse_id(raw: &str) -> RecordId {
    raw.parse::<i64>()
        .map(RecordId::Int)
        .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
}
