//! Command-line front end: wires the HTTP user source and file-backed
//! storage into the dashboard services and prints derived views as JSON.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use dashboard::domain::auth::{AuthTokenStore, Authenticator, LoginError};
use dashboard::domain::dashboard::DEFAULT_PAGE_SIZE;
use dashboard::domain::overrides::StatusOverrideStore;
use dashboard::domain::ports::UserSource;
use dashboard::outbound::storage::FileStore;
use dashboard::outbound::users::HttpUserSource;
use dashboard::domain::user::User;
use dashboard::{Dashboard, DashboardView, Error, UserFilters, UserStatus};

#[derive(Parser)]
#[command(name = "dashboard", about = "User admin dashboard", version)]
struct Cli {
    /// Endpoint serving the users JSON document.
    #[arg(long, env = "DASHBOARD_USERS_URL", global = true)]
    users_url: Option<Url>,

    /// Directory holding the session token and status overrides.
    #[arg(long, env = "DASHBOARD_STORAGE_DIR", global = true, default_value = ".dashboard")]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Close the current session.
    Logout,
    /// Show who is logged in and how long the session has left.
    Session,
    /// Fetch the user list and print the derived page.
    View {
        /// 1-based page to show.
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        #[arg(long)]
        organization: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        status: Option<UserStatus>,
        /// Join day, YYYY-MM-DD.
        #[arg(long)]
        joined: Option<String>,
    },
    /// Fetch and print one user by id.
    User { id: String },
    /// Override a user's displayed status.
    SetStatus { id: String, status: UserStatus },
    /// Drop the status override for one user.
    ClearStatus { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let store: Arc<FileStore> =
        Arc::new(FileStore::new(&cli.storage_dir).map_err(|err| err.to_string())?);
    let tokens = AuthTokenStore::new(store.clone(), Arc::new(DefaultClock));
    let auth = Authenticator::new(tokens.clone());
    let overrides = StatusOverrideStore::new(store);

    match cli.command {
        Command::Login { email, password } => login(&auth, &email, &password).await,
        Command::Logout => {
            auth.logout();
            println!("Logged out");
            Ok(())
        }
        Command::Session => session(&tokens),
        Command::View {
            page,
            page_size,
            organization,
            username,
            email,
            phone_number,
            status,
            joined,
        } => {
            require_session(&tokens)?;
            let filters = UserFilters {
                organization,
                username,
                email,
                phone_number,
                status,
                date_joined: joined,
            };
            view(&cli.users_url, overrides, filters, page, page_size).await
        }
        Command::User { id } => {
            require_session(&tokens)?;
            show_user(&cli.users_url, &overrides, &id).await
        }
        Command::SetStatus { id, status } => {
            require_session(&tokens)?;
            overrides
                .set_status(&id, status)
                .map_err(|err| err.to_string())?;
            println!("Status of {id} set to {status}");
            Ok(())
        }
        Command::ClearStatus { id } => {
            require_session(&tokens)?;
            overrides.clear_status(&id).map_err(|err| err.to_string())?;
            println!("Status override for {id} cleared");
            Ok(())
        }
    }
}

async fn login(auth: &Authenticator, email: &str, password: &str) -> Result<(), String> {
    match auth.login(email, password).await {
        Ok(()) => {
            println!("Logged in as {email}");
            Ok(())
        }
        Err(LoginError::Validation { errors }) => {
            let rendered = serde_json::to_string_pretty(&errors)
                .unwrap_or_else(|_| "login validation failed".to_owned());
            Err(rendered)
        }
        Err(err @ LoginError::TokenStorage { .. }) => Err(err.to_string()),
    }
}

fn session(tokens: &AuthTokenStore) -> Result<(), String> {
    match tokens.payload() {
        Some(payload) => {
            let remaining = tokens.remaining_time();
            println!(
                "Logged in as {} ({} minutes left)",
                payload.email,
                remaining.as_secs() / 60
            );
            Ok(())
        }
        None => Err("Not logged in".to_owned()),
    }
}

fn require_session(tokens: &AuthTokenStore) -> Result<(), String> {
    if tokens.is_valid() {
        Ok(())
    } else {
        Err("Not logged in; run `dashboard login` first".to_owned())
    }
}

fn user_source(users_url: &Option<Url>) -> Result<Arc<dyn UserSource>, String> {
    let url = users_url
        .clone()
        .ok_or("no users endpoint; pass --users-url or set DASHBOARD_USERS_URL")?;
    let source = HttpUserSource::new(url).map_err(|err| err.to_string())?;
    Ok(Arc::new(source))
}

async fn view(
    users_url: &Option<Url>,
    overrides: StatusOverrideStore,
    filters: UserFilters,
    page: usize,
    page_size: usize,
) -> Result<(), String> {
    let source = user_source(users_url)?;
    let mut dashboard = Dashboard::new(source, overrides);
    if let Some(size) = NonZeroUsize::new(page_size) {
        dashboard.set_page_size(size);
    }
    dashboard.submit_filters(filters);
    dashboard.set_page(page);
    dashboard.load().await;

    let view = dashboard.view();
    let rendered = serde_json::to_string_pretty(&view)
        .map_err(|err| Error::internal(format!("failed to render view: {err}")).to_string())?;
    println!("{rendered}");
    if matches!(view, DashboardView::Failed { .. }) {
        return Err("user list fetch failed".to_owned());
    }
    Ok(())
}

async fn show_user(
    users_url: &Option<Url>,
    overrides: &StatusOverrideStore,
    id: &str,
) -> Result<(), String> {
    let source = user_source(users_url)?;
    let user = source
        .find_user(id)
        .await
        .map_err(|err| Error::from(err).to_string())?
        .ok_or_else(|| Error::not_found(format!("no user with id {id}")).to_string())?;

    let user = match overrides.status(id) {
        Some(status) => User { status, ..user },
        None => user,
    };
    let rendered = serde_json::to_string_pretty(&user)
        .map_err(|err| Error::internal(format!("failed to render user: {err}")).to_string())?;
    println!("{rendered}");
    Ok(())
}
