//! Portal sign-in and backup run setup shared by the commands

use crate::adapters::arcgis::ArcGisPortal;
use crate::adapters::{ContentStore, Session};
use crate::cli::console::prompt_error;
use crate::cli::output::{exit_code_for_error, exit_code_for_report, print_error};
use crate::config::{load_credentials_from_file, BackupConfig, Credentials, PortalConfig};
use crate::core::backup::{BackupOrchestrator, ShutdownHandle};
use crate::core::directory::ContentDirectory;
use crate::core::frontend::{submit_selection, SelectionFrontEnd};
use crate::core::sandbox::{BackupBase, PathSandbox};
use crate::domain::Result;
use dialoguer::{Input, Password};
use std::sync::Arc;

/// A signed-in portal
pub struct Connection {
    /// Content store the session belongs to
    pub store: Arc<dyn ContentStore>,
    /// Authenticated session
    pub session: Session,
}

/// Build the portal client and sign in
///
/// Credentials come from `portal.credentials_file` when it holds both keys,
/// otherwise the user is prompted.
///
/// # Errors
///
/// Returns `Configuration` for an unusable portal URL, `Prompt` if input
/// cannot be read and `Authentication` if sign-in is rejected.
pub async fn connect(config: &BackupConfig) -> Result<Connection> {
    let store: Arc<dyn ContentStore> = Arc::new(ArcGisPortal::new(config.portal.clone())?);
    let credentials = obtain_credentials(&config.portal)?;

    let session = store.authenticate(&credentials).await?;
    println!("✅ Signed in to {} as {}", store.base_url(), session.username);

    Ok(Connection { store, session })
}

fn obtain_credentials(portal: &PortalConfig) -> Result<Credentials> {
    if let Some(path) = portal
        .credentials_file
        .as_deref()
        .filter(|p| !p.trim().is_empty())
    {
        if let Some(credentials) = load_credentials_from_file(path)? {
            return Ok(credentials);
        }
        println!("⚠️  No usable credentials in {path}, please sign in");
    }

    let mut username = Input::<String>::new().with_prompt("ArcGIS username");
    if let Some(default) = portal.username.as_deref().filter(|u| !u.trim().is_empty()) {
        username = username.default(default.to_string());
    }
    let username = username.interact_text().map_err(prompt_error)?;

    let password = Password::new()
        .with_prompt("ArcGIS password")
        .interact()
        .map_err(prompt_error)?;

    Credentials::new(username, password)
}

/// Everything a backup command needs once signed in
pub struct BackupRuntime {
    /// Signed-in portal
    pub connection: Connection,
    /// Folder and item enumeration
    pub directory: ContentDirectory,
    /// Export driver
    pub orchestrator: BackupOrchestrator,
}

impl BackupRuntime {
    /// Create the backup base, sign in and wire the orchestrator
    ///
    /// The base directory is created before sign-in so an unusable
    /// `backup.base_path` fails without prompting.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the base directory cannot be created, plus the
    /// errors of [`connect`].
    pub async fn start(
        config: &BackupConfig,
        shutdown: ShutdownHandle,
    ) -> Result<Self> {
        let base = BackupBase::new(&config.backup.base_path)?;
        tracing::info!(base = %base, naming = %config.backup.naming, "Backup base ready");
        let sandbox = PathSandbox::new(base, config.backup.naming.policy());

        let connection = connect(config).await?;
        let directory = ContentDirectory::new(connection.store.clone());
        let orchestrator = BackupOrchestrator::new(connection.store.clone(), sandbox)
            .with_shutdown(shutdown);

        Ok(Self {
            connection,
            directory,
            orchestrator,
        })
    }

    /// Drive one run through `front_end` and map the outcome to an exit code
    pub async fn run<F>(&self, front_end: &mut F) -> i32
    where
        F: SelectionFrontEnd + ?Sized,
    {
        match submit_selection(
            front_end,
            &self.directory,
            &self.orchestrator,
            &self.connection.session,
        )
        .await
        {
            Ok(report) => exit_code_for_report(&report),
            Err(e) => {
                tracing::error!(error = %e, "Backup aborted");
                print_error(&e);
                exit_code_for_error(&e)
            }
        }
    }
}

/// Start a backup runtime, printing and mapping any startup error
pub async fn start_runtime(
    config: &BackupConfig,
    shutdown: ShutdownHandle,
) -> std::result::Result<BackupRuntime, i32> {
    BackupRuntime::start(config, shutdown)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to start backup");
            print_error(&e);
            exit_code_for_error(&e)
        })
}
