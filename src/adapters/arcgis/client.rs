//! ArcGIS portal implementation of [`ContentStore`]
//!
//! Talks to the sharing REST API of ArcGIS Online or an ArcGIS Enterprise
//! portal. Feature layers are exported server-side and downloaded as a zip
//! package; web maps are saved as a JSON document holding the item metadata
//! and the map definition.

use super::models::{
    parse_response, DeleteResponse, ExportJobResponse, ItemModel, JobStatus, JobStatusResponse,
    PortalError, PortalResponse, TokenResponse, UserContentResponse,
};
use crate::adapters::store::{ContentStore, Session};
use crate::config::{secret_string, Credentials, PortalConfig};
use crate::core::naming::sanitize_segment;
use crate::domain::{BackupError, Folder, FolderRef, Item, ItemId, ItemKind, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Page size for content listings (portal maximum)
const PAGE_SIZE: &str = "100";

/// Token lifetime requested from `generateToken`, in minutes
const TOKEN_EXPIRATION_MINUTES: &str = "120";

type ErrorCtor = fn(String) -> BackupError;

/// ArcGIS portal client
///
/// # Example
///
/// ```no_run
/// use ago_backup::adapters::arcgis::ArcGisPortal;
/// use ago_backup::adapters::ContentStore;
/// use ago_backup::config::{Credentials, PortalConfig};
///
/// # async fn example() -> ago_backup::domain::Result<()> {
/// let portal = ArcGisPortal::new(PortalConfig::default())?;
/// let credentials = Credentials::new("alice", "s3cret".to_string())?;
/// let session = portal.authenticate(&credentials).await?;
///
/// for folder in portal.list_folders(&session).await? {
///     println!("{}", folder.display_name());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ArcGisPortal {
    /// Portal base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Portal configuration
    config: PortalConfig,
}

impl ArcGisPortal {
    /// Create a new portal client
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: PortalConfig) -> Result<Self> {
        let base_url = config.url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            BackupError::Configuration(format!("Invalid portal URL '{base_url}': {e}"))
        })?;

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(url = %base_url, "TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            BackupError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Build `<base>/sharing/rest/<segments...>` with each segment escaped
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            BackupError::Configuration(format!("Invalid portal URL '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                BackupError::Configuration(format!(
                    "Portal URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["sharing", "rest"])
            .extend(segments);
        Ok(url)
    }

    /// Retry a read-only request with exponential backoff
    ///
    /// Authentication failures are returned immediately.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let max_attempts = retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e @ BackupError::Authentication(_)) => return Err(e),
                Err(e) => {
                    attempt += 1;
                    if attempt >= max_attempts {
                        return Err(e);
                    }

                    let delay_ms = (retry.initial_delay_ms as f64
                        * retry.backoff_multiplier.powf((attempt - 1) as f64))
                        as u64;
                    let delay_ms = delay_ms.min(retry.max_delay_ms);

                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = max_attempts,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        fail: ErrorCtor,
    ) -> Result<PortalResponse<T>> {
        let resp = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| fail(format!("Request to {url} failed: {}", e.without_url())))?;
        read_body(resp, fail).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: Url,
        form: &[(&str, &str)],
        fail: ErrorCtor,
    ) -> Result<PortalResponse<T>> {
        let resp = self
            .client
            .post(url.clone())
            .form(form)
            .send()
            .await
            .map_err(|e| fail(format!("Request to {url} failed: {}", e.without_url())))?;
        read_body(resp, fail).await
    }

    /// Fetch every page of a user content listing
    async fn fetch_user_content(
        &self,
        session: &Session,
        folder: Option<&Folder>,
    ) -> Result<Vec<UserContentResponse>> {
        let mut segments = vec!["content", "users", session.username.as_str()];
        if let Some(folder) = folder {
            segments.push(folder.id.as_str());
        }
        let url = self.endpoint(&segments)?;
        let token = session.token.expose_secret();

        let mut pages = Vec::new();
        let mut start: i64 = 1;

        loop {
            let start_param = start.to_string();
            let query = [
                ("f", "json"),
                ("token", token.as_ref()),
                ("start", start_param.as_str()),
                ("num", PAGE_SIZE),
            ];

            let page: UserContentResponse = self
                .retry_request(|| async {
                    let resp = self
                        .get_json(url.clone(), &query, BackupError::RemoteAccess)
                        .await?;
                    expect_ok(resp, BackupError::RemoteAccess)
                })
                .await?;

            let next_start = page.next_start;
            pages.push(page);

            // The portal reports -1 on the last page
            if next_start <= start {
                break;
            }
            start = next_start;
        }

        Ok(pages)
    }

    async fn export_feature_layer(
        &self,
        session: &Session,
        item: &Item,
        destination: &Path,
    ) -> Result<PathBuf> {
        let token = session.token.expose_secret();
        let stem = sanitize_segment(item.display_name());
        let export_title = format!("{stem}_backup_{}", Utc::now().format("%Y%m%d%H%M%S"));

        let url = self.endpoint(&["content", "users", session.username.as_str(), "export"])?;
        let form = [
            ("f", "json"),
            ("token", token.as_ref()),
            ("itemId", item.id.as_str()),
            ("exportFormat", self.config.export.format.as_str()),
            ("title", export_title.as_str()),
        ];

        let job: ExportJobResponse =
            expect_ok(self.post_form(url, &form, BackupError::Export).await?, BackupError::Export)?;

        tracing::info!(
            item_id = %item.id,
            export_item_id = %job.export_item_id,
            job_id = %job.job_id,
            format = %self.config.export.format,
            "Started remote export"
        );

        let outcome = async {
            self.wait_for_export(session, &job).await?;
            self.download_item_data(session, &job.export_item_id, destination, &stem)
                .await
        }
        .await;

        if self.config.export.cleanup_remote_exports {
            if let Err(e) = self.delete_item(session, &job.export_item_id).await {
                tracing::warn!(
                    export_item_id = %job.export_item_id,
                    error = %e,
                    "Failed to delete temporary export item"
                );
            }
        }

        outcome
    }

    async fn wait_for_export(&self, session: &Session, job: &ExportJobResponse) -> Result<()> {
        let url = self.endpoint(&[
            "content",
            "users",
            session.username.as_str(),
            "items",
            job.export_item_id.as_str(),
            "status",
        ])?;
        let token = session.token.expose_secret();
        let query = [
            ("f", "json"),
            ("token", token.as_ref()),
            ("jobId", job.job_id.as_str()),
            ("jobType", "export"),
        ];

        let poll_interval = Duration::from_millis(self.config.export.poll_interval_ms);
        let deadline = tokio::time::Instant::now()
            + Duration::from_secs(self.config.export.timeout_seconds);

        loop {
            let status: JobStatusResponse = expect_ok(
                self.get_json(url.clone(), &query, BackupError::Export).await?,
                BackupError::Export,
            )?;

            match status.status {
                JobStatus::Completed => return Ok(()),
                JobStatus::Failed => {
                    return Err(BackupError::Export(format!(
                        "Export job {} failed: {}",
                        job.job_id,
                        status
                            .status_message
                            .unwrap_or_else(|| "no message from portal".to_string())
                    )))
                }
                JobStatus::Processing | JobStatus::Pending => {
                    tracing::debug!(job_id = %job.job_id, "Export job still running");
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(BackupError::Export(format!(
                    "Export job {} did not finish within {} seconds",
                    job.job_id, self.config.export.timeout_seconds
                )));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn download_item_data(
        &self,
        session: &Session,
        export_item_id: &str,
        destination: &Path,
        stem: &str,
    ) -> Result<PathBuf> {
        let url = self.endpoint(&["content", "items", export_item_id, "data"])?;
        let token = session.token.expose_secret();

        let resp = self
            .client
            .get(url.clone())
            .query(&[("token", token.as_ref())])
            .send()
            .await
            .map_err(|e| {
                BackupError::Export(format!("Download from {url} failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackupError::Export(format!(
                "Download of export item {export_item_id} failed with status {status}"
            )));
        }

        let (package, mut file) = create_package_file(destination, stem, "zip").await?;
        if let Err(e) = stream_to_file(resp, &mut file, &package).await {
            drop(file);
            discard_partial_package(&package).await;
            return Err(e);
        }

        Ok(package)
    }

    async fn delete_item(&self, session: &Session, item_id: &str) -> Result<()> {
        let url = self.endpoint(&[
            "content",
            "users",
            session.username.as_str(),
            "items",
            item_id,
            "delete",
        ])?;
        let token = session.token.expose_secret();
        let form = [("f", "json"), ("token", token.as_ref())];

        let resp: DeleteResponse =
            expect_ok(self.post_form(url, &form, BackupError::Export).await?, BackupError::Export)?;
        if !resp.success {
            return Err(BackupError::Export(format!(
                "Portal did not confirm deletion of item {item_id}"
            )));
        }

        tracing::debug!(item_id = %item_id, "Deleted temporary export item");
        Ok(())
    }

    async fn export_web_map(
        &self,
        session: &Session,
        item: &Item,
        destination: &Path,
    ) -> Result<PathBuf> {
        let token = session.token.expose_secret();
        let query = [("f", "json"), ("token", token.as_ref())];

        let item_url = self.endpoint(&["content", "items", item.id.as_str()])?;
        let metadata: serde_json::Value = expect_ok(
            self.get_json(item_url, &query, BackupError::Export).await?,
            BackupError::Export,
        )?;

        let data_url = self.endpoint(&["content", "items", item.id.as_str(), "data"])?;
        let data: serde_json::Value = expect_ok(
            self.get_json(data_url, &query, BackupError::Export).await?,
            BackupError::Export,
        )?;

        let document = serde_json::json!({
            "item": metadata,
            "data": data,
        });
        let contents = serde_json::to_vec_pretty(&document)?;

        let stem = sanitize_segment(item.display_name());
        let (package, mut file) = create_package_file(destination, &stem, "json").await?;
        let written = match file.write_all(&contents).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            drop(file);
            discard_partial_package(&package).await;
            return Err(BackupError::Io(format!(
                "Failed to write {}: {e}",
                package.display()
            )));
        }

        Ok(package)
    }
}

#[async_trait]
impl ContentStore for ArcGisPortal {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let url = self.endpoint(&["generateToken"])?;
        let password = credentials.password.expose_secret();
        let form = [
            ("f", "json"),
            ("username", credentials.username.as_str()),
            ("password", password.as_ref()),
            ("client", "referer"),
            ("referer", self.base_url.as_str()),
            ("expiration", TOKEN_EXPIRATION_MINUTES),
        ];

        tracing::info!(url = %self.base_url, username = %credentials.username, "Signing in");

        let token: TokenResponse = match self
            .post_form(url, &form, BackupError::RemoteAccess)
            .await?
        {
            PortalResponse::Ok(token) => token,
            PortalResponse::Err(e) => {
                return Err(BackupError::Authentication(format!(
                    "Sign-in to {} failed: {}",
                    self.base_url,
                    e.describe()
                )))
            }
        };

        if token.token.is_empty() {
            return Err(BackupError::Authentication(
                "Portal returned an empty token".to_string(),
            ));
        }

        let expires_at = token.expires_at();
        Ok(Session::new(
            self.base_url.clone(),
            credentials.username.clone(),
            secret_string(token.token),
            expires_at,
        ))
    }

    async fn list_folders(&self, session: &Session) -> Result<Vec<Folder>> {
        let pages = self.fetch_user_content(session, None).await?;

        let mut folders = Vec::new();
        for model in pages.iter().flat_map(|page| page.folders.iter()) {
            match model.to_domain() {
                Ok(folder) => {
                    // Folders are repeated on every page
                    if !folders.iter().any(|f: &Folder| f.id == folder.id) {
                        folders.push(folder);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Skipping invalid folder"),
            }
        }

        tracing::debug!(count = folders.len(), "Listed folders");
        Ok(folders)
    }

    async fn list_items(&self, session: &Session, folder: &Folder) -> Result<Vec<Item>> {
        let pages = self.fetch_user_content(session, Some(folder)).await?;
        let folder_ref = FolderRef::from(folder);

        let mut items = Vec::new();
        for model in pages.iter().flat_map(|page| page.items.iter()) {
            match model.to_domain(folder_ref.clone()) {
                Ok(item) => items.push(item),
                Err(e) => tracing::warn!(error = %e, "Skipping invalid item"),
            }
        }

        tracing::debug!(folder = %folder.display_name(), count = items.len(), "Listed items");
        Ok(items)
    }

    async fn get_item(&self, session: &Session, id: &ItemId) -> Result<Option<Item>> {
        let url = self.endpoint(&["content", "items", id.as_str()])?;
        let token = session.token.expose_secret();
        let query = [("f", "json"), ("token", token.as_ref())];

        let response = self
            .retry_request(|| async {
                match self
                    .get_json::<ItemModel>(
                        url.clone(),
                        &query,
                        BackupError::RemoteAccess,
                    )
                    .await?
                {
                    PortalResponse::Err(e) if e.is_not_found() => Ok(None),
                    other => expect_ok(other, BackupError::RemoteAccess).map(Some),
                }
            })
            .await?;

        match response {
            Some(model) => Ok(Some(model.to_domain(model.folder_ref())?)),
            None => {
                tracing::debug!(item_id = %id, "Item not found or inaccessible");
                Ok(None)
            }
        }
    }

    async fn export_item(
        &self,
        session: &Session,
        item: &Item,
        destination: &Path,
    ) -> Result<PathBuf> {
        match &item.kind {
            ItemKind::FeatureLayer => self.export_feature_layer(session, item, destination).await,
            ItemKind::WebMap => self.export_web_map(session, item, destination).await,
            ItemKind::Other(portal_type) => Err(BackupError::Export(format!(
                "Items of type '{portal_type}' cannot be exported"
            ))),
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Read a response body, turning HTTP failures into `fail` errors
///
/// A 404 becomes a portal error with code 404 so lookups can treat it as a
/// missing item.
async fn read_body<T: DeserializeOwned>(resp: Response, fail: ErrorCtor) -> Result<PortalResponse<T>> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| fail(format!("Failed to read response: {}", e.without_url())))?;

    match status {
        s if s.is_success() => {}
        StatusCode::NOT_FOUND => {
            return Ok(PortalResponse::Err(PortalError {
                code: 404,
                message: "Not found".to_string(),
                details: Vec::new(),
            }))
        }
        StatusCode::UNAUTHORIZED => {
            return Err(BackupError::Authentication(format!(
                "Portal rejected the session with status {status}"
            )))
        }
        _ => {
            return Err(fail(format!("Portal returned status {status}: {body}")));
        }
    }

    parse_response(&body).map_err(|e| fail(format!("Unexpected portal response: {e}")))
}

/// Unwrap a portal response; token errors always map to `Authentication`
fn expect_ok<T>(response: PortalResponse<T>, fail: ErrorCtor) -> Result<T> {
    match response {
        PortalResponse::Ok(value) => Ok(value),
        PortalResponse::Err(e) if e.is_auth_failure() => {
            Err(BackupError::Authentication(e.describe()))
        }
        PortalResponse::Err(e) => Err(fail(e.describe())),
    }
}

/// Upper bound on `_<n>` suffixes tried for one package name
const MAX_PACKAGE_SUFFIX: u32 = 10_000;

/// Create the first free `<dir>/<stem>.<ext>`, `<dir>/<stem>_1.<ext>`, ...
///
/// Files are opened with `create_new`, so an existing package is never
/// overwritten, even one that appears while the name is being chosen.
///
/// # Errors
///
/// Returns `Io` if the file cannot be created or every suffix is taken.
pub async fn create_package_file(dir: &Path, stem: &str, ext: &str) -> Result<(PathBuf, File)> {
    for n in 0..MAX_PACKAGE_SUFFIX {
        let path = if n == 0 {
            dir.join(format!("{stem}.{ext}"))
        } else {
            dir.join(format!("{stem}_{n}.{ext}"))
        };

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(BackupError::Io(format!(
                    "Failed to create {}: {e}",
                    path.display()
                )))
            }
        }
    }

    Err(BackupError::Io(format!(
        "No free package name for {stem}.{ext} in {}",
        dir.display()
    )))
}

/// Copy a response body into `file` chunk by chunk
async fn stream_to_file(mut resp: Response, file: &mut File, package: &Path) -> Result<()> {
    let write_failed =
        |e: std::io::Error| BackupError::Io(format!("Failed to write {}: {e}", package.display()));

    while let Some(chunk) = resp.chunk().await.map_err(|e| {
        BackupError::Export(format!("Failed to read export package: {}", e.without_url()))
    })? {
        file.write_all(&chunk).await.map_err(write_failed)?;
    }
    file.flush().await.map_err(write_failed)?;

    Ok(())
}

/// Remove a package left incomplete by a failed download or write
async fn discard_partial_package(package: &Path) {
    match tokio::fs::remove_file(package).await {
        Ok(()) => tracing::debug!(path = %package.display(), "Removed partial package"),
        Err(e) => tracing::warn!(
            path = %package.display(),
            error = %e,
            "Failed to remove partial package"
        ),
    }
}
