//! Integration tests for the backup flow
//!
//! An in-memory content store stands in for the portal. It writes a small
//! package per export and can be told to fail specific items.

use ago_backup::adapters::{ContentStore, Session};
use ago_backup::config::{secret_string, Credentials};
use ago_backup::core::backup::{
    BackupOrchestrator, BackupReport, ExportOutcome, InterruptAction, ShutdownHandle,
};
use ago_backup::core::directory::ContentDirectory;
use ago_backup::core::frontend::{submit_selection, SelectionFrontEnd};
use ago_backup::core::naming::NamingScheme;
use ago_backup::core::sandbox::{BackupBase, PathSandbox};
use ago_backup::domain::{
    BackupError, FailureKind, Folder, FolderId, FolderRef, Item, ItemId, ItemKind, Result,
    Selection,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::watch;

#[derive(Default)]
struct FakeStore {
    folders: Vec<Folder>,
    items: Vec<Item>,
    failures: HashMap<String, fn(String) -> BackupError>,
    exported: Mutex<Vec<String>>,
    shutdown_after_export: Option<watch::Sender<bool>>,
    observed_shutdown: Option<ShutdownHandle>,
    actions_during_export: Mutex<Vec<InterruptAction>>,
}

impl FakeStore {
    fn fail(mut self, id: &str, kind: fn(String) -> BackupError) -> Self {
        self.failures.insert(id.to_string(), kind);
        self
    }

    fn exported(&self) -> Vec<String> {
        self.exported.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for FakeStore {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        Ok(Session::new(
            "memory://",
            credentials.username.clone(),
            secret_string("token".to_string()),
            None,
        ))
    }

    async fn list_folders(&self, _session: &Session) -> Result<Vec<Folder>> {
        Ok(self.folders.clone())
    }

    async fn list_items(&self, _session: &Session, folder: &Folder) -> Result<Vec<Item>> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.folder.id.as_ref() == Some(&folder.id))
            .cloned()
            .collect())
    }

    async fn get_item(&self, _session: &Session, id: &ItemId) -> Result<Option<Item>> {
        Ok(self.items.iter().find(|item| &item.id == id).cloned())
    }

    async fn export_item(
        &self,
        _session: &Session,
        item: &Item,
        destination: &Path,
    ) -> Result<PathBuf> {
        self.exported.lock().unwrap().push(item.id.to_string());

        if let Some(handle) = &self.observed_shutdown {
            self.actions_during_export
                .lock()
                .unwrap()
                .push(handle.interrupt_action());
        }

        if let Some(tx) = &self.shutdown_after_export {
            let _ = tx.send(true);
        }

        if let Some(kind) = self.failures.get(item.id.as_str()) {
            return Err(kind(format!("export of {} failed", item.id)));
        }

        let package = destination.join(format!("{}.zip", item.id));
        std::fs::write(&package, item.title.as_bytes())?;
        Ok(package)
    }

    fn base_url(&self) -> &str {
        "memory://"
    }
}

fn field_work() -> Folder {
    Folder::new(FolderId::new("f1").unwrap(), "FieldWork")
}

fn item(id: &str, title: &str, kind: ItemKind) -> Item {
    Item::new(ItemId::new(id).unwrap(), title, kind, FolderRef::from(&field_work()))
}

fn three_items() -> Vec<Item> {
    vec![
        item("l1", "Roads", ItemKind::FeatureLayer),
        item("m1", "Overview", ItemKind::WebMap),
        item("l2", "Parcels", ItemKind::FeatureLayer),
    ]
}

fn store_with(items: Vec<Item>) -> FakeStore {
    FakeStore {
        folders: vec![field_work()],
        items,
        ..Default::default()
    }
}

fn session() -> Session {
    Session::new("memory://", "alice", secret_string("token".to_string()), None)
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 11).unwrap()
}

fn orchestrator(store: Arc<FakeStore>, temp: &TempDir) -> BackupOrchestrator {
    let sandbox = PathSandbox::new(
        BackupBase::new(temp.path()).unwrap(),
        NamingScheme::Dated.policy(),
    );
    BackupOrchestrator::new(store, sandbox).with_run_date(run_date())
}

#[tokio::test]
async fn test_failure_does_not_stop_remaining_items() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_with(three_items()).fail("m1", BackupError::Export));
    let selection = Selection::new(three_items()).unwrap();

    let report = orchestrator(store.clone(), &temp)
        .run_backup(&session(), &selection, None)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert!(report.results[0].succeeded());
    assert!(report.results[1].failed());
    assert!(report.results[2].succeeded());
    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert!(!report.is_successful());
    assert_eq!(store.exported(), vec!["l1", "m1", "l2"]);

    match &report.results[1].outcome {
        ExportOutcome::Failed { kind, message } => {
            assert_eq!(*kind, FailureKind::Export);
            assert!(message.contains("m1"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_default_destinations_per_item() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_with(three_items()));
    let selection = Selection::new(three_items()).unwrap();
    let orchestrator = orchestrator(store, &temp);

    let report = orchestrator
        .run_backup(&session(), &selection, None)
        .await
        .unwrap();
    assert!(report.is_successful());

    let base = orchestrator.sandbox().base().path();
    let expected = [
        "2026FEB11/FieldWork/layer/Roads",
        "2026FEB11/FieldWork/map/Overview",
        "2026FEB11/FieldWork/layer/Parcels",
    ];
    for (result, expected) in report.results.iter().zip(expected) {
        assert_eq!(result.destination.as_deref(), Some(base.join(expected).as_path()));
        let package = result.package().unwrap();
        assert!(package.starts_with(base.join(expected)));
        assert!(package.is_file());
    }

    match &report.results[0].outcome {
        ExportOutcome::Exported {
            size_bytes, sha256, ..
        } => {
            assert_eq!(*size_bytes, Some("Roads".len() as u64));
            assert_eq!(sha256.as_ref().map(String::len), Some(64));
        }
        other => panic!("expected export, got {other:?}"),
    }
}

#[tokio::test]
async fn test_shared_subpath_used_for_all_items() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_with(three_items()));
    let selection = Selection::new(three_items()).unwrap();
    let orchestrator = orchestrator(store, &temp);

    let report = orchestrator
        .run_backup(&session(), &selection, Some("nightly/run1"))
        .await
        .unwrap();

    let shared = orchestrator.sandbox().base().path().join("nightly/run1");
    assert!(report
        .results
        .iter()
        .all(|r| r.destination.as_deref() == Some(shared.as_path())));
}

#[tokio::test]
async fn test_traversal_subpath_aborts_before_any_export() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_with(three_items()));
    let selection = Selection::new(three_items()).unwrap();

    let err = orchestrator(store.clone(), &temp)
        .run_backup(&session(), &selection, Some("../../etc"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackupError::PathTraversal { .. }));
    assert!(store.exported().is_empty());
}

#[tokio::test]
async fn test_shutdown_between_items() {
    let temp = TempDir::new().unwrap();
    let (tx, rx) = watch::channel(false);
    let store = Arc::new(FakeStore {
        shutdown_after_export: Some(tx),
        ..store_with(three_items())
    });
    let selection = Selection::new(three_items()).unwrap();

    let report = orchestrator(store.clone(), &temp)
        .with_shutdown_signal(rx)
        .run_backup(&session(), &selection, None)
        .await
        .unwrap();

    assert!(report.interrupted);
    assert!(report.results[0].succeeded());
    assert_eq!(report.not_attempted_count(), 2);
    assert_eq!(store.exported(), vec!["l1"]);
    assert!(!report.is_successful());
}

#[tokio::test]
async fn test_interrupts_only_deferred_while_exporting() {
    let temp = TempDir::new().unwrap();
    let (_tx, shutdown) = ShutdownHandle::channel();
    let store = Arc::new(FakeStore {
        observed_shutdown: Some(shutdown.clone()),
        ..store_with(three_items()).fail("m1", BackupError::Export)
    });
    let selection = Selection::new(three_items()).unwrap();

    assert_eq!(shutdown.interrupt_action(), InterruptAction::ExitNow);

    let report = orchestrator(store.clone(), &temp)
        .with_shutdown(shutdown.clone())
        .run_backup(&session(), &selection, None)
        .await
        .unwrap();

    assert_eq!(report.results.len(), 3);
    assert_eq!(
        *store.actions_during_export.lock().unwrap(),
        vec![InterruptAction::FinishCurrentItem; 3]
    );
    assert_eq!(shutdown.interrupt_action(), InterruptAction::ExitNow);
}

#[tokio::test]
async fn test_rejected_subpath_leaves_interrupts_immediate() {
    let temp = TempDir::new().unwrap();
    let (_tx, shutdown) = ShutdownHandle::channel();
    let store = Arc::new(store_with(three_items()));
    let selection = Selection::new(three_items()).unwrap();

    let result = orchestrator(store, &temp)
        .with_shutdown(shutdown.clone())
        .run_backup(&session(), &selection, Some("../outside"))
        .await;

    assert!(result.is_err());
    assert_eq!(shutdown.interrupt_action(), InterruptAction::ExitNow);
}

#[tokio::test]
async fn test_authentication_failure_stops_run() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_with(three_items()).fail("l1", BackupError::Authentication));
    let selection = Selection::new(three_items()).unwrap();

    let report = orchestrator(store.clone(), &temp)
        .run_backup(&session(), &selection, None)
        .await
        .unwrap();

    assert!(report.results[0].failed());
    assert_eq!(report.not_attempted_count(), 2);
    assert!(!report.interrupted);
    assert_eq!(store.exported(), vec!["l1"]);
}

struct ScriptedFrontEnd {
    picks: Vec<usize>,
    subpath: Option<String>,
    presented: Option<BackupReport>,
}

#[async_trait]
impl SelectionFrontEnd for ScriptedFrontEnd {
    async fn select_folders_and_items(
        &mut self,
        directory: &ContentDirectory,
        session: &Session,
    ) -> Result<Selection> {
        let folders = directory.list_folders(session).await?;
        let items = directory.list_items(session, &folders[0]).await?;
        let picked: Vec<Item> = self.picks.iter().map(|&i| items[i - 1].clone()).collect();
        Selection::new(picked)
    }

    fn choose_subpath(
        &mut self,
        sandbox: &PathSandbox,
        _selection: &Selection,
        _run_date: NaiveDate,
    ) -> Result<Option<String>> {
        if let Some(subpath) = &self.subpath {
            sandbox.resolve(subpath)?;
        }
        Ok(self.subpath.clone())
    }

    fn present_report(&mut self, report: &BackupReport) -> Result<()> {
        self.presented = Some(report.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_submit_selection_runs_the_whole_flow() {
    let temp = TempDir::new().unwrap();
    let mut items = three_items();
    items.push(item("x1", "Dashboard", ItemKind::Other("Dashboard".to_string())));
    let store = Arc::new(store_with(items));
    let directory = ContentDirectory::new(store.clone());
    let orchestrator = orchestrator(store.clone(), &temp);

    let mut front_end = ScriptedFrontEnd {
        picks: vec![3, 1],
        subpath: None,
        presented: None,
    };

    let report = submit_selection(&mut front_end, &directory, &orchestrator, &session())
        .await
        .unwrap();

    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(store.exported(), vec!["l2", "l1"]);
    let presented = front_end.presented.unwrap();
    assert_eq!(presented.results.len(), 2);
}

#[tokio::test]
async fn test_submit_selection_rejected_subpath_exports_nothing() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(store_with(three_items()));
    let directory = ContentDirectory::new(store.clone());
    let orchestrator = orchestrator(store.clone(), &temp);

    let mut front_end = ScriptedFrontEnd {
        picks: vec![1],
        subpath: Some("../escape".to_string()),
        presented: None,
    };

    let err = submit_selection(&mut front_end, &directory, &orchestrator, &session())
        .await
        .unwrap_err();

    assert!(matches!(err, BackupError::PathTraversal { .. }));
    assert!(store.exported().is_empty());
    assert!(front_end.presented.is_none());
}
