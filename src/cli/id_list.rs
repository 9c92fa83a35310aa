//! Non-interactive identifier-list front end
//!
//! Item IDs pasted as comma- or newline-separated text are resolved against
//! the portal in one batch. Nothing is prompted: bad input ends the run with
//! an `InvalidSelection` or `PathTraversal` error.

use crate::adapters::Session;
use crate::cli::output::print_report;
use crate::core::backup::BackupReport;
use crate::core::directory::ContentDirectory;
use crate::core::frontend::SelectionFrontEnd;
use crate::core::sandbox::PathSandbox;
use crate::core::selection::parse_identifiers;
use crate::domain::{Result, Selection};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Front end over a fixed block of identifier text
#[derive(Debug, Clone)]
pub struct IdListFrontEnd {
    input: String,
    subpath: Option<String>,
}

impl IdListFrontEnd {
    /// Create a front end for `input`, exporting into `subpath` if given
    pub fn new(input: impl Into<String>, subpath: Option<String>) -> Self {
        Self {
            input: input.into(),
            subpath,
        }
    }
}

#[async_trait]
impl SelectionFrontEnd for IdListFrontEnd {
    async fn select_folders_and_items(
        &mut self,
        directory: &ContentDirectory,
        session: &Session,
    ) -> Result<Selection> {
        let ids = parse_identifiers(&self.input)?;
        tracing::info!(count = ids.len(), "Resolving item IDs");

        let items = directory.resolve_identifiers(session, &ids).await?;
        for item in &items {
            println!(
                "  • {} [{}] in {}",
                item.display_name(),
                item.kind.tag(),
                item.folder.title
            );
        }

        Selection::new(items)
    }

    fn choose_subpath(
        &mut self,
        sandbox: &PathSandbox,
        _selection: &Selection,
        _run_date: NaiveDate,
    ) -> Result<Option<String>> {
        match self.subpath.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(subpath) => {
                sandbox.resolve(subpath)?;
                Ok(Some(subpath.to_string()))
            }
            None => Ok(None),
        }
    }

    fn present_report(&mut self, report: &BackupReport) -> Result<()> {
        print_report(report);
        Ok(())
    }
}
