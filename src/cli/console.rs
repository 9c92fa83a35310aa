//! Interactive console front end
//!
//! Numbered folder list, one folder by number, numbered item list, several
//! items by number, then an optional subpath and a confirmation. Bad input
//! re-prompts instead of ending the run.

use crate::adapters::Session;
use crate::cli::output::print_report;
use crate::core::backup::BackupReport;
use crate::core::directory::ContentDirectory;
use crate::core::frontend::SelectionFrontEnd;
use crate::core::sandbox::PathSandbox;
use crate::core::selection::{parse_indices, parse_single_index};
use crate::domain::{BackupError, Folder, Item, Result, Selection};
use async_trait::async_trait;
use chrono::NaiveDate;
use dialoguer::{Confirm, Input};

/// Preview lines shown before the subpath prompt
const PREVIEW_LIMIT: usize = 3;

/// Map a dialoguer failure into the domain error
pub fn prompt_error(error: dialoguer::Error) -> BackupError {
    BackupError::Prompt(error.to_string())
}

/// Console front end driven by dialoguer prompts
#[derive(Debug, Default)]
pub struct ConsoleFrontEnd {
    subpath: Option<String>,
    assume_yes: bool,
}

impl ConsoleFrontEnd {
    /// Create a console front end
    ///
    /// A preset `subpath` skips the subpath prompt; `assume_yes` skips the
    /// confirmation.
    pub fn new(subpath: Option<String>, assume_yes: bool) -> Self {
        Self {
            subpath,
            assume_yes,
        }
    }

    fn pick_folder<'a>(&self, folders: &'a [Folder]) -> Result<&'a Folder> {
        println!();
        println!("📁 Folders:");
        for (i, folder) in folders.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, folder.display_name());
        }
        println!();

        loop {
            let input: String = Input::new()
                .with_prompt("Folder number")
                .interact_text()
                .map_err(prompt_error)?;

            match parse_single_index(&input, folders.len()) {
                Ok(index) => return Ok(&folders[index - 1]),
                Err(e) if e.is_recoverable() => println!("❌ {e}"),
                Err(e) => return Err(e),
            }
        }
    }

    fn pick_items(&self, items: &[Item]) -> Result<Selection> {
        println!();
        println!("🗂️  Items:");
        for (i, item) in items.iter().enumerate() {
            println!("  {:>3}. {} [{}]", i + 1, item.display_name(), item.kind.tag());
        }
        println!();

        loop {
            let input: String = Input::new()
                .with_prompt("Item numbers (e.g. 1,3,5)")
                .interact_text()
                .map_err(prompt_error)?;

            let picked = parse_indices(&input, items.len())
                .and_then(|indices| Selection::from_indices(items, &indices));

            match picked {
                Ok(selection) => return Ok(selection),
                Err(e) if e.is_recoverable() => println!("❌ {e}"),
                Err(e) => return Err(e),
            }
        }
    }

    fn confirm(&self, sandbox: &PathSandbox, selection: &Selection, subpath: Option<&str>) -> Result<()> {
        if self.assume_yes {
            return Ok(());
        }

        println!();
        println!("Backup Configuration:");
        println!("  Items: {}", selection.len());
        println!("  Base directory: {}", sandbox.base());
        match subpath {
            Some(subpath) => println!("  Subpath: {subpath}"),
            None => println!("  Subpath: per-item default"),
        }
        println!();

        let proceed = Confirm::new()
            .with_prompt("Proceed with backup?")
            .default(true)
            .interact()
            .map_err(prompt_error)?;

        if proceed {
            Ok(())
        } else {
            Err(BackupError::Cancelled("Backup cancelled.".to_string()))
        }
    }
}

#[async_trait]
impl SelectionFrontEnd for ConsoleFrontEnd {
    async fn select_folders_and_items(
        &mut self,
        directory: &ContentDirectory,
        session: &Session,
    ) -> Result<Selection> {
        let folders = directory.list_folders(session).await?;
        if folders.is_empty() {
            return Err(BackupError::InvalidSelection(
                "No folders found for this account".to_string(),
            ));
        }

        loop {
            let folder = self.pick_folder(&folders)?;
            let items = directory.list_items(session, folder).await?;

            if items.is_empty() {
                println!(
                    "⚠️  No feature layers or web maps in '{}', pick another folder",
                    folder.display_name()
                );
                continue;
            }

            return self.pick_items(&items);
        }
    }

    fn choose_subpath(
        &mut self,
        sandbox: &PathSandbox,
        selection: &Selection,
        run_date: NaiveDate,
    ) -> Result<Option<String>> {
        if let Some(preset) = self.subpath.as_deref().map(str::trim) {
            let subpath = (!preset.is_empty()).then(|| preset.to_string());
            if let Some(subpath) = &subpath {
                sandbox.resolve(subpath)?;
            }
            self.confirm(sandbox, selection, subpath.as_deref())?;
            return Ok(subpath);
        }

        println!();
        println!("Default destinations under {}:", sandbox.base());
        for line in preview_lines(sandbox, selection, run_date) {
            println!("  {line}");
        }
        println!();

        let subpath = loop {
            let input: String = Input::new()
                .with_prompt("Subpath under the base directory (blank for default)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;

            let trimmed = input.trim();
            if trimmed.is_empty() {
                break None;
            }

            match sandbox.resolve(trimmed) {
                Ok(resolved) => {
                    println!("  → {}", resolved.display());
                    break Some(trimmed.to_string());
                }
                Err(e @ BackupError::PathTraversal { .. }) => println!("❌ {e}"),
                Err(e) => return Err(e),
            }
        };

        self.confirm(sandbox, selection, subpath.as_deref())?;
        Ok(subpath)
    }

    fn present_report(&mut self, report: &BackupReport) -> Result<()> {
        print_report(report);
        Ok(())
    }
}

/// Default subpaths of the first few selected items
pub fn preview_lines(sandbox: &PathSandbox, selection: &Selection, run_date: NaiveDate) -> Vec<String> {
    let mut lines: Vec<String> = selection
        .items()
        .iter()
        .take(PREVIEW_LIMIT)
        .map(|item| sandbox.default_subpath(item, run_date))
        .collect();

    if selection.len() > PREVIEW_LIMIT {
        lines.push(format!("... and {} more", selection.len() - PREVIEW_LIMIT));
    }

    lines
}
