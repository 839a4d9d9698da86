// Test doubles for the session's collaborators
//
// Useful for driving a `BrowsingSession` without a terminal, network or
// desktop. Compiled for unit tests and with the `testing` feature.

use crate::api::{Catalog, Collection, PhotoItem};
use crate::date::DateFilter;
use crate::error::{CatalogError, DisplayError};
use crate::menu::{InteractiveMenu, Menu, MenuAction};
use crate::viewer::ImageViewer;
use anyhow::{bail, Result};
use reqwest::StatusCode;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// One scripted user answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Pick the menu option with this label
    Choose(String),
    /// Type this line at a text prompt
    Type(String),
}

/// Menu that answers from a script and records what it was shown
///
/// Picking a label the current menu does not offer is an error, as is
/// running out of script.
#[derive(Debug, Default)]
pub struct ScriptedMenu {
    script: VecDeque<ScriptStep>,
    menus: Vec<Menu>,
    prompts: Vec<String>,
    notices: Vec<String>,
    reports: Vec<String>,
    closes: usize,
}

impl ScriptedMenu {
    #[must_use]
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Queue a menu choice
    #[must_use]
    pub fn choose(mut self, label: impl Into<String>) -> Self {
        self.script.push_back(ScriptStep::Choose(label.into()));
        self
    }

    /// Queue a line of text input
    #[must_use]
    pub fn type_line(mut self, text: impl Into<String>) -> Self {
        self.script.push_back(ScriptStep::Type(text.into()));
        self
    }

    /// Every menu opened so far, in order
    #[must_use]
    pub fn menus(&self) -> &[Menu] {
        &self.menus
    }

    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    #[must_use]
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    #[must_use]
    pub fn reports(&self) -> &[String] {
        &self.reports
    }

    #[must_use]
    pub const fn closes(&self) -> usize {
        self.closes
    }

    /// Steps not consumed yet
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InteractiveMenu for ScriptedMenu {
    fn open(&mut self, menu: &Menu) -> Result<MenuAction> {
        self.menus.push(menu.clone());
        match self.script.pop_front() {
            Some(ScriptStep::Choose(label)) => match menu.action_for(&label) {
                Some(action) => Ok(action.clone()),
                None => bail!("'{label}' is not offered by {:?}", menu.labels()),
            },
            Some(ScriptStep::Type(text)) => bail!("expected a choice, script types '{text}'"),
            None => bail!("script exhausted at menu '{}'", menu.title),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closes += 1;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        match self.script.pop_front() {
            Some(ScriptStep::Type(text)) => Ok(text),
            Some(ScriptStep::Choose(label)) => bail!("expected text, script chooses '{label}'"),
            None => bail!("script exhausted at prompt '{prompt}'"),
        }
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn report(&mut self, message: &str) {
        self.reports.push(message.to_string());
    }
}

/// Catalog serving fixed data, optionally failing, and recording queries
#[derive(Debug, Default)]
pub struct StubCatalog {
    collections: Vec<Collection>,
    items: Vec<PhotoItem>,
    fail_collections: bool,
    fail_items: bool,
    collection_queries: RefCell<usize>,
    item_queries: RefCell<Vec<(String, String)>>,
}

impl StubCatalog {
    #[must_use]
    pub fn new(collections: Vec<Collection>) -> Self {
        Self {
            collections,
            ..Self::default()
        }
    }

    /// Photos returned for any rover and date
    #[must_use]
    pub fn with_items(mut self, items: Vec<PhotoItem>) -> Self {
        self.items = items;
        self
    }

    pub fn fail_collections(&mut self, fail: bool) {
        self.fail_collections = fail;
    }

    pub fn fail_items(&mut self, fail: bool) {
        self.fail_items = fail;
    }

    #[must_use]
    pub fn collection_queries(&self) -> usize {
        *self.collection_queries.borrow()
    }

    /// `(rover, date)` of every photo query, in order
    #[must_use]
    pub fn item_queries(&self) -> Vec<(String, String)> {
        self.item_queries.borrow().clone()
    }

    fn unavailable(endpoint: &str) -> CatalogError {
        CatalogError::Status {
            endpoint: endpoint.to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "stub failure".into(),
        }
    }
}

impl Catalog for StubCatalog {
    fn list_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        *self.collection_queries.borrow_mut() += 1;
        if self.fail_collections {
            return Err(Self::unavailable("stub://rovers"));
        }
        Ok(self.collections.clone())
    }

    fn list_items(
        &self,
        collection: &str,
        date: &DateFilter,
    ) -> Result<Vec<PhotoItem>, CatalogError> {
        self.item_queries
            .borrow_mut()
            .push((collection.to_string(), date.as_str().to_string()));
        if self.fail_items {
            return Err(Self::unavailable("stub://photos"));
        }
        Ok(self.items.clone())
    }
}

/// Viewer that only remembers which URLs it was asked to show
#[derive(Debug, Default)]
pub struct RecordingViewer {
    shown: RefCell<Vec<String>>,
    fail: bool,
    finished: Cell<bool>,
}

impl RecordingViewer {
    /// Make every following `show` fail
    pub fn fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    #[must_use]
    pub fn shown(&self) -> Vec<String> {
        self.shown.borrow().clone()
    }

    /// Whether the session told the viewer it is done
    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished.get()
    }
}

impl ImageViewer for RecordingViewer {
    fn show(&self, url: &str) -> Result<(), DisplayError> {
        self.shown.borrow_mut().push(url.to_string());
        if self.fail {
            return Err(DisplayError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            });
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), DisplayError> {
        self.finished.set(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_menu_picks_offered_option() {
        let menu = Menu::new("t", "m").with_option("Exit", MenuAction::Exit);
        let mut scripted = ScriptedMenu::default().choose("Exit");
        assert_eq!(scripted.open(&menu).unwrap(), MenuAction::Exit);
        assert_eq!(scripted.menus().len(), 1);
        assert_eq!(scripted.remaining(), 0);
    }

    #[test]
    fn test_scripted_menu_rejects_missing_option() {
        let menu = Menu::new("t", "m").with_option("Exit", MenuAction::Exit);
        let mut scripted = ScriptedMenu::default().choose("Next Page");
        assert!(scripted.open(&menu).is_err());
    }

    #[test]
    fn test_scripted_menu_kind_mismatch() {
        let menu = Menu::new("t", "m").with_option("Exit", MenuAction::Exit);
        let mut scripted = ScriptedMenu::default().type_line("2023-01-10").choose("Exit");
        assert!(scripted.open(&menu).is_err());
        assert!(scripted.read_line("date").is_err());
    }

    #[test]
    fn test_scripted_menu_exhausted() {
        let mut scripted = ScriptedMenu::default();
        assert!(scripted.read_line("date").is_err());
        assert_eq!(scripted.prompts(), &["date".to_string()]);
    }

    #[test]
    fn test_stub_catalog_records_queries() {
        let mut catalog = StubCatalog::new(vec![Collection::named("Spirit")])
            .with_items(vec![PhotoItem::new("http://img.test/1.jpg")]);
        let date = DateFilter::parse("2004-01-05").unwrap();
        assert_eq!(catalog.list_items("Spirit", &date).unwrap().len(), 1);

        catalog.fail_items(true);
        let err = catalog.list_items("Spirit", &date).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(catalog.item_queries().len(), 2);
    }

    #[test]
    fn test_recording_viewer() {
        let mut viewer = RecordingViewer::default();
        viewer.show("a").unwrap();
        viewer.fail(true);
        assert!(viewer.show("b").is_err());
        assert_eq!(viewer.shown(), vec!["a".to_string(), "b".to_string()]);
    }
}
