// UI layer: renders the session's menus with `dialoguer`, shows an
// `indicatif` spinner while the catalog is queried, and wires everything
// together in `main_menu`.

use crate::api::{ApiClient, Catalog, Collection, PhotoItem};
use crate::date::DateFilter;
use crate::error::CatalogError;
use crate::menu::{InteractiveMenu, Menu, MenuAction};
use crate::session::BrowsingSession;
use crate::viewer::SystemViewer;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::console::Term;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start the interactive browser. Blocks until the user chooses "Exit".
pub fn main_menu(api: ApiClient, viewer: SystemViewer) -> Result<()> {
    let mut session = BrowsingSession::new(Spinner::new(api), viewer);
    let mut menu = TerminalMenu::new();
    session.run(&mut menu)
}

/// Keyboard-driven menus on stdout.
///
/// `Select::interact()` lets the user move with the arrow keys and pick
/// with Enter.
pub struct TerminalMenu {
    term: Term,
}

impl TerminalMenu {
    #[must_use]
    pub fn new() -> Self {
        TerminalMenu {
            term: Term::stdout(),
        }
    }
}

impl Default for TerminalMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveMenu for TerminalMenu {
    fn open(&mut self, menu: &Menu) -> Result<MenuAction> {
        if !menu.title.is_empty() {
            println!("\n{}", menu.title.as_str().bold());
        }
        let labels = menu.labels();
        let selection = Select::new()
            .with_prompt(&menu.message)
            .items(&labels)
            .default(0)
            .interact_on(&self.term)?;
        let option = menu
            .options
            .get(selection)
            .context("Selection outside of the menu")?;
        Ok(option.action.clone())
    }

    fn close(&mut self) -> Result<()> {
        self.term.flush()?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let text: String = Input::new()
            .with_prompt(prompt)
            .interact_text_on(&self.term)?;
        Ok(text)
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }

    fn report(&mut self, message: &str) {
        eprintln!("{}", message.red());
    }
}

/// Wraps a catalog and shows a spinner while each query runs.
pub struct Spinner<C> {
    inner: C,
}

impl<C: Catalog> Spinner<C> {
    pub fn new(inner: C) -> Self {
        Spinner { inner }
    }

    fn around<T>(&self, message: String, f: impl FnOnce(&C) -> T) -> T {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = f(&self.inner);
        spinner.finish_and_clear();
        result
    }
}

impl<C: Catalog> Catalog for Spinner<C> {
    fn list_collections(&self) -> Result<Vec<Collection>, CatalogError> {
        self.around("Loading rovers...".into(), |c| c.list_collections())
    }

    fn list_items(
        &self,
        collection: &str,
        date: &DateFilter,
    ) -> Result<Vec<PhotoItem>, CatalogError> {
        self.around(format!("Loading {collection} photos for {date}..."), |c| {
            c.list_items(collection, date)
        })
    }
}
