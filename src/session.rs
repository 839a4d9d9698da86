// Browsing session state machine
//
// The session owns everything that changes while the user browses: the
// rover list, the selected rover and date, the photos of the last query
// and the current page. One loop in `BrowsingSession::run` asks the
// menu for input according to the current `SessionState` and feeds the
// answer back through a single `match`.
//
// ```text
// TopMenu      --select rover-->        AwaitingDate
// TopMenu      --Exit-->                Terminated
// AwaitingDate --"exit"-->              TopMenu
// AwaitingDate --bad date / error-->    AwaitingDate
// AwaitingDate --date, query ok-->      PagedResults (page 0)
// PagedResults --next / previous-->     PagedResults
// PagedResults --photo-->               ViewingImage --> PagedResults
// PagedResults --Return to Main Menu--> TopMenu
// ```

use crate::api::{Catalog, Collection, PhotoItem};
use crate::date::DateFilter;
use crate::error::{CatalogError, InputError};
use crate::menu::{InteractiveMenu, Menu, MenuAction};
use crate::page::PageWindow;
use crate::viewer::ImageViewer;
use anyhow::Result;
use log::{debug, info, warn};

/// Typed at the date prompt to go back to the main menu (any case).
pub const EXIT_KEYWORD: &str = "exit";

pub const MAIN_TITLE: &str = "Main Menu";
pub const MAIN_MESSAGE: &str = "Choose one of the available rovers (try Curiosity):";
pub const PHOTOS_MESSAGE: &str = "Choose a photo or 'Return to Main Menu':";
pub const PREVIOUS_LABEL: &str = "Previous Page";
pub const NEXT_LABEL: &str = "Next Page";
pub const RETURN_LABEL: &str = "Return to Main Menu";
pub const RELOAD_LABEL: &str = "Reload Rovers";
pub const EXIT_LABEL: &str = "Exit";
pub const FAREWELL: &str = "Exiting the program.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    TopMenu,
    AwaitingDate,
    PagedResults,
    /// Transient: the next step shows this image and returns to the page.
    ViewingImage(String),
    Terminated,
}

/// What happened to a line typed at the date prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSubmission {
    /// Exit keyword; back at the main menu.
    Cancelled,
    /// Not a date; still waiting for one.
    Invalid(InputError),
    /// Query succeeded; now showing page 0 of `count` photos.
    Loaded { count: usize },
}

pub struct BrowsingSession<C, V> {
    catalog: C,
    viewer: V,
    state: SessionState,
    collections: Vec<Collection>,
    selected_collection: Option<String>,
    selected_date: Option<DateFilter>,
    items: Vec<PhotoItem>,
    page: PageWindow,
}

impl<C: Catalog, V: ImageViewer> BrowsingSession<C, V> {
    /// Empty session sitting at the main menu. Call [`Self::load_collections`]
    /// (or [`Self::run`], which does) to fill the rover list.
    pub fn new(catalog: C, viewer: V) -> Self {
        Self {
            catalog,
            viewer,
            state: SessionState::TopMenu,
            collections: Vec::new(),
            selected_collection: None,
            selected_date: None,
            items: Vec::new(),
            page: PageWindow::default(),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn selected_collection(&self) -> Option<&str> {
        self.selected_collection.as_deref()
    }

    pub fn selected_date(&self) -> Option<&DateFilter> {
        self.selected_date.as_ref()
    }

    pub fn items(&self) -> &[PhotoItem] {
        &self.items
    }

    pub fn page_index(&self) -> usize {
        self.page.page_index
    }

    /// Photos visible on the current page.
    pub fn current_page(&self) -> &[PhotoItem] {
        self.page.slice(&self.items)
    }

    /// Fetch the rover list. On failure the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns the catalog error so the caller can report it.
    pub fn load_collections(&mut self) -> Result<(), CatalogError> {
        let collections = self.catalog.list_collections()?;
        debug!("loaded {} collections", collections.len());
        self.collections = collections;
        Ok(())
    }

    /// Main menu: one option per rover, then Exit. While the rover list is
    /// empty a reload option is offered instead.
    pub fn top_menu(&self) -> Menu {
        let mut menu = Menu::new(MAIN_TITLE, MAIN_MESSAGE);
        for collection in &self.collections {
            menu = menu.with_option(
                collection.name.as_str(),
                MenuAction::SelectCollection(collection.name.clone()),
            );
        }
        if self.collections.is_empty() {
            menu = menu.with_option(RELOAD_LABEL, MenuAction::Refresh);
        }
        menu.with_option(EXIT_LABEL, MenuAction::Exit)
    }

    /// Record `name` as the selected rover and wait for a date. Any earlier
    /// date and photos are dropped.
    pub fn select_collection(&mut self, name: &str) {
        debug!("selected collection {name}");
        self.selected_collection = Some(name.to_string());
        self.selected_date = None;
        self.items.clear();
        self.page = PageWindow::default();
        self.state = SessionState::AwaitingDate;
    }

    /// Prompt shown while waiting for a date.
    pub fn date_prompt(&self) -> String {
        let hint = self
            .selected_collection
            .as_deref()
            .and_then(|name| self.collections.iter().find(|c| c.name == name))
            .and_then(Collection::date_hint);
        match hint {
            Some(hint) => format!(
                "Please enter a date (YYYY-MM-DD, {hint}) or 'Exit' to go back to the Main Menu"
            ),
            None => "Please enter a date (YYYY-MM-DD) or 'Exit' to go back to the Main Menu"
                .to_string(),
        }
    }

    /// Handle one line typed at the date prompt.
    ///
    /// The exit keyword returns to the main menu without a query. A valid
    /// date triggers the photo query; only when it succeeds are the date,
    /// the photos and page 0 committed.
    ///
    /// # Errors
    ///
    /// Returns the catalog error of a failed query. The session then stays
    /// in `AwaitingDate` with nothing changed.
    pub fn submit_date(&mut self, text: &str) -> Result<DateSubmission, CatalogError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case(EXIT_KEYWORD) {
            debug!("date entry abandoned");
            self.return_to_main();
            return Ok(DateSubmission::Cancelled);
        }

        let date = match DateFilter::parse(text) {
            Ok(date) => date,
            Err(e) => return Ok(DateSubmission::Invalid(e)),
        };

        let Some(collection) = self.selected_collection.clone() else {
            // A date without a rover has nothing to filter
            self.state = SessionState::TopMenu;
            return Ok(DateSubmission::Cancelled);
        };

        let items = self.catalog.list_items(&collection, &date)?;
        let count = items.len();
        info!("{collection} on {date}: {count} photos");
        self.selected_date = Some(date);
        self.items = items;
        self.page = PageWindow::default();
        self.state = SessionState::PagedResults;
        Ok(DateSubmission::Loaded { count })
    }

    /// Menu for the current page: the photos, "Previous Page" unless on the
    /// first page, "Next Page" when the page is full, and the way back.
    pub fn render_page(&self) -> Menu {
        let title = format!(
            "{} Photos Menu",
            self.selected_collection.as_deref().unwrap_or_default()
        );
        let position = match self.page.item_range(self.items.len()) {
            Some((first, last)) => format!(
                "Page {} (items {first}-{last} of {})",
                self.page.page_index + 1,
                self.items.len()
            ),
            None => format!("Page {} (no items)", self.page.page_index + 1),
        };

        let mut menu = Menu::new(title, format!("{position}\n{PHOTOS_MESSAGE}"));
        for item in self.current_page() {
            menu = menu.with_option(item.url.as_str(), MenuAction::ViewItem(item.url.clone()));
        }
        if self.page.has_previous() {
            menu = menu.with_option(PREVIOUS_LABEL, MenuAction::PreviousPage);
        }
        if self.page.offers_next(&self.items) {
            menu = menu.with_option(NEXT_LABEL, MenuAction::NextPage);
        }
        menu.with_option(RETURN_LABEL, MenuAction::ReturnToMain)
    }

    /// Advance one page if `page_index < total / page_size`. Returns whether
    /// the page changed.
    pub fn next_page(&mut self) -> bool {
        if self.state != SessionState::PagedResults || !self.page.can_advance(self.items.len()) {
            debug!("next page refused at page {}", self.page.page_index);
            return false;
        }
        self.page.page_index += 1;
        true
    }

    /// Go back one page unless on the first. Returns whether the page changed.
    pub fn previous_page(&mut self) -> bool {
        if self.state != SessionState::PagedResults || !self.page.has_previous() {
            debug!("previous page refused at page {}", self.page.page_index);
            return false;
        }
        self.page.page_index -= 1;
        true
    }

    /// Back to the main menu. The fetched photos stay around until the next
    /// rover is selected.
    pub fn return_to_main(&mut self) {
        self.state = SessionState::TopMenu;
    }

    /// Show `url` through the viewer. Page and selection are untouched
    /// whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the viewer's `DisplayError`.
    pub fn view_item(&mut self, url: &str) -> Result<(), crate::error::DisplayError> {
        let result = self.viewer.show(url);
        if self.state == SessionState::ViewingImage(url.to_string()) {
            self.state = SessionState::PagedResults;
        }
        result
    }

    /// Apply a menu choice.
    pub fn apply<M: InteractiveMenu>(&mut self, action: MenuAction, menu: &mut M) {
        match action {
            MenuAction::SelectCollection(name) => self.select_collection(&name),
            MenuAction::ViewItem(url) => self.state = SessionState::ViewingImage(url),
            MenuAction::NextPage => {
                self.next_page();
            }
            MenuAction::PreviousPage => {
                self.previous_page();
            }
            MenuAction::ReturnToMain => self.return_to_main(),
            MenuAction::Refresh => self.refresh(menu),
            MenuAction::Exit => self.state = SessionState::Terminated,
        }
    }

    fn refresh<M: InteractiveMenu>(&mut self, menu: &mut M) {
        if let Err(e) = self.load_collections() {
            warn!("listing rovers failed: {e}");
            menu.report(&format!("Could not load rovers: {e}"));
        }
    }

    /// One step of the loop: read input for the current state and act on it.
    ///
    /// # Errors
    ///
    /// Only terminal I/O errors are returned; catalog, input and display
    /// failures are reported through `menu` and the session carries on.
    pub fn step<M: InteractiveMenu>(&mut self, menu: &mut M) -> Result<()> {
        match self.state.clone() {
            SessionState::TopMenu => {
                let action = menu.open(&self.top_menu())?;
                self.apply(action, menu);
            }
            SessionState::AwaitingDate => {
                let text = menu.read_line(&self.date_prompt())?;
                match self.submit_date(&text) {
                    Ok(DateSubmission::Cancelled) => menu.close()?,
                    Ok(DateSubmission::Invalid(e)) => menu.report(&e.to_string()),
                    Ok(DateSubmission::Loaded { count: 0 }) => {
                        let date = self.selected_date.as_ref().map(DateFilter::as_str);
                        menu.notify(&format!(
                            "No photos found for {} on {}.",
                            self.selected_collection.as_deref().unwrap_or_default(),
                            date.unwrap_or_default()
                        ));
                    }
                    Ok(DateSubmission::Loaded { .. }) => {}
                    Err(e) => {
                        warn!("photo query failed: {e}");
                        menu.report(&format!("Could not load photos: {e}"));
                    }
                }
            }
            SessionState::PagedResults => {
                let action = menu.open(&self.render_page())?;
                self.apply(action, menu);
            }
            SessionState::ViewingImage(url) => {
                if let Err(e) = self.view_item(&url) {
                    warn!("viewing {url} failed: {e}");
                    menu.report(&format!("Could not display photo: {e}"));
                }
            }
            SessionState::Terminated => {}
        }
        Ok(())
    }

    /// Load the rovers and drive the session until the user exits.
    ///
    /// # Errors
    ///
    /// Returns terminal I/O errors from `menu`.
    pub fn run<M: InteractiveMenu>(&mut self, menu: &mut M) -> Result<()> {
        self.refresh(menu);
        while self.state != SessionState::Terminated {
            self.step(menu)?;
        }
        if let Err(e) = self.viewer.finish() {
            warn!("viewer cleanup failed: {e}");
        }
        menu.notify(FAREWELL);
        Ok(())
    }
}
