// Menu model shared by the session and the terminal front ends
//
// A `Menu` is plain data: a title, a message and an ordered list of
// labelled `MenuAction`s. Rendering it and reading the user's choice is
// the job of an `InteractiveMenu` implementation.

use anyhow::Result;

/// Everything a menu option can ask the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    SelectCollection(String),
    ViewItem(String),
    NextPage,
    PreviousPage,
    ReturnToMain,
    Refresh,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub action: MenuAction,
}

impl MenuOption {
    #[must_use]
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A titled list of options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub message: String,
    pub options: Vec<MenuOption>,
}

impl Menu {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: Vec::new(),
        }
    }

    /// Append an option
    #[must_use]
    pub fn with_option(mut self, label: impl Into<String>, action: MenuAction) -> Self {
        self.options.push(MenuOption::new(label, action));
        self
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.label.as_str()).collect()
    }

    /// Action bound to the option with `label`, if any
    #[must_use]
    pub fn action_for(&self, label: &str) -> Option<&MenuAction> {
        self.options
            .iter()
            .find(|o| o.label == label)
            .map(|o| &o.action)
    }
}

/// Interactive front end driven by the browsing session
///
/// Every call blocks until the user has answered.
pub trait InteractiveMenu {
    /// Show `menu` and return the action of the option the user picked
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn open(&mut self, menu: &Menu) -> Result<MenuAction>;

    /// End a prompt without waiting for input
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be written.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Ask for one line of free text
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Informational message
    fn notify(&mut self, message: &str);

    /// Recovered failure the user should know about
    fn report(&mut self, message: &str);
}
