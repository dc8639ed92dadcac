//! Keybinding registry: maps key events to actions, with config overrides.
//!
//! Bindings are looked up per dispatch context. Listing and reader contexts
//! fall back to global bindings; text-entry contexts (search, composer) do
//! not, so plain characters typed there never trigger commands.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Back,
    Select,
    Reload,
    SwitchView,
    NewPost,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    /// Toggle the n-th category chip (1-based).
    ToggleCategory(u8),
    NextCategory,
    PrevCategory,
    ClearFilters,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ExitReader,
    CycleTheme,
    ShowHelp,
    SubmitPost,
    CancelComposer,
    NextField,
    PrevField,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::Back => "Dismiss / clear filters",
            Self::Select => "Open selected post",
            Self::Reload => "Reload current view",
            Self::SwitchView => "Switch blog / community",
            Self::NewPost => "Write a community post",
            Self::EnterSearch => "Search posts",
            Self::ExitSearch => "Clear search",
            Self::CommitSearch => "Keep search and return",
            Self::ToggleCategory(_) => "Toggle category chip",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::ClearFilters => "Clear search and category",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ExitReader => "Back to listing",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::SubmitPost => "Submit post",
            Self::CancelComposer => "Discard draft",
            Self::NextField => "Next field",
            Self::PrevField => "Previous field",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context that determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Listing,
    Reader,
    Search,
    Composer,
}

impl Context {
    fn falls_back_to_global(self) -> bool {
        matches!(self, Context::Listing | Context::Reader)
    }

    /// Section heading on the help screen.
    pub fn label(self) -> &'static str {
        match self {
            Context::Global => "General",
            Context::Listing => "Listing",
            Context::Reader => "Reader",
            Context::Search => "Search",
            Context::Composer => "Composer",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Shift+Tab", "Up", "Down", "Backspace"
/// - Modifier combos: "Ctrl+d", "Ctrl+s"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then(|| KeySpec::ctrl(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "shift+tab" | "backtab" => {
            return Some(KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT))
        }
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(n) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = n.parse::<u8>() {
            return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
        }
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| KeySpec::plain(KeyCode::Char(c)))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts.
#[derive(Debug, Clone)]
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::*;
        let plain = |c: char| KeySpec::plain(KeyCode::Char(c));

        // === Global ===
        self.bind(Global, plain('q'), Action::Quit);
        self.bind(Global, KeySpec::ctrl('c'), Action::Quit);
        self.bind(Global, plain('T'), Action::CycleTheme);
        self.bind(Global, plain('?'), Action::ShowHelp);
        self.bind(Global, plain('r'), Action::Reload);

        // === Listing ===
        self.bind(Listing, plain('j'), Action::NavDown);
        self.bind(Listing, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Listing, plain('k'), Action::NavUp);
        self.bind(Listing, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Listing, KeySpec::plain(KeyCode::Enter), Action::Select);
        self.bind(Listing, KeySpec::plain(KeyCode::Esc), Action::Back);
        self.bind(Listing, KeySpec::plain(KeyCode::Tab), Action::SwitchView);
        self.bind(Listing, plain('v'), Action::SwitchView);
        self.bind(Listing, plain('n'), Action::NewPost);
        self.bind(Listing, plain('/'), Action::EnterSearch);
        self.bind(Listing, plain('0'), Action::ClearFilters);
        for n in 1..=9u8 {
            self.bind(Listing, plain(char::from(b'0' + n)), Action::ToggleCategory(n));
        }
        self.bind(Listing, plain(']'), Action::NextCategory);
        self.bind(Listing, plain('['), Action::PrevCategory);

        // === Reader ===
        self.bind(Reader, plain('b'), Action::ExitReader);
        self.bind(Reader, KeySpec::plain(KeyCode::Esc), Action::ExitReader);
        self.bind(Reader, plain('j'), Action::ScrollDown);
        self.bind(Reader, KeySpec::plain(KeyCode::Down), Action::ScrollDown);
        self.bind(Reader, plain('k'), Action::ScrollUp);
        self.bind(Reader, KeySpec::plain(KeyCode::Up), Action::ScrollUp);
        self.bind(Reader, KeySpec::ctrl('d'), Action::PageDown);
        self.bind(Reader, KeySpec::ctrl('u'), Action::PageUp);
        self.bind(Reader, plain(' '), Action::PageDown);

        // === Search ===
        self.bind(Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch);

        // === Composer ===
        self.bind(Composer, KeySpec::ctrl('s'), Action::SubmitPost);
        self.bind(Composer, KeySpec::plain(KeyCode::Esc), Action::CancelComposer);
        self.bind(Composer, KeySpec::plain(KeyCode::Tab), Action::NextField);
        self.bind(Composer, KeySpec::plain(KeyCode::Down), Action::NextField);
        self.bind(
            Composer,
            KeySpec::new(KeyCode::BackTab, KeyModifiers::SHIFT),
            Action::PrevField,
        );
        self.bind(Composer, KeySpec::plain(KeyCode::Up), Action::PrevField);
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys are action names (`"reload"`, `"new_post"`), values are key strings
    /// (`"F5"`, `"Ctrl+n"`). The new key replaces every default binding of that
    /// action, in the same contexts. Category chips stay on the digit keys.
    ///
    /// Returns a warning per unrecognized action name or unparseable key.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key in a context.
    ///
    /// Listing and reader contexts fall back to Global bindings.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Terminals report uppercase letters with SHIFT set
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context.falls_back_to_global() {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// Display name of the first key bound to `action` in `context`.
    ///
    /// Listing and reader contexts fall back to Global bindings, matching
    /// `action_for_key`.
    pub fn key_label(&self, action: Action, context: Context) -> Option<String> {
        let find = |ctx: Context| {
            self.bindings
                .iter()
                .find(|(c, _, a)| *c == ctx && *a == action)
                .map(|(_, key, _)| format_key(key))
        };
        find(context).or_else(|| {
            if context.falls_back_to_global() {
                find(Context::Global)
            } else {
                None
            }
        })
    }

    /// Bindings for the help screen as (context, key, action, description).
    ///
    /// The nine category chip bindings are folded into a single "1-9" row.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        let mut out = Vec::with_capacity(self.bindings.len());
        for (ctx, key, action) in &self.bindings {
            match action {
                Action::ToggleCategory(1) => {
                    out.push((*ctx, "1-9".to_string(), *action, action.describe()))
                }
                Action::ToggleCategory(_) => {}
                _ => out.push((*ctx, format_key(key), *action, action.describe())),
            }
        }
        out
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "back" => Some(Action::Back),
        "select" | "open" => Some(Action::Select),
        "reload" | "refresh" => Some(Action::Reload),
        "switch_view" | "switch" => Some(Action::SwitchView),
        "new_post" | "compose" => Some(Action::NewPost),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "exit_search" => Some(Action::ExitSearch),
        "commit_search" => Some(Action::CommitSearch),
        "clear_filters" => Some(Action::ClearFilters),
        "next_category" => Some(Action::NextCategory),
        "prev_category" => Some(Action::PrevCategory),
        "scroll_down" => Some(Action::ScrollDown),
        "scroll_up" => Some(Action::ScrollUp),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "exit_reader" => Some(Action::ExitReader),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        "submit_post" | "submit" => Some(Action::SubmitPost),
        "cancel_composer" | "cancel" => Some(Action::CancelComposer),
        "next_field" => Some(Action::NextField),
        "prev_field" => Some(Action::PrevField),
        _ => None,
    }
}
