use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::db::Database;
use crate::models::*;
use crate::report::{self, DerivedTotals, MonthlySummary, NetWorthEntry, SavingsSplit};
use crate::ui::theme::{Accent, Palette, ThemeMode};

const SETTING_MONTH: &str = "selected_month";
const SETTING_THEME: &str = "theme";
const SETTING_ACCENT: &str = "accent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Income,
    Categories,
    NetWorth,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Income,
            Self::Categories,
            Self::NetWorth,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Expenses"),
            Self::Income => write!(f, "Income"),
            Self::Categories => write!(f, "Categories"),
            Self::NetWorth => write!(f, "Net Worth"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
    DeleteIncome { id: i64, description: String },
    /// Cascades: the category's transactions go with it.
    DeleteCategory { id: i64, name: String },
}

/// The whole client state lives here and is passed by reference to views.
/// Month, theme, and accent changes persist through the settings table at
/// this boundary; nothing else writes settings.
pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) user_id: i64,
    pub(crate) user_label: String,
    pub(crate) selected_month: String,

    theme_mode: ThemeMode,
    accent: Accent,
    palette: Palette,

    // Current-month collections
    pub(crate) categories: Vec<Category>,
    pub(crate) known_categories: Vec<Category>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) incomes: Vec<Income>,
    pub(crate) category_names: HashMap<i64, String>,

    // Derived state, recomputed on every refresh
    pub(crate) summary: MonthlySummary,
    pub(crate) totals: DerivedTotals,
    pub(crate) savings: SavingsSplit,
    pub(crate) net_worth: Vec<NetWorthEntry>,

    // Cursors
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) income_index: usize,
    pub(crate) income_scroll: usize,
    pub(crate) category_index: usize,
    pub(crate) known_index: usize,
    pub(crate) category_view_known: bool,
    pub(crate) net_worth_index: usize,
    pub(crate) net_worth_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    /// Build the state container for a user, restoring the persisted month,
    /// theme, and accent. Collections start empty; call `refresh_all`.
    pub(crate) fn load(db: &Database, user: &User) -> Result<Self> {
        let user_id = user.id.context("user has no id")?;

        let selected_month = db
            .get_setting(user_id, SETTING_MONTH)?
            .and_then(|m| MonthKey::parse(&m))
            .unwrap_or_else(MonthKey::current)
            .to_string();
        let theme_mode = db
            .get_setting(user_id, SETTING_THEME)?
            .and_then(|t| ThemeMode::parse(&t))
            .unwrap_or(ThemeMode::Dark);
        let accent = db
            .get_setting(user_id, SETTING_ACCENT)?
            .and_then(|a| Accent::parse(&a))
            .unwrap_or(Accent::Blue);

        Ok(Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            user_id,
            user_label: user.to_string(),
            selected_month,

            theme_mode,
            accent,
            palette: Palette::new(theme_mode, accent),

            categories: Vec::new(),
            known_categories: Vec::new(),
            transactions: Vec::new(),
            incomes: Vec::new(),
            category_names: HashMap::new(),

            summary: MonthlySummary::default(),
            totals: DerivedTotals::default(),
            savings: SavingsSplit::default(),
            net_worth: Vec::new(),

            transaction_index: 0,
            transaction_scroll: 0,
            income_index: 0,
            income_scroll: 0,
            category_index: 0,
            known_index: 0,
            category_view_known: false,
            net_worth_index: 0,
            net_worth_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        })
    }

    pub(crate) fn palette(&self) -> &Palette {
        &self.palette
    }

    pub(crate) fn month_key(&self) -> MonthKey {
        MonthKey::parse(&self.selected_month).unwrap_or_else(MonthKey::current)
    }

    // ── Persisted mutations ───────────────────────────────────

    pub(crate) fn set_month(&mut self, db: &Database, month: MonthKey) -> Result<()> {
        self.selected_month = month.to_string();
        db.set_setting(self.user_id, SETTING_MONTH, &self.selected_month)?;
        self.refresh_all(db)
    }

    pub(crate) fn set_theme(&mut self, db: &Database, mode: ThemeMode) -> Result<()> {
        self.theme_mode = mode;
        self.palette = Palette::new(self.theme_mode, self.accent);
        db.set_setting(self.user_id, SETTING_THEME, mode.as_str())?;
        Ok(())
    }

    pub(crate) fn set_accent(&mut self, db: &Database, accent: Accent) -> Result<()> {
        self.accent = accent;
        self.palette = Palette::new(self.theme_mode, self.accent);
        db.set_setting(self.user_id, SETTING_ACCENT, accent.as_str())?;
        Ok(())
    }

    // ── Refresh ───────────────────────────────────────────────

    /// Load the selected month's categories, transactions, and incomes and
    /// recompute every derived figure. The three loads succeed or fail as a
    /// unit; there is no partial dashboard.
    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let categories = db.get_categories(self.user_id, &self.selected_month)?;
        let transactions = db.get_transactions(self.user_id, Some(&self.selected_month), None)?;
        let incomes = db.get_incomes(self.user_id, Some(&self.selected_month))?;
        let names = db.category_names(self.user_id)?;

        self.summary = report::summarize(&transactions, &incomes, &categories, &names);
        self.totals = DerivedTotals::compute(&categories, &transactions, &incomes);
        self.savings = SavingsSplit::from_net_income(self.totals.net_income());

        self.categories = categories;
        self.incomes = incomes;
        self.category_names = names;
        self.clamp_cursors();

        self.refresh_transactions(db)?;

        // The net-worth series is a separate, independently-failable load:
        // its failure must not take the dashboard down with it.
        if let Err(e) = self.refresh_net_worth(db) {
            self.set_status(format!("Net worth unavailable: {e}"));
        }
        Ok(())
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };
        self.transactions =
            db.get_transactions(self.user_id, Some(&self.selected_month), search)?;
        if self.transaction_index >= self.transactions.len() {
            self.transaction_index = self.transactions.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_incomes(&mut self, db: &Database) -> Result<()> {
        self.incomes = db.get_incomes(self.user_id, Some(&self.selected_month))?;
        if self.income_index >= self.incomes.len() {
            self.income_index = self.incomes.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_categories(&mut self, db: &Database) -> Result<()> {
        self.categories = db.get_categories(self.user_id, &self.selected_month)?;
        self.known_categories = db.get_known_categories(self.user_id)?;
        self.category_names = db.category_names(self.user_id)?;
        self.clamp_cursors();
        Ok(())
    }

    pub(crate) fn refresh_net_worth(&mut self, db: &Database) -> Result<()> {
        self.net_worth = report::net_worth_series(db, self.user_id)?;
        if self.net_worth_index >= self.net_worth.len() {
            self.net_worth_index = self.net_worth.len().saturating_sub(1);
        }
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_dashboard(db)?; // also refreshes transactions + net worth
        self.refresh_incomes(db)?;
        self.refresh_categories(db)?;
        Ok(())
    }

    fn clamp_cursors(&mut self) {
        if self.category_index >= self.categories.len() {
            self.category_index = self.categories.len().saturating_sub(1);
        }
        if self.known_index >= self.known_categories.len() {
            self.known_index = self.known_categories.len().saturating_sub(1);
        }
    }

    pub(crate) fn category_name(&self, id: i64) -> &str {
        self.category_names
            .get(&id)
            .map(String::as_str)
            .unwrap_or(report::UNCATEGORIZED)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
