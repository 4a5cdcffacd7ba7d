use std::str::FromStr;

use chrono::NaiveDate;
use ratatui::widgets::ListState;
use rust_decimal::Decimal;

use crate::store::ExpenseStore;
use crate::summary::{SummaryDispatcher, SummaryOutcome, SummaryState};

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Filtering,
    Adding,
}

/// Which field of the add-expense form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Description,
    Amount,
    Date,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Description => Self::Amount,
            Self::Amount => Self::Date,
            Self::Date => Self::Description,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Description => Self::Date,
            Self::Amount => Self::Description,
            Self::Date => Self::Amount,
        }
    }
}

/// Raw text of the add-expense form. Validation happens on submit; an
/// invalid form stays open with its error message set.
#[derive(Debug, Default)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub focus: FormField,
    pub error: Option<String>,
}

impl ExpenseForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Description => &mut self.description,
            FormField::Amount => &mut self.amount,
            FormField::Date => &mut self.date,
        }
    }

    pub fn clear(&mut self) {
        self.description.clear();
        self.amount.clear();
        self.date.clear();
        self.focus = FormField::Description;
        self.error = None;
    }

    /// Nothing may be empty, the amount must be a non-negative number, the
    /// date a calendar date.
    pub fn validate(&self) -> Result<(String, Decimal, NaiveDate), String> {
        let description = self.description.trim();
        let amount = self.amount.trim();
        let date = self.date.trim();

        if description.is_empty() || amount.is_empty() || date.is_empty() {
            return Err("All fields are required".to_string());
        }

        let amount = Decimal::from_str(amount).map_err(|_| "Amount must be a number".to_string())?;
        if amount < Decimal::ZERO {
            return Err("Amount cannot be negative".to_string());
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| "Date must be YYYY-MM-DD".to_string())?;

        Ok((description.to_string(), amount, date))
    }
}

pub struct App {
    pub store: ExpenseStore,
    /// Indices into the store for the current filter, in insertion order.
    pub filtered: Vec<usize>,
    pub filter: String,
    pub list_state: ListState,
    pub input_mode: InputMode,
    pub form: ExpenseForm,
    pub summary: SummaryState,
    dispatcher: SummaryDispatcher,
}

impl App {
    pub fn new(dispatcher: SummaryDispatcher) -> Self {
        App {
            store: ExpenseStore::new(),
            filtered: Vec::new(),
            filter: String::new(),
            list_state: ListState::default(),
            input_mode: InputMode::Normal,
            form: ExpenseForm::default(),
            summary: SummaryState::default(),
            dispatcher,
        }
    }

    /// Re-derives the visible indices from the store and the filter, keeping
    /// the selection in range.
    fn refresh_view(&mut self) {
        self.filtered = self.store.filtered(&self.filter);
        match self.list_state.selected() {
            Some(i) if i >= self.filtered.len() => {
                self.list_state.select(self.filtered.len().checked_sub(1));
            }
            None if !self.filtered.is_empty() => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.filtered.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.filtered.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn open_form(&mut self) {
        self.form.clear();
        self.input_mode = InputMode::Adding;
    }

    pub fn cancel_form(&mut self) {
        self.form.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Validates and commits the add form. On success the fields are cleared
    /// and a fresh summary is requested; on failure the form stays open.
    pub fn submit_form(&mut self) {
        match self.form.validate() {
            Ok((description, amount, date)) => {
                self.store.add(description, amount, date);
                self.form.clear();
                self.input_mode = InputMode::Normal;
                self.refresh_view();
                self.request_summary();
            }
            Err(message) => self.form.error = Some(message),
        }
    }

    /// Deletes the selected expense, if any, and requests a fresh summary.
    pub fn delete_selected(&mut self) {
        let Some(i) = self.list_state.selected() else {
            return;
        };
        let Some(&idx) = self.filtered.get(i) else {
            return;
        };
        let id = self.store.expenses()[idx].id;
        self.store.remove(id);
        self.refresh_view();
        self.request_summary();
    }

    pub fn start_filtering(&mut self) {
        self.input_mode = InputMode::Filtering;
        self.refresh_view();
    }

    /// Keeps the current filter and leaves the prompt.
    pub fn confirm_filter(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Drops the filter entirely.
    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.input_mode = InputMode::Normal;
        self.refresh_view();
    }

    pub fn handle_input(&mut self, c: char) {
        match self.input_mode {
            InputMode::Filtering => {
                self.filter.push(c);
                self.refresh_view();
            }
            InputMode::Adding => {
                self.form.focused_mut().push(c);
                self.form.error = None;
            }
            InputMode::Normal => {}
        }
    }

    pub fn handle_backspace(&mut self) {
        match self.input_mode {
            InputMode::Filtering => {
                self.filter.pop();
                self.refresh_view();
            }
            InputMode::Adding => {
                self.form.focused_mut().pop();
                self.form.error = None;
            }
            InputMode::Normal => {}
        }
    }

    pub fn summaries_available(&self) -> bool {
        self.dispatcher.is_configured()
    }

    pub fn settle_summary(&mut self, outcome: SummaryOutcome) {
        self.summary.settle(outcome);
    }

    fn request_summary(&mut self) {
        let generation = self.summary.begin();
        self.dispatcher.dispatch(generation, self.store.narrative());
    }
}
