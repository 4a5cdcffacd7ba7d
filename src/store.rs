use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::expense::Expense;

/// In-memory expense list. Owns every record for the session; nothing is
/// persisted. Ids are monotonic and never reused.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    next_id: u64,
}

impl ExpenseStore {
    pub fn new() -> Self {
        ExpenseStore {
            expenses: Vec::new(),
            next_id: 1,
        }
    }

    /// Appends a new expense and returns its id. Callers validate the fields
    /// before getting here.
    pub fn add(&mut self, description: String, amount: Decimal, date: NaiveDate) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.expenses.push(Expense {
            id,
            description,
            amount,
            date,
        });
        id
    }

    /// Removes the expense with the given id. Unknown ids are a no-op.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        self.expenses.len() != before
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Indices of expenses whose description contains `query`
    /// (case-insensitive). An empty query matches everything.
    pub fn filtered(&self, query: &str) -> Vec<usize> {
        let query = query.to_lowercase();
        self.expenses
            .iter()
            .enumerate()
            .filter(|(_, e)| e.description.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }

    /// The text blob handed to the summarization endpoint, one clause per
    /// expense in insertion order.
    pub fn narrative(&self) -> String {
        self.expenses
            .iter()
            .map(|e| e.narrative_clause())
            .collect::<Vec<_>>()
            .join(". ")
    }

    pub fn total(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn add_assigns_unique_ids_and_keeps_fields() {
        let mut store = ExpenseStore::new();
        let id = store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));

        assert_eq!(store.len(), 1);
        let expense = &store.expenses()[0];
        assert_eq!(expense.id, id);
        assert_eq!(expense.description, "Coffee");
        assert_eq!(expense.amount, Decimal::from(50));
        assert_eq!(expense.date, date("2024-01-01"));

        let other = store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));
        assert_ne!(id, other);
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let mut store = ExpenseStore::new();
        store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));

        assert!(!store.remove(999));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_deletes_exactly_the_matching_entry() {
        let mut store = ExpenseStore::new();
        let coffee = store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));
        let taxi = store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));

        assert!(store.remove(coffee));
        assert_eq!(store.len(), 1);
        assert_eq!(store.expenses()[0].id, taxi);
        assert_eq!(store.expenses()[0].description, "Taxi");
    }

    #[test]
    fn ids_are_not_reused_after_remove() {
        let mut store = ExpenseStore::new();
        let first = store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));
        store.remove(first);
        let second = store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));
        assert_ne!(first, second);
    }

    #[test]
    fn filter_is_case_insensitive_substring_on_description() {
        let mut store = ExpenseStore::new();
        store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));
        store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));

        assert_eq!(store.filtered("cof"), vec![0]);
        assert_eq!(store.filtered("TAXI"), vec![1]);
        assert!(store.filtered("groceries").is_empty());
    }

    #[test]
    fn empty_filter_returns_the_full_list() {
        let mut store = ExpenseStore::new();
        store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));
        store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));

        assert_eq!(store.filtered(""), vec![0, 1]);
    }

    #[test]
    fn narrative_joins_clauses_in_insertion_order() {
        let mut store = ExpenseStore::new();
        store.add("Coffee".into(), Decimal::new(5050, 2), date("2024-01-01"));
        store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));

        assert_eq!(
            store.narrative(),
            "Description: Coffee, Amount: ₹50.50 on 2024-01-01. \
             Description: Taxi, Amount: ₹120.00 on 2024-01-02"
        );
    }

    #[test]
    fn total_sums_all_amounts() {
        let mut store = ExpenseStore::new();
        store.add("Coffee".into(), Decimal::from(50), date("2024-01-01"));
        store.add("Taxi".into(), Decimal::from(120), date("2024-01-02"));

        assert_eq!(store.total(), Decimal::from(170));
    }
}
