use chrono::NaiveDate;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: u64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl Expense {
    /// One clause of the text blob sent to the summarization endpoint.
    pub fn narrative_clause(&self) -> String {
        format!(
            "Description: {}, Amount: ₹{:.2} on {}",
            self.description,
            self.amount,
            self.date.format("%Y-%m-%d")
        )
    }

    pub fn to_list_item(&self) -> ListItem {
        ListItem::new(Line::from(vec![
            Span::raw(format!("{:<12} ", self.date.format("%Y-%m-%d"))),
            Span::styled(
                format!("₹{:>10.2} ", self.amount),
                Style::default().fg(Color::Green),
            ),
            Span::raw(self.description.clone()),
        ]))
    }
}
