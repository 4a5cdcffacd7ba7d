pub mod config;
pub mod models;
pub mod store;
pub mod summary;
pub mod ui;

// Re-export commonly used items
pub use config::SummaryConfig;
pub use models::expense::Expense;
pub use store::ExpenseStore;
pub use summary::{SummaryClient, SummaryDispatcher, Summarizer};
pub use ui::app::App;
