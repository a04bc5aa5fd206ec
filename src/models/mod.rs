mod budget;
mod category;
mod expense;
mod form;
mod income;
mod month;
mod savings;
mod wishlist;

pub use budget::CategoryBudget;
pub use category::{Category, SAVINGS_CATEGORY};
pub use expense::{Expense, ExpensePatch, NewExpense};
pub use form::{optional_text, parse_amount, parse_date, required_text};
pub use income::{Frequency, Income, IncomePatch, NewIncome};
pub use month::MonthKey;
pub use savings::Savings;
pub use wishlist::{NewWishlistItem, Purchase, WishlistItem, WishlistPatch, PURCHASE_CATEGORY};
