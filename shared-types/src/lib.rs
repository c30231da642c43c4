pub mod defaults;
pub mod expense;
pub mod financial;
pub mod keys;
pub mod reminder;
pub mod session;
pub mod settings;
pub mod split;
pub mod tip;
pub mod user;
pub mod validation;

pub use expense::{Expense, ExpenseDraft, ExpenseForm, DEFAULT_NOTES, KNOWN_CATEGORIES};
pub use financial::{CategoryBreakdown, CategoryTotal, DailyPoint, FriendBalance, SpendingSummary};
pub use reminder::Reminder;
pub use session::{Identity, ProfileSeed, Session};
pub use settings::Theme;
pub use split::{is_me, Friend, ParticipantId, SplitExpense, SplitForm, ME};
pub use tip::{Tip, TipsProgress};
pub use user::{Currency, UpdateProfileRequest, User};
pub use validation::ValidationError;

/// Fresh opaque identifier for a stored entity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
