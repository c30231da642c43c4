use analytics::balances::{self, BalanceDirection};
use shared_types::{defaults, is_me, keys, new_id, Friend, FriendBalance, SplitExpense, SplitForm, ValidationError};

use super::Page;
use crate::context::AppContext;
use crate::sync::{PageKind, SyncKind};

pub struct SplitPage {
    ctx: AppContext,
    pub friends: Vec<Friend>,
    pub splits: Vec<SplitExpense>,
}

impl SplitPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            friends: Vec::new(),
            splits: Vec::new(),
        }
    }

    pub fn friend(&self, id: &str) -> Option<&Friend> {
        self.friends.iter().find(|f| f.id == id)
    }

    /// Display name of a participant
    pub fn participant_name(&self, id: &str) -> String {
        if is_me(id) {
            return "You".to_string();
        }
        self.friend(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// History, newest first
    pub fn history(&self) -> Vec<SplitExpense> {
        let mut history = self.splits.clone();
        history.sort_by(|a, b| b.date.cmp(&a.date));
        history
    }

    pub fn add(&mut self, form: &SplitForm) -> Result<SplitExpense, ValidationError> {
        let split = form.validate(new_id(), self.ctx.today())?;

        let known = |id: &str| is_me(id) || self.friends.iter().any(|f| f.id == id);
        if let Some(unknown) = split
            .split_between
            .iter()
            .chain(std::iter::once(&split.paid_by))
            .find(|id| !known(id.as_str()))
        {
            return Err(ValidationError::UnknownParticipant(unknown.clone()));
        }

        self.splits.push(split.clone());
        self.persist("Split added");
        Ok(split)
    }

    /// Mark a split settled so it drops out of the balances
    pub fn settle(&mut self, id: &str) -> bool {
        let Some(split) = self.splits.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if split.settled {
            return false;
        }
        split.settled = true;
        self.persist("Split settled");
        true
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.splits.len();
        self.splits.retain(|s| s.id != id);
        if self.splits.len() == before {
            return false;
        }
        self.persist("Split deleted");
        true
    }

    /// Unsettled balances per friend, hiding those that net to zero
    pub fn balances(&self) -> Vec<(FriendBalance, BalanceDirection)> {
        balances::visible_balances(balances::split_balances(&self.splits, &self.friends))
            .into_iter()
            .map(|b| {
                let direction = balances::direction(b.balance);
                (b, direction)
            })
            .collect()
    }

    /// Total owed to the user and total the user owes
    pub fn totals(&self) -> (f64, f64) {
        balances::totals(&balances::split_balances(&self.splits, &self.friends))
    }

    fn persist(&self, message: &str) {
        if self.ctx.store.save(keys::SPLIT_EXPENSES, &self.splits) {
            self.ctx.emit(SyncKind::SplitsUpdated, Self::KIND);
            self.ctx.toaster.success(message);
        } else {
            self.ctx
                .toaster
                .warning(format!("{message} for now, but it could not be saved on this device"));
        }
    }
}

impl Page for SplitPage {
    const KIND: PageKind = PageKind::Split;
    const WATCHED_KEYS: &'static [&'static str] = &[keys::SPLIT_EXPENSES, keys::FRIENDS];

    fn context(&self) -> &AppContext {
        &self.ctx
    }

    fn load(&mut self) {
        self.friends = match self.ctx.store.load_optional(keys::FRIENDS) {
            Some(friends) => friends,
            None => {
                let friends = defaults::demo_friends();
                self.ctx.store.save(keys::FRIENDS, &friends);
                friends
            }
        };
        self.splits = self.ctx.store.load(keys::SPLIT_EXPENSES, &Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, test_context};
    use shared_types::ME;

    fn form(description: &str, total: &str, paid_by: &str, between: &[&str]) -> SplitForm {
        SplitForm {
            description: description.to_string(),
            total_amount: total.to_string(),
            paid_by: paid_by.to_string(),
            date: Some(day("2025-11-18")),
            split_between: between.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn page() -> SplitPage {
        let mut page = SplitPage::new(test_context(day("2025-11-20")));
        page.load();
        page
    }

    #[tokio::test]
    async fn test_pizza_scenario_balances() {
        let mut page = page();
        page.add(&form("Pizza", "450", ME, &["me", "f1", "f2"])).unwrap();

        let balances = page.balances();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].0.friend_id, "f1");
        assert_eq!(balances[0].0.balance, 150.0);
        assert_eq!(balances[0].1, BalanceDirection::OwesYou);
        assert_eq!(balances[1].0.friend_id, "f2");
        assert_eq!(page.totals(), (300.0, 0.0));
    }

    #[tokio::test]
    async fn test_friend_paid_means_you_owe() {
        let mut page = page();
        page.add(&form("Taxi", "90", "f3", &["me", "f3"])).unwrap();

        let balances = page.balances();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].0.balance, -45.0);
        assert_eq!(balances[0].1, BalanceDirection::YouOwe);
        assert_eq!(page.totals(), (0.0, 45.0));
    }

    #[tokio::test]
    async fn test_settle_and_delete() {
        let mut page = page();
        let split = page.add(&form("Pizza", "450", ME, &["me", "f1", "f2"])).unwrap();

        assert!(page.settle(&split.id));
        assert!(!page.settle(&split.id));
        assert!(page.balances().is_empty());

        assert!(!page.delete("missing"));
        assert!(page.delete(&split.id));
        assert!(page.history().is_empty());
    }

    #[tokio::test]
    async fn test_rejections_do_not_mutate() {
        let mut page = page();
        assert_eq!(
            page.add(&form("Lunch", "0", ME, &["me", "f1"])),
            Err(ValidationError::InvalidAmount)
        );
        assert_eq!(
            page.add(&form("Lunch", "60", ME, &[])),
            Err(ValidationError::MissingParticipants)
        );
        assert_eq!(
            page.add(&form("Lunch", "60", ME, &["me", "f9"])),
            Err(ValidationError::UnknownParticipant("f9".to_string()))
        );
        assert_eq!(
            page.add(&form("Lunch", "60", "ghost", &["me"])),
            Err(ValidationError::UnknownParticipant("ghost".to_string()))
        );
        assert!(page.splits.is_empty());
        assert!(!page.context().store.contains(keys::SPLIT_EXPENSES));
    }

    #[test]
    fn test_demo_friends_persisted_once() {
        let ctx = test_context(day("2025-11-20"));
        let mut page = SplitPage::new(ctx.clone());
        page.load();
        assert_eq!(page.friends.len(), 4);
        assert!(ctx.store.contains(keys::FRIENDS));
        assert_eq!(page.participant_name("me"), "You");
        assert_eq!(page.participant_name("f2"), "Sara");
    }
}
