use shared_types::{is_me, Friend, FriendBalance, ParticipantId, SplitExpense};
use std::collections::HashMap;

/// Balances closer to zero than this count as settled
pub const SETTLED_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDirection {
    OwesYou,
    YouOwe,
    Settled,
}

pub fn direction(balance: f64) -> BalanceDirection {
    if balance.abs() < SETTLED_EPSILON {
        BalanceDirection::Settled
    } else if balance > 0.0 {
        BalanceDirection::OwesYou
    } else {
        BalanceDirection::YouOwe
    }
}

/// Balance of every friend against the user over the unsettled splits.
///
/// Each participant other than the user is charged an equal share; a friend
/// who paid is credited the full amount. Friends keep their list order and
/// participants that are not in `friends` are ignored.
pub fn split_balances(splits: &[SplitExpense], friends: &[Friend]) -> Vec<FriendBalance> {
    let ledger = ledger(splits);

    friends
        .iter()
        .map(|friend| FriendBalance {
            friend_id: friend.id.clone(),
            name: friend.name.clone(),
            avatar: friend.avatar.clone(),
            balance: ledger.get(friend.id.as_str()).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Balances that are not settled, for display
pub fn visible_balances(balances: Vec<FriendBalance>) -> Vec<FriendBalance> {
    balances
        .into_iter()
        .filter(|b| direction(b.balance) != BalanceDirection::Settled)
        .collect()
}

/// Same ledger as [`split_balances`] but including the user under `"me"`
/// and any participant id, in first-seen order. The values sum to zero.
pub fn participant_balances(splits: &[SplitExpense]) -> Vec<(ParticipantId, f64)> {
    let mut order: Vec<ParticipantId> = Vec::new();
    let mut balance: HashMap<ParticipantId, f64> = HashMap::new();

    for split in splits.iter().filter(|s| !s.settled) {
        let share = split.share();
        for participant in &split.split_between {
            if !balance.contains_key(participant) {
                order.push(participant.clone());
            }
            balance
                .entry(participant.clone())
                .and_modify(|v| *v += share)
                .or_insert(share);
        }
        if !balance.contains_key(&split.paid_by) {
            order.push(split.paid_by.clone());
        }
        balance
            .entry(split.paid_by.clone())
            .and_modify(|v| *v -= split.total_amount)
            .or_insert(-split.total_amount);
    }

    order
        .into_iter()
        .map(|id| {
            let value = balance.get(&id).copied().unwrap_or(0.0);
            (id, value)
        })
        .collect()
}

/// Sum of positive balances (owed to the user) and of negative ones (owed by
/// the user, as a positive number)
pub fn totals(balances: &[FriendBalance]) -> (f64, f64) {
    balances.iter().fold((0.0, 0.0), |(owed, owing), b| {
        if b.balance > 0.0 {
            (owed + b.balance, owing)
        } else {
            (owed, owing - b.balance)
        }
    })
}

fn ledger(splits: &[SplitExpense]) -> HashMap<&str, f64> {
    let mut balance: HashMap<&str, f64> = HashMap::new();

    for split in splits.iter().filter(|s| !s.settled) {
        let share = split.share();
        for participant in split.split_between.iter().filter(|p| !is_me(p)) {
            balance
                .entry(participant.as_str())
                .and_modify(|v| *v += share)
                .or_insert(share);
        }
        if !is_me(&split.paid_by) {
            balance
                .entry(split.paid_by.as_str())
                .and_modify(|v| *v -= split.total_amount)
                .or_insert(-split.total_amount);
        }
    }

    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared_types::ME;

    fn friends() -> Vec<Friend> {
        ["f1", "f2", "f3"]
            .iter()
            .map(|id| Friend {
                id: id.to_string(),
                name: id.to_uppercase(),
                avatar: "🙂".to_string(),
            })
            .collect()
    }

    fn split(id: &str, total: f64, paid_by: &str, between: &[&str]) -> SplitExpense {
        SplitExpense {
            id: id.to_string(),
            description: id.to_string(),
            total_amount: total,
            paid_by: paid_by.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            split_between: between.iter().map(|s| s.to_string()).collect(),
            settled: false,
        }
    }

    fn balance_of(balances: &[FriendBalance], id: &str) -> f64 {
        balances.iter().find(|b| b.friend_id == id).unwrap().balance
    }

    #[test]
    fn test_two_split_scenario() {
        let splits = vec![
            split("s1", 450.0, "me", &["me", "f1", "f2"]),
            split("s2", 300.0, "f3", &["me", "f3"]),
        ];
        let balances = split_balances(&splits, &friends());

        assert_eq!(balance_of(&balances, "f1"), 150.0);
        assert_eq!(balance_of(&balances, "f2"), 150.0);
        assert_eq!(balance_of(&balances, "f3"), -150.0);
        assert_eq!(direction(-150.0), BalanceDirection::YouOwe);
        assert_eq!(totals(&balances), (300.0, 150.0));
    }

    #[test]
    fn test_settled_splits_are_ignored() {
        let mut settled = split("s1", 100.0, "me", &["me", "f1"]);
        settled.settled = true;
        let balances = split_balances(&[settled], &friends());
        assert!(balances.iter().all(|b| b.balance == 0.0));
        assert!(visible_balances(balances).is_empty());
    }

    #[test]
    fn test_near_zero_balances_hidden() {
        let splits = vec![
            split("s1", 10.0, "me", &["me", "f1", "f2"]),
            split("s2", 3.33, "f1", &["me"]),
        ];
        let visible = visible_balances(split_balances(&splits, &friends()));
        let ids: Vec<_> = visible.iter().map(|b| b.friend_id.as_str()).collect();
        assert_eq!(ids, vec!["f2"]);
    }

    #[test]
    fn test_participant_balances_sum_to_zero() {
        let splits = vec![
            split("s1", 450.0, "me", &["me", "f1", "f2"]),
            split("s2", 300.0, "f3", &["me", "f3"]),
            split("s3", 100.0, "f1", &["f1", "f2", "f3"]),
            split("s4", 77.7, "f2", &["me", "f1", "f2"]),
        ];
        let ledger = participant_balances(&splits);
        let sum: f64 = ledger.iter().map(|(_, v)| v).sum();
        assert!(sum.abs() < 1e-9);

        let me = ledger.iter().find(|(id, _)| id == ME).unwrap().1;
        let friends_sum: f64 = split_balances(&splits, &friends())
            .iter()
            .map(|b| b.balance)
            .sum();
        assert!((me + friends_sum).abs() < 1e-9);
    }
}
