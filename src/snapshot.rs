use crate::balance::compute_balances;
use crate::money::round2;
use crate::schemas::{Group, Snapshot};
use crate::settlement::compute_settlements;

/// Compose the externally visible view of a group: entities as recorded,
/// balances rounded to cents, and the current settlement plan.
///
/// Rebuilt from scratch after every mutation and on every read; linear in
/// members + expenses, so there is no cache to invalidate.
pub fn build_snapshot(group: &Group) -> Snapshot {
    let raw = compute_balances(&group.members, &group.expenses);
    let balances = group
        .members
        .iter()
        .map(|m| (m.id.clone(), round2(raw.get(&m.id).copied().unwrap_or(0.0))))
        .collect();
    Snapshot {
        id: group.id.clone(),
        name: group.name.clone(),
        members: group.members.clone(),
        expenses: group.expenses.clone(),
        balances,
        settlements: compute_settlements(&group.members, &group.expenses),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Expense, Member};
    use chrono::Utc;

    fn group() -> Group {
        Group {
            id: "g1".to_string(),
            name: "Trip".to_string(),
            members: vec![
                Member {
                    id: "alice".to_string(),
                    name: "Alice".to_string(),
                },
                Member {
                    id: "bob".to_string(),
                    name: "Bob".to_string(),
                },
                Member {
                    id: "carol".to_string(),
                    name: "Carol".to_string(),
                },
            ],
            expenses: vec![Expense {
                id: "e1".to_string(),
                description: "Dinner".to_string(),
                amount: 10.0,
                paid_by: "alice".to_string(),
                split_between: vec![
                    "alice".to_string(),
                    "bob".to_string(),
                    "carol".to_string(),
                ],
                created_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn balances_are_rounded_to_cents() {
        let snapshot = build_snapshot(&group());
        assert_eq!(snapshot.balances["alice"], 6.67);
        assert_eq!(snapshot.balances["bob"], -3.33);
        assert_eq!(snapshot.balances["carol"], -3.33);
        assert_eq!(snapshot.settlements.len(), 2);
    }

    #[test]
    fn empty_group_has_zero_balances_and_no_settlements() {
        let mut g = group();
        g.expenses.clear();

        let snapshot = build_snapshot(&g);
        assert_eq!(snapshot.balances.len(), 3);
        assert!(snapshot.balances.values().all(|&b| b == 0.0));
        assert!(snapshot.settlements.is_empty());
    }

    #[test]
    fn snapshot_carries_entities_verbatim() {
        let g = group();
        let snapshot = build_snapshot(&g);
        assert_eq!(snapshot.id, g.id);
        assert_eq!(snapshot.name, g.name);
        assert_eq!(snapshot.members, g.members);
        assert_eq!(snapshot.expenses, g.expenses);
    }
}
