use tracing::warn;

use crate::balance::compute_balances;
use crate::money::{round2, DEAD_ZONE};
use crate::schemas::{Expense, Member, MemberId, Settlement};

struct PartyBalance {
    member_id: MemberId,
    amount: f64,
}

/// Greedy debt resolution: repeatedly match the largest creditor with the
/// largest debtor. Not guaranteed minimal in transaction count, but
/// deterministic. Classification walks the member list in insertion order
/// and both sorts are stable, so equal balances keep their relative order.
pub fn compute_settlements(members: &[Member], expenses: &[Expense]) -> Vec<Settlement> {
    let balances = compute_balances(members, expenses);

    let mut creditors: Vec<PartyBalance> = Vec::new();
    let mut debtors: Vec<PartyBalance> = Vec::new();
    for member in members {
        let rounded = round2(balances.get(&member.id).copied().unwrap_or(0.0));
        let party = PartyBalance {
            member_id: member.id.clone(),
            amount: rounded,
        };
        if rounded > DEAD_ZONE {
            creditors.push(party);
        } else if rounded < -DEAD_ZONE {
            debtors.push(party);
        }
    }
    creditors.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    debtors.sort_by(|a, b| a.amount.total_cmp(&b.amount));

    let mut settlements = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < creditors.len() && j < debtors.len() {
        let pay = creditors[i].amount.min(-debtors[j].amount);
        if pay > DEAD_ZONE {
            settlements.push(Settlement {
                from: debtors[j].member_id.clone(),
                to: creditors[i].member_id.clone(),
                amount: round2(pay),
            });
            // Re-round after every decrement so drift can't accumulate
            // across a long chain of partial matches.
            creditors[i].amount = round2(creditors[i].amount - pay);
            debtors[j].amount = round2(debtors[j].amount + pay);
        }
        if creditors[i].amount <= DEAD_ZONE {
            i += 1;
        }
        if debtors[j].amount >= -DEAD_ZONE {
            j += 1;
        }
    }

    // Zero-sum should leave nothing behind; a leftover beyond the dead zone
    // means an upstream contract was broken, so surface it in the logs.
    let residual: f64 = creditors[i..]
        .iter()
        .chain(debtors[j..].iter())
        .map(|p| p.amount)
        .sum();
    if residual.abs() > DEAD_ZONE {
        warn!(residual, "settlement sweep left an unmatched balance");
    }

    settlements
}
