use std::collections::HashMap;

use crate::schemas::{Expense, Member, MemberId};

pub type Balances = HashMap<MemberId, f64>;

/// Raw net position per member: positive means owed money, negative means
/// owes money. Every member appears, including ones with no expenses.
///
/// Values are deliberately unrounded; rounding happens once, at settlement
/// classification or snapshot presentation. Shares are real divisions, so a
/// 10.00 expense split three ways leaves each debtor with 3.333... and the
/// sum of all balances a few fractions of a cent off zero.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> Balances {
    let mut balances: Balances = members.iter().map(|m| (m.id.clone(), 0.0)).collect();
    for expense in expenses {
        let amount = expense.amount;
        balances
            .entry(expense.paid_by.clone())
            .and_modify(|v| *v += amount)
            .or_insert(amount);
        // An empty split credits the payer and debits nobody. The service
        // layer rejects these before they are recorded; no re-validation here.
        if expense.split_between.is_empty() {
            continue;
        }
        let share = amount / expense.split_between.len() as f64;
        for member in &expense.split_between {
            balances
                .entry(member.clone())
                .and_modify(|v| *v -= share)
                .or_insert(-share);
        }
    }
    balances
}
