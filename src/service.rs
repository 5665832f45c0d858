//! Mutation and query operations over groups. Validation lives here, before
//! anything reaches the balance/settlement engine; every mutation rebuilds
//! the snapshot under the group's lock and pushes it to subscribers.

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::money::round2;
use crate::notify::SnapshotHub;
use crate::schemas::{Expense, Group, Member, MemberId, NewExpense, Snapshot};
use crate::snapshot::build_snapshot;
use crate::store::GroupStore;

#[derive(Debug)]
pub struct MemberAdded {
    pub member: Member,
    pub snapshot: Snapshot,
    /// False when the name matched an existing member (idempotent re-join).
    pub created: bool,
}

pub struct GroupService<S> {
    store: S,
    hub: SnapshotHub,
}

impl<S: GroupStore> GroupService<S> {
    pub fn new(store: S) -> Self {
        GroupService {
            store,
            hub: SnapshotHub::default(),
        }
    }

    pub fn create_group(&self, name: &str) -> Snapshot {
        let name = name.trim();
        let group = Group {
            id: Uuid::new_v4().to_string(),
            name: if name.is_empty() {
                "New Group".to_string()
            } else {
                name.to_string()
            },
            members: vec![],
            expenses: vec![],
        };
        let snapshot = build_snapshot(&group);
        info!(group_id = %group.id, name = %group.name, "group created");
        self.store.insert(group);
        snapshot
    }

    pub fn get_group(&self, group_id: &str) -> Result<Snapshot, ServiceError> {
        self.store
            .read(group_id, build_snapshot)
            .ok_or(ServiceError::GroupNotFound)
    }

    /// Join a member to a group. Idempotent by case-insensitive name: a
    /// second "alex" gets the existing member back, with no mutation and no
    /// broadcast.
    pub fn add_member(&self, group_id: &str, name: &str) -> Result<MemberAdded, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("Member name is required"));
        }
        let lowered = name.to_lowercase();
        let added = self
            .store
            .mutate(group_id, |group| {
                if let Some(existing) = group
                    .members
                    .iter()
                    .find(|m| m.name.to_lowercase() == lowered)
                {
                    return MemberAdded {
                        member: existing.clone(),
                        snapshot: build_snapshot(group),
                        created: false,
                    };
                }
                let member = Member {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                };
                group.members.push(member.clone());
                MemberAdded {
                    member,
                    snapshot: build_snapshot(group),
                    created: true,
                }
            })
            .ok_or(ServiceError::GroupNotFound)?;
        if added.created {
            debug!(group_id, member_id = %added.member.id, "member joined");
            self.hub.publish(group_id, added.snapshot.clone());
        }
        Ok(added)
    }

    pub fn add_expense(
        &self,
        group_id: &str,
        new: NewExpense,
    ) -> Result<(Expense, Snapshot), ServiceError> {
        let description = new.description.as_deref().map(str::trim).unwrap_or_default();
        if description.is_empty() {
            return Err(ServiceError::validation("Description is required"));
        }
        let amount = new.amount.unwrap_or(f64::NAN);
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::validation("Amount must be a positive number"));
        }

        let (expense, snapshot) = self
            .store
            .mutate(group_id, |group| {
                let payer = new.paid_by.as_deref().unwrap_or_default();
                if !group.has_member(payer) {
                    return Err(ServiceError::validation("Valid paidBy memberId is required"));
                }
                // The split is a set: duplicates collapse, unknown ids are
                // rejected rather than filtered out.
                let mut split_between: Vec<MemberId> = Vec::new();
                for id in new.split_between.as_deref().unwrap_or_default() {
                    if !group.has_member(id) {
                        return Err(ServiceError::validation(
                            "splitBetween contains an unknown memberId",
                        ));
                    }
                    if !split_between.iter().any(|seen| seen == id) {
                        split_between.push(id.clone());
                    }
                }
                if split_between.is_empty() {
                    return Err(ServiceError::validation(
                        "splitBetween must include at least one valid memberId",
                    ));
                }
                let expense = Expense {
                    id: Uuid::new_v4().to_string(),
                    description: description.to_string(),
                    amount: round2(amount),
                    paid_by: payer.to_string(),
                    split_between,
                    created_at: Utc::now(),
                };
                group.expenses.push(expense.clone());
                Ok((expense, build_snapshot(group)))
            })
            .ok_or(ServiceError::GroupNotFound)??;

        debug!(group_id, expense_id = %expense.id, amount = expense.amount, "expense recorded");
        self.hub.publish(group_id, snapshot.clone());
        Ok((expense, snapshot))
    }

    /// Current snapshot plus a live feed of every later one. Subscribing
    /// before the snapshot read means a mutation racing this call shows up
    /// on the feed instead of falling between the two.
    pub fn subscribe(
        &self,
        group_id: &str,
    ) -> Result<(Snapshot, broadcast::Receiver<Snapshot>), ServiceError> {
        self.store
            .read(group_id, |_| ())
            .ok_or(ServiceError::GroupNotFound)?;
        let receiver = self.hub.subscribe(group_id);
        let snapshot = self.get_group(group_id)?;
        Ok((snapshot, receiver))
    }
}
