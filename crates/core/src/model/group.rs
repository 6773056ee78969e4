use thiserror::Error;

use crate::model::ids::ModuleProgressId;
use crate::model::module::ModuleProgressSnapshot;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GroupProgressError {
    #[error("duplicate order number {order_number} within a group")]
    DuplicateOrderNumber { order_number: u32 },
}

/// Sequencing flags configured per group/assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupSchedulingPolicy {
    /// Modules must be completed strictly in `order_number` order.
    pub is_member_order_locked: bool,
    /// After completing a module, its full configured duration must elapse
    /// before the next module unlocks, even when finished early.
    pub wait_module_completion: bool,
}

/// The ordered module snapshot list for one exam-taker in one group.
///
/// `order_number` values are unique and totally ordered within a group.
/// Normalization into ascending order happens exactly once here, at
/// construction; classification functions never reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupProgress {
    modules: Vec<ModuleProgressSnapshot>,
    policy: GroupSchedulingPolicy,
}

impl GroupProgress {
    /// Build a validated group from fetched snapshots.
    ///
    /// # Errors
    ///
    /// Returns `GroupProgressError::DuplicateOrderNumber` when two modules
    /// share an `order_number`.
    pub fn new(
        mut modules: Vec<ModuleProgressSnapshot>,
        policy: GroupSchedulingPolicy,
    ) -> Result<Self, GroupProgressError> {
        modules.sort_by_key(|m| m.order_number);
        for pair in modules.windows(2) {
            if pair[0].order_number == pair[1].order_number {
                return Err(GroupProgressError::DuplicateOrderNumber {
                    order_number: pair[0].order_number,
                });
            }
        }
        Ok(Self { modules, policy })
    }

    #[must_use]
    pub fn modules(&self) -> &[ModuleProgressSnapshot] {
        &self.modules
    }

    #[must_use]
    pub fn policy(&self) -> GroupSchedulingPolicy {
        self.policy
    }

    #[must_use]
    pub fn find(&self, id: ModuleProgressId) -> Option<&ModuleProgressSnapshot> {
        self.modules.iter().find(|m| m.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }
}
