//! In-place edits a host applies to a condition tree as the user types.
//!
//! Every edit addresses its target by id and reports whether the id was found.
//! An unknown id leaves the tree untouched.

use super::model::*;
use crate::expression::Expression;

/// Which side of a comparison an edit replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lhs,
    Rhs,
}

impl GroupCondition {
    /// Finds a condition or group anywhere in this tree. The root itself is not an item.
    pub fn find(&self, id: &str) -> Option<&ConditionItem> {
        self.conditions.iter().find_map(|item| {
            if item.id() == Some(id) {
                return Some(item);
            }
            match item {
                ConditionItem::Group(g) => g.find(id),
                _ => None,
            }
        })
    }

    /// Finds this group or a nested group by id.
    pub fn find_group_mut(&mut self, id: &str) -> Option<&mut GroupCondition> {
        if self.id == id {
            return Some(self);
        }
        self.conditions.iter_mut().find_map(|item| match item {
            ConditionItem::Group(g) => g.find_group_mut(id),
            _ => None,
        })
    }

    /// Finds a comparison by id anywhere in this tree.
    pub fn find_condition_mut(&mut self, id: &str) -> Option<&mut Condition> {
        self.conditions.iter_mut().find_map(|item| match item {
            ConditionItem::Condition(c) if c.id == id => Some(c),
            ConditionItem::Group(g) => g.find_condition_mut(id),
            _ => None,
        })
    }

    /// Appends an empty comparison to the group `group_id`.
    pub fn add_condition(&mut self, group_id: &str) -> bool {
        self.find_group_mut(group_id)
            .map(|g| g.conditions.push(empty_condition().into()))
            .is_some()
    }

    /// Appends a nested empty group to the group `group_id`.
    pub fn add_group(&mut self, group_id: &str) -> bool {
        self.find_group_mut(group_id)
            .map(|g| g.conditions.push(empty_group_condition().into()))
            .is_some()
    }

    /// Removes the item `id` from wherever it sits in this tree.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.conditions.len();
        self.conditions.retain(|item| item.id() != Some(id));
        if self.conditions.len() != before {
            return true;
        }
        self.conditions.iter_mut().any(|item| match item {
            ConditionItem::Group(g) => g.remove_item(id),
            _ => false,
        })
    }

    pub fn set_logic(&mut self, group_id: &str, logic: GroupLogic) -> bool {
        self.find_group_mut(group_id)
            .map(|g| g.group_logic = logic)
            .is_some()
    }

    pub fn set_operator(&mut self, condition_id: &str, operator: ComparisonOperator) -> bool {
        self.find_condition_mut(condition_id)
            .map(|c| c.operator = operator)
            .is_some()
    }

    /// Replaces one side of the comparison `condition_id`.
    pub fn set_side(&mut self, condition_id: &str, side: Side, expr: Expression) -> bool {
        self.find_condition_mut(condition_id)
            .map(|c| match side {
                Side::Lhs => c.lhs = Some(expr),
                Side::Rhs => c.rhs = Some(expr),
            })
            .is_some()
    }
}
