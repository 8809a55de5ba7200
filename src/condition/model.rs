use crate::expression::model::lenient_expression;
use crate::expression::{Expression, ExpressionType, default_expression, generate_id};
use ahash::AHashSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Comparison between the two sides of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[default]
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "crosses above")]
    CrossesAbove,
    #[serde(rename = "crosses below")]
    CrossesBelow,
    #[serde(rename = "is above")]
    IsAbove,
    #[serde(rename = "is below")]
    IsBelow,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterThanOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessThanOrEqual => "<=",
            ComparisonOperator::CrossesAbove => "crosses above",
            ComparisonOperator::CrossesBelow => "crosses below",
            ComparisonOperator::IsAbove => "is above",
            ComparisonOperator::IsBelow => "is below",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How the children of a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupLogic {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl GroupLogic {
    pub fn keyword(&self) -> &'static str {
        match self {
            GroupLogic::And => "AND",
            GroupLogic::Or => "OR",
        }
    }
}

/// A single comparison. Either side may be empty while the user is still editing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(deserialize_with = "lenient_expression")]
    pub lhs: Option<Expression>,
    pub operator: ComparisonOperator,
    #[serde(deserialize_with = "lenient_expression")]
    pub rhs: Option<Expression>,
}

/// An AND/OR group of conditions and nested groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCondition {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub group_logic: GroupLogic,
    #[serde(default)]
    pub conditions: Vec<ConditionItem>,
}

/// One entry of a group: a condition, a nested group, or a value that is neither.
///
/// Entries are told apart by shape alone (see [`is_group_condition`] and
/// [`is_condition`]). Values matching neither shape are kept untouched as `Malformed`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionItem {
    Condition(Condition),
    Group(GroupCondition),
    Malformed(serde_json::Value),
}

/// Returns true when `value` has the shape of a group (`groupLogic` and a `conditions` array).
pub fn is_group_condition(value: &serde_json::Value) -> bool {
    value.get("groupLogic").is_some()
        && value.get("conditions").is_some_and(|c| c.is_array())
}

/// Returns true when `value` has the shape of a comparison (`lhs`, `operator` and `rhs`).
pub fn is_condition(value: &serde_json::Value) -> bool {
    ["lhs", "operator", "rhs"]
        .iter()
        .all(|key| value.get(key).is_some())
}

impl<'de> Deserialize<'de> for ConditionItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(ConditionItem::from_value)
    }
}

impl Serialize for ConditionItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionItem::Condition(c) => c.serialize(serializer),
            ConditionItem::Group(g) => g.serialize(serializer),
            ConditionItem::Malformed(raw) => raw.serialize(serializer),
        }
    }
}

impl ConditionItem {
    /// Classifies a raw entry by shape. Never fails: anything unreadable is kept as
    /// `Malformed`.
    pub fn from_value(raw: serde_json::Value) -> Self {
        let loaded = if is_group_condition(&raw) {
            serde_json::from_value(raw.clone()).map(ConditionItem::Group)
        } else if is_condition(&raw) {
            serde_json::from_value(raw.clone()).map(ConditionItem::Condition)
        } else {
            return ConditionItem::Malformed(raw);
        };
        loaded.unwrap_or_else(|e| {
            log::debug!("Keeping unreadable condition entry as malformed: {}", e);
            ConditionItem::Malformed(raw)
        })
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ConditionItem::Condition(c) => Some(&c.id),
            ConditionItem::Group(g) => Some(&g.id),
            ConditionItem::Malformed(raw) => raw.get("id").and_then(|id| id.as_str()),
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match self {
            ConditionItem::Condition(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupCondition> {
        match self {
            ConditionItem::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl From<Condition> for ConditionItem {
    fn from(condition: Condition) -> Self {
        ConditionItem::Condition(condition)
    }
}

impl From<GroupCondition> for ConditionItem {
    fn from(group: GroupCondition) -> Self {
        ConditionItem::Group(group)
    }
}

/// A fresh comparison: a blank indicator `==` the constant zero.
pub fn empty_condition() -> Condition {
    Condition {
        id: generate_id(),
        lhs: Some(default_expression(ExpressionType::Indicator)),
        operator: ComparisonOperator::Equal,
        rhs: Some(default_expression(ExpressionType::Constant)),
    }
}

/// A fresh AND group seeded with one empty condition.
pub fn empty_group_condition() -> GroupCondition {
    GroupCondition {
        id: generate_id(),
        group_logic: GroupLogic::And,
        conditions: vec![ConditionItem::Condition(empty_condition())],
    }
}

impl Condition {
    pub fn new(lhs: Expression, operator: ComparisonOperator, rhs: Expression) -> Self {
        Self {
            id: generate_id(),
            lhs: Some(lhs),
            operator,
            rhs: Some(rhs),
        }
    }
}

impl GroupCondition {
    pub fn new(group_logic: GroupLogic, conditions: Vec<ConditionItem>) -> Self {
        Self {
            id: generate_id(),
            group_logic,
            conditions,
        }
    }

    /// Number of comparisons in this group, counting nested groups recursively.
    pub fn condition_count(&self) -> usize {
        self.conditions
            .iter()
            .map(|item| match item {
                ConditionItem::Condition(_) => 1,
                ConditionItem::Group(g) => g.condition_count(),
                ConditionItem::Malformed(_) => 0,
            })
            .sum()
    }

    /// Collects every indicator name referenced by the comparisons in this group.
    pub fn referenced_indicators(&self, names: &mut AHashSet<String>) {
        for item in &self.conditions {
            match item {
                ConditionItem::Condition(c) => {
                    for side in [&c.lhs, &c.rhs].into_iter().flatten() {
                        side.referenced_indicators(names);
                    }
                }
                ConditionItem::Group(g) => g.referenced_indicators(names),
                ConditionItem::Malformed(_) => {}
            }
        }
    }
}

/// Loads the root groups of a condition payload without failing the surrounding node.
///
/// A root entry that does not load as a group is wrapped in a fresh group holding it as
/// a `Malformed` item, so it still renders as a placeholder and is written back.
pub(crate) fn lenient_groups<'de, D>(deserializer: D) -> Result<Option<Vec<GroupCondition>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let entries = match raw {
        None => return Ok(None),
        Some(serde_json::Value::Array(entries)) => entries,
        Some(other) => vec![other],
    };
    Ok(Some(
        entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value(entry.clone()).unwrap_or_else(|e| {
                    log::debug!("Wrapping unreadable root condition group: {}", e);
                    GroupCondition::new(GroupLogic::And, vec![ConditionItem::Malformed(entry)])
                })
            })
            .collect(),
    ))
}
