use super::context::FormatContext;
use crate::condition::{Condition, ConditionItem, GroupCondition};
use crate::expression::*;
use itertools::Itertools;
use serde_json::Value;

/// Shown for an empty operand slot or a blank name.
pub const MISSING: &str = "?";
/// Shown for an expression whose type is not part of the language.
pub const INVALID_EXPRESSION: &str = "Invalid expression";
/// Shown for a group entry that is neither a condition nor a group.
pub const INVALID_CONDITION: &str = "Invalid condition";
/// Shown for a group with no entries.
pub const EMPTY_GROUP: &str = "(empty)";

/// Renders conditions as human-readable text.
///
/// Formatting never fails: anything incomplete or unreadable is rendered as a
/// placeholder, because it runs on every edit while the user is mid-way through one.
pub struct ConditionFormatter;

impl ConditionFormatter {
    /// Format a single expression.
    pub fn format_expression(expr: &Expression, ctx: &FormatContext) -> String {
        match expr {
            Expression::Indicator(ind) => {
                let body = Self::format_indicator(ind, ctx);
                format!("{}{}", offset_prefix(ind.offset), body)
            }
            Expression::MarketData(md) => {
                let symbol = ctx.symbol.as_deref().unwrap_or("Instrument");
                let mut out = format!(
                    "{}{}.{}",
                    offset_prefix(md.offset),
                    symbol,
                    or_missing(&md.field)
                );
                if let Some(sub) = md.sub_indicator.as_deref().filter(|s| !s.is_empty()) {
                    out.push('.');
                    out.push_str(sub);
                }
                out
            }
            Expression::Constant(c) => match &c.value {
                ConstantValue::Text(s) if s.is_empty() => MISSING.to_string(),
                value => value.to_string(),
            },
            Expression::TimeFunction(tf) => match tf.parameters.as_deref() {
                Some(params) if !params.is_empty() => format!(
                    "{}({})",
                    or_missing(&tf.function),
                    params.iter().map(format_json_value).join(", ")
                ),
                _ => or_missing(&tf.function).to_string(),
            },
            Expression::PositionData(pd) => {
                let scope = match (specific(&pd.vpi), specific(&pd.vpt)) {
                    (Some(vpi), _) => format!("ID:{}", vpi),
                    (None, Some(vpt)) => format!("Tag:{}", vpt),
                    (None, None) => "All Positions".to_string(),
                };
                format!("{} ({})", or_missing(&pd.field), scope)
            }
            Expression::StrategyMetric(sm) => or_missing(&sm.metric).to_string(),
            Expression::ExecutionData(ed) => match specific(&ed.vpi) {
                Some(vpi) => format!("{} (ID:{})", or_missing(&ed.field), vpi),
                None => or_missing(&ed.field).to_string(),
            },
            Expression::ExternalTrigger(et) => {
                format!("External({})", or_missing(&et.trigger_type))
            }
            Expression::Complex(cx) => {
                let left = Self::format_slot(cx.left.as_deref(), ctx);
                let right = Self::format_slot(cx.right.as_deref(), ctx);
                match cx.operation {
                    ArithmeticOp::IncreaseByPercent => {
                        format!("({} increased by {}%)", left, right)
                    }
                    ArithmeticOp::DecreaseByPercent => {
                        format!("({} decreased by {}%)", left, right)
                    }
                    op => format!("({} {} {})", left, op, right),
                }
            }
            Expression::Unknown => {
                log::debug!("Rendering expression of unknown type as placeholder");
                INVALID_EXPRESSION.to_string()
            }
        }
    }

    /// Format one comparison, e.g. `RSI(14) crosses above 70`.
    pub fn format_condition(condition: &Condition, ctx: &FormatContext) -> String {
        format!(
            "{} {} {}",
            Self::format_slot(condition.lhs.as_ref(), ctx),
            condition.operator,
            Self::format_slot(condition.rhs.as_ref(), ctx)
        )
    }

    /// Format a group, joining its entries with its logic keyword. Nested groups are
    /// parenthesized.
    pub fn format_group(group: &GroupCondition, ctx: &FormatContext) -> String {
        if group.conditions.is_empty() {
            return EMPTY_GROUP.to_string();
        }
        let separator = format!(" {} ", group.group_logic.keyword());
        group
            .conditions
            .iter()
            .map(|item| match item {
                ConditionItem::Condition(c) => Self::format_condition(c, ctx),
                ConditionItem::Group(g) if g.conditions.is_empty() => EMPTY_GROUP.to_string(),
                ConditionItem::Group(g) => format!("({})", Self::format_group(g, ctx)),
                ConditionItem::Malformed(_) => {
                    log::debug!("Rendering malformed entry of group '{}'", group.id);
                    INVALID_CONDITION.to_string()
                }
            })
            .join(&separator)
    }

    /// Format the condition payload of a signal or exit node. Several root groups are
    /// combined with AND.
    pub fn format_conditions(groups: &[GroupCondition], ctx: &FormatContext) -> String {
        match groups {
            [] => EMPTY_GROUP.to_string(),
            [only] => Self::format_group(only, ctx),
            many => many
                .iter()
                .map(|g| format!("({})", Self::format_group(g, ctx)))
                .join(" AND "),
        }
    }

    fn format_slot(slot: Option<&Expression>, ctx: &FormatContext) -> String {
        slot.map_or_else(
            || MISSING.to_string(),
            |expr| Self::format_expression(expr, ctx),
        )
    }

    fn format_indicator(ind: &IndicatorRef, ctx: &FormatContext) -> String {
        if ind.name.is_empty() {
            return MISSING.to_string();
        }
        if let Some(params) = ctx.indicator_parameters.get(&ind.name) {
            return format!(
                "{}({})",
                ind.name,
                params.values().map(format_json_value).join(",")
            );
        }
        match ind.parameter.as_deref().filter(|p| !p.is_empty()) {
            Some(parameter) => format!("{}[{}]", ind.name, parameter),
            None => ind.name.clone(),
        }
    }
}

/// `-1` is the previous candle, anything further back counts candles.
fn offset_prefix(offset: i32) -> String {
    match offset {
        -1 => "Previous ".to_string(),
        o if o < -1 => format!("{} candles ago ", o.unsigned_abs()),
        _ => String::new(),
    }
}

fn or_missing(s: &str) -> &str {
    if s.trim().is_empty() { MISSING } else { s }
}

/// A position id or tag that narrows the selection, i.e. neither blank nor `_any`.
fn specific(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && *v != ANY_POSITION)
}

fn format_json_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => ConstantValue::Number(f).to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Renders an expression. Never fails.
pub fn expression_to_string(expr: &Expression, ctx: Option<&FormatContext>) -> String {
    ConditionFormatter::format_expression(expr, ctx.unwrap_or(&FormatContext::default()))
}

/// Renders a comparison. Never fails.
pub fn condition_to_string(condition: &Condition, ctx: Option<&FormatContext>) -> String {
    ConditionFormatter::format_condition(condition, ctx.unwrap_or(&FormatContext::default()))
}

/// Renders a group and its nested groups. Never fails.
pub fn group_condition_to_string(group: &GroupCondition, ctx: Option<&FormatContext>) -> String {
    ConditionFormatter::format_group(group, ctx.unwrap_or(&FormatContext::default()))
}
