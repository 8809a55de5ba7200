use super::id::generate_id;
use ahash::AHashSet;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard used by position and execution references to mean "any position".
pub const ANY_POSITION: &str = "_any";

/// A value in the condition language.
///
/// The set of variants is closed; the formatter and the validator match on every case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Indicator(IndicatorRef),
    MarketData(MarketDataRef),
    Constant(ConstantExpr),
    TimeFunction(TimeFunctionExpr),
    PositionData(PositionDataRef),
    StrategyMetric(StrategyMetricRef),
    ExecutionData(ExecutionDataRef),
    ExternalTrigger(ExternalTriggerRef),
    /// Arithmetic combination of two sub-expressions.
    #[serde(rename = "expression")]
    Complex(ComplexExpr),
    /// An expression whose `type` is not part of the language. Kept so a
    /// half-edited document still loads; it renders as a placeholder.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRef {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(default)]
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataRef {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub offset: i32,
    #[serde(
        default,
        alias = "subIndicator",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_indicator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantExpr {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub value: ConstantValue,
}

/// A literal operand. Hosts store either a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Number(f64),
    Text(String),
}

impl Default for ConstantValue {
    fn default() -> Self {
        ConstantValue::Number(0.0)
    }
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Number(n) => {
                // Whole numbers past 2^53 are not exact integers; print them as floats.
                if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            ConstantValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeFunctionExpr {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub function: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionDataRef {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetricRef {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionDataRef {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpi: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTriggerRef {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub trigger_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexExpr {
    #[serde(default = "generate_id")]
    pub id: String,
    #[serde(default)]
    pub operation: ArithmeticOp,
    #[serde(default, deserialize_with = "lenient_boxed")]
    pub left: Option<Box<Expression>>,
    #[serde(default, deserialize_with = "lenient_boxed")]
    pub right: Option<Box<Expression>>,
}

/// Operators available to the arithmetic expression variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArithmeticOp {
    #[default]
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "%")]
    Modulo,
    /// `left` increased by `right` percent.
    #[serde(rename = "+%")]
    IncreaseByPercent,
    /// `left` decreased by `right` percent.
    #[serde(rename = "-%")]
    DecreaseByPercent,
}

impl ArithmeticOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "%",
            ArithmeticOp::IncreaseByPercent => "+%",
            ArithmeticOp::DecreaseByPercent => "-%",
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expression {
    /// The id of this expression, or `None` for the `Unknown` placeholder.
    pub fn id(&self) -> Option<&str> {
        match self {
            Expression::Indicator(e) => Some(&e.id),
            Expression::MarketData(e) => Some(&e.id),
            Expression::Constant(e) => Some(&e.id),
            Expression::TimeFunction(e) => Some(&e.id),
            Expression::PositionData(e) => Some(&e.id),
            Expression::StrategyMetric(e) => Some(&e.id),
            Expression::ExecutionData(e) => Some(&e.id),
            Expression::ExternalTrigger(e) => Some(&e.id),
            Expression::Complex(e) => Some(&e.id),
            Expression::Unknown => None,
        }
    }

    /// Collects the names of every indicator referenced in this tree.
    pub fn referenced_indicators(&self, names: &mut AHashSet<String>) {
        match self {
            Expression::Indicator(IndicatorRef { name, .. }) if !name.is_empty() => {
                names.insert(name.clone());
            }
            Expression::Complex(ComplexExpr { left, right, .. }) => {
                for child in [left, right].into_iter().flatten() {
                    child.referenced_indicators(names);
                }
            }
            Expression::Indicator(_)
            | Expression::MarketData(_)
            | Expression::Constant(_)
            | Expression::TimeFunction(_)
            | Expression::PositionData(_)
            | Expression::StrategyMetric(_)
            | Expression::ExecutionData(_)
            | Expression::ExternalTrigger(_)
            | Expression::Unknown => {}
        }
    }
}

/// Loads an optional expression slot without failing the surrounding document.
///
/// Anything that is not a loadable expression becomes `None`.
pub(crate) fn lenient_expression<'de, D>(deserializer: D) -> Result<Option<Expression>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value::<Expression>(value) {
        Ok(expr) => Some(expr),
        Err(e) => {
            log::debug!("Dropping unreadable expression slot: {}", e);
            None
        }
    }))
}

fn lenient_boxed<'de, D>(deserializer: D) -> Result<Option<Box<Expression>>, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_expression(deserializer).map(|e| e.map(Box::new))
}
