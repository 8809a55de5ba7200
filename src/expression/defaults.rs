use super::id::generate_id;
use super::model::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of expression kinds a host can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionType {
    Indicator,
    MarketData,
    Constant,
    TimeFunction,
    PositionData,
    StrategyMetric,
    ExecutionData,
    ExternalTrigger,
    Expression,
}

impl ExpressionType {
    pub const ALL: [ExpressionType; 9] = [
        ExpressionType::Indicator,
        ExpressionType::MarketData,
        ExpressionType::Constant,
        ExpressionType::TimeFunction,
        ExpressionType::PositionData,
        ExpressionType::StrategyMetric,
        ExpressionType::ExecutionData,
        ExpressionType::ExternalTrigger,
        ExpressionType::Expression,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionType::Indicator => "indicator",
            ExpressionType::MarketData => "market_data",
            ExpressionType::Constant => "constant",
            ExpressionType::TimeFunction => "time_function",
            ExpressionType::PositionData => "position_data",
            ExpressionType::StrategyMetric => "strategy_metric",
            ExpressionType::ExecutionData => "execution_data",
            ExpressionType::ExternalTrigger => "external_trigger",
            ExpressionType::Expression => "expression",
        }
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised names map to `Constant`, matching what a fresh operand defaults to.
impl From<&str> for ExpressionType {
    fn from(name: &str) -> Self {
        ExpressionType::ALL
            .into_iter()
            .find(|t| t.as_str() == name)
            .unwrap_or_else(|| {
                log::debug!(
                    "Unknown expression type '{}', falling back to constant",
                    name
                );
                ExpressionType::Constant
            })
    }
}

impl Expression {
    /// The kind of this expression. `Unknown` reports as `Constant`.
    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Expression::Indicator(_) => ExpressionType::Indicator,
            Expression::MarketData(_) => ExpressionType::MarketData,
            Expression::Constant(_) | Expression::Unknown => ExpressionType::Constant,
            Expression::TimeFunction(_) => ExpressionType::TimeFunction,
            Expression::PositionData(_) => ExpressionType::PositionData,
            Expression::StrategyMetric(_) => ExpressionType::StrategyMetric,
            Expression::ExecutionData(_) => ExpressionType::ExecutionData,
            Expression::ExternalTrigger(_) => ExpressionType::ExternalTrigger,
            Expression::Complex(_) => ExpressionType::Expression,
        }
    }

    /// A numeric constant with a fresh id.
    pub fn constant(value: f64) -> Self {
        Expression::Constant(ConstantExpr {
            id: generate_id(),
            value: ConstantValue::Number(value),
        })
    }

    /// A market data reference with a fresh id.
    pub fn market_data(field: impl Into<String>, offset: i32) -> Self {
        Expression::MarketData(MarketDataRef {
            id: generate_id(),
            field: field.into(),
            offset,
            sub_indicator: None,
        })
    }

    /// An indicator reference with a fresh id.
    pub fn indicator(name: impl Into<String>, offset: i32) -> Self {
        Expression::Indicator(IndicatorRef {
            id: generate_id(),
            name: name.into(),
            parameter: None,
            offset,
        })
    }

    /// Combines two expressions arithmetically under a fresh id.
    pub fn complex(operation: ArithmeticOp, left: Expression, right: Expression) -> Self {
        Expression::Complex(ComplexExpr {
            id: generate_id(),
            operation,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        })
    }
}

/// Builds a new default expression of the requested kind.
///
/// Each call generates new ids, so two results compare equal only after their ids are
/// ignored.
pub fn default_expression(expression_type: ExpressionType) -> Expression {
    match expression_type {
        ExpressionType::Indicator => Expression::indicator("", 0),
        ExpressionType::MarketData => Expression::market_data("Close", 0),
        ExpressionType::Constant => Expression::constant(0.0),
        ExpressionType::TimeFunction => Expression::TimeFunction(TimeFunctionExpr {
            id: generate_id(),
            function: "today".to_string(),
            parameters: None,
        }),
        ExpressionType::PositionData => Expression::PositionData(PositionDataRef {
            id: generate_id(),
            field: "unrealizedPnl".to_string(),
            vpi: Some(ANY_POSITION.to_string()),
            vpt: Some(ANY_POSITION.to_string()),
        }),
        ExpressionType::StrategyMetric => Expression::StrategyMetric(StrategyMetricRef {
            id: generate_id(),
            metric: "totalPnl".to_string(),
        }),
        ExpressionType::ExecutionData => Expression::ExecutionData(ExecutionDataRef {
            id: generate_id(),
            field: "fillPrice".to_string(),
            vpi: None,
        }),
        ExpressionType::ExternalTrigger => Expression::ExternalTrigger(ExternalTriggerRef {
            id: generate_id(),
            trigger_type: "webhook".to_string(),
        }),
        ExpressionType::Expression => Expression::complex(
            ArithmeticOp::Add,
            default_expression(ExpressionType::Constant),
            default_expression(ExpressionType::Constant),
        ),
    }
}
