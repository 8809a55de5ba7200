use crate::graph::NodeData;
use ahash::AHashMap;
use serde_json::{Map, Value};

/// Node data the formatter may consult to make output more specific.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatContext {
    /// Instrument symbol used in place of `Instrument` for market data.
    pub symbol: Option<String>,
    /// Indicator name -> parameters, kept in the order the user entered them.
    pub indicator_parameters: AHashMap<String, Map<String, Value>>,
}

impl FormatContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_indicator_parameters(
        mut self,
        indicator: impl Into<String>,
        parameters: Map<String, Value>,
    ) -> Self {
        self.indicator_parameters
            .insert(indicator.into(), parameters);
        self
    }

    /// Reads `symbol` and `indicatorParameters` from a node's data.
    ///
    /// Blank symbols and parameter entries that are not objects are ignored.
    pub fn from_node_data(data: &NodeData) -> Self {
        let symbol = data
            .symbol
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .cloned();
        let indicator_parameters = data
            .indicator_parameters
            .iter()
            .flatten()
            .filter_map(|(name, params)| params.as_object().map(|p| (name.clone(), p.clone())))
            .collect();
        Self {
            symbol,
            indicator_parameters,
        }
    }
}
