//! Common test utilities for building strategy graphs.
use senryaku::graph::{ExitNodeData, ReEntryConfig, RetryConfig};
use senryaku::prelude::*;

/// A start node trading `symbol` with one indicator configured.
#[allow(dead_code)]
pub fn start(id: &str, symbol: &str) -> Node {
    let mut node = Node::new(id, NodeType::Start);
    node.data.symbol = Some(symbol.to_string());
    node.data.indicators = Some(vec![serde_json::json!("RSI")]);
    node
}

/// A signal node with one default (non-empty) condition group.
#[allow(dead_code)]
pub fn signal(id: &str) -> Node {
    Node::new(id, NodeType::Signal)
}

#[allow(dead_code)]
pub fn end(id: &str) -> Node {
    Node::new(id, NodeType::End)
}

#[allow(dead_code)]
pub fn retry(id: &str, group_number: u32, max_re_entries: u32) -> Node {
    let mut node = Node::new(id, NodeType::Retry);
    node.data.retry_config = Some(RetryConfig {
        group_number,
        max_re_entries,
    });
    node
}

#[allow(dead_code)]
pub fn exit(id: &str, group_number: u32, max_re_entries: u32, enabled: bool) -> Node {
    let mut node = Node::new(id, NodeType::Exit);
    node.data.exit_node_data = Some(ExitNodeData {
        re_entry_config: Some(ReEntryConfig {
            enabled,
            group_number,
            max_re_entries,
        }),
        extra: Default::default(),
    });
    node
}

/// An edge with id `source->target`.
#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> Edge {
    Edge::new(format!("{}->{}", source, target), source, target)
}

/// `start(A) -> signal(B) -> end(C)`, the smallest valid strategy.
#[allow(dead_code)]
pub fn create_happy_path() -> (Vec<Node>, Vec<Edge>) {
    (
        vec![start("A", "AAPL"), signal("B"), end("C")],
        vec![edge("A", "B"), edge("B", "C")],
    )
}

/// A saved strategy as the editor exports it, including view state the core ignores.
#[allow(dead_code)]
pub const STRATEGY_JSON: &str = r#"{
  "nodes": [
    {
      "id": "start-1",
      "type": "start",
      "position": { "x": 0, "y": 0 },
      "data": {
        "label": "Start",
        "symbol": "BTCUSDT",
        "timeframe": "15m",
        "indicators": ["RSI", "SMA"],
        "indicatorParameters": {
          "RSI": { "period": 14, "source": "close" },
          "SMA": { "period": 50 }
        }
      }
    },
    {
      "id": "signal-1",
      "type": "signal",
      "data": {
        "label": "Oversold",
        "conditions": [
          {
            "id": "g1",
            "groupLogic": "AND",
            "conditions": [
              {
                "id": "c1",
                "lhs": { "type": "indicator", "id": "e1", "name": "RSI", "offset": 0 },
                "operator": "<",
                "rhs": { "type": "constant", "id": "e2", "value": 30 }
              },
              {
                "id": "g2",
                "groupLogic": "OR",
                "conditions": [
                  {
                    "id": "c2",
                    "lhs": { "type": "market_data", "id": "e3", "field": "Close", "offset": -1 },
                    "operator": "crosses above",
                    "rhs": { "type": "indicator", "id": "e4", "name": "SMA", "offset": 0 }
                  },
                  {
                    "id": "c3",
                    "lhs": { "type": "position_data", "id": "e5", "field": "unrealizedPnl", "vpi": "_any", "vpt": "_any" },
                    "operator": ">",
                    "rhs": { "type": "constant", "id": "e6", "value": 0 }
                  }
                ]
              }
            ]
          }
        ]
      }
    },
    {
      "id": "entry-1",
      "type": "entry",
      "data": { "label": "Buy", "actionType": "buy", "quantity": 1 }
    },
    {
      "id": "exit-1",
      "type": "exit",
      "data": {
        "exitCondition": "all",
        "exitNodeData": {
          "orderType": "market",
          "reEntryConfig": { "enabled": true, "groupNumber": 1, "maxReEntries": 2 }
        }
      }
    },
    {
      "id": "retry-1",
      "type": "retry",
      "data": { "retryConfig": { "groupNumber": 1, "maxReEntries": 2 } }
    },
    { "id": "end-1", "type": "end", "data": {} }
  ],
  "edges": [
    { "id": "e-1", "source": "start-1", "target": "signal-1" },
    { "id": "e-2", "source": "signal-1", "target": "entry-1" },
    { "id": "e-3", "source": "entry-1", "target": "exit-1" },
    { "id": "e-4", "source": "exit-1", "target": "retry-1" },
    { "id": "e-5", "source": "retry-1", "target": "end-1", "animated": true }
  ]
}"#;
