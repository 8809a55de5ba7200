//! Property tests for formatting, validation and group synchronization.
mod common;
use common::*;
use proptest::prelude::*;
use proptest::sample::{Index, select};
use senryaku::prelude::*;
use senryaku::sync::inconsistent_groups;

const OPERATORS: [ComparisonOperator; 10] = [
    ComparisonOperator::Equal,
    ComparisonOperator::NotEqual,
    ComparisonOperator::GreaterThan,
    ComparisonOperator::GreaterThanOrEqual,
    ComparisonOperator::LessThan,
    ComparisonOperator::LessThanOrEqual,
    ComparisonOperator::CrossesAbove,
    ComparisonOperator::CrossesBelow,
    ComparisonOperator::IsAbove,
    ComparisonOperator::IsBelow,
];

const ARITHMETIC: [ArithmeticOp; 7] = [
    ArithmeticOp::Add,
    ArithmeticOp::Subtract,
    ArithmeticOp::Multiply,
    ArithmeticOp::Divide,
    ArithmeticOp::Modulo,
    ArithmeticOp::IncreaseByPercent,
    ArithmeticOp::DecreaseByPercent,
];

const NODE_TYPES: [NodeType; 9] = [
    NodeType::Start,
    NodeType::Signal,
    NodeType::Entry,
    NodeType::Exit,
    NodeType::Alert,
    NodeType::Modify,
    NodeType::Retry,
    NodeType::End,
    NodeType::ForceEnd,
];

fn arb_expression() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        ("[A-Z]{0,4}", -3i32..=0).prop_map(|(name, offset)| Expression::indicator(name, offset)),
        (select(vec!["Open", "High", "Low", "Close"]), -3i32..=0)
            .prop_map(|(field, offset)| Expression::market_data(field, offset)),
        // Quarters survive a JSON round trip exactly.
        (-400i32..400).prop_map(|n| Expression::constant(f64::from(n) / 4.0)),
        select(ExpressionType::ALL.to_vec()).prop_map(default_expression),
        Just(Expression::Unknown),
    ];
    leaf.prop_recursive(3, 16, 2, |inner| {
        (select(ARITHMETIC.to_vec()), inner.clone(), inner)
            .prop_map(|(op, left, right)| Expression::complex(op, left, right))
    })
}

fn arb_condition() -> impl Strategy<Value = ConditionItem> {
    (
        proptest::option::of(arb_expression()),
        select(OPERATORS.to_vec()),
        proptest::option::of(arb_expression()),
    )
        .prop_map(|(lhs, operator, rhs)| {
            ConditionItem::from(Condition {
                lhs,
                rhs,
                ..Condition::new(Expression::Unknown, operator, Expression::Unknown)
            })
        })
}

fn arb_logic() -> impl Strategy<Value = GroupLogic> {
    prop_oneof![Just(GroupLogic::And), Just(GroupLogic::Or)]
}

fn arb_group() -> impl Strategy<Value = GroupCondition> {
    let leaf = (arb_logic(), prop::collection::vec(arb_condition(), 0..3))
        .prop_map(|(logic, items)| GroupCondition::new(logic, items));
    leaf.prop_recursive(2, 8, 3, |inner| {
        (
            arb_logic(),
            prop::collection::vec(
                prop_oneof![arb_condition(), inner.prop_map(ConditionItem::from)],
                0..3,
            ),
        )
            .prop_map(|(logic, items)| GroupCondition::new(logic, items))
    })
}

fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    prop::collection::vec(select(NODE_TYPES.to_vec()), 1..8)
        .prop_flat_map(|types| {
            let n = types.len();
            (Just(types), prop::collection::vec((0..n, 0..n), 0..12))
        })
        .prop_map(|(types, pairs)| {
            let nodes = types
                .into_iter()
                .enumerate()
                .map(|(i, node_type)| Node::new(format!("n{}", i), node_type))
                .collect();
            let edges = pairs
                .into_iter()
                .enumerate()
                .map(|(i, (s, t))| Edge::new(format!("e{}", i), format!("n{}", s), format!("n{}", t)))
                .collect();
            (nodes, edges)
        })
}

proptest! {
    #[test]
    fn prop_formatting_is_deterministic(group in arb_group(), symbol in "[A-Z]{0,6}") {
        let ctx = FormatContext::new().with_symbol(symbol);
        let first = ConditionFormatter::format_group(&group, &ctx);
        prop_assert_eq!(&first, &ConditionFormatter::format_group(&group, &ctx));
        prop_assert!(!first.is_empty());
    }

    #[test]
    fn prop_formatting_survives_save_and_load(group in arb_group()) {
        let json = serde_json::to_string(&group).unwrap();
        let loaded: GroupCondition = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(
            group_condition_to_string(&group, None),
            group_condition_to_string(&loaded, None)
        );
        prop_assert_eq!(group.condition_count(), loaded.condition_count());
    }

    #[test]
    fn prop_validation_is_deterministic((nodes, edges) in arb_graph()) {
        let first = validate_workflow(&nodes, &edges);
        let second = validate_workflow(&nodes, &edges);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.valid, first.errors.is_empty());
        prop_assert_eq!(
            first.has(FindingKind::MissingStart),
            !nodes.iter().any(|n| n.node_type == NodeType::Start)
        );
    }

    #[test]
    fn prop_budget_edit_keeps_groups_consistent(
        groups in prop::collection::vec(1u32..4, 1..8),
        pick in any::<Index>(),
        max_re_entries in 1u32..10,
    ) {
        // Every group starts consistent: its budget equals its number.
        let nodes: Vec<Node> = groups
            .iter()
            .enumerate()
            .map(|(i, &group)| {
                if i % 2 == 0 {
                    retry(&format!("r{}", i), group, group)
                } else {
                    exit(&format!("x{}", i), group, group, true)
                }
            })
            .collect();
        let target = nodes[pick.index(nodes.len())].id.clone();
        let target_group = groups[pick.index(groups.len())];

        let mut queue = SyncQueue::new(GraphDocument::new(nodes, Vec::new()));
        let report = queue
            .submit(SyncCommand::SetMaxReEntries { node_id: target, max_re_entries })
            .unwrap();
        prop_assert!(report.rejected.is_empty());

        let members = groups.iter().filter(|&&g| g == target_group).count();
        prop_assert_eq!(report.applied.len(), members);
        prop_assert!(inconsistent_groups(queue.store().nodes()).is_empty());
    }
}
