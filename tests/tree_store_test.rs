//! Tests for TreeStore mutation rules and queries

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use rstest::rstest;

use loantree::domain::{
    DomainError, ExportSerializer, IdGenerator, NodeId, NodeTypeRegistry, SequentialIdGenerator,
    TreeStore,
};
use loantree::util::testing::init_test_setup;

/// Hands out a fixed list of ids, in order.
struct ScriptedIds(VecDeque<&'static str>);

impl IdGenerator for ScriptedIds {
    fn next_id(&mut self) -> NodeId {
        NodeId::from(self.0.pop_front().unwrap_or("overflow"))
    }
}

fn store() -> TreeStore {
    init_test_setup();
    TreeStore::with_id_generator(
        Arc::new(NodeTypeRegistry::builtin()),
        Box::new(SequentialIdGenerator::new("n")),
    )
}

#[test]
fn given_account_loan_collateral_when_building_and_deleting_then_store_empties() {
    // Arrange
    let mut store = TreeStore::with_id_generator(
        Arc::new(NodeTypeRegistry::builtin()),
        Box::new(ScriptedIds(VecDeque::from(["a1", "l1", "c1", "x1"]))),
    );

    // Act
    let a1 = store.add_root("Account").unwrap();
    let l1 = store.add_child(&a1, "Loan").unwrap();
    let c1 = store.add_child(&l1, "Collateral").unwrap();
    let bad_root = store.add_root("Collateral");
    let removed = store.delete_subtree(&a1).unwrap();
    let doc = ExportSerializer::default().serialize(&store);

    // Assert
    assert_eq!((a1.as_str(), l1.as_str(), c1.as_str()), ("a1", "l1", "c1"));
    assert_eq!(
        bad_root,
        Err(DomainError::InvalidRootType("Collateral".to_string()))
    );
    assert_eq!(removed, vec![a1, l1, c1]);
    assert!(store.is_empty());
    assert_eq!(doc.metadata.total_nodes, 0);
    assert_eq!(doc.metadata.total_edges, 0);
}

#[test]
fn given_three_level_chain_when_counting_descendants_then_matches_depth() {
    // Arrange
    let mut store = store();
    let a = store.add_root("Account").unwrap();
    let b = store.add_child(&a, "Loan").unwrap();
    let c = store.add_child(&b, "Collateral").unwrap();

    // Act / Assert
    assert_eq!(store.descendant_count(&a), 2);
    assert_eq!(store.descendant_count(&b), 1);
    assert_eq!(store.descendant_count(&c), 0);
}

#[rstest]
#[case("Account", "Loan", true)]
#[case("Account", "Collateral", true)]
#[case("Account", "Account", false)]
#[case("Loan", "Collateral", true)]
#[case("Loan", "Loan", false)]
#[case("Loan", "Account", false)]
#[case("Collateral", "Collateral", false)]
#[case("Collateral", "Loan", false)]
fn given_parent_type_when_adding_child_then_containment_rules_apply(
    #[case] parent_type: &str,
    #[case] child_type: &str,
    #[case] allowed: bool,
) {
    // Arrange
    let mut store = store();
    let root = store.add_root("Account").unwrap();
    let parent = match parent_type {
        "Account" => root,
        "Loan" => store.add_child(&root, "Loan").unwrap(),
        _ => store.add_child(&root, "Collateral").unwrap(),
    };
    let before = store.len();

    // Act
    let result = store.add_child(&parent, child_type);

    // Assert
    if allowed {
        let id = result.unwrap();
        assert_eq!(store.get(&id).unwrap().parent_id.as_ref(), Some(&parent));
        assert_eq!(store.len(), before + 1);
    } else {
        assert_eq!(
            result,
            Err(DomainError::DisallowedChildType {
                parent_type: parent_type.to_string(),
                child_type: child_type.to_string(),
            })
        );
        assert_eq!(store.len(), before);
    }
}

#[test]
fn given_unregistered_child_type_when_adding_then_disallowed() {
    let mut store = store();
    let a = store.add_root("Account").unwrap();

    let result = store.add_child(&a, "Mortgage");

    assert!(matches!(result, Err(DomainError::DisallowedChildType { .. })));
}

#[test]
fn given_missing_parent_when_adding_child_then_node_not_found() {
    let mut store = store();

    let result = store.add_child(&NodeId::from("ghost"), "Loan");

    assert_eq!(result, Err(DomainError::NodeNotFound(NodeId::from("ghost"))));
}

#[rstest]
#[case("Account", true)]
#[case("Loan", true)]
#[case("Collateral", false)]
fn given_type_when_adding_root_then_root_eligibility_applies(#[case] type_name: &str, #[case] ok: bool) {
    let mut store = store();
    assert_eq!(store.add_root(type_name).is_ok(), ok);
}

#[test]
fn given_unknown_type_when_adding_root_then_unknown_type() {
    let mut store = store();
    assert_eq!(
        store.add_root("Mortgage"),
        Err(DomainError::UnknownType("Mortgage".to_string()))
    );
}

#[test]
fn given_wide_forest_when_deleting_subtree_then_exactly_subtree_removed() {
    // Arrange
    let mut store = store();
    let a = store.add_root("Account").unwrap();
    let l1 = store.add_child(&a, "Loan").unwrap();
    let c1 = store.add_child(&l1, "Collateral").unwrap();
    let l2 = store.add_child(&a, "Loan").unwrap();
    let c2 = store.add_child(&l2, "Collateral").unwrap();
    let other = store.add_root("Loan").unwrap();
    let other_c = store.add_child(&other, "Collateral").unwrap();

    // Act
    let removed = store.delete_subtree(&l1).unwrap();

    // Assert
    let removed_set: HashSet<_> = removed.iter().cloned().collect();
    assert_eq!(removed_set, HashSet::from([l1.clone(), c1.clone()]));
    for remaining in store.all_nodes() {
        for child in store.children_of(&remaining.id) {
            assert!(!removed_set.contains(&child.id));
        }
    }
    for gone in &removed {
        assert_eq!(store.node(gone), Err(DomainError::NodeNotFound(gone.clone())));
        assert_eq!(
            store.add_child(gone, "Collateral"),
            Err(DomainError::NodeNotFound(gone.clone()))
        );
        assert_eq!(store.delete_subtree(gone), Err(DomainError::NodeNotFound(gone.clone())));
    }
    assert_eq!(store.len(), 5);
    assert!(store.contains(&c2));
    assert!(store.contains(&other_c));
    assert_eq!(store.all_edges().len(), 3);
}

#[test]
fn given_random_valid_operations_when_walking_parents_then_every_chain_ends_at_root() {
    // Arrange
    let mut store = store();
    let types = ["Account", "Loan", "Collateral"];
    let mut seed: u64 = 0x5eed;
    let mut next = move || {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (seed >> 33) as usize
    };

    // Act
    for _ in 0..300 {
        let ids: Vec<NodeId> = store.nodes().map(|n| n.id.clone()).collect();
        let type_name = types[next() % types.len()];
        match next() % 5 {
            0 => {
                let _ = store.add_root(type_name);
            }
            1 if !ids.is_empty() => {
                let _ = store.delete_subtree(&ids[next() % ids.len()]);
            }
            _ if !ids.is_empty() => {
                let _ = store.add_child(&ids[next() % ids.len()], type_name);
            }
            _ => {
                let _ = store.add_root("Account");
            }
        }
    }

    // Assert
    let registry = NodeTypeRegistry::builtin();
    for node in store.all_nodes() {
        let mut steps = 0;
        let mut current = node;
        while let Some(parent_id) = &current.parent_id {
            let parent = store.get(parent_id).expect("parent must be live");
            assert!(registry.lookup(&parent.node_type).unwrap().allows_child(&current.node_type));
            current = parent;
            steps += 1;
            assert!(steps <= store.len(), "cycle at {}", node.id);
        }
        assert!(registry.lookup(&current.node_type).unwrap().can_be_root);
    }
    let edges = store.all_edges();
    assert_eq!(edges.len(), store.all_nodes().iter().filter(|n| !n.is_root()).count());
    for edge in edges {
        assert_eq!(store.get(&edge.target).unwrap().parent_id.as_ref(), Some(&edge.source));
    }
}

#[test]
fn given_nested_node_when_listing_ancestors_then_nearest_first() {
    let mut store = store();
    let a = store.add_root("Account").unwrap();
    let l = store.add_child(&a, "Loan").unwrap();
    let c = store.add_child(&l, "Collateral").unwrap();

    assert_eq!(store.ancestors(&c), vec![l, a]);
}

#[test]
fn given_children_added_when_listing_then_insertion_order_kept() {
    let mut store = store();
    let a = store.add_root("Account").unwrap();
    let first = store.add_child(&a, "Collateral").unwrap();
    let second = store.add_child(&a, "Loan").unwrap();

    let children: Vec<_> = store.children_of(&a).into_iter().map(|n| n.id.clone()).collect();

    assert_eq!(children, vec![first, second]);
    assert!(store.children_of(&NodeId::from("ghost")).is_empty());
    assert_eq!(store.descendant_count(&NodeId::from("ghost")), 0);
}
