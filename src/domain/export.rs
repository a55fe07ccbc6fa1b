//! Export document: a mirror of the store's nodes and edges in insertion order.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{NodeId, Position};
use crate::domain::store::TreeStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub total_nodes: usize,
    pub total_edges: usize,
    /// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`
    pub exported_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    /// Serialized as `null` for roots
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

/// Converts store contents into an `ExportDocument`. Performs no validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportSerializer {
    pub include_positions: bool,
}

impl ExportSerializer {
    pub fn new(include_positions: bool) -> Self {
        Self { include_positions }
    }

    pub fn serialize(&self, store: &TreeStore) -> ExportDocument {
        self.serialize_at(store, Utc::now())
    }

    /// Deterministic for a given store and timestamp.
    pub fn serialize_at(&self, store: &TreeStore, exported_at: DateTime<Utc>) -> ExportDocument {
        let nodes: Vec<ExportNode> = store
            .nodes()
            .map(|n| ExportNode {
                id: n.id.clone(),
                node_type: n.node_type.clone(),
                parent_id: n.parent_id.clone(),
                position: self.include_positions.then_some(n.position),
            })
            .collect();
        let edges: Vec<ExportEdge> = store
            .all_edges()
            .into_iter()
            .map(|e| ExportEdge {
                id: e.id,
                source: e.source,
                target: e.target,
            })
            .collect();

        ExportDocument {
            metadata: ExportMetadata {
                total_nodes: nodes.len(),
                total_edges: edges.len(),
                exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::domain::ids::SequentialIdGenerator;
    use crate::domain::node_type::NodeTypeRegistry;

    fn store() -> TreeStore {
        TreeStore::with_id_generator(
            Arc::new(NodeTypeRegistry::builtin()),
            Box::new(SequentialIdGenerator::new("n")),
        )
    }

    #[test]
    fn given_small_tree_when_serializing_then_matches_wire_format() {
        // Arrange
        let mut store = store();
        let a = store.add_root("Account").unwrap();
        store.add_child(&a, "Loan").unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        // Act
        let doc = ExportSerializer::default().serialize_at(&store, at);
        let value = serde_json::to_value(&doc).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "metadata": {
                    "totalNodes": 2,
                    "totalEdges": 1,
                    "exportedAt": "2024-05-01T09:30:00.000Z"
                },
                "nodes": [
                    { "id": "n1", "type": "Account", "parentId": null },
                    { "id": "n2", "type": "Loan", "parentId": "n1" }
                ],
                "edges": [
                    { "id": "n1-n2", "source": "n1", "target": "n2" }
                ]
            })
        );
    }

    #[test]
    fn given_positions_enabled_when_serializing_then_nodes_carry_position() {
        let mut store = store();
        store.add_root("Loan").unwrap();

        let doc = ExportSerializer::new(true).serialize(&store);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["nodes"][0]["position"], json!({ "x": 0.0, "y": 0.0 }));
    }
}
