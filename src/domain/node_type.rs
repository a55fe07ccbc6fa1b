//! Node type registry: which kinds exist, which may be roots, which children each allows.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Static description of one node kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeType {
    pub name: String,
    /// Names of types allowed as direct children, in display order
    #[serde(default)]
    pub allowed_children: Vec<String>,
    #[serde(default)]
    pub can_be_root: bool,
    #[serde(default)]
    pub description: String,
}

impl NodeType {
    pub fn new(name: &str, allowed_children: &[&str], can_be_root: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            allowed_children: allowed_children.iter().map(|s| s.to_string()).collect(),
            can_be_root,
            description: description.to_string(),
        }
    }

    pub fn allows_child(&self, type_name: &str) -> bool {
        self.allowed_children.iter().any(|c| c == type_name)
    }
}

/// On-disk schema layout: an ordered `[[types]]` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeTypeSchema {
    #[serde(default)]
    pub types: Vec<NodeType>,
}

/// Immutable table of node types, in declaration order.
///
/// Loaded once at startup and shared by reference; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct NodeTypeRegistry {
    types: Vec<NodeType>,
    by_name: HashMap<String, usize>,
}

impl NodeTypeRegistry {
    /// Build a registry, validating names and child references.
    pub fn new(types: Vec<NodeType>) -> DomainResult<Self> {
        let mut by_name = HashMap::with_capacity(types.len());
        for (i, t) in types.iter().enumerate() {
            if t.name.trim().is_empty() {
                return Err(DomainError::InvalidSchema(format!(
                    "type #{} has an empty name",
                    i + 1
                )));
            }
            if by_name.insert(t.name.clone(), i).is_some() {
                return Err(DomainError::InvalidSchema(format!(
                    "duplicate type name: {}",
                    t.name
                )));
            }
        }

        for t in &types {
            let mut seen = HashSet::new();
            for child in &t.allowed_children {
                if !by_name.contains_key(child) {
                    return Err(DomainError::InvalidSchema(format!(
                        "{} allows unknown child type {}",
                        t.name, child
                    )));
                }
                if !seen.insert(child) {
                    return Err(DomainError::InvalidSchema(format!(
                        "{} lists child type {} twice",
                        t.name, child
                    )));
                }
            }
        }

        Ok(Self { types, by_name })
    }

    /// The Account → Loan → Collateral schema.
    pub fn builtin() -> Self {
        let types = vec![
            NodeType::new(
                "Account",
                &["Loan", "Collateral"],
                true,
                "Customer account container",
            ),
            NodeType::new("Loan", &["Collateral"], true, "Loan issued to account"),
            NodeType::new("Collateral", &[], false, "Asset pledged against loan"),
        ];
        let by_name = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Self { types, by_name }
    }

    /// Parse a TOML schema (`[[types]]` tables).
    pub fn from_toml(content: &str) -> DomainResult<Self> {
        let schema: NodeTypeSchema =
            toml::from_str(content).map_err(|e| DomainError::InvalidSchema(e.to_string()))?;
        if schema.types.is_empty() {
            return Err(DomainError::InvalidSchema("no types declared".to_string()));
        }
        Self::new(schema.types)
    }

    pub fn lookup(&self, type_name: &str) -> DomainResult<&NodeType> {
        self.by_name
            .get(type_name)
            .map(|&i| &self.types[i])
            .ok_or_else(|| DomainError::UnknownType(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    /// Names of root-eligible types, in declaration order.
    pub fn root_eligible_types(&self) -> Vec<&str> {
        self.types
            .iter()
            .filter(|t| t.can_be_root)
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn types(&self) -> &[NodeType] {
        &self.types
    }

    pub fn to_schema(&self) -> NodeTypeSchema {
        NodeTypeSchema {
            types: self.types.clone(),
        }
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
