//! Dependency graph of declared resources

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::error::{StackError, StackResult};
use crate::resources::{Resource, ResourceId};

/// A declared resource and its edges
#[derive(Debug, Clone)]
pub struct Node {
    pub id: ResourceId,
    pub resource: Resource,
    /// Serialized `{"Type", "Properties"}` of the resource
    pub body: Value,
    /// Resources referenced from the properties
    pub references: BTreeSet<String>,
    /// Explicit ordering edges
    pub depends_on: BTreeSet<String>,
}

/// Logical ids referenced by `Ref` / `Fn::GetAtt` anywhere in `value`
///
/// Pseudo parameters (`AWS::*`) are not resources and are skipped.
#[must_use]
pub fn references(value: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect_references(value, &mut found);
    found
}

fn collect_references(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(id)) = map.get("Ref") {
                if !id.starts_with("AWS::") {
                    found.insert(id.clone());
                }
            }
            if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                if let Some(Value::String(id)) = parts.first() {
                    found.insert(id.clone());
                }
            }
            map.values().for_each(|v| collect_references(v, found));
        }
        Value::Array(items) => items.iter().for_each(|v| collect_references(v, found)),
        _ => {}
    }
}

/// Resources in declaration order, with reference and explicit dependency edges
///
/// Every edge points at an already declared resource and the graph stays acyclic: both are
/// checked when the edge is added.
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    nodes: Vec<Node>,
    index: BTreeMap<String, usize>,
}

impl ResourceGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a resource
    ///
    /// # Errors
    ///
    /// Returns `StackError::DuplicateId` if the id is taken, `StackError::UnknownReference` if
    /// the properties reference an undeclared resource, or `StackError::Serialization`
    pub fn add(&mut self, id: &str, resource: Resource) -> StackResult<ResourceId> {
        if self.index.contains_key(id) {
            return Err(StackError::DuplicateId(id.to_string()));
        }

        let body = serde_json::to_value(&resource)?;
        let references = references(&body);
        self.check_declared(id, &references)?;

        let resource_id = ResourceId(id.to_string());
        self.index.insert(id.to_string(), self.nodes.len());
        self.nodes.push(Node {
            id: resource_id.clone(),
            resource,
            body,
            references,
            depends_on: BTreeSet::new(),
        });

        tracing::debug!("Declared resource {id}");
        Ok(resource_id)
    }

    /// Adds an ordering edge: `dependent` is created after `dependency`
    ///
    /// # Errors
    ///
    /// Returns `StackError::UnknownReference` for an undeclared id and `StackError::Cycle` if
    /// the edge would close a cycle, in which case the graph is left unchanged
    pub fn add_dependency(
        &mut self,
        dependent: &ResourceId,
        dependency: &ResourceId,
    ) -> StackResult<()> {
        let position = self.position(dependent.as_str(), dependent.as_str())?;
        self.position(dependent.as_str(), dependency.as_str())?;

        let added = self.nodes[position]
            .depends_on
            .insert(dependency.as_str().to_string());

        if let Err(err) = self.topological_order() {
            if added {
                self.nodes[position].depends_on.remove(dependency.as_str());
            }
            return Err(err);
        }

        Ok(())
    }

    /// Fails on the first id in `ids` that has not been declared
    ///
    /// # Errors
    ///
    /// Returns `StackError::UnknownReference` naming `from` and the missing id
    pub fn check_declared<'a, I>(&self, from: &str, ids: I) -> StackResult<()>
    where
        I: IntoIterator<Item = &'a String>,
    {
        for reference in ids {
            self.position(from, reference)?;
        }
        Ok(())
    }

    fn position(&self, from: &str, id: &str) -> StackResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| StackError::UnknownReference {
                resource: from.to_string(),
                reference: id.to_string(),
            })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Kahn's algorithm; ties are broken by declaration order so the result is stable
    ///
    /// # Errors
    ///
    /// Returns `StackError::Cycle` with the ids that could not be ordered
    pub fn topological_order(&self) -> StackResult<Vec<&Node>> {
        let mut in_degree: Vec<usize> = Vec::with_capacity(self.nodes.len());
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];

        for (position, node) in self.nodes.iter().enumerate() {
            let edges: BTreeSet<&String> =
                node.references.iter().chain(node.depends_on.iter()).collect();
            in_degree.push(edges.len());
            for edge in edges {
                dependents[self.index[edge.as_str()]].push(position);
            }
        }

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &degree)| degree == 0)
            .map(|(position, _)| position)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(position) = ready.pop_first() {
            order.push(&self.nodes[position]);
            for &dependent in &dependents[position] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < self.nodes.len() {
            let cycle = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(position, _)| in_degree[*position] > 0)
                .map(|(_, node)| node.id.to_string())
                .collect();
            return Err(StackError::Cycle(cycle));
        }

        Ok(order)
    }
}
