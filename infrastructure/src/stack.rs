//! A stack: resource graph, outputs and tags, synthesized into a template

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::environment::DeployTarget;
use crate::error::{StackError, StackResult};
use crate::graph::{self, ResourceGraph};
use crate::resources::{Resource, ResourceId, Token};
use crate::template::{Template, TemplateEntry};

/// A named value exported by the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub id: String,
    pub value: Token,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub description: String,
    pub target: DeployTarget,
    graph: ResourceGraph,
    outputs: Vec<Output>,
    tags: BTreeMap<String, String>,
}

impl Stack {
    #[must_use]
    pub fn new(name: &str, description: &str, target: DeployTarget) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            target,
            graph: ResourceGraph::new(),
            outputs: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Declares a resource
    ///
    /// # Errors
    ///
    /// See [`ResourceGraph::add`]
    pub fn add(&mut self, id: &str, resource: Resource) -> StackResult<ResourceId> {
        self.graph.add(id, resource)
    }

    /// See [`ResourceGraph::add_dependency`]
    ///
    /// # Errors
    ///
    /// Returns `StackError::UnknownReference` or `StackError::Cycle`
    pub fn add_dependency(
        &mut self,
        dependent: &ResourceId,
        dependency: &ResourceId,
    ) -> StackResult<()> {
        self.graph.add_dependency(dependent, dependency)
    }

    /// Exports a value
    ///
    /// # Errors
    ///
    /// Returns `StackError::DuplicateId` for a repeated output id and
    /// `StackError::UnknownReference` if the value references an undeclared resource
    pub fn add_output(&mut self, id: &str, value: Token, description: &str) -> StackResult<()> {
        if self.outputs.iter().any(|output| output.id == id) {
            return Err(StackError::DuplicateId(id.to_string()));
        }

        let references = graph::references(&serde_json::to_value(&value)?);
        self.graph.check_declared(id, &references)?;

        self.outputs.push(Output {
            id: id.to_string(),
            value,
            description: description.to_string(),
        });
        Ok(())
    }

    /// Tags every resource of the stack
    pub fn tag(&mut self, key: &str, value: &str) {
        self.tags.insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub const fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    #[must_use]
    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    #[must_use]
    pub const fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    fn tag_list(&self) -> Value {
        self.tags
            .iter()
            .map(|(key, value)| json!({ "Key": key, "Value": value }))
            .collect()
    }

    /// Renders the template, resources in topological order
    ///
    /// # Errors
    ///
    /// Returns `StackError::Cycle` if the graph cannot be ordered, or
    /// `StackError::Serialization`
    pub fn synth(&self) -> StackResult<Template> {
        let tags = self.tag_list();
        let mut resources = Vec::with_capacity(self.graph.len());

        for node in self.graph.topological_order()? {
            let mut body = match node.body.clone() {
                Value::Object(map) => map,
                other => {
                    let mut map = Map::new();
                    map.insert("Properties".to_string(), other);
                    map
                }
            };

            if !self.tags.is_empty() {
                if let Some(Value::Object(properties)) = body.get_mut("Properties") {
                    properties.insert("Tags".to_string(), tags.clone());
                }
            }
            if !node.depends_on.is_empty() {
                body.insert("DependsOn".to_string(), json!(node.depends_on));
            }
            if let Some(policy) = node.resource.removal_policy() {
                body.insert(
                    "DeletionPolicy".to_string(),
                    Value::String(policy.deletion_policy().to_string()),
                );
            }

            resources.push(TemplateEntry {
                id: node.id.to_string(),
                body: Value::Object(body),
            });
        }

        let outputs = self
            .outputs
            .iter()
            .map(|output| -> StackResult<TemplateEntry> {
                Ok(TemplateEntry {
                    id: output.id.clone(),
                    body: json!({
                        "Description": output.description,
                        "Value": serde_json::to_value(&output.value)?,
                    }),
                })
            })
            .collect::<StackResult<Vec<_>>>()?;

        tracing::info!(
            "Synthesized {} with {} resources and {} outputs",
            self.name,
            resources.len(),
            outputs.len()
        );

        Ok(Template {
            description: self.description.clone(),
            account: self.target.account.clone(),
            region: self.target.region.clone(),
            resources,
            outputs,
        })
    }
}
