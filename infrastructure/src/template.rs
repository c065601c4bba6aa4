//! Synthesized template document

use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

/// A keyed entry whose position in the document is significant
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateEntry {
    pub id: String,
    pub body: Value,
}

/// Output of synthesis, handed to the provisioning engine
///
/// The document uses the engine's own resource schema. It borrows the `Resources`/`Outputs`
/// layout and the `Ref`/`Fn::GetAtt`/`Fn::Join` intrinsics from CloudFormation but is not a
/// CloudFormation template, so it carries no `AWSTemplateFormatVersion`. Resources and outputs
/// serialize as JSON objects that keep their order.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub description: String,
    pub account: Option<String>,
    pub region: String,
    pub resources: Vec<TemplateEntry>,
    pub outputs: Vec<TemplateEntry>,
}

struct Entries<'a>(&'a [TemplateEntry]);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.id, &entry.body)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Environment<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<&'a str>,
    region: &'a str,
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("Description", &self.description)?;
        map.serialize_entry(
            "Environment",
            &Environment {
                account: self.account.as_deref(),
                region: &self.region,
            },
        )?;
        map.serialize_entry("Resources", &Entries(&self.resources))?;
        map.serialize_entry("Outputs", &Entries(&self.outputs))?;
        map.end()
    }
}

impl Template {
    /// Logical ids in document order
    #[must_use]
    pub fn resource_ids(&self) -> Vec<&str> {
        self.resources.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[must_use]
    pub fn resource(&self, id: &str) -> Option<&Value> {
        self.resources
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.body)
    }

    #[must_use]
    pub fn output(&self, id: &str) -> Option<&Value> {
        self.outputs
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.body)
    }

    /// Pretty-printed JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
