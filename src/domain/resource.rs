//! Resource domain types
//!
//! A **Resource** is one catalog entry describing an installable artifact
//! (agent, command, hook, template or server). Records are immutable once
//! loaded; every index in the crate is keyed by [`Resource::id`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::category::CategoryPath;

/// Resource type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Agent/subagent definition
    Agent,
    /// Slash command definition
    Command,
    /// Hook configuration
    Hook,
    /// Project template
    Template,
    /// MCP server configuration
    Server,
}

impl ResourceType {
    /// All resource types, in display order
    pub const ALL: [ResourceType; 5] = [
        ResourceType::Agent,
        ResourceType::Command,
        ResourceType::Hook,
        ResourceType::Template,
        ResourceType::Server,
    ];

    /// Lowercase tag used in catalog files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Agent => "agent",
            ResourceType::Command => "command",
            ResourceType::Hook => "hook",
            ResourceType::Template => "template",
            ResourceType::Server => "server",
        }
    }

    /// Directory name resources of this type are installed into
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceType::Agent => "agents",
            ResourceType::Command => "commands",
            ResourceType::Hook => "hooks",
            ResourceType::Template => "templates",
            ResourceType::Server => "servers",
        }
    }

    /// File extension of the installed artifact
    pub fn extension(self) -> &'static str {
        match self {
            ResourceType::Agent | ResourceType::Command | ResourceType::Template => "md",
            ResourceType::Hook | ResourceType::Server => "json",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == singular)
            .ok_or_else(|| format!("unknown resource type '{s}'"))
    }
}

/// Transport used to fetch a resource's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportScheme {
    /// Local file system path or `file://` URL
    File,
    /// HTTP(S) URL
    Https,
}

impl TransportScheme {
    /// Infer the scheme from a location string
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("https://") || location.starts_with("http://") {
            TransportScheme::Https
        } else {
            TransportScheme::File
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportScheme::File => "file",
            TransportScheme::Https => "https",
        }
    }
}

/// Where and how to fetch a resource's content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Fetch location (path or URL)
    pub location: String,

    /// Explicit transport; inferred from `location` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<TransportScheme>,

    /// Expected BLAKE3 checksum of the content (`blake3:<hex>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl SourceDescriptor {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            scheme: None,
            checksum: None,
        }
    }

    /// Transport scheme, explicit or inferred
    pub fn transport_scheme(&self) -> TransportScheme {
        self.scheme
            .unwrap_or_else(|| TransportScheme::from_location(&self.location))
    }

    /// Location with any `file://` prefix removed
    pub fn local_path(&self) -> &str {
        self.location
            .strip_prefix("file://")
            .unwrap_or(&self.location)
    }
}

/// A catalog entry describing one installable artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier (e.g., "development-team/frontend-developer")
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Resource type tag
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Fetch location and transport
    pub source: SourceDescriptor,

    /// Dependency name -> resource identifier
    ///
    /// Catalog files may also give a plain list of identifiers.
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_dependencies"
    )]
    pub dependencies: BTreeMap<String, String>,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Version string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Last update, seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencySpec {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

fn deserialize_dependencies<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match DependencySpec::deserialize(deserializer)? {
        DependencySpec::List(ids) => ids.into_iter().map(|id| (id.clone(), id)).collect(),
        DependencySpec::Map(map) => map,
    })
}

impl Resource {
    /// Create a new resource with no dependencies
    pub fn new(
        id: impl Into<String>,
        resource_type: ResourceType,
        location: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let name = CategoryPath::from_id(&id).leaf;
        Self {
            id,
            name,
            resource_type,
            source: SourceDescriptor::new(location),
            dependencies: BTreeMap::new(),
            description: String::new(),
            version: None,
            updated_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: u64) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.source.checksum = Some(checksum.into());
        self
    }

    /// Add a dependency; the dependency name doubles as the target identifier
    pub fn with_dependency(self, target: impl Into<String>) -> Self {
        let target = target.into();
        self.with_named_dependency(target.clone(), target)
    }

    pub fn with_named_dependency(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.dependencies.insert(name.into(), target.into());
        self
    }

    /// Identifiers this resource depends on, in dependency-name order
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.values().map(String::as_str)
    }

    /// Category path derived from the identifier
    pub fn category(&self) -> CategoryPath {
        CategoryPath::from_id(&self.id)
    }

    /// Display name, falling back to the identifier's leaf segment
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            self.category().leaf
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_from_str_accepts_plural() {
        assert_eq!("agents".parse::<ResourceType>(), Ok(ResourceType::Agent));
        assert_eq!("Hook".parse::<ResourceType>(), Ok(ResourceType::Hook));
        assert!("plugin".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_resource_type_serde_lowercase() {
        let json = serde_json::to_string(&ResourceType::Server).expect("serialize");
        assert_eq!(json, "\"server\"");
    }

    #[test]
    fn test_scheme_inferred_from_location() {
        assert_eq!(
            SourceDescriptor::new("https://example.com/a.md").transport_scheme(),
            TransportScheme::Https
        );
        assert_eq!(
            SourceDescriptor::new("file:///tmp/a.md").transport_scheme(),
            TransportScheme::File
        );
        assert_eq!(SourceDescriptor::new("file:///tmp/a.md").local_path(), "/tmp/a.md");
    }

    #[test]
    fn test_new_resource_names_itself_after_leaf() {
        let resource = Resource::new("dev/frontend/react-expert", ResourceType::Agent, "a.md");
        assert_eq!(resource.name, "react-expert");
        assert_eq!(resource.display_name(), "react-expert");
    }

    #[test]
    fn test_dependency_ids_follow_name_order() {
        let resource = Resource::new("web-server", ResourceType::Server, "s.json")
            .with_named_dependency("zz-client", "api-client")
            .with_named_dependency("aa-auth", "auth");
        let ids: Vec<&str> = resource.dependency_ids().collect();
        assert_eq!(ids, vec!["auth", "api-client"]);
    }

    #[test]
    fn test_resource_deserializes_from_yaml() {
        let yaml = r"
id: security/audit
type: command
source:
  location: commands/security/audit.md
dependencies:
  scanner: hooks/scanner
description: Run a security audit
";
        let resource: Resource = serde_yaml::from_str(yaml).expect("valid record");
        assert_eq!(resource.resource_type, ResourceType::Command);
        assert_eq!(resource.dependencies.get("scanner").map(String::as_str), Some("hooks/scanner"));
        assert!(resource.name.is_empty());
        assert_eq!(resource.display_name(), "audit");
    }

    #[test]
    fn test_dependencies_accept_plain_list() {
        let yaml = r"
id: web-server
type: server
source:
  location: servers/web.json
dependencies: [api-client, auth]
";
        let resource: Resource = serde_yaml::from_str(yaml).expect("valid record");
        let ids: Vec<&str> = resource.dependency_ids().collect();
        assert_eq!(ids, vec!["api-client", "auth"]);
    }
}
