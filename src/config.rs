//! Navigation configuration
//!
//! The application configuration is a JSON-like tree. Navigation lives under
//! the top-level [`CONFIG_KEY`], one section per container:
//!
//! ```yaml
//! navigation:
//!   default:
//!     - label: Home
//!       route: home
//!     - label: Users
//!       route: user.list
//!       pages:
//!         - label: Me
//!           route: user.detail
//!           params: { id: "me" }
//!   footer: config/footer.yaml
//! ```
//!
//! A section is either a list of page definitions, a mapping whose values are
//! page definitions, or the path of a JSON/YAML file holding one of those.

use crate::error::{NavigationError, Result};
use crate::{debug_log, QueryParams, RouteParams};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Top-level configuration key holding navigation sections.
pub const CONFIG_KEY: &str = "navigation";

/// Name of the section used for the default container.
pub const DEFAULT_SECTION: &str = "default";

/// One entry of a navigation section.
///
/// Unknown keys are ignored so that rendering hints (CSS classes, titles, ...)
/// can live next to the routing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDefinition {
    /// Display label
    pub label: Option<String>,
    /// Fixed URI for pages without a route
    pub uri: Option<String>,
    /// Route name; its presence makes the page route-bound
    pub route: Option<String>,
    /// Route parameters
    #[serde(deserialize_with = "scalar_map")]
    pub params: BTreeMap<String, String>,
    /// Query string parameters
    #[serde(deserialize_with = "scalar_map")]
    pub query: BTreeMap<String, String>,
    /// Fragment without the leading `#`
    pub fragment: Option<String>,
    /// Force the page active
    pub active: bool,
    /// Name of an explicitly registered URL resolver to use instead of the default one
    pub url_resolver: Option<String>,
    /// Child pages
    pub pages: Vec<PageDefinition>,
}

impl PageDefinition {
    /// A route-bound page definition
    pub fn routed(route: impl Into<String>) -> Self {
        Self {
            route: Some(route.into()),
            ..Self::default()
        }
    }

    /// Route parameters as [`RouteParams`]
    pub fn route_params(&self) -> RouteParams {
        RouteParams::from_map(self.params.clone())
    }

    /// Query parameters as [`QueryParams`]
    pub fn query_params(&self) -> QueryParams {
        QueryParams::from_map(self.query.clone())
    }
}

/// The navigation part of the application configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationConfig {
    sections: Option<Map<String, Value>>,
}

impl NavigationConfig {
    /// Extract the navigation sections from the application configuration
    ///
    /// A missing or non-mapping [`CONFIG_KEY`] yields a configuration without
    /// sections; [`has_navigation_key`](Self::has_navigation_key) tells the two apart.
    pub fn from_value(config: &Value) -> Self {
        let sections = config
            .get(CONFIG_KEY)
            .and_then(Value::as_object)
            .cloned();
        Self { sections }
    }

    /// Load the application configuration from a JSON or YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let value = load_file(path.as_ref())?;
        Ok(Self::from_value(&value))
    }

    /// Whether the application configuration had a navigation mapping
    pub fn has_navigation_key(&self) -> bool {
        self.sections.is_some()
    }

    /// Section names, in configuration order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|sections| sections.keys().map(String::as_str))
            .collect()
    }

    /// Raw section value, looked up case-sensitively then lower-cased
    pub fn section(&self, name: &str) -> Option<&Value> {
        let sections = self.sections.as_ref()?;
        sections
            .get(name)
            .or_else(|| sections.get(&name.to_lowercase()))
    }

    /// Whether `name` resolves to a section
    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Parse the page definitions of the section `name`
    ///
    /// Returns `Ok(None)` when no such section exists.
    pub fn pages(&self, name: &str) -> Result<Option<Vec<PageDefinition>>> {
        self.section(name).map(pages_from_value).transpose()
    }
}

/// Parse a section value into page definitions.
///
/// Fails with `InvalidArgument` for a missing file, an unsupported file
/// extension, or a value that is neither a list, a mapping nor a path.
pub fn pages_from_value(value: &Value) -> Result<Vec<PageDefinition>> {
    match value {
        Value::String(path) => {
            let loaded = load_file(Path::new(path))?;
            match loaded {
                Value::Array(_) | Value::Object(_) => pages_from_value(&loaded),
                _ => Err(NavigationError::invalid_argument(format!(
                    "config file \"{}\" must contain a list or mapping of pages",
                    path
                ))),
            }
        }
        Value::Array(items) => items.iter().map(page_from_value).collect(),
        Value::Object(entries) => entries.values().map(page_from_value).collect(),
        _ => Err(NavigationError::invalid_argument(
            "invalid navigation config: expected a list of pages, a mapping, or a file name",
        )),
    }
}

fn page_from_value(value: &Value) -> Result<PageDefinition> {
    if !value.is_object() {
        return Err(NavigationError::invalid_argument(format!(
            "invalid page definition: expected a mapping, got {}",
            value
        )));
    }
    PageDefinition::deserialize(value).map_err(|e| {
        NavigationError::invalid_argument(format!("invalid page definition: {}", e))
    })
}

/// Parameter maps accept any scalar; numbers and booleans are stored in
/// their textual form so they compare equal to router-extracted strings.
fn scalar_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, Value>::deserialize(deserializer)?
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => Ok((key, text)),
            Value::Number(number) => Ok((key, number.to_string())),
            Value::Bool(flag) => Ok((key, flag.to_string())),
            other => Err(de::Error::custom(format!(
                "parameter '{}' must be a string, number or boolean, got {}",
                key, other
            ))),
        })
        .collect()
}

/// Read a JSON or YAML file, picking the format from the extension.
fn load_file(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(NavigationError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let contents = fs::read_to_string(path)?;
    debug_log!("Loading navigation config from {}", path.display());

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(&contents)?),
        _ => Err(NavigationError::invalid_argument(format!(
            "unsupported config file format: {}",
            path.display()
        ))),
    }
}
