//! Dump configuration
//!
//! Every formatting toggle the walker and renderer consult. Options are fixed
//! for the duration of one parse.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment: `SCENEDUMP_PRESET=terse`, `SCENEDUMP_COMPRESS_ARRAYS=false`
//! 2. Options file passed to the CLI (`--options dump.toml`)
//! 3. Preset chosen on the command line (`--preset verbose`)
//!
//! # Example Options File
//!
//! ```toml
//! xml_prefix = "unity"
//! include_untagged = true
//! compress_arrays = false
//! omit_container_policy = "always"
//! type_abbreviations = [["UnityEngine.", "µ."], ["System.", "§."]]
//! ignored_properties = ["m_Script"]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use scene_graph::{ObjectId, PropertyEntry};

use crate::error::{DumpError, Result};

/// Default namespace of the output document
pub const DEFAULT_NAMESPACE: &str = "urn:scene-dump:scene:1.0";

/// When a `components` or `properties` container is left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmitWhen {
    /// Keep the container even when it ends up empty
    Never,
    /// Drop the container only if it ends up empty
    IfEmpty,
    /// Never create the container; children go straight into the parent
    Always,
}

impl Default for OmitWhen {
    fn default() -> Self {
        Self::IfEmpty
    }
}

impl std::fmt::Display for OmitWhen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "never"),
            Self::IfEmpty => write!(f, "if_empty"),
            Self::Always => write!(f, "always"),
        }
    }
}

impl std::str::FromStr for OmitWhen {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" | "keep" => Ok(Self::Never),
            "if_empty" | "if-empty" | "ifempty" => Ok(Self::IfEmpty),
            "always" | "splice" => Ok(Self::Always),
            _ => Err(format!("Unknown omit policy: {}", s)),
        }
    }
}

/// Named option sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Default,
    /// Compact output: values as attributes, abbreviated types, compressed arrays
    Terse,
    /// Everything spelled out as elements
    Verbose,
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Terse => write!(f, "terse"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "" => Ok(Self::Default),
            "terse" | "compact" => Ok(Self::Terse),
            "verbose" | "full" => Ok(Self::Verbose),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}

/// Ordered literal `(pattern, replacement)` pairs.
///
/// Pairs apply left to right, each across the whole string, so later pairs
/// see the output of earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Abbreviations(Vec<(String, String)>);

impl Abbreviations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<P, R>(pairs: impl IntoIterator<Item = (P, R)>) -> Self
    where
        P: Into<String>,
        R: Into<String>,
    {
        Self(pairs.into_iter().map(|(p, r)| (p.into(), r.into())).collect())
    }

    pub fn push(&mut self, pattern: impl Into<String>, replacement: impl Into<String>) {
        self.0.push((pattern.into(), replacement.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    /// Apply every pair in order
    pub fn apply(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (pattern, replacement) in &self.0 {
            if !pattern.is_empty() && out.contains(pattern.as_str()) {
                out = out.replace(pattern.as_str(), replacement);
            }
        }
        out
    }
}

/// `None` is written as `""` so an options file can switch a tag off
mod optional_name {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}

fn default_redundant_properties() -> BTreeSet<String> {
    [
        "position",
        "localPosition",
        "eulerAngles",
        "localEulerAngles",
        "rotation",
        "localRotation",
        "localScale",
        "parent",
        "hasChanged",
        "tag",
        "name",
        "hideFlags",
        "right",
        "up",
        "forward",
        "hierarchyCapacity",
        "anchorMin",
        "anchorMax",
        "anchoredPosition",
        "sizeDelta",
        "pivot",
        "anchoredPosition3D",
        "offsetMin",
        "offsetMax",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_superclass_stop_types() -> BTreeSet<String> {
    [
        "System.Object",
        "UnityEngine.Object",
        "UnityEngine.Component",
        "UnityEngine.Behaviour",
        "UnityEngine.MonoBehaviour",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Complete dump configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpOptions {
    /// Prefix for every element name; `None` writes unprefixed names
    #[serde(with = "optional_name")]
    pub xml_prefix: Option<String>,
    /// Namespace declared on the root element; empty declares none
    pub xml_namespace: String,
    /// Write `tag` even for untagged nodes
    pub include_untagged: bool,
    /// Render compound values as an attribute string
    pub include_value_string_as_property: bool,
    /// Render compound values as discrete child elements
    pub include_value_as_discrete_elements: bool,
    /// Collapse a trailing run of equal array items into one `same-value`
    pub compress_arrays: bool,
    /// Container policy for `components` and `properties`
    pub omit_container_policy: OmitWhen,
    /// Wraps superclass entries; `None` lists them directly under the component
    #[serde(with = "optional_name")]
    pub superclass_container_tag: Option<String>,
    pub superclass_tag: String,
    /// Joins the superclass chain into one string instead of one element per base
    #[serde(with = "optional_name")]
    pub superclass_separator: Option<String>,
    /// A joined chain this long or shorter becomes an `extends` attribute
    pub superclass_inline_max: usize,
    /// Wraps interface entries; `None` lists them directly under the component
    #[serde(with = "optional_name")]
    pub interface_container_tag: Option<String>,
    pub interface_tag: String,
    /// Joins the interface list into one string instead of one element each
    #[serde(with = "optional_name")]
    pub interface_separator: Option<String>,
    /// A joined list this long or shorter becomes an `implements` attribute
    pub interface_inline_max: usize,
    /// Element name for script components; falls back to `tagname_behaviour`
    #[serde(with = "optional_name")]
    pub tagname_script: Option<String>,
    /// Element name for behaviours; falls back to `Component`
    #[serde(with = "optional_name")]
    pub tagname_behaviour: Option<String>,
    /// Base types at which the superclass listing stops
    pub superclass_stop_types: BTreeSet<String>,
    pub type_abbreviations: Abbreviations,
    pub value_abbreviations: Abbreviations,
    /// Only properties of these runtime types are written; `None` writes all
    pub property_types_to_include: Option<BTreeSet<String>>,
    /// Property names never written
    pub ignored_properties: BTreeSet<String>,
    /// Skip `redundant_properties`
    pub ignore_redundant_properties: bool,
    /// Derived properties already covered by transform output
    pub redundant_properties: BTreeSet<String>,
    /// Write properties holding embedded script source
    pub include_generated_script_source: bool,
    /// Runtime types that carry script source
    pub script_source_types: BTreeSet<String>,
    /// Graph depth at which the walk truncates a branch
    pub max_depth: usize,
    /// Object whose visits are logged and marked with a comment
    pub trace_id: Option<ObjectId>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            xml_prefix: None,
            xml_namespace: DEFAULT_NAMESPACE.to_string(),
            include_untagged: false,
            include_value_string_as_property: true,
            include_value_as_discrete_elements: false,
            compress_arrays: true,
            omit_container_policy: OmitWhen::IfEmpty,
            superclass_container_tag: Some("extends".to_string()),
            superclass_tag: "baseclass".to_string(),
            superclass_separator: None,
            superclass_inline_max: 0,
            interface_container_tag: Some("implements".to_string()),
            interface_tag: "interface".to_string(),
            interface_separator: None,
            interface_inline_max: 0,
            tagname_script: Some("MonoBehaviour".to_string()),
            tagname_behaviour: Some("Behaviour".to_string()),
            superclass_stop_types: default_superclass_stop_types(),
            type_abbreviations: Abbreviations::new(),
            value_abbreviations: Abbreviations::new(),
            property_types_to_include: None,
            ignored_properties: BTreeSet::new(),
            ignore_redundant_properties: true,
            redundant_properties: default_redundant_properties(),
            include_generated_script_source: false,
            script_source_types: ["MonoScript".to_string()].into_iter().collect(),
            max_depth: 128,
            trace_id: None,
        }
    }
}

impl DumpOptions {
    /// Options for a named preset
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Default => Self::default(),
            Preset::Terse => Self::terse(),
            Preset::Verbose => Self::verbose(),
        }
    }

    /// Compact output for reading diffs
    pub fn terse() -> Self {
        Self {
            include_untagged: false,
            xml_prefix: None,
            superclass_container_tag: None,
            superclass_tag: "extends".to_string(),
            interface_container_tag: None,
            interface_tag: "implements".to_string(),
            include_value_string_as_property: true,
            include_value_as_discrete_elements: false,
            compress_arrays: true,
            omit_container_policy: OmitWhen::Always,
            type_abbreviations: Abbreviations::from_pairs([
                ("UnityEngine.", "µ."),
                ("System.", "§."),
            ]),
            value_abbreviations: Abbreviations::from_pairs([("\n", " •¬ ")]),
            ..Self::default()
        }
    }

    /// Every value spelled out
    pub fn verbose() -> Self {
        Self {
            include_untagged: true,
            superclass_container_tag: Some("extends".to_string()),
            superclass_tag: "superclass".to_string(),
            interface_container_tag: Some("implements".to_string()),
            interface_tag: "interface".to_string(),
            include_value_string_as_property: false,
            include_value_as_discrete_elements: true,
            compress_arrays: false,
            omit_container_policy: OmitWhen::IfEmpty,
            ..Self::default()
        }
    }

    /// Parse options from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: Self =
            toml::from_str(content).map_err(|e| DumpError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        log::info!("Loaded dump options from {}", path.display());
        Ok(options)
    }

    /// Overlay the keys of a TOML document on these options
    ///
    /// Keys the document leaves out keep their current value, so a preset can
    /// serve as the base of an options file.
    pub fn merge_toml_str(&self, content: &str) -> Result<Self> {
        let overrides: toml::Table =
            toml::from_str(content).map_err(|e| DumpError::Config(e.to_string()))?;
        let mut merged = match toml::Value::try_from(self) {
            Ok(toml::Value::Table(table)) => table,
            Ok(_) => return Err(DumpError::Config("options did not serialize to a table".into())),
            Err(e) => return Err(DumpError::Config(e.to_string())),
        };
        merged.extend(overrides);

        let options: Self = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| DumpError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// [`merge_toml_str`](Self::merge_toml_str) over the contents of a file
    pub fn merge_file(&self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let options = self.merge_toml_str(&content)?;
        log::info!("Merged dump options from {}", path.display());
        Ok(options)
    }

    /// Apply `SCENEDUMP_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    ///
    /// `SCENEDUMP_PRESET` replaces the whole option set, so it is applied
    /// before the individual switches.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(preset) = lookup("SCENEDUMP_PRESET") {
            match preset.parse::<Preset>() {
                Ok(p) => {
                    *self = Self::preset(p);
                    log::info!("Preset from env: {}", p);
                }
                Err(e) => log::warn!("Ignoring SCENEDUMP_PRESET: {}", e),
            }
        }

        if let Some(value) = lookup("SCENEDUMP_COMPRESS_ARRAYS") {
            self.compress_arrays = value == "1" || value.eq_ignore_ascii_case("true");
            log::info!("Array compression from env: {}", self.compress_arrays);
        }

        if let Some(value) = lookup("SCENEDUMP_OMIT_CONTAINERS") {
            match value.parse() {
                Ok(policy) => self.omit_container_policy = policy,
                Err(e) => log::warn!("Ignoring SCENEDUMP_OMIT_CONTAINERS: {}", e),
            }
        }
    }

    /// Reject option sets the walker cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(DumpError::Config("max_depth must be at least 1".into()));
        }
        if self.superclass_tag.trim().is_empty() {
            return Err(DumpError::Config("superclass_tag must not be empty".into()));
        }
        if self.interface_tag.trim().is_empty() {
            return Err(DumpError::Config("interface_tag must not be empty".into()));
        }
        if let Some(prefix) = &self.xml_prefix {
            if prefix.contains(':') || prefix.contains(char::is_whitespace) {
                return Err(DumpError::Config(format!("invalid xml_prefix '{}'", prefix)));
            }
        }
        Ok(())
    }

    /// Whether a property survives the filters
    pub fn includes_property(&self, entry: &PropertyEntry) -> bool {
        if self.ignored_properties.contains(&entry.name) {
            return false;
        }
        if self.ignore_redundant_properties && self.redundant_properties.contains(&entry.name) {
            return false;
        }
        if !self.include_generated_script_source
            && self.script_source_types.contains(&entry.runtime_type)
        {
            return false;
        }
        match &self.property_types_to_include {
            Some(types) => types.contains(&entry.runtime_type),
            None => true,
        }
    }

    pub fn abbreviate_type(&self, type_name: &str) -> String {
        self.type_abbreviations.apply(type_name)
    }

    pub fn abbreviate_value(&self, value: &str) -> String {
        self.value_abbreviations.apply(value)
    }

    /// Log the active settings
    pub fn log_summary(&self) {
        log::info!("Dump options:");
        log::info!("  Prefix: {:?}", self.xml_prefix);
        log::info!("  Namespace: {}", self.xml_namespace);
        log::info!(
            "  Values: attribute={}, elements={}",
            self.include_value_string_as_property,
            self.include_value_as_discrete_elements
        );
        log::info!("  Compress arrays: {}", self.compress_arrays);
        if let Some(sep) = &self.superclass_separator {
            log::info!("  Superclasses joined by {:?}, inline up to {}", sep, self.superclass_inline_max);
        }
        if let Some(sep) = &self.interface_separator {
            log::info!("  Interfaces joined by {:?}, inline up to {}", sep, self.interface_inline_max);
        }
        log::info!("  Containers omitted: {}", self.omit_container_policy);
        log::info!(
            "  Abbreviations: {} type, {} value",
            self.type_abbreviations.len(),
            self.value_abbreviations.len()
        );
        if let Some(id) = self.trace_id {
            log::info!("  Tracing: {}", id);
        }
    }
}
