use crate::error::{CatalogError, Result};
use crate::resolver::{ResolverRule, TopicResolver};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uxguide_search::{FieldSet, SearchConfig};

pub const DEFAULT_TOPIC: &str = "style";

/// Source file and field layout of one searchable table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    /// CSV path relative to the data directory.
    pub file: PathBuf,
    #[serde(flatten)]
    pub fields: FieldSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    pub file: PathBuf,
}

/// Immutable topic/stack configuration, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_topic")]
    pub default_topic: String,
    #[serde(default)]
    pub search: SearchConfig,
    pub topics: BTreeMap<String, TopicConfig>,
    #[serde(default)]
    pub stacks: BTreeMap<String, StackConfig>,
    /// Columns shared by every stack table.
    #[serde(default)]
    pub stack_fields: FieldSet,
    /// Keyword rules in priority order; earlier rules win ties.
    #[serde(default)]
    pub resolver: Vec<ResolverRule>,
}

fn default_topic() -> String {
    DEFAULT_TOPIC.to_string()
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Parse a TOML catalog and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.topics.contains_key(&self.default_topic) {
            return Err(CatalogError::InvalidConfig(format!(
                "default topic '{}' is not defined",
                self.default_topic
            )));
        }
        for (name, topic) in &self.topics {
            if topic.fields.search_fields.is_empty() {
                return Err(CatalogError::InvalidConfig(format!(
                    "topic '{name}' has no search fields"
                )));
            }
        }
        if !self.stacks.is_empty() && self.stack_fields.search_fields.is_empty() {
            return Err(CatalogError::InvalidConfig(
                "stacks are defined but stack_fields has no search fields".to_string(),
            ));
        }
        for rule in &self.resolver {
            if !self.topics.contains_key(&rule.topic) {
                return Err(CatalogError::InvalidConfig(format!(
                    "resolver rule references unknown topic '{}'",
                    rule.topic
                )));
            }
        }
        self.search
            .validate()
            .map_err(|err| CatalogError::InvalidConfig(err.to_string()))
    }

    pub fn topic(&self, name: &str) -> Result<&TopicConfig> {
        self.topics
            .get(name)
            .ok_or_else(|| CatalogError::UnknownTopic {
                name: name.to_string(),
                available: self.topic_names().join(", "),
            })
    }

    /// Stack table config; all stacks share [`Catalog::stack_fields`].
    pub fn stack(&self, name: &str) -> Result<TopicConfig> {
        let stack = self
            .stacks
            .get(name)
            .ok_or_else(|| CatalogError::UnknownStack {
                name: name.to_string(),
                available: self.stack_names().join(", "),
            })?;
        Ok(TopicConfig {
            file: stack.file.clone(),
            fields: self.stack_fields.clone(),
        })
    }

    pub fn topic_names(&self) -> Vec<&str> {
        self.topics.keys().map(String::as_str).collect()
    }

    pub fn stack_names(&self) -> Vec<&str> {
        self.stacks.keys().map(String::as_str).collect()
    }

    pub fn resolver(&self) -> TopicResolver {
        TopicResolver::new(self.resolver.clone(), self.default_topic.clone())
    }

    /// The nine UI/UX topics and eight framework stacks shipped with the tool.
    pub fn builtin() -> Self {
        let topics = [
            topic(
                "style",
                "styles.csv",
                &["Style Category", "Keywords", "Best For", "Type"],
                &[
                    "Style Category",
                    "Type",
                    "Keywords",
                    "Primary Colors",
                    "Effects & Animation",
                    "Best For",
                    "Performance",
                    "Accessibility",
                    "Framework Compatibility",
                    "Complexity",
                ],
            ),
            topic(
                "prompt",
                "prompts.csv",
                &[
                    "Style Category",
                    "AI Prompt Keywords (Copy-Paste Ready)",
                    "CSS/Technical Keywords",
                ],
                &[
                    "Style Category",
                    "AI Prompt Keywords (Copy-Paste Ready)",
                    "CSS/Technical Keywords",
                    "Implementation Checklist",
                ],
            ),
            topic(
                "color",
                "colors.csv",
                &["Product Type", "Keywords", "Notes"],
                &[
                    "Product Type",
                    "Keywords",
                    "Primary (Hex)",
                    "Secondary (Hex)",
                    "CTA (Hex)",
                    "Background (Hex)",
                    "Text (Hex)",
                    "Border (Hex)",
                    "Notes",
                ],
            ),
            topic(
                "chart",
                "charts.csv",
                &["Data Type", "Keywords", "Best Chart Type", "Accessibility Notes"],
                &[
                    "Data Type",
                    "Keywords",
                    "Best Chart Type",
                    "Secondary Options",
                    "Color Guidance",
                    "Accessibility Notes",
                    "Library Recommendation",
                    "Interactive Level",
                ],
            ),
            topic(
                "landing",
                "landing.csv",
                &[
                    "Pattern Name",
                    "Keywords",
                    "Conversion Optimization",
                    "Section Order",
                ],
                &[
                    "Pattern Name",
                    "Keywords",
                    "Section Order",
                    "Primary CTA Placement",
                    "Color Strategy",
                    "Conversion Optimization",
                ],
            ),
            topic(
                "product",
                "products.csv",
                &[
                    "Product Type",
                    "Keywords",
                    "Primary Style Recommendation",
                    "Key Considerations",
                ],
                &[
                    "Product Type",
                    "Keywords",
                    "Primary Style Recommendation",
                    "Secondary Styles",
                    "Landing Page Pattern",
                    "Dashboard Style (if applicable)",
                    "Color Palette Focus",
                ],
            ),
            topic(
                "ux",
                "ux-guidelines.csv",
                &["Category", "Issue", "Description", "Platform"],
                &[
                    "Category",
                    "Issue",
                    "Platform",
                    "Description",
                    "Do",
                    "Don't",
                    "Code Example Good",
                    "Code Example Bad",
                    "Severity",
                ],
            ),
            topic(
                "typography",
                "typography.csv",
                &[
                    "Font Pairing Name",
                    "Category",
                    "Mood/Style Keywords",
                    "Best For",
                    "Heading Font",
                    "Body Font",
                ],
                &[
                    "Font Pairing Name",
                    "Category",
                    "Heading Font",
                    "Body Font",
                    "Mood/Style Keywords",
                    "Best For",
                    "Google Fonts URL",
                    "CSS Import",
                    "Tailwind Config",
                    "Notes",
                ],
            ),
            topic(
                "pages",
                "pages.csv",
                &[
                    "Page Type",
                    "Keywords",
                    "Section Order",
                    "Key Components",
                    "Layout Pattern",
                    "Best For",
                ],
                &[
                    "Page Type",
                    "Keywords",
                    "Section Order",
                    "Key Components",
                    "Layout Pattern",
                    "Color Strategy",
                    "Recommended Effects",
                    "Best For",
                    "Considerations",
                ],
            ),
        ]
        .into_iter()
        .collect();

        let stacks = [
            "html-tailwind",
            "react",
            "nextjs",
            "vue",
            "svelte",
            "swiftui",
            "react-native",
            "flutter",
        ]
        .into_iter()
        .map(|name| {
            (
                name.to_string(),
                StackConfig {
                    file: PathBuf::from("stacks").join(format!("{name}.csv")),
                },
            )
        })
        .collect();

        let stack_fields = FieldSet::new(
            ["Category", "Guideline", "Description", "Do", "Don't"].to_vec(),
            [
                "Category",
                "Guideline",
                "Description",
                "Do",
                "Don't",
                "Code Good",
                "Code Bad",
                "Severity",
                "Docs URL",
            ]
            .to_vec(),
        );

        Self {
            default_topic: default_topic(),
            search: SearchConfig::default(),
            topics,
            stacks,
            stack_fields,
            resolver: TopicResolver::builtin_rules(),
        }
    }
}

fn topic(name: &str, file: &str, search: &[&str], output: &[&str]) -> (String, TopicConfig) {
    (
        name.to_string(),
        TopicConfig {
            file: PathBuf::from(file),
            fields: FieldSet::new(search.iter().copied(), output.iter().copied()),
        },
    )
}
