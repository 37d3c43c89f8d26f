use serde::{Deserialize, Serialize};

/// Keywords that vote for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverRule {
    pub topic: String,
    pub keywords: Vec<String>,
}

impl ResolverRule {
    pub fn new(topic: &str, keywords: &[&str]) -> Self {
        Self {
            topic: topic.to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
        }
    }

    /// Number of keywords occurring as substrings of the lowercased query.
    fn hits(&self, query_lower: &str) -> usize {
        self.keywords
            .iter()
            .filter(|keyword| query_lower.contains(keyword.to_lowercase().as_str()))
            .count()
    }
}

/// Picks a topic for a query when the caller did not name one.
///
/// Each rule scores one point per keyword found in the query. The highest score
/// wins, earlier rules win ties, and a query matching nothing falls back to the
/// default topic.
#[derive(Debug, Clone)]
pub struct TopicResolver {
    rules: Vec<ResolverRule>,
    default_topic: String,
}

impl TopicResolver {
    pub fn new(rules: Vec<ResolverRule>, default_topic: impl Into<String>) -> Self {
        Self {
            rules,
            default_topic: default_topic.into(),
        }
    }

    pub fn resolve(&self, query: &str) -> &str {
        let query_lower = query.to_lowercase();
        let mut best: Option<(&ResolverRule, usize)> = None;
        for rule in &self.rules {
            let hits = rule.hits(&query_lower);
            if hits > best.map_or(0, |(_, score)| score) {
                best = Some((rule, hits));
            }
        }
        match best {
            Some((rule, _)) => &rule.topic,
            None => &self.default_topic,
        }
    }

    pub fn rules(&self) -> &[ResolverRule] {
        &self.rules
    }

    pub(crate) fn builtin_rules() -> Vec<ResolverRule> {
        vec![
            ResolverRule::new("color", &["color", "palette", "hex", "#", "rgb"]),
            ResolverRule::new(
                "chart",
                &[
                    "chart",
                    "graph",
                    "visualization",
                    "trend",
                    "bar",
                    "pie",
                    "scatter",
                    "heatmap",
                    "funnel",
                ],
            ),
            ResolverRule::new(
                "landing",
                &[
                    "landing",
                    "page",
                    "cta",
                    "conversion",
                    "hero",
                    "testimonial",
                    "pricing",
                    "section",
                ],
            ),
            ResolverRule::new(
                "product",
                &[
                    "saas",
                    "ecommerce",
                    "e-commerce",
                    "fintech",
                    "healthcare",
                    "gaming",
                    "portfolio",
                    "crypto",
                    "dashboard",
                ],
            ),
            ResolverRule::new(
                "prompt",
                &[
                    "prompt",
                    "css",
                    "implementation",
                    "variable",
                    "checklist",
                    "tailwind",
                ],
            ),
            ResolverRule::new(
                "style",
                &[
                    "style",
                    "design",
                    "ui",
                    "minimalism",
                    "glassmorphism",
                    "neumorphism",
                    "brutalism",
                    "dark mode",
                    "flat",
                    "aurora",
                ],
            ),
            ResolverRule::new(
                "ux",
                &[
                    "ux",
                    "usability",
                    "accessibility",
                    "wcag",
                    "touch",
                    "scroll",
                    "animation",
                    "keyboard",
                    "navigation",
                    "mobile",
                ],
            ),
            ResolverRule::new(
                "typography",
                &["font", "typography", "heading", "serif", "sans"],
            ),
            ResolverRule::new(
                "pages",
                &[
                    "page", "home", "homepage", "about", "post", "article", "blog", "category",
                    "pricing", "faq", "contact", "product", "shop", "catalog", "details",
                    "single",
                ],
            ),
        ]
    }
}
