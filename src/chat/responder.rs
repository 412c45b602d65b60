//! Canned answer generation
//!
//! Questions are routed to one of five fixed tables by keyword. Routing
//! lower-cases the question and checks substrings in a fixed priority
//! order; the first topic with a matching keyword wins.

use crate::chat::types::Table;
use crate::config::ChatConfig;
use std::fmt;

/// Answer topic selected for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    ProgrammingLanguages,
    AiModels,
    WebFrameworks,
    CloudProviders,
    General,
}

/// Keyword rules in priority order
const ROUTES: &[(&[&str], Topic)] = &[
    (&["programming", "language"], Topic::ProgrammingLanguages),
    (&["ai", "model"], Topic::AiModels),
    (&["framework", "web"], Topic::WebFrameworks),
    (&["cloud", "provider"], Topic::CloudProviders),
];

impl Topic {
    /// Pick the topic for a question
    ///
    /// Matching is plain substring search, so "ai" also matches inside
    /// words such as "maintain".
    ///
    /// # Examples
    ///
    /// ```
    /// use tablechat::chat::Topic;
    ///
    /// assert_eq!(
    ///     Topic::route("Tell me about programming languages"),
    ///     Topic::ProgrammingLanguages
    /// );
    /// assert_eq!(Topic::route("Best cloud provider?"), Topic::CloudProviders);
    /// assert_eq!(Topic::route("hello"), Topic::General);
    /// ```
    pub fn route(question: &str) -> Self {
        let lower = question.to_lowercase();
        ROUTES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(_, topic)| *topic)
            .unwrap_or(Topic::General)
    }

    /// The fixed table answering this topic
    pub fn table(self) -> Table {
        let (headers, rows, description) = match self {
            Self::ProgrammingLanguages => LANGUAGES,
            Self::AiModels => AI_MODELS,
            Self::WebFrameworks => WEB_FRAMEWORKS,
            Self::CloudProviders => CLOUD_PROVIDERS,
            Self::General => GENERAL,
        };
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
            description: description.to_string(),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgrammingLanguages => write!(f, "programming languages"),
            Self::AiModels => write!(f, "ai models"),
            Self::WebFrameworks => write!(f, "web frameworks"),
            Self::CloudProviders => write!(f, "cloud providers"),
            Self::General => write!(f, "default"),
        }
    }
}

type CannedTable = (&'static [&'static str], &'static [[&'static str; 4]], &'static str);

const LANGUAGES: CannedTable = (
    &["Language", "Year Created", "Primary Use", "Popularity"],
    &[
        ["JavaScript", "1995", "Web Development", "Very High"],
        ["Python", "1991", "Data Science & AI", "Very High"],
        ["Java", "1995", "Enterprise Applications", "High"],
        ["TypeScript", "2012", "Web Development", "High"],
        ["Go", "2009", "Backend Services", "Medium"],
    ],
    "Here's a comprehensive overview of popular programming languages, their creation years, \
     primary applications, and current popularity in the industry.",
);

const AI_MODELS: CannedTable = (
    &["Model", "Developer", "Release Year", "Parameters"],
    &[
        ["GPT-4", "OpenAI", "2023", "1.7T (estimated)"],
        ["Claude 3", "Anthropic", "2024", "Not disclosed"],
        ["Gemini", "Google", "2023", "Multiple versions"],
        ["LLaMA 2", "Meta", "2023", "7B to 70B"],
        ["Mistral", "Mistral AI", "2023", "7B to 8x7B"],
    ],
    "A comparison of leading AI language models, showcasing the rapid advancement in artificial \
     intelligence technology and the diverse approaches taken by different organizations.",
);

const WEB_FRAMEWORKS: CannedTable = (
    &["Framework", "Language", "Type", "Learning Curve"],
    &[
        ["React", "JavaScript", "Library", "Moderate"],
        ["Vue.js", "JavaScript", "Framework", "Easy"],
        ["Angular", "TypeScript", "Framework", "Steep"],
        ["Svelte", "JavaScript", "Compiler", "Easy"],
        ["Next.js", "React/TS", "Meta-Framework", "Moderate"],
    ],
    "An overview of modern web development frameworks and libraries, highlighting their \
     characteristics and accessibility for developers at different skill levels.",
);

const CLOUD_PROVIDERS: CannedTable = (
    &["Provider", "Market Share", "Key Services", "Founded"],
    &[
        ["AWS", "32%", "EC2, S3, Lambda", "2006"],
        ["Azure", "23%", "VMs, Storage, Functions", "2010"],
        ["Google Cloud", "10%", "Compute Engine, Cloud Storage", "2008"],
        ["Alibaba Cloud", "4%", "ECS, OSS", "2009"],
        ["IBM Cloud", "3%", "Virtual Servers, Object Storage", "2013"],
    ],
    "Market analysis of major cloud service providers, showing their relative market positions \
     and core infrastructure offerings.",
);

const GENERAL: CannedTable = (
    &["Category", "Value", "Status", "Priority"],
    &[
        ["Data Analysis", "85%", "Active", "High"],
        ["Development", "92%", "Active", "High"],
        ["Testing", "78%", "In Progress", "Medium"],
        ["Deployment", "65%", "Pending", "Medium"],
        ["Monitoring", "88%", "Active", "High"],
    ],
    "General overview of project metrics and status across different categories.",
);

/// Produces answer tables and session titles
#[derive(Debug, Clone)]
pub struct Responder {
    title_max_words: usize,
    title_max_chars: usize,
}

impl Default for Responder {
    fn default() -> Self {
        Self::from_config(&ChatConfig::default())
    }
}

impl Responder {
    /// Build a responder using the title limits from `config`
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            title_max_words: config.title_max_words,
            title_max_chars: config.title_max_chars,
        }
    }

    /// Answer a question with the table of its routed topic
    pub fn respond(&self, question: &str) -> Table {
        let topic = Topic::route(question);
        tracing::debug!("Routed question to topic '{}'", topic);
        topic.table()
    }

    /// Derive a session title from the first question
    ///
    /// Takes the leading words, joins them with single spaces, and cuts
    /// the result at the character limit with a trailing `...` when it is
    /// longer. The cut is not word-aware.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablechat::chat::Responder;
    ///
    /// let responder = Responder::default();
    /// assert_eq!(responder.title("Compare   cloud providers"), "Compare cloud providers");
    /// ```
    pub fn title(&self, question: &str) -> String {
        let joined = question
            .split_whitespace()
            .take(self.title_max_words)
            .collect::<Vec<_>>()
            .join(" ");

        if joined.chars().count() > self.title_max_chars {
            let cut: String = joined.chars().take(self.title_max_chars).collect();
            format!("{}...", cut)
        } else {
            joined
        }
    }
}
