//! Topic taxonomy and the keyword classifier.
//!
//! The taxonomy is a fixed keyword → topic table. An article hits a topic if
//! any of that topic's keywords is one of the article's keywords, or appears
//! anywhere in its lowercased title. Multi-word keywords ("language model",
//! "data center") can only hit through the title.
//!
//! # Topics
//!
//! | Theme | Topics |
//! |-------|--------|
//! | AI | AI & LLMs, Generative AI, AI Hardware, AI Safety & Ethics, Autonomous & Robotics, AI Agents, AI Startups & Funding, AI & Defense, AI Research |
//! | DevOps | Cloud & Containers, DevOps & CI/CD, Infrastructure as Code, Security & Compliance, Observability & Monitoring |
//! | General tech | Data Centers & Energy, AI in Search, Big Tech & AI |

use crate::models::Article;
use std::collections::BTreeSet;

/// Keyword → topic label, grouped by theme.
pub static TOPIC_MAP: &[(&str, &str)] = &[
    // AI
    ("openai", "AI & LLMs"),
    ("chatgpt", "AI & LLMs"),
    ("gpt", "AI & LLMs"),
    ("llm", "AI & LLMs"),
    ("llms", "AI & LLMs"),
    ("claude", "AI & LLMs"),
    ("anthropic", "AI & LLMs"),
    ("gemini", "AI & LLMs"),
    ("copilot", "AI & LLMs"),
    ("language model", "AI & LLMs"),
    ("generative", "Generative AI"),
    ("diffusion", "Generative AI"),
    ("midjourney", "Generative AI"),
    ("image generation", "Generative AI"),
    ("deepfake", "Generative AI"),
    ("nvidia", "AI Hardware"),
    ("chip", "AI Hardware"),
    ("chips", "AI Hardware"),
    ("gpu", "AI Hardware"),
    ("tpu", "AI Hardware"),
    ("semiconductor", "AI Hardware"),
    ("safety", "AI Safety & Ethics"),
    ("regulation", "AI Safety & Ethics"),
    ("bias", "AI Safety & Ethics"),
    ("ethics", "AI Safety & Ethics"),
    ("alignment", "AI Safety & Ethics"),
    ("privacy", "AI Safety & Ethics"),
    ("autonomous", "Autonomous & Robotics"),
    ("robot", "Autonomous & Robotics"),
    ("robotics", "Autonomous & Robotics"),
    ("self-driving", "Autonomous & Robotics"),
    ("drone", "Autonomous & Robotics"),
    ("drones", "Autonomous & Robotics"),
    ("agents", "AI Agents"),
    ("agent", "AI Agents"),
    ("agentic", "AI Agents"),
    ("startup", "AI Startups & Funding"),
    ("startups", "AI Startups & Funding"),
    ("funding", "AI Startups & Funding"),
    ("venture", "AI Startups & Funding"),
    ("million", "AI Startups & Funding"),
    ("billion", "AI Startups & Funding"),
    ("raises", "AI Startups & Funding"),
    ("series", "AI Startups & Funding"),
    ("defense", "AI & Defense"),
    ("military", "AI & Defense"),
    ("pentagon", "AI & Defense"),
    ("weapons", "AI & Defense"),
    // DevOps
    ("kubernetes", "Cloud & Containers"),
    ("docker", "Cloud & Containers"),
    ("container", "Cloud & Containers"),
    ("containers", "Cloud & Containers"),
    ("cloud", "Cloud & Containers"),
    ("aws", "Cloud & Containers"),
    ("azure", "Cloud & Containers"),
    ("gcp", "Cloud & Containers"),
    ("devops", "DevOps & CI/CD"),
    ("cicd", "DevOps & CI/CD"),
    ("pipeline", "DevOps & CI/CD"),
    ("deployment", "DevOps & CI/CD"),
    ("terraform", "Infrastructure as Code"),
    ("infrastructure", "Infrastructure as Code"),
    ("iac", "Infrastructure as Code"),
    ("ansible", "Infrastructure as Code"),
    ("security", "Security & Compliance"),
    ("vulnerability", "Security & Compliance"),
    ("cybersecurity", "Security & Compliance"),
    ("breach", "Security & Compliance"),
    ("observability", "Observability & Monitoring"),
    ("monitoring", "Observability & Monitoring"),
    ("logging", "Observability & Monitoring"),
    ("metrics", "Observability & Monitoring"),
    // General tech
    ("data center", "Data Centers & Energy"),
    ("energy", "Data Centers & Energy"),
    ("climate", "Data Centers & Energy"),
    ("environment", "Data Centers & Energy"),
    ("search", "AI in Search"),
    ("google", "AI in Search"),
    ("perplexity", "AI in Search"),
    ("meta", "Big Tech & AI"),
    ("apple", "Big Tech & AI"),
    ("microsoft", "Big Tech & AI"),
    ("research", "AI Research"),
    ("paper", "AI Research"),
    ("breakthrough", "AI Research"),
];

/// Icon lookup; the first key contained in the lowercased topic wins.
pub static TOPIC_ICONS: &[(&str, &str)] = &[
    ("ai", "🤖"),
    ("machine learning", "🧠"),
    ("deep learning", "🧠"),
    ("llm", "💬"),
    ("chatbot", "💬"),
    ("robotics", "🦾"),
    ("autonomous", "🚗"),
    ("data", "📊"),
    ("cloud", "☁️"),
    ("devops", "⚙️"),
    ("kubernetes", "🐳"),
    ("docker", "🐳"),
    ("security", "🔒"),
    ("privacy", "🛡️"),
    ("startup", "🚀"),
    ("funding", "💰"),
    ("research", "🔬"),
    ("chip", "🔲"),
    ("gpu", "🔲"),
    ("energy", "⚡"),
];

pub const DEFAULT_ICON: &str = "📡";

/// Topic label for a single keyword, if it is in the taxonomy.
pub fn topic_for_keyword(keyword: &str) -> Option<&'static str> {
    let keyword = keyword.to_lowercase();
    TOPIC_MAP
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, topic)| *topic)
}

/// Every topic hit by the keyword list or the title.
///
/// Pure: the same keywords and title always give the same set.
pub fn classify(keywords: &[String], title: &str) -> BTreeSet<&'static str> {
    let title = title.to_lowercase();
    let mut topics: BTreeSet<&'static str> =
        keywords.iter().filter_map(|kw| topic_for_keyword(kw)).collect();
    topics.extend(
        TOPIC_MAP
            .iter()
            .filter(|(k, _)| title.contains(k))
            .map(|(_, topic)| *topic),
    );
    topics
}

/// [`classify`] applied to an article's keywords and title.
pub fn classify_article(article: &Article) -> BTreeSet<&'static str> {
    classify(&article.keywords, &article.title)
}

/// Icon glyph for a topic label.
///
/// # Returns
///
/// The icon of the first [`TOPIC_ICONS`] key contained in the lowercased
/// label, or [`DEFAULT_ICON`] when none is.
pub fn icon_for_topic(topic: &str) -> &'static str {
    let topic = topic.to_lowercase();
    TOPIC_ICONS
        .iter()
        .find(|(key, _)| topic.contains(key))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
