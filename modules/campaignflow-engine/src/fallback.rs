//! Deterministic substitutes for collaborator failures.
//!
//! Generation and extraction failures never halt the pipeline: every call
//! site swaps in a value built from locally known topic/description. No
//! retry anywhere — recovery means substitution.

use campaignflow_common::{
    ContentPlan, Platform, PostDraft, ResearchBrief, ThreadDraft, DEFAULT_POST_COUNT,
    DEFAULT_THREAD_COUNT,
};

/// Placeholder source text when extraction fails (including rate limiting).
pub fn extraction_placeholder(topic: &str, url: &str) -> String {
    format!("Source material on \"{topic}\" was unavailable (could not extract {url}).")
}

/// Brief used when the generation collaborator fails.
pub fn research_brief(topic: &str, description: Option<&str>) -> ResearchBrief {
    let short = description
        .map(String::from)
        .unwrap_or_else(|| format!("An overview of {topic}."));

    ResearchBrief {
        title: topic.to_string(),
        short_description: short.clone(),
        long_description: format!(
            "{short} This brief was assembled locally because generated research \
             was unavailable."
        ),
        tags: topic
            .split_whitespace()
            .take(5)
            .map(|w| w.to_lowercase())
            .collect(),
        key_insights: vec![
            format!("{topic} is an active conversation worth a campaign."),
            format!("Audiences respond to concrete, specific takes on {topic}."),
            format!("A mix of short posts and threads covers {topic} from several angles."),
        ],
        sources: Vec::new(),
    }
}

/// Content plan used when the generation collaborator fails: the default
/// counts (3 posts, 2 threads), all on the primary platform.
pub fn content_plan(topic: &str, description: Option<&str>) -> ContentPlan {
    let context = description.unwrap_or("what it means and why it matters");

    let posts = (1..=DEFAULT_POST_COUNT)
        .map(|n| PostDraft {
            platform: Platform::Twitter,
            text: format!("{topic}, take {n}: {context}."),
        })
        .collect();

    let threads = (1..=DEFAULT_THREAD_COUNT)
        .map(|n| ThreadDraft {
            platform: Platform::Twitter,
            posts: vec![
                format!("A closer look at {topic} ({n}/{DEFAULT_THREAD_COUNT}). \u{1F9F5}"),
                format!("Why it matters: {context}."),
                format!("That's the thread — more on {topic} soon."),
            ],
        })
        .collect();

    ContentPlan { posts, threads }
}
