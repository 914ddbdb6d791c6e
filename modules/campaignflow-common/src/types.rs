use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator joining thread posts into one draft body. The publishing API
/// treats it as a split marker when `threadify` is set.
pub const THREAD_SEPARATOR: &str = "\n\n\n\n";

/// Default number of standalone posts in a generated content plan.
pub const DEFAULT_POST_COUNT: usize = 3;
/// Default number of threads in a generated content plan.
pub const DEFAULT_THREAD_COUNT: usize = 2;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Planning,
    Researching,
    Writing,
    Scheduling,
    Active,
    Completed,
}

impl CampaignStatus {
    fn rank(self) -> u8 {
        match self {
            CampaignStatus::Planning => 0,
            CampaignStatus::Researching => 1,
            CampaignStatus::Writing => 2,
            CampaignStatus::Scheduling => 3,
            CampaignStatus::Active => 4,
            CampaignStatus::Completed => 5,
        }
    }

    /// Status moves forward through the lifecycle DAG and never regresses.
    /// Researching is an optional branch, so any strictly-later status is a
    /// legal successor (planning → writing skips it).
    pub fn can_advance_to(self, next: CampaignStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CampaignStatus::Planning => write!(f, "planning"),
            CampaignStatus::Researching => write!(f, "researching"),
            CampaignStatus::Writing => write!(f, "writing"),
            CampaignStatus::Scheduling => write!(f, "scheduling"),
            CampaignStatus::Active => write!(f, "active"),
            CampaignStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Twitter,
    Linkedin,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Twitter => write!(f, "twitter"),
            Platform::Linkedin => write!(f, "linkedin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Draft,
    Scheduled,
    Published,
    Failed,
}

// --- Research ---

/// Research brief attached by the research stage. Doubles as the structured
/// output schema handed to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResearchBrief {
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    pub tags: Vec<String>,
    pub key_insights: Vec<String>,
    pub sources: Vec<String>,
}

// --- Content groups ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PostDraft {
    pub platform: Platform,
    pub text: String,
}

/// Ordered posts published as a single thread sharing one schedule slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ThreadDraft {
    pub platform: Platform,
    pub posts: Vec<String>,
}

/// The atomic unit of scheduling: a standalone post or a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentGroup {
    Post(PostDraft),
    Thread(ThreadDraft),
}

impl ContentGroup {
    pub fn platform(&self) -> Platform {
        match self {
            ContentGroup::Post(p) => p.platform,
            ContentGroup::Thread(t) => t.platform,
        }
    }

    /// Body sent to the publishing API. A post goes out as-is; a thread is
    /// joined with the separator the API splits on.
    pub fn publish_text(&self) -> String {
        match self {
            ContentGroup::Post(p) => p.text.clone(),
            ContentGroup::Thread(t) => t.posts.join(THREAD_SEPARATOR),
        }
    }

    /// Whether the publishing API should split the body into parts.
    pub fn needs_split(&self) -> bool {
        matches!(self, ContentGroup::Thread(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContentGroup::Post(_) => "post",
            ContentGroup::Thread(_) => "thread",
        }
    }
}

/// Generated content plan: the structured output schema for the copywriting
/// stage. Posts and threads keep their generated order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentPlan {
    pub posts: Vec<PostDraft>,
    pub threads: Vec<ThreadDraft>,
}

impl ContentPlan {
    pub fn into_groups(self) -> Vec<ContentGroup> {
        self.posts
            .into_iter()
            .map(ContentGroup::Post)
            .chain(self.threads.into_iter().map(ContentGroup::Thread))
            .collect()
    }
}

// --- Scheduling output ---

/// One record per input group, written by the scheduler regardless of the
/// publish outcome. `external_id` is empty when the publish call failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub group_id: String,
    pub external_id: String,
    pub scheduled_date: String,
    pub status: ScheduleStatus,
}

// --- Campaign ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    /// Immutable once minted.
    pub id: String,
    pub topic: String,
    pub description: Option<String>,
    /// Raw publish-date input. Not validated here; the scheduler resolves it.
    pub publish_date: Option<String>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub research: Option<ResearchBrief>,
    pub content: Option<Vec<ContentGroup>>,
    pub scheduling_info: Option<Vec<ScheduledPost>>,
}

impl Campaign {
    pub fn new(topic: &str, description: Option<&str>, publish_date: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            description: description.map(String::from),
            publish_date: publish_date.map(String::from),
            status: CampaignStatus::Planning,
            created_at: now,
            updated_at: now,
            research: None,
            content: None,
            scheduling_info: None,
        }
    }

    /// Refresh `updated_at`. Every mutation path calls this before saving.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> CampaignSummary {
        CampaignSummary {
            id: self.id.clone(),
            topic: self.topic.clone(),
            status: self.status,
        }
    }
}

/// Terse view returned when intake matches existing campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: String,
    pub topic: String,
    pub status: CampaignStatus,
}
