use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access class of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Private,
    RoleBased,
    Public,
}

impl Visibility {
    /// Wire representation, also used for multipart form fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "PRIVATE",
            Visibility::RoleBased => "ROLE_BASED",
            Visibility::Public => "PUBLIC",
        }
    }
}

/// Tag attached to documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// AI analysis result attached to a document once the job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub model_used: Option<String>,
    pub analyzed_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub page_count: Option<u32>,
    pub owner: User,
    pub visibility: Visibility,
    #[serde(default)]
    pub analyzed: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub analysis: Option<Analysis>,
    #[serde(default)]
    pub snippet: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Acknowledgement returned when an analysis job is queued.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeAccepted {
    pub message: String,
    pub task_id: String,
    pub document_id: String,
}

/// Aggregate counters from the stats endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentStats {
    pub total_documents: u64,
    pub analyzed_documents: u64,
    pub analyzed_percentage: f64,
}
