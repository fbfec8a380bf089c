use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a suggestion.
///
/// `Accepted`, `Refused` and `Realized` are terminal in practice, but no
/// transition is guarded by the current status: any workflow action may be
/// called from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Refused,
    Realized,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Submitted => "submitted",
            Status::UnderReview => "under_review",
            Status::Accepted => "accepted",
            Status::Refused => "refused",
            Status::Realized => "realized",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Status::Draft),
            "submitted" => Ok(Status::Submitted),
            "under_review" => Ok(Status::UnderReview),
            "accepted" => Ok(Status::Accepted),
            "refused" => Ok(Status::Refused),
            "realized" => Ok(Status::Realized),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!("Unknown priority '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Category {
    Improvement,
    Innovation,
    ProblemSolving,
    CostSaving,
    Quality,
    Safety,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Improvement => "improvement",
            Category::Innovation => "innovation",
            Category::ProblemSolving => "problem_solving",
            Category::CostSaving => "cost_saving",
            Category::Quality => "quality",
            Category::Safety => "safety",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "improvement" => Ok(Category::Improvement),
            "innovation" => Ok(Category::Innovation),
            "problem_solving" => Ok(Category::ProblemSolving),
            "cost_saving" => Ok(Category::CostSaving),
            "quality" => Ok(Category::Quality),
            "safety" => Ok(Category::Safety),
            other => Err(format!("Unknown category '{other}'")),
        }
    }
}

/// Full suggestion record with author/assignee names joined in.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Suggestion {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub author_id: i64,
    pub author_name: String,
    pub assignee_id: Option<i64>,
    pub assignee_name: Option<String>,
    pub created_on: NaiveDate,
    pub processed_on: Option<NaiveDate>,
    pub status: Status,
    pub priority: Priority,
    pub category: Category,
    pub comment: Option<String>,
    pub benefit: Option<String>,
    pub cost: f64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Suggestion {
    /// Days between creation and processing; 0 while unprocessed.
    pub fn processing_days(&self) -> i64 {
        match self.processed_on {
            Some(processed) => (processed - self.created_on).num_days(),
            None => 0,
        }
    }

    /// Display label: the title prefixed with the uppercased status tag,
    /// e.g. `[SUBMITTED] Reduce waste`.
    pub fn display_label(&self) -> String {
        format!("[{}] {}", self.status.as_str().to_uppercase(), self.title)
    }

    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// Suggestion shaped for API responses: the record plus computed fields.
#[derive(Debug, Serialize)]
pub struct SuggestionView {
    #[serde(flatten)]
    pub record: Suggestion,
    pub display_label: String,
    pub processing_days: i64,
}

impl From<Suggestion> for SuggestionView {
    fn from(record: Suggestion) -> Self {
        let display_label = record.display_label();
        let processing_days = record.processing_days();
        SuggestionView { record, display_label, processing_days }
    }
}

/// Request body for creating a suggestion. The author is the session user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSuggestion {
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    pub assignee_id: Option<i64>,
    pub benefit: Option<String>,
    #[serde(default)]
    pub cost: f64,
}

/// Partial write against an existing suggestion. `None` leaves a field
/// untouched; the double options distinguish "set to NULL" from "untouched".
/// Author and creation date are not writable.
#[derive(Debug, Clone, Default)]
pub struct SuggestionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<Option<i64>>,
    pub processed_on: Option<Option<NaiveDate>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub comment: Option<String>,
    pub benefit: Option<String>,
    pub cost: Option<f64>,
    pub active: Option<bool>,
}

impl SuggestionPatch {
    /// Names of the fields this patch writes, for the audit trail.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.assignee_id.is_some() {
            fields.push("assignee_id");
        }
        if self.processed_on.is_some() {
            fields.push("processed_on");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.priority.is_some() {
            fields.push("priority");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.comment.is_some() {
            fields.push("comment");
        }
        if self.benefit.is_some() {
            fields.push("benefit");
        }
        if self.cost.is_some() {
            fields.push("cost");
        }
        if self.active.is_some() {
            fields.push("active");
        }
        fields
    }
}

/// Caller-supplied list filters, ANDed with the name-search clause.
#[derive(Debug, Clone, Default)]
pub struct SuggestionFilter {
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub include_inactive: bool,
}

/// Page of suggestions.
#[derive(Debug, Serialize)]
pub struct SuggestionPage {
    pub items: Vec<SuggestionView>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

/// Counts grouped by status and category, for the stats endpoint.
#[derive(Debug, Serialize)]
pub struct SuggestionStats {
    pub by_status: Vec<GroupCount>,
    pub by_category: Vec<GroupCount>,
}
