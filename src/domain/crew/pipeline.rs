//! Pipeline requests, results, and step planning.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::jurisdiction::Jurisdiction;
use super::role::Role;
use super::task::{build_task, TaskSpec};

/// Query fragments that pull the drafter into a full-crew run.
const DRAFTER_TRIGGERS: &[&str] = &["draft", "write", "prepare", "motion", "complaint", "letter"];

/// One query to route through the crew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub query: String,
    pub jurisdiction: Jurisdiction,
    /// Skips classification when set.
    pub forced_role: Option<Role>,
    pub matter_facts: Option<String>,
    pub document_type: Option<String>,
    pub run_full_pipeline: bool,
}

impl PipelineRequest {
    /// Creates a single-role request with auto-classification.
    pub fn new(query: impl Into<String>, jurisdiction: Jurisdiction) -> Self {
        Self {
            query: query.into(),
            jurisdiction,
            forced_role: None,
            matter_facts: None,
            document_type: None,
            run_full_pipeline: false,
        }
    }

    /// Forces a specific role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.forced_role = Some(role);
        self
    }

    /// Attaches matter facts.
    pub fn with_matter_facts(mut self, facts: impl Into<String>) -> Self {
        self.matter_facts = Some(facts.into());
        self
    }

    /// Attaches the document type for the drafter.
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Requests the full crew pipeline.
    pub fn full_pipeline(mut self) -> Self {
        self.run_full_pipeline = true;
        self
    }

    /// Builds the task for `role` from this request's context.
    pub fn task_for(&self, role: Role) -> TaskSpec {
        build_task(
            role,
            &self.query,
            &self.jurisdiction,
            self.matter_facts.as_deref(),
            self.document_type.as_deref(),
        )
    }

    fn has_document_type(&self) -> bool {
        self.document_type.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Returns true when the drafter joins a full-crew run.
    pub fn needs_drafter(&self) -> bool {
        if self.has_document_type() {
            return true;
        }
        let query = self.query.to_lowercase();
        DRAFTER_TRIGGERS.iter().any(|t| query.contains(t))
    }
}

/// Ordered roles for a full-crew run: researcher, analyst, [drafter], strategist.
pub fn plan_full_crew(request: &PipelineRequest) -> Vec<Role> {
    let mut roles = vec![Role::Researcher, Role::Analyst];
    if request.needs_drafter() {
        roles.push(Role::Drafter);
    }
    roles.push(Role::Strategist);
    roles
}

/// Identifies what produced a result: one role or the full crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineId {
    Role(Role),
    FullCrew,
}

impl PipelineId {
    /// Returns the wire tag (a role tag or `full_crew`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineId::Role(role) => role.as_str(),
            PipelineId::FullCrew => "full_crew",
        }
    }
}

impl Serialize for PipelineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for PipelineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token counts reported for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_cents: u32,
}

impl RunUsage {
    /// Adds one step's counts, saturating at `u32::MAX`.
    pub fn accumulate(
        &mut self,
        prompt_tokens: u32,
        completion_tokens: u32,
        total_tokens: u32,
        estimated_cost_cents: u32,
    ) {
        self.prompt_tokens = self.prompt_tokens.saturating_add(prompt_tokens);
        self.completion_tokens = self.completion_tokens.saturating_add(completion_tokens);
        self.total_tokens = self.total_tokens.saturating_add(total_tokens);
        self.estimated_cost_cents = self.estimated_cost_cents.saturating_add(estimated_cost_cents);
    }
}

/// Outcome of one pipeline request.
///
/// Successful and failed runs share this shape. A failed run has empty
/// `content`, no roles, zero usage, and a populated `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub pipeline_id: PipelineId,
    pub content: String,
    pub jurisdiction: Jurisdiction,
    pub model: String,
    pub roles_used: Vec<Role>,
    pub tasks_completed: usize,
    pub token_usage: RunUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineResult {
    /// Builds a successful result; `tasks_completed` follows `roles_used`.
    pub fn succeeded(
        pipeline_id: PipelineId,
        content: impl Into<String>,
        jurisdiction: Jurisdiction,
        model: impl Into<String>,
        roles_used: Vec<Role>,
        token_usage: RunUsage,
    ) -> Self {
        Self {
            success: true,
            pipeline_id,
            content: content.into(),
            jurisdiction,
            model: model.into(),
            tasks_completed: roles_used.len(),
            roles_used,
            token_usage,
            error: None,
        }
    }

    /// Builds a failed result, discarding any partial output.
    pub fn failed(
        pipeline_id: PipelineId,
        jurisdiction: Jurisdiction,
        model: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            pipeline_id,
            content: String::new(),
            jurisdiction,
            model: model.into(),
            roles_used: Vec::new(),
            tasks_completed: 0,
            token_usage: RunUsage::default(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &str) -> PipelineRequest {
        PipelineRequest::new(query, Jurisdiction::Missouri).full_pipeline()
    }

    #[test]
    fn plan_without_triggers_skips_drafter() {
        let roles = plan_full_crew(&request("What is the statute of limitations for negligence?"));
        assert_eq!(
            roles,
            vec![Role::Researcher, Role::Analyst, Role::Strategist]
        );
    }

    #[test]
    fn plan_with_document_type_inserts_drafter_before_strategist() {
        let req = request("Car accident on I-70").with_document_type("motion for summary judgment");
        let roles = plan_full_crew(&req);
        assert_eq!(
            roles,
            vec![
                Role::Researcher,
                Role::Analyst,
                Role::Drafter,
                Role::Strategist
            ]
        );
    }

    #[test]
    fn plan_with_query_trigger_inserts_drafter() {
        for query in ["Prepare a demand", "WRITE to opposing counsel", "file a complaint"] {
            let roles = plan_full_crew(&request(query));
            assert_eq!(roles.len(), 4, "query {query:?}");
            assert_eq!(roles[2], Role::Drafter);
        }
    }

    #[test]
    fn empty_document_type_does_not_trigger_drafter() {
        let req = request("Assess liability").with_document_type("");
        assert!(!req.needs_drafter());
    }

    #[test]
    fn plan_always_ends_with_strategist() {
        for query in ["", "draft", "hello"] {
            let roles = plan_full_crew(&request(query));
            assert_eq!(roles.first(), Some(&Role::Researcher));
            assert_eq!(roles.last(), Some(&Role::Strategist));
        }
    }

    #[test]
    fn pipeline_id_wire_tags() {
        assert_eq!(PipelineId::Role(Role::Analyst).as_str(), "analyst");
        assert_eq!(PipelineId::FullCrew.to_string(), "full_crew");
    }

    #[test]
    fn pipeline_id_serializes_as_plain_tag() {
        let json = serde_json::to_string(&PipelineId::Role(Role::Researcher)).unwrap();
        assert_eq!(json, "\"researcher\"");
        let json = serde_json::to_string(&PipelineId::FullCrew).unwrap();
        assert_eq!(json, "\"full_crew\"");
    }

    #[test]
    fn succeeded_counts_tasks_from_roles() {
        let result = PipelineResult::succeeded(
            PipelineId::FullCrew,
            "final",
            Jurisdiction::Kansas,
            "gpt-5-mini",
            vec![Role::Researcher, Role::Analyst, Role::Strategist],
            RunUsage::default(),
        );
        assert!(result.success);
        assert_eq!(result.tasks_completed, 3);
        assert!(result.error.is_none());
    }

    #[test]
    fn failed_result_discards_output() {
        let result = PipelineResult::failed(
            PipelineId::Role(Role::Drafter),
            Jurisdiction::Kansas,
            "gpt-5-mini",
            "network error",
        );
        assert!(!result.success);
        assert_eq!(result.content, "");
        assert!(result.roles_used.is_empty());
        assert_eq!(result.tasks_completed, 0);
        assert_eq!(result.token_usage, RunUsage::default());
        assert_eq!(result.error.as_deref(), Some("network error"));
    }

    #[test]
    fn run_usage_accumulates() {
        let mut usage = RunUsage::default();
        usage.accumulate(10, 5, 15, 1);
        usage.accumulate(20, 10, 30, 2);
        assert_eq!(usage.total_tokens, 45);
        assert_eq!(usage.estimated_cost_cents, 3);
    }

    #[test]
    fn usage_saturates_instead_of_overflowing() {
        let mut usage = RunUsage::default();
        usage.accumulate(u32::MAX - 5, 1, u32::MAX - 1, 7);
        usage.accumulate(u32::MAX - 5, 1, u32::MAX - 1, 7);

        assert_eq!(usage.prompt_tokens, u32::MAX);
        assert_eq!(usage.completion_tokens, 2);
        assert_eq!(usage.total_tokens, u32::MAX);
        assert_eq!(usage.estimated_cost_cents, 14);
    }
}
