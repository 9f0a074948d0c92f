//! Task Builder
//!
//! Renders a role, query, jurisdiction and matter context into a [`TaskSpec`].
//! Rendering is pure: identical arguments always produce identical text.

use serde::{Deserialize, Serialize};

use super::jurisdiction::Jurisdiction;
use super::role::Role;

const FACTS_NOT_SPECIFIED: &str = "Not specified";
const FACTS_GENERAL_TEMPLATE: &str = "General template";
const DEFAULT_DOCUMENT_TYPE: &str = "legal document";

/// A fully rendered instruction-plus-rubric unit for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub role: Role,
    pub description: String,
    pub expected_output: String,
}

impl TaskSpec {
    /// Renders the user message submitted to the completion engine.
    pub fn prompt(&self) -> String {
        format!(
            "{}\n\nExpected output:\n{}",
            self.description, self.expected_output
        )
    }
}

/// Builds the task specification for `role`.
///
/// Empty `matter_facts` / `document_type` fall back to the role's defaults.
pub fn build_task(
    role: Role,
    query: &str,
    jurisdiction: &Jurisdiction,
    matter_facts: Option<&str>,
    document_type: Option<&str>,
) -> TaskSpec {
    let jx = jurisdiction.display_name();
    let facts = non_empty(matter_facts);

    let (description, expected_output) = match role {
        Role::Researcher => research(query, jx),
        Role::Analyst => analysis(query, jx, facts.unwrap_or(FACTS_NOT_SPECIFIED)),
        Role::Drafter => drafting(
            query,
            jx,
            non_empty(document_type).unwrap_or(DEFAULT_DOCUMENT_TYPE),
            facts.unwrap_or(FACTS_GENERAL_TEMPLATE),
        ),
        Role::Strategist => strategy(query, jx, facts.unwrap_or(FACTS_NOT_SPECIFIED)),
    };

    TaskSpec {
        role,
        description,
        expected_output,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn research(query: &str, jx: &str) -> (String, String) {
    let description = format!(
        "Research the following legal question under {jx} law:\n\n\
         {query}\n\n\
         Provide:\n\
         1. Relevant statutes with pinpoint citations and URLs\n\
         2. Key case law with holdings and citations\n\
         3. SOL analysis and deadline flags\n\
         4. Comparative fault implications (KS 50% bar / MO pure comparative)\n\
         5. Procedural requirements specific to {jx}\n\
         6. Risks and verification notes\n\
         7. Recommended next actions"
    );
    let expected = "Structured legal research memo with: Summary, Statutory Authority \
                    (with URLs), Case Law, SOL & Comparative Fault flags, Procedural \
                    Framework, Risks, and Next Actions."
        .to_string();
    (description, expected)
}

fn analysis(query: &str, jx: &str, facts: &str) -> (String, String) {
    let description = format!(
        "Perform a comprehensive risk analysis for the following matter under {jx} law:\n\n\
         Query: {query}\n\
         Matter Facts: {facts}\n\n\
         Score risks 1-10 on these factors:\n\
         - Liability Exposure\n\
         - Damages/Exposure\n\
         - SOL/Deadlines\n\
         - Comparative Fault Risk\n\
         - Evidence Gaps\n\
         - Deadline Management\n\n\
         Include SWOT analysis and damages scenarios."
    );
    let expected = "Risk scorecard (table with factor/score/risk/notes), overall risk \
                    rating, SWOT analysis, comparative fault analysis, damages scenarios, \
                    and recommended actions."
        .to_string();
    (description, expected)
}

fn drafting(query: &str, jx: &str, doc_type: &str, facts: &str) -> (String, String) {
    let description = format!(
        "Draft a {doc_type} under {jx} law:\n\n\
         Instructions: {query}\n\
         Matter Facts: {facts}\n\n\
         Include all required sections per {jx} rules:\n\
         - Proper caption and formatting\n\
         - All substantive sections\n\
         - Jurisdiction-specific requirements\n\
         - Certificate of Service\n\
         - Citation footnotes"
    );
    let expected = format!(
        "Complete {doc_type} in Markdown format with proper caption, \
         all required sections, jurisdiction-specific requirements, \
         citations with [Footnote] format, and review checklist."
    );
    (description, expected)
}

fn strategy(query: &str, jx: &str, facts: &str) -> (String, String) {
    let description = format!(
        "Develop a litigation strategy for the following under {jx} law:\n\n\
         Query: {query}\n\
         Matter Facts: {facts}\n\n\
         Provide:\n\
         1. Three settlement strategy options with expected value calculations\n\
         2. Litigation timeline with key deadlines\n\
         3. Budget projection\n\
         4. Venue/forum selection analysis (if multi-state)\n\
         5. Proactive 'what am I missing?' checklist\n\
         6. Recommended next 3 actions"
    );
    let expected = "Strategic plan with: settlement options (3 scenarios with $$ ranges), \
                    timeline table, budget projection, venue analysis, proactive checklist, \
                    and prioritized next actions."
        .to_string();
    (description, expected)
}
