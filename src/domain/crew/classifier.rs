//! Keyword-scored intent classifier.
//!
//! Matching is plain substring search over the lowercased query, with no
//! tokenization or word boundaries. That means "sol" also hits "solution";
//! this behavior is relied on and must not be tightened silently.

use serde::Serialize;

use super::role::Role;

const GENERIC_WEIGHT: u32 = 3;

const RESEARCH_KEYWORDS: &[&str] = &[
    "research", "case law", "precedent", "statute", "find", "search", "cite", "citation",
    "authority", "holding", "ruling", "sol", "limitation", "rule", "regulation", "code",
    "preemption",
];

const DRAFT_KEYWORDS: &[&str] = &[
    "draft", "write", "prepare", "create", "generate", "motion", "complaint", "letter", "brief",
    "contract", "agreement", "petition", "template", "engagement", "demand", "discovery request",
];

const ANALYST_KEYWORDS: &[&str] = &[
    "risk", "assess", "evaluat", "analyz", "review", "strength", "weakness", "exposure",
    "damage", "inconsisten", "deposition", "enforceab", "score", "audit", "calculate",
    "comparative fault",
];

const STRATEGIST_KEYWORDS: &[&str] = &[
    "strateg", "settle", "settlement", "timeline", "calendar", "deadline", "budget", "scenario",
    "option", "plan", "mediat", "arbitrat", "trial", "recommend", "proactive", "missing",
    "next step", "appeal",
];

/// A group of phrases awarding `weight` once when any of them matches.
struct PhraseBonus {
    role: Role,
    phrases: &'static [&'static str],
    weight: u32,
}

const PHRASE_BONUSES: &[PhraseBonus] = &[
    PhraseBonus {
        role: Role::Researcher,
        phrases: &["k.s.a", "ksa ", "kansas statute", "chapter 60", "10th circuit"],
        weight: 6,
    },
    PhraseBonus {
        role: Role::Researcher,
        phrases: &[
            "rsmo",
            "r.s.mo",
            "missouri statute",
            "missouri supreme court rule",
            "8th circuit",
        ],
        weight: 6,
    },
    PhraseBonus {
        role: Role::Drafter,
        phrases: &["draft a", "draft the", "draft my"],
        weight: 5,
    },
    PhraseBonus {
        role: Role::Drafter,
        phrases: &["motion to"],
        weight: 6,
    },
    PhraseBonus {
        role: Role::Analyst,
        phrases: &["risk assess"],
        weight: 5,
    },
    PhraseBonus {
        role: Role::Analyst,
        phrases: &["what am i missing"],
        weight: 4,
    },
    PhraseBonus {
        role: Role::Strategist,
        phrases: &["what am i missing"],
        weight: 5,
    },
];

/// Per-role score table produced by [`score`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleScores {
    pub researcher: u32,
    pub analyst: u32,
    pub drafter: u32,
    pub strategist: u32,
}

impl RoleScores {
    /// Returns the score accumulated by `role`.
    pub fn get(&self, role: Role) -> u32 {
        match role {
            Role::Researcher => self.researcher,
            Role::Analyst => self.analyst,
            Role::Drafter => self.drafter,
            Role::Strategist => self.strategist,
        }
    }

    fn add(&mut self, role: Role, points: u32) {
        let slot = match role {
            Role::Researcher => &mut self.researcher,
            Role::Analyst => &mut self.analyst,
            Role::Drafter => &mut self.drafter,
            Role::Strategist => &mut self.strategist,
        };
        *slot += points;
    }

    /// Highest-scoring role, first in canonical order on ties.
    ///
    /// Falls back to [`Role::Strategist`] when nothing scored.
    pub fn winner(&self) -> Role {
        let mut best = Role::Strategist;
        let mut best_score = 0;
        for role in Role::all() {
            let score = self.get(*role);
            if score > best_score {
                best = *role;
                best_score = score;
            }
        }
        best
    }
}

/// Scores `text` against every role's keyword tables.
pub fn score(text: &str) -> RoleScores {
    let msg = text.to_lowercase();
    let mut scores = RoleScores::default();

    let generic = [
        (Role::Researcher, RESEARCH_KEYWORDS),
        (Role::Drafter, DRAFT_KEYWORDS),
        (Role::Analyst, ANALYST_KEYWORDS),
        (Role::Strategist, STRATEGIST_KEYWORDS),
    ];
    for (role, keywords) in generic {
        let hits = keywords.iter().filter(|k| msg.contains(*k)).count() as u32;
        scores.add(role, hits * GENERIC_WEIGHT);
    }

    for bonus in PHRASE_BONUSES {
        if bonus.phrases.iter().any(|p| msg.contains(p)) {
            scores.add(bonus.role, bonus.weight);
        }
    }

    scores
}

/// Routes `text` to the role best suited to answer it.
pub fn classify(text: &str) -> Role {
    score(text).winner()
}
