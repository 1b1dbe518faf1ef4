//! The scoring engine: a pure function from (question bank, answer set) to a
//! score tally and a predominant profile.

use thiserror::Error;

use crate::questions::Question;
use crate::tags::{ProfileTag, ScoreTally};

/// The outcome of scoring one complete submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// Only tags that scored at least one point appear.
    pub tally: ScoreTally,
    /// `None` when every answer mapped to zero tags.
    pub predominant: Option<ProfileTag>,
}

#[derive(Debug, Error)]
pub enum ScoringError {
    /// One or more answers were blank or missing. All offending positions are
    /// reported; the caller must re-prompt for the whole form — partial
    /// re-submission is not supported.
    #[error("incomplete submission: missing answers at positions {missing:?}")]
    Incomplete { missing: Vec<usize> },
}

/// Score a submission against the question bank.
///
/// Each answer is matched positionally against its question's choice labels;
/// a label the question does not map contributes nothing. The predominant
/// profile is the tag with the strictly greatest count — walking the tally in
/// tag declaration order means the lowest tag wins ties.
///
/// Pure: no side effects, deterministic for identical inputs.
///
/// # Errors
///
/// Returns [`ScoringError::Incomplete`] if any answer is blank or missing,
/// including when the answer set is shorter than the bank.
pub fn score(bank: &[Question], answers: &[Option<String>]) -> Result<ScoreOutcome, ScoringError> {
    let missing: Vec<usize> = (0..bank.len())
        .filter(|&i| {
            answers
                .get(i)
                .and_then(|a| a.as_deref())
                .is_none_or(|a| a.trim().is_empty())
        })
        .collect();
    if !missing.is_empty() {
        return Err(ScoringError::Incomplete { missing });
    }

    let mut tally = ScoreTally::new();
    for (question, answer) in bank.iter().zip(answers) {
        let label = answer.as_deref().unwrap_or_default().trim();
        for &tag in question.tags_for(label) {
            *tally.entry(tag).or_insert(0) += 1;
        }
    }

    let predominant = predominant_profile(&tally);
    Ok(ScoreOutcome { tally, predominant })
}

fn predominant_profile(tally: &ScoreTally) -> Option<ProfileTag> {
    let mut best: Option<(ProfileTag, u32)> = None;
    for (&tag, &count) in tally {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((tag, count)),
        }
    }
    best.map(|(tag, _)| tag)
}
