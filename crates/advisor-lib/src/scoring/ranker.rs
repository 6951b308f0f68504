use crate::models::ScoredInstance;

/// Sort scored candidates best first.
///
/// The sort is stable: equal scores keep their catalog order.
pub fn rank(mut scored: Vec<ScoredInstance>) -> Vec<ScoredInstance> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
