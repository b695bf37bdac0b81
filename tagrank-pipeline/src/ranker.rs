use crate::Observation;

/// Stable sort by follower count, highest first. Ties keep collection order.
pub fn rank(mut observations: Vec<Observation>) -> Vec<Observation> {
    observations.sort_by(|a, b| b.followers_count.cmp(&a.followers_count));
    observations
}
