use tagrank_common::Result;
use tagrank_store::UserStore;
use tracing::info;

use crate::Observation;

/// Upsert one record per observation, in the given order.
///
/// Returns the number of writes. Stops at the first store error; earlier writes
/// are not rolled back.
pub async fn persist<U>(store: &U, observations: &[Observation]) -> Result<usize>
where
    U: UserStore + ?Sized,
{
    for (written, obs) in observations.iter().enumerate() {
        info!(
            position = written,
            user_id = %obs.user_id,
            name = %obs.name,
            followers_count = obs.followers_count,
            hashtags = ?obs.hashtags,
            "persister.upsert"
        );
        store.upsert(&obs.to_record()).await?;
    }
    Ok(observations.len())
}
