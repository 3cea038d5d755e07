use std::collections::HashMap;

use futures::{StreamExt, stream};
use scoring::{CheckInFetch, CompetitionDefinition};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::Result;
use crate::source::{CheckInSource, Session};

/// Fetches every participant's check-ins with at most `concurrency` requests
/// in flight.
///
/// A per-participant failure becomes [`CheckInFetch::Failed`] so the builder
/// can tell it apart from an empty history. A fatal source error (such as an
/// unauthorized session) aborts the whole collection.
pub async fn collect_check_ins<S>(
    source: &S,
    session: &Session,
    definition: &CompetitionDefinition,
    concurrency: usize,
) -> Result<HashMap<Uuid, CheckInFetch>>
where
    S: CheckInSource + ?Sized,
{
    debug!(
        "Fetching check-ins of {} participant(s) from {} ({} at a time)",
        definition.participant_ids.len(),
        source.name(),
        concurrency.max(1)
    );

    let results: Vec<_> = stream::iter(definition.participant_ids.iter().copied())
        .map(|participant_id| async move {
            let result = source
                .fetch_check_ins(session, definition, participant_id)
                .await;
            (participant_id, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut fetches = HashMap::with_capacity(results.len());
    for (participant_id, result) in results {
        let fetch = match result {
            Ok(check_ins) => CheckInFetch::complete(check_ins),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!("Could not fetch check-ins of participant {}: {}", participant_id, e);
                CheckInFetch::failed(e.to_string())
            }
        };
        fetches.insert(participant_id, fetch);
    }

    Ok(fetches)
}
