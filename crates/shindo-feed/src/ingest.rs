//! One ingestion pass: index → classify → concurrent detail fetches →
//! normalise → snapshot.
//!
//! Only the index fetch can fail the pass. Every detail fetch is isolated:
//! a transport error or an unusable document drops that bulletin and the
//! rest of the batch carries on.

use futures::future::join_all;
use shindo_core::{
    BasicEarthquake, BulletinKind, DetailedEarthquake, IndexEntry, Snapshot, classify,
    normalize_basic, normalize_detailed,
};
use tracing::{Instrument, info, info_span, warn};

use crate::source::{FeedError, FeedSource};

/// Number of most-recent index entries considered per pass.
pub const INDEX_WINDOW: usize = 20;

enum Record {
    Detailed(DetailedEarthquake),
    Basic(BasicEarthquake),
}

/// Run one ingestion pass against `feed`.
///
/// Output order follows index order within each bucket.
pub async fn ingest(feed: &dyn FeedSource) -> Result<Snapshot, FeedError> {
    let index = feed.fetch_index().await?;

    let candidates: Vec<(BulletinKind, &IndexEntry)> = index
        .iter()
        .take(INDEX_WINDOW)
        .map(|entry| (classify(entry.document_id()), entry))
        .filter(|(kind, _)| *kind != BulletinKind::Unrecognized)
        .collect();

    let records = join_all(
        candidates
            .iter()
            .map(|&(kind, entry)| fetch_record(feed, kind, entry)),
    )
    .await;

    let mut snapshot = Snapshot::default();
    for record in records.into_iter().flatten() {
        match record {
            Record::Detailed(quake) => snapshot.detailed.push(quake),
            Record::Basic(quake) => snapshot.basic.push(quake),
        }
    }

    info!(
        listed = index.len(),
        fetched = candidates.len(),
        detailed = snapshot.detailed.len(),
        basic = snapshot.basic.len(),
        "ingested bulletins"
    );
    Ok(snapshot)
}

async fn fetch_record(
    feed: &dyn FeedSource,
    kind: BulletinKind,
    entry: &IndexEntry,
) -> Option<Record> {
    let span = info_span!("bulletin", document = %entry.document_id(), kind = kind.as_str());
    async move {
        let raw = match feed.fetch_detail(entry).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "detail fetch failed, dropping bulletin");
                return None;
            }
        };
        match kind {
            BulletinKind::Detailed => normalize_detailed(&raw).map(Record::Detailed),
            BulletinKind::Basic => normalize_basic(&raw).map(Record::Basic),
            BulletinKind::Unrecognized => None,
        }
    }
    .instrument(span)
    .await
}
