//! Document ingestion
//!
//! [`Ingestor`] runs one record-building job per matched block on a bounded
//! pool of tokio workers. The matcher feeds a bounded job queue; workers
//! send `(sequence, result)` pairs back over a channel, and the caller's
//! future completes only after every worker has finished.
//!
//! With [`ResultOrder::Document`] the collected records are put back in
//! document order by sequence number. With [`ResultOrder::Completion`] they
//! keep arrival order, which depends on scheduling.
//!
//! A worker panic or a strict-policy [`RecordError`] fails the whole call.
//! No partial set is returned.
//!
//! [`DocumentReader`] is the sequential counterpart for callers without a
//! runtime.

use crate::building::RecordBuilder;
use crate::error::{IngestError, RecordError};
use crate::matching::{RecordCaptures, RecordMatcher};
use crate::model::{Follower, FollowerSet};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Order of records in an ingested set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrder {
    /// Same order as the blocks in the document
    #[default]
    Document,
    /// Order in which workers finished
    Completion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub workers: usize,
    pub queue_capacity: usize,
    pub order: ResultOrder,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
            order: ResultOrder::Document,
        }
    }
}

type Job = (usize, RecordCaptures);
type JobResult = (usize, Result<Follower, RecordError>);

/// Concurrent document ingestion
#[derive(Clone)]
pub struct Ingestor {
    matcher: Arc<dyn RecordMatcher>,
    builder: RecordBuilder,
    options: IngestOptions,
}

impl Ingestor {
    pub fn new(matcher: Arc<dyn RecordMatcher>, builder: RecordBuilder, options: IngestOptions) -> Self {
        Self {
            matcher,
            builder,
            options,
        }
    }

    /// Parse every record block in `source` into a follower set
    pub async fn ingest(&self, source: &str) -> Result<FollowerSet, IngestError> {
        let workers = self.options.workers.max(1);
        let (job_tx, job_rx) = mpsc::channel::<Job>(self.options.queue_capacity.max(1));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<JobResult>();
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut pool = JoinSet::new();
        for _ in 0..workers {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let builder = self.builder;
            pool.spawn(async move {
                loop {
                    // The guard is dropped before the job runs.
                    let job = jobs.lock().await.recv().await;
                    let Some((seq, captures)) = job else {
                        break;
                    };
                    if results.send((seq, builder.build(captures))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut matched = 0;
        for captures in self.matcher.matches(source) {
            if job_tx.send((matched, captures)).await.is_err() {
                break;
            }
            matched += 1;
        }
        drop(job_tx);

        while let Some(joined) = pool.join_next().await {
            joined?;
        }

        let mut results = Vec::with_capacity(matched);
        while let Some(result) = result_rx.recv().await {
            results.push(result);
        }
        if self.options.order == ResultOrder::Document {
            results.sort_by_key(|(seq, _)| *seq);
        }

        let mut set = FollowerSet::new();
        for (_, result) in results {
            set.push(result?);
        }

        info!(
            matcher = self.matcher.name(),
            workers,
            records = set.len(),
            "ingested document"
        );
        Ok(set)
    }
}

/// Sequential document reader
#[derive(Clone)]
pub struct DocumentReader {
    matcher: Arc<dyn RecordMatcher>,
    builder: RecordBuilder,
}

impl DocumentReader {
    pub fn new(matcher: Arc<dyn RecordMatcher>, builder: RecordBuilder) -> Self {
        Self { matcher, builder }
    }

    pub fn parse(&self, source: &str) -> Result<FollowerSet, RecordError> {
        let set = self
            .matcher
            .matches(source)
            .map(|captures| self.builder.build(captures))
            .collect::<Result<FollowerSet, _>>()?;
        debug!(matcher = self.matcher.name(), records = set.len(), "read document");
        Ok(set)
    }
}

impl Default for DocumentReader {
    fn default() -> Self {
        Self::new(Arc::new(crate::matching::GrammarMatcher), RecordBuilder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::FieldPolicy;
    use crate::matching::MatcherKind;

    fn block(id: &str, extra: &str) -> String {
        format!(
            r#"{{"id":"{id}","label":"L{id}","aspects":{{"growth":1}},"description":"","xtriggers":{{}},"uniquenessgroup":""{extra}}}"#
        )
    }

    fn document(count: usize) -> String {
        let blocks: Vec<_> = (0..count).map(|i| block(&format!("f{i}"), "")).collect();
        format!("{{ \"elements\": [\n{}\n]}}", blocks.join(",\n"))
    }

    fn ingestor(options: IngestOptions, policy: FieldPolicy) -> Ingestor {
        Ingestor::new(MatcherKind::Grammar.matcher(), RecordBuilder::new(policy), options)
    }

    #[tokio::test]
    async fn test_document_order_is_restored() {
        let options = IngestOptions {
            workers: 3,
            queue_capacity: 2,
            order: ResultOrder::Document,
        };
        let set = ingestor(options, FieldPolicy::Lenient)
            .ingest(&document(25))
            .await
            .unwrap();
        let ids: Vec<_> = set.iter().map(|f| f.id.clone()).collect();
        let expected: Vec<_> = (0..25).map(|i| format!("f{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_completion_order_keeps_cardinality() {
        let options = IngestOptions {
            workers: 8,
            queue_capacity: 1,
            order: ResultOrder::Completion,
        };
        let set = ingestor(options, FieldPolicy::Lenient)
            .ingest(&document(40))
            .await
            .unwrap();
        let mut ids: Vec<_> = set.iter().map(|f| f.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 40);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let set = ingestor(IngestOptions::default(), FieldPolicy::Lenient)
            .ingest("")
            .await
            .unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_still_ingests() {
        let options = IngestOptions {
            workers: 0,
            queue_capacity: 0,
            order: ResultOrder::Document,
        };
        let set = ingestor(options, FieldPolicy::Lenient)
            .ingest(&document(3))
            .await
            .unwrap();
        assert_eq!(set.len(), 3);
    }

    #[tokio::test]
    async fn test_strict_policy_fails_the_call() {
        let source = format!("{}\n{}", block("ok", ""), block("bad", r#","lifetime":"soon""#));
        let err = ingestor(IngestOptions::default(), FieldPolicy::Strict)
            .ingest(&source)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Record(RecordError::InvalidLifetime { ref record, .. }) if record == "bad"
        ));
    }

    #[test]
    fn test_sequential_reader_matches_concurrent_ingest() {
        let reader = DocumentReader::default();
        let set = reader.parse(&document(5)).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.find("f3").map(|f| f.label.as_str()), Some("Lf3"));
    }
}
