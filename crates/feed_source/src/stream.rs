//! PacedRecordStream - counter stream with cancellable pacing delay

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use contracts::{ContractError, Record, RecordStream, StreamEnd, StreamObserver};

use crate::catalog::{COUNTER_FIELD, STREAM_NAME};
use crate::pacing::{PacingPolicy, Sleeper};

/// Lifecycle of a paced stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Running,
    Exhausted,
    Cancelled,
    Released,
}

/// Stream emitting `{"column1": n}` for n = 1, 2, ...
///
/// Each record after the first waits for the configured interval. The wait
/// races the cancellation token; a cancelled wait ends the stream with
/// `StreamCancelled` and produces no record.
pub struct PacedRecordStream<S> {
    policy: PacingPolicy,
    sleeper: S,
    token: CancellationToken,
    observer: Arc<dyn StreamObserver>,
    cursor: u64,
    state: StreamState,
}

impl<S: Sleeper> PacedRecordStream<S> {
    pub fn new(
        policy: PacingPolicy,
        sleeper: S,
        token: CancellationToken,
        observer: Arc<dyn StreamObserver>,
    ) -> Self {
        debug!(
            max_records = ?policy.max_records,
            interval_ms = ?policy.interval.map(|d| d.as_millis()),
            "paced stream opened"
        );
        Self {
            policy,
            sleeper,
            token,
            observer,
            cursor: 0,
            state: StreamState::Running,
        }
    }

    /// Handle the host uses to interrupt a pending delay
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Records emitted so far
    pub fn emitted(&self) -> u64 {
        self.cursor
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn policy(&self) -> &PacingPolicy {
        &self.policy
    }

    fn finish(&mut self, end: StreamEnd) {
        self.state = match end {
            StreamEnd::Exhausted => StreamState::Exhausted,
            StreamEnd::Cancelled => StreamState::Cancelled,
            StreamEnd::Released => StreamState::Released,
        };
        self.observer.on_finish(end, self.cursor);
        debug!(reason = end.as_str(), emitted = self.cursor, "paced stream finished");
    }

    fn cancelled(&mut self) -> ContractError {
        self.finish(StreamEnd::Cancelled);
        ContractError::stream_cancelled(self.cursor)
    }

    /// Wait out the interval; `false` when cancellation won the race
    async fn pace(&self) -> bool {
        let Some(delay) = self.policy.interval else {
            return true;
        };
        if self.cursor == 0 {
            return true;
        }

        self.observer.on_delay(delay);
        tokio::select! {
            biased;
            _ = self.token.cancelled() => false,
            _ = self.sleeper.sleep(delay) => true,
        }
    }
}

impl<S: Sleeper> RecordStream for PacedRecordStream<S> {
    async fn next(&mut self) -> Result<Option<Record>, ContractError> {
        match self.state {
            StreamState::Exhausted | StreamState::Released => return Ok(None),
            StreamState::Cancelled => return Err(ContractError::stream_cancelled(self.cursor)),
            StreamState::Running => {}
        }

        if self.policy.is_exhausted(self.cursor) {
            self.finish(StreamEnd::Exhausted);
            return Ok(None);
        }

        if self.token.is_cancelled() || !self.pace().await {
            return Err(self.cancelled());
        }

        self.cursor += 1;
        let mut data = Map::new();
        data.insert(COUNTER_FIELD.to_string(), Value::from(self.cursor));

        self.observer.on_record(STREAM_NAME, self.cursor);
        trace!(cursor = self.cursor, "record emitted");

        Ok(Some(Record::new(STREAM_NAME, data)))
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.token.cancel();
        if matches!(self.state, StreamState::Running) {
            self.finish(StreamEnd::Released);
        } else {
            self.state = StreamState::Released;
        }
        Ok(())
    }
}

impl<S> fmt::Debug for PacedRecordStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacedRecordStream")
            .field("policy", &self.policy)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use contracts::NoopObserver;

    use crate::pacing::TokioSleeper;

    #[derive(Clone, Default)]
    struct RecordingSleeper {
        delays: Arc<Mutex<Vec<Duration>>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
            self.delays.lock().unwrap().push(duration);
            std::future::ready(())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        records: Mutex<Vec<u64>>,
        finishes: Mutex<Vec<(StreamEnd, u64)>>,
    }

    impl StreamObserver for RecordingObserver {
        fn on_record(&self, _stream: &str, cursor: u64) {
            self.records.lock().unwrap().push(cursor);
        }

        fn on_finish(&self, end: StreamEnd, emitted: u64) {
            self.finishes.lock().unwrap().push((end, emitted));
        }
    }

    fn policy(max_records: Option<u64>, interval_ms: Option<u64>) -> PacingPolicy {
        PacingPolicy {
            max_records,
            interval: interval_ms.map(Duration::from_millis),
        }
    }

    fn tokio_stream(policy: PacingPolicy) -> PacedRecordStream<TokioSleeper> {
        PacedRecordStream::new(
            policy,
            TokioSleeper,
            CancellationToken::new(),
            Arc::new(NoopObserver),
        )
    }

    fn counter(record: &Record) -> u64 {
        record.data[COUNTER_FIELD].as_u64().unwrap()
    }

    #[tokio::test]
    async fn test_bounded_stream_emits_counter_then_ends() {
        let mut stream = tokio_stream(policy(Some(3), None));

        for expected in 1..=3 {
            let record = stream.next().await.unwrap().unwrap();
            assert_eq!(record.stream, STREAM_NAME);
            assert_eq!(counter(&record), expected);
        }
        assert!(stream.next().await.unwrap().is_none());
        assert!(stream.next().await.unwrap().is_none());
        assert_eq!(stream.state(), StreamState::Exhausted);
    }

    #[tokio::test]
    async fn test_zero_max_records_is_empty() {
        let mut stream = tokio_stream(policy(Some(0), Some(10)));
        assert!(stream.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unbounded_stream_keeps_counting() {
        let mut stream = tokio_stream(policy(None, None));
        for expected in 1..=10_000 {
            let record = stream.next().await.unwrap().unwrap();
            assert_eq!(counter(&record), expected);
        }
        assert_eq!(stream.emitted(), 10_000);
    }

    #[tokio::test]
    async fn test_delay_precedes_every_record_but_the_first() {
        let sleeper = RecordingSleeper::default();
        let mut stream = PacedRecordStream::new(
            policy(Some(3), Some(20)),
            sleeper.clone(),
            CancellationToken::new(),
            Arc::new(NoopObserver),
        );

        while stream.next().await.unwrap().is_some() {}

        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_millis(20); 2]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_spaces_consecutive_records() {
        let mut stream = tokio_stream(policy(Some(2), Some(50)));

        let start = tokio::time::Instant::now();
        stream.next().await.unwrap().unwrap();
        assert!(start.elapsed() < Duration::from_millis(50));

        stream.next().await.unwrap().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_delay_yields_no_record() {
        let mut stream = tokio_stream(policy(None, Some(1_000)));
        stream.next().await.unwrap().unwrap();

        let token = stream.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = stream.next().await.unwrap_err();
        assert!(matches!(err, ContractError::StreamCancelled { emitted: 1 }));
        assert_eq!(stream.emitted(), 1);
        assert_eq!(stream.state(), StreamState::Cancelled);

        assert!(stream.next().await.is_err());
        stream.close().await.unwrap();
        assert!(stream.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel_before_pull_is_reported() {
        let mut stream = tokio_stream(policy(None, None));
        stream.cancellation_token().cancel();
        assert!(matches!(
            stream.next().await,
            Err(ContractError::StreamCancelled { emitted: 0 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_pull_leaves_cursor_untouched() {
        let mut stream = tokio_stream(policy(None, Some(1_000)));
        stream.next().await.unwrap().unwrap();

        let abandoned = tokio::time::timeout(Duration::from_millis(10), stream.next()).await;
        assert!(abandoned.is_err());
        assert_eq!(stream.emitted(), 1);

        stream.close().await.unwrap();
        assert!(stream.cancellation_token().is_cancelled());
        assert!(stream.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_reported_once() {
        let observer = Arc::new(RecordingObserver::default());
        let mut stream = PacedRecordStream::new(
            policy(None, None),
            TokioSleeper,
            CancellationToken::new(),
            observer.clone(),
        );

        stream.next().await.unwrap().unwrap();
        stream.next().await.unwrap().unwrap();
        stream.close().await.unwrap();
        stream.close().await.unwrap();

        assert_eq!(stream.state(), StreamState::Released);
        assert_eq!(*observer.records.lock().unwrap(), vec![1, 2]);
        assert_eq!(
            *observer.finishes.lock().unwrap(),
            vec![(StreamEnd::Released, 2)]
        );
    }
}
