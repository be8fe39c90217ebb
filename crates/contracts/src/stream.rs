//! RecordStream trait - pull-based record sequence
//!
//! The host pulls one record at a time and must release the stream on every
//! exit path (exhaustion, early abandonment, error).

use crate::{ContractError, Record};

/// Lazily evaluated, closeable record sequence
#[trait_variant::make(RecordStream: Send)]
pub trait LocalRecordStream {
    /// Pull the next record
    ///
    /// `Ok(None)` signals end of data. Once end of data has been signalled,
    /// further pulls keep returning `Ok(None)`.
    async fn next(&mut self) -> Result<Option<Record>, ContractError>;

    /// Release underlying resources
    ///
    /// Idempotent: calling it more than once is a no-op.
    async fn close(&mut self) -> Result<(), ContractError>;
}

/// In-memory stream over prepared records
#[derive(Debug, Default)]
pub struct VecRecordStream {
    records: std::vec::IntoIter<Record>,
    closed: bool,
}

impl VecRecordStream {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into_iter(),
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RecordStream for VecRecordStream {
    async fn next(&mut self) -> Result<Option<Record>, ContractError> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.records.next())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[tokio::test]
    async fn test_vec_stream_drains_then_ends() {
        let mut stream = VecRecordStream::new(vec![
            Record::new("data", Map::new()),
            Record::new("data", Map::new()),
        ]);

        assert!(RecordStream::next(&mut stream).await.unwrap().is_some());
        assert!(RecordStream::next(&mut stream).await.unwrap().is_some());
        assert!(RecordStream::next(&mut stream).await.unwrap().is_none());
        assert!(RecordStream::next(&mut stream).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_vec_stream_close_is_idempotent() {
        let mut stream = VecRecordStream::new(vec![Record::new("data", Map::new())]);
        RecordStream::close(&mut stream).await.unwrap();
        RecordStream::close(&mut stream).await.unwrap();
        assert!(stream.is_closed());
        assert!(RecordStream::next(&mut stream).await.unwrap().is_none());
    }
}
