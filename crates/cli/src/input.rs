//! JSON lines record input

use contracts::{ContractError, Record, RecordStream};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Records read one per line; blank lines are skipped
pub struct LinesRecordStream<R> {
    lines: Lines<R>,
    line: u64,
    closed: bool,
}

impl<R: AsyncBufRead + Unpin + Send> LinesRecordStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            closed: false,
        }
    }
}

impl<R: AsyncBufRead + Unpin + Send> RecordStream for LinesRecordStream<R> {
    async fn next(&mut self) -> Result<Option<Record>, ContractError> {
        if self.closed {
            return Ok(None);
        }

        while let Some(line) = self.lines.next_line().await? {
            self.line += 1;
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(&line).map(Some).map_err(|e| {
                ContractError::Other(format!("invalid record on line {}: {e}", self.line))
            });
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.closed = true;
        Ok(())
    }
}
