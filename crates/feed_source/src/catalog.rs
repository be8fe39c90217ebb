//! Constant catalog of the feed source

use std::sync::LazyLock;

use contracts::Catalog;
use serde_json::json;

/// The only stream the feed source emits
pub const STREAM_NAME: &str = "data";
/// Field carrying the counter value
pub const COUNTER_FIELD: &str = "column1";

static FEED_CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    Catalog::single_stream(
        STREAM_NAME,
        json!({
            "type": "object",
            "properties": {
                "column1": {"type": "number"}
            }
        }),
    )
});

/// Fresh copy of the feed catalog
pub fn feed_catalog() -> Catalog {
    FEED_CATALOG.clone()
}
