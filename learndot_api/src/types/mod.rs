mod page;
pub use self::page::{AggregatedResult, PageResponse};

mod record;
pub use self::record::{Record, RecordId};
