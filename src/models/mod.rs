pub mod finding;
pub mod record;

pub use finding::{Finding, FindingKind};
pub use record::{LogRecord, NumberedRecord, RequestInfo, ResponseInfo};
