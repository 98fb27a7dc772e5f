pub mod document;
pub mod extract;
pub mod thread;

pub use document::{Block, Document};
pub use extract::{ProjectDetail, ReadmeSummary, summarize};
