pub mod ai;
pub mod chat;
pub mod completeness;
pub mod composer;
pub mod search;
pub mod travel;
