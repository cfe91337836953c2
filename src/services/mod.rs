pub mod api;
pub mod auth;
pub mod catalog;
pub mod dates;
pub mod drafts;
pub mod edit;
pub mod formatters;
pub mod generation;
pub mod http;
pub mod slots;
pub mod storage;
pub mod upcoming;
pub mod wizard;
