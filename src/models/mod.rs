// Data models for the gateway envelope and capability requests

pub mod baidu;
pub mod envelope;
pub mod fields;

pub use envelope::Envelope;
pub use fields::{Params, RequestFields};
