pub mod api;
pub mod backend;

pub use self::{api::HttpBackend, backend::PaymentsBackend};
