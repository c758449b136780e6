pub mod client;

pub use self::client::HttpBackend;
