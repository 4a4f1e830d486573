pub mod http;

pub use http::HttpFeedTransport;
