pub mod browser;
pub mod document;
pub mod flights;
pub mod http;
pub mod traits;
pub mod types;

pub use browser::ChromePage;
pub use http::HttpPage;
pub use traits::Page;
pub use types::{Backend, ScrapeConfig};
