//! Project configuration: shared application context, templates, URL
//! routing and the request pipeline.

pub mod context;
pub mod settings;
pub mod templates;
pub mod urls;
pub mod views;

pub use context::AppContext;
pub use settings::get_settings;
pub use urls::{build_application, url_patterns};
