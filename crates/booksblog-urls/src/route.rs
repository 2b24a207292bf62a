use booksblog_core::exception::Result;
use booksblog_http::{Handler, Method};
use std::sync::Arc;

use crate::pattern::PathPattern;

/// A path pattern bound to a handler.
#[derive(Clone)]
pub struct Route {
	pub path: String,
	handler: Arc<dyn Handler>,
	pub name: Option<String>,
	/// Accepted methods; empty accepts every method
	pub methods: Vec<Method>,
}

impl Route {
	pub fn new(path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		Self {
			path: path.into(),
			handler,
			name: None,
			methods: Vec::new(),
		}
	}

	/// Route names are unique within a router.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
		self.methods = methods.into_iter().collect();
		self
	}

	pub fn handler(&self) -> &Arc<dyn Handler> {
		&self.handler
	}

	pub fn allows(&self, method: &Method) -> bool {
		self.methods.is_empty()
			|| self.methods.contains(method)
			|| (*method == Method::HEAD && self.methods.contains(&Method::GET))
	}

	pub(crate) fn compile(&self) -> Result<PathPattern> {
		PathPattern::new(self.path.clone())
	}
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("path", &self.path)
			.field("name", &self.name)
			.field("methods", &self.methods)
			.finish()
	}
}
