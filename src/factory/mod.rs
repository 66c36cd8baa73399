pub(crate) mod frame;
pub(crate) mod loader;
pub(crate) mod model;
pub(crate) mod resolve;
pub(crate) mod template;
