pub(crate) mod artkey;
pub(crate) mod canvas;
pub(crate) mod composite;
pub(crate) mod decode;
pub(crate) mod pipeline;
