pub(crate) mod base;
pub(crate) mod carve;
pub(crate) mod flatmap;
pub(crate) mod segment;
