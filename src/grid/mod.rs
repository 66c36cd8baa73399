pub(crate) mod alias;
pub(crate) mod context;
pub(crate) mod lines;
pub(crate) mod locate;
