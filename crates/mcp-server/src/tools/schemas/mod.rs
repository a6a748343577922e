pub(crate) mod audit;
pub(crate) mod documents;
pub(crate) mod knowledge;
pub(crate) mod search;
pub(crate) mod status;
pub(crate) mod suggest;
