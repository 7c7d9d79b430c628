pub(crate) mod classifier;
