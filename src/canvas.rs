pub(crate) mod raster;
pub(crate) mod snapshot;
pub(crate) mod stroke;
