pub(crate) mod quantize;
pub(crate) mod rescale;
pub(crate) mod tensor;
