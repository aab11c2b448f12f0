pub(crate) mod clinic;
pub(crate) mod equipment;
