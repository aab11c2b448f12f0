pub(super) mod clinic;
pub(super) mod equipment;
