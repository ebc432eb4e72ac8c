pub(crate) mod pitch;
pub(crate) mod summary;
