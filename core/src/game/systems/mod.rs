pub(crate) mod construction;
pub(crate) mod events;
pub(crate) mod monthly;
