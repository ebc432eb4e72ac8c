pub use self::event::*;

pub(crate) mod event;
