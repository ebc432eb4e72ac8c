pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseGameStateError {
    #[display("game state key does not match the RRR-O?-B?-S? shape")]
    MalformedKey,
    #[display("game state component outside the pre-pitch range")]
    OutOfRange,
}
