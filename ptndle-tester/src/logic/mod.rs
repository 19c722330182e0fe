pub mod assets;
pub mod policy;
pub mod reports;
pub mod tester;

pub use assets::load_catalog;
pub use policy::{GuessPolicy, GuessStrategy};
pub use tester::*;
