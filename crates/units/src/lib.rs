pub mod length;
pub mod mass;


pub use length::{KPC_PER_MPC, Length};
pub use mass::Mass;
