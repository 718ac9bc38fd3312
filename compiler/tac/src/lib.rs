pub mod tac;
mod tac_gen;
mod print_tac;
mod eval;

pub use eval::*;
pub use print_tac::*;
pub use tac::*;
pub use tac_gen::*;
