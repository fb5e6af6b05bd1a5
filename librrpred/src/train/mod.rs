mod trainer;
pub use trainer::*;

mod training_set;
pub use training_set::*;
