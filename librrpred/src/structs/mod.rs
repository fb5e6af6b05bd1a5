pub mod contacts;
pub use contacts::{ContactSet, RrRecord};

pub mod model;
pub use model::Model;

pub mod prediction;
pub use prediction::PredictionRow;

pub mod profile;
pub use profile::Profile;
