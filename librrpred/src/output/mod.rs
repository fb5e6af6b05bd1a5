pub mod output_rr;
pub use output_rr::PredictionFile;
