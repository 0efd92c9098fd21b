pub mod csv_reader;
pub mod match_store;

pub use csv_reader::{pad_scores, read_csv, read_csv_from};
pub use match_store::{MatchStore, StoreError};
