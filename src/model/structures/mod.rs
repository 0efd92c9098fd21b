pub mod distribution;
pub mod family;
pub mod match_record;
pub mod update_kind;
