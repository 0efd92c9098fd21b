use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The distribution family used for every rating in a run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Family {
    #[default]
    Gaussian,
    Gamma
}
