/// Implementation backed by the HiGHS mixed-integer solver
#[cfg(feature = "highs")]
pub mod highs;

/// Implementation backed by COIN-OR CBC, through good_lp
#[cfg(feature = "cbc")]
pub mod cbc;
