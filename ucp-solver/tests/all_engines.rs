#![allow(unused_macros)]
use rstest_reuse::template;

// This creates a testing "template" to allow for the injection of each engine
// implementation

#[template]
#[rstest]
#[case::highs(ucp_solver::highs::HighsEngine::default())]
#[case::cbc(ucp_solver::cbc::CbcEngine::default())]
pub fn all_engines(#[case] engine: impl ucp_solver::Engine) -> () {}
