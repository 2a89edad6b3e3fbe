mod config_tests;
mod orchestrator_tests;
mod support;
