mod common;

mod metadata_tests;
mod property_tests;
mod scenario_tests;
