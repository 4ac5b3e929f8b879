pub mod strategy_tests;
