#[ctor::ctor]
fn init_logging() {
    eqcov::testing::init_global_test_logging();
}

#[macro_export]
macro_rules! test_log {
    ($($arg:tt)*) => {
        tracing::info!(target: "eqcov::test", $($arg)*);
    };
}
