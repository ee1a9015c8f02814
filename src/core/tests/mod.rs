mod graph_engine_tests;

/// Route `log` output through the test harness
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
