pub mod classifier;
pub mod pipeline;
pub mod progress;
pub mod renderer;
pub mod report;
pub mod resolver;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
