pub mod densemap;
pub mod dirty;
pub mod fs;
pub mod graph;
pub mod load;
pub mod parse;
pub mod plan;
pub mod process;
pub mod progress;
pub mod run;
pub mod task;
#[cfg(test)]
mod testing;
pub mod trace;
pub mod work;
