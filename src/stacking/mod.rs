pub mod aggregator;
pub mod grouper;
pub mod reducer;
pub mod tone;

pub use aggregator::{FinalStack, StackResult, group_output_path};
pub use grouper::{BatchGrouper, Group};
pub use reducer::{BACKGROUND_TERM, CpuEngine, RenderEngine, RenderSettings, reduce_mean};
pub use tone::{FINAL_GAMMA, apply_gamma, gamma_table};
