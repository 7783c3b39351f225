pub mod stage0_load;
pub mod stage1_generate;
pub mod stage2_write;

pub use stage0_load::*;
pub use stage1_generate::*;
pub use stage2_write::*;
