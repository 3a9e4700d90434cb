pub mod deriver;
pub mod evaluator;

pub use deriver::derive_analysis;
pub use evaluator::{is_high_leverage_sector, passes_screen, screen_stock};
