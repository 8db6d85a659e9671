pub mod forecast;
pub mod ohlcv;

pub use forecast::*;
pub use ohlcv::*;
