pub mod digits;
pub mod reel;
