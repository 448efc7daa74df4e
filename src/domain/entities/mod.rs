pub mod breakout;
pub mod fundamentals;
pub mod region;
