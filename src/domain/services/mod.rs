pub mod indicators;
pub mod screening;
pub mod value_screen;
