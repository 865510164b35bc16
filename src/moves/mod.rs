pub mod attacks;
pub mod detail;
pub mod magic;
pub mod magic_numbers;
pub mod movegen;
pub mod perft;
pub mod square_control;
pub mod types;
