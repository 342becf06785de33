//! Search box input: raw text, debounced commits and immediate submits.

pub mod debounce;
pub mod input;

pub use debounce::Debouncer;
pub use input::SearchInput;
