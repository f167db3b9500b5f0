pub mod bands;
pub mod classify;
pub mod delta;
pub mod diagnosis;
