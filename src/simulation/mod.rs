pub mod cascade;
pub mod consumption;
pub mod dilemma;
pub mod disaster;
pub mod events;
pub mod tick;
