pub mod company;
pub mod item;
