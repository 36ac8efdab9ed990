pub mod companies;
pub mod items;
