pub mod company_repo;
pub mod item_repo;

pub use company_repo::CompanyRepo;
pub use item_repo::ItemRepo;
