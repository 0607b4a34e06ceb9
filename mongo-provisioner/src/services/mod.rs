pub mod database;
pub mod registry;

pub use database::MongoAdmin;
pub use registry::UserRegistry;
