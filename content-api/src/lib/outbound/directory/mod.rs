pub mod password;
pub mod postgres;

pub use password::PasswordHasher;
pub use postgres::PostgresUserDirectory;
