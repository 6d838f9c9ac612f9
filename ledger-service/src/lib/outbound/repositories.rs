mod entry;
mod user;

pub use entry::PostgresEntryRepository;
pub use user::PostgresUserRepository;
