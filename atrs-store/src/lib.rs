pub mod app_config;
pub mod database;
pub mod flight_repo;
pub mod member_repo;
pub mod memory;
pub mod reservation_repo;

pub use database::DbClient;
pub use member_repo::PgMemberRepository;
pub use memory::{MemoryStore, WriteOp};
pub use reservation_repo::{PgReservationStore, PgReservationUnit};
