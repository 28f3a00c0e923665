pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod room_repo;
pub use room_repo::RoomRepository;
pub mod reservation_repo;
pub use reservation_repo::{PgReservationStore, ReservationStore};
pub mod user_repo;
pub use user_repo::UserRepository;
