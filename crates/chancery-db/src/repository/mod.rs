//! SurrealDB repository implementations.

mod dossier;
mod grant;
mod transfer;
mod world;

pub use dossier::SurrealDossierRepository;
pub use grant::SurrealGrantRepository;
pub use transfer::SurrealTransferRepository;
pub use world::SurrealWorldRepository;
