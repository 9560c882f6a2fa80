#![forbid(unsafe_code)]

//! Garden session controller for Bloom.
//!
//! # Role in Bloom
//! `bloom-garden` owns the shared collection of published flowers and the
//! publish protocol that moves a drawing from a [`bloom_canvas::DrawingSurface`]
//! into the store. The controller is an Elm-style state machine
//! ([`GardenSession`]) that never performs I/O; store work is described as
//! [`GardenCmd`] values and executed by a host, or by [`GardenRuntime`].
//!
//! # How it fits in the system
//! - [`flower`] and [`placement`] define the persisted record.
//! - [`store`] is the collaborator contract, with an in-memory store and,
//!   behind the `rest` feature, a PostgREST client.
//! - [`config`] reads store credentials from the environment.
//! - [`view`] derives layout and labels for a renderer.
//!
//! Time and randomness are inputs: hosts stamp publishes with their clock
//! and sessions draw ids and placements from an injected generator.

pub mod config;
pub mod error;
pub mod flower;
pub mod placement;
#[cfg(feature = "rest")]
pub mod rest;
pub mod runtime;
pub mod session;
pub mod store;
pub mod view;

pub use config::{ConfigError, StoreConfig};
pub use error::{SessionError, StartupError, StoreError};
pub use flower::{Flower, FlowerId, ImageDataUrl};
pub use placement::Placement;
#[cfg(feature = "rest")]
pub use rest::RestStore;
pub use runtime::GardenRuntime;
pub use session::{GardenCmd, GardenMsg, GardenSession, NOTICE_DURATION, Notice, Phase};
pub use store::{FlowerStore, MemoryStore};
pub use view::{NOTICE_TEXT, PlantedFlowerView, count_label, publish_enabled};
