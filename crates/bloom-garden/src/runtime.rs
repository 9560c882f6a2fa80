#![forbid(unsafe_code)]

//! Synchronous command executor for a [`GardenSession`].
//!
//! Each dispatched message may produce store commands; their completions
//! are fed back as messages until the session has nothing left to ask for.
//! Hosts with an event loop of their own can skip this type and drive
//! [`GardenSession::update`] directly.

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::SmallRng;

use crate::session::{GardenCmd, GardenMsg, GardenSession};
use crate::store::FlowerStore;

/// A session wired to a concrete store.
#[derive(Debug)]
pub struct GardenRuntime<S, R = SmallRng> {
    session: GardenSession<R>,
    store: S,
}

#[cfg(feature = "rest")]
impl GardenRuntime<crate::rest::RestStore> {
    /// Build a runtime against the store named by the environment.
    pub fn from_env() -> Result<Self, crate::error::StartupError> {
        let config = crate::config::StoreConfig::from_env()?;
        let store = crate::rest::RestStore::new(&config)?;
        Ok(Self::new(GardenSession::from_os_rng(), store))
    }
}

impl<S: FlowerStore, R: Rng> GardenRuntime<S, R> {
    pub fn new(session: GardenSession<R>, store: S) -> Self {
        Self { session, store }
    }

    #[must_use]
    pub const fn session(&self) -> &GardenSession<R> {
        &self.session
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Run the session's mount command.
    pub fn start(&mut self) {
        let cmd = self.session.init();
        self.run(cmd);
    }

    /// Apply `msg` and execute every command it leads to.
    pub fn dispatch(&mut self, msg: GardenMsg) {
        let cmd = self.session.update(msg);
        self.run(cmd);
    }

    fn run(&mut self, cmd: GardenCmd) {
        let mut queue = VecDeque::from([cmd]);
        while let Some(cmd) = queue.pop_front() {
            if let Some(reply) = self.execute(cmd, &mut queue) {
                let next = self.session.update(reply);
                queue.push_back(next);
            }
        }
    }

    fn execute(&mut self, cmd: GardenCmd, queue: &mut VecDeque<GardenCmd>) -> Option<GardenMsg> {
        match cmd {
            GardenCmd::None => None,
            GardenCmd::Batch(cmds) => {
                queue.extend(cmds);
                None
            }
            GardenCmd::LoadAll => Some(GardenMsg::Loaded(self.store.load_all())),
            GardenCmd::Insert(flower) => {
                let result = self.store.insert(&flower);
                Some(GardenMsg::Inserted { flower, result })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;
    use crate::store::MemoryStore;
    use rand::SeedableRng;

    fn runtime(store: MemoryStore) -> GardenRuntime<MemoryStore> {
        GardenRuntime::new(GardenSession::new(SmallRng::seed_from_u64(1)), store)
    }

    #[test]
    fn start_loads_once() {
        let mut rt = runtime(MemoryStore::new());
        rt.start();
        assert_eq!(rt.store().load_calls(), 1);
        assert_eq!(rt.session().phase(), Phase::Ready);
    }

    #[test]
    fn batches_run_in_order() {
        let mut rt = runtime(MemoryStore::new());
        let mut queue = VecDeque::new();
        let reply = rt.execute(
            GardenCmd::Batch(vec![GardenCmd::LoadAll, GardenCmd::None]),
            &mut queue,
        );
        assert!(reply.is_none());
        assert_eq!(queue, [GardenCmd::LoadAll, GardenCmd::None]);
    }

    #[test]
    fn messages_without_commands_touch_no_store() {
        let mut rt = runtime(MemoryStore::new());
        rt.start();
        rt.dispatch(GardenMsg::OpenDrawing);
        rt.dispatch(GardenMsg::CancelDrawing);
        assert_eq!(rt.store().insert_calls(), 0);
        assert_eq!(rt.store().load_calls(), 1);
    }
}
