//! Handler dispatch: routes one decoded [`ServerPacket`] to the state mirror
//! (always) and, if registered, a raw handler. Deliberately an explicit
//! `match` over the `ServerPacket` sum type rather than a reflective
//! name-based lookup table.

use crate::mirror::StateMirror;
use crate::observation::Observation;
use crate::protocol::ServerPacket;

/// A handler that sees every decoded packet before it is folded into the
/// state mirror. Optional; registered once per connection.
pub type RawHandler = Box<dyn FnMut(&ServerPacket) + Send>;

#[derive(Default)]
pub struct Dispatcher {
    raw_handler: Option<RawHandler>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher { raw_handler: None }
    }

    pub fn set_raw_handler(&mut self, handler: RawHandler) {
        self.raw_handler = Some(handler);
    }

    /// Folds `packet` into `mirror`, invokes the raw handler if present, and
    /// returns the observations the typed (mirror) side produced.
    pub fn dispatch(&mut self, packet: &ServerPacket, mirror: &mut StateMirror) -> Vec<Observation> {
        if let Some(handler) = self.raw_handler.as_mut() {
            handler(packet);
        }
        mirror.apply(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn raw_handler_fires_alongside_mirror_update() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let mut dispatcher = Dispatcher::new();
        dispatcher.set_raw_handler(Box::new(move |_packet| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let mut mirror = StateMirror::new();
        let obs = dispatcher.dispatch(&ServerPacket::NewGame, &mut mirror);

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(matches!(obs.as_slice(), [Observation::NewGame]));
    }
}
