//! Signal bus for surface-layer notifications
//!
//! Every listener attached to a surface signal is represented by a
//! [`SubscriptionToken`]. The token is the only way to detach the listener
//! again and it is consumed by doing so, so a listener can never be removed
//! twice.

use std::collections::BTreeMap;
use std::fmt;

use log::trace;

use crate::surface::{SurfaceId, WlSurfaceId};
use crate::view::ViewId;

/// Notifications a view can listen to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    Map,
    Unmap,
    Destroy,
    RequestConfigure,
    Commit,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Map => "map",
            Signal::Unmap => "unmap",
            Signal::Destroy => "destroy",
            Signal::RequestConfigure => "request_configure",
            Signal::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Object that emits a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalSource {
    XSurface(SurfaceId),
    WlSurface(WlSurfaceId),
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::XSurface(id) => id.fmt(f),
            SignalSource::WlSurface(id) => id.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Proof that a listener is attached. Detaching consumes it.
#[must_use = "dropping a token leaks the listener"]
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionToken {
    id: ListenerId,
    source: SignalSource,
    signal: Signal,
}

impl SubscriptionToken {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn source(&self) -> SignalSource {
        self.source
    }

    pub fn signal(&self) -> Signal {
        self.signal
    }
}

#[derive(Debug, Clone, Copy)]
struct Listener {
    source: SignalSource,
    signal: Signal,
    view: ViewId,
}

/// Registry of attached listeners
///
/// Listeners are indexed by the signal they wait for, so delivering an
/// event only touches the views listening to it.
#[derive(Debug, Default)]
pub struct SignalBus {
    next_id: u64,
    listeners: BTreeMap<ListenerId, Listener>,
    /// Attachment order per signal
    by_signal: BTreeMap<(SignalSource, Signal), Vec<(ListenerId, ViewId)>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `view` to `signal` emitted by `source`
    pub fn connect(
        &mut self,
        source: SignalSource,
        signal: Signal,
        view: ViewId,
    ) -> SubscriptionToken {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(
            id,
            Listener {
                source,
                signal,
                view,
            },
        );
        self.by_signal
            .entry((source, signal))
            .or_default()
            .push((id, view));
        trace!("🔌 {} listening to {} on {}", view, signal, source);
        SubscriptionToken { id, source, signal }
    }

    /// Detach a listener. The token must still be attached.
    pub fn disconnect(&mut self, token: SubscriptionToken) {
        let Some(listener) = self.listeners.remove(&token.id) else {
            panic!(
                "listener {:?} for {} on {} detached twice",
                token.id, token.signal, token.source
            );
        };

        let key = (listener.source, listener.signal);
        if let Some(entries) = self.by_signal.get_mut(&key) {
            entries.retain(|(id, _)| *id != token.id);
            if entries.is_empty() {
                self.by_signal.remove(&key);
            }
        }
        trace!(
            "🔌 {} stopped listening to {} on {}",
            listener.view,
            token.signal,
            token.source
        );
    }

    /// Views listening to `signal` on `source`, oldest listener first
    pub fn listeners(
        &self,
        source: SignalSource,
        signal: Signal,
    ) -> impl Iterator<Item = ViewId> + '_ {
        self.by_signal
            .get(&(source, signal))
            .into_iter()
            .flatten()
            .map(|(_, view)| *view)
    }

    pub fn has_listeners(&self, source: SignalSource, signal: Signal) -> bool {
        self.by_signal.contains_key(&(source, signal))
    }

    pub fn is_connected(&self, token: &SubscriptionToken) -> bool {
        self.listeners.contains_key(&token.id)
    }

    /// Number of listeners attached on behalf of `view`
    pub fn count_for(&self, view: ViewId) -> usize {
        self.listeners.values().filter(|l| l.view == view).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
