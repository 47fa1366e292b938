//! Per-view subscription bookkeeping
//!
//! A view listens to map, unmap, destroy and request_configure for its
//! whole life, and to commit only while mapped. All tokens live here and
//! are handed back to the bus exactly once, at destroy.

use crate::signals::{Signal, SignalBus, SignalSource, SubscriptionToken};
use crate::surface::{SurfaceId, WlSurfaceId};
use crate::view::ViewId;

/// Number of subscriptions held from creation to destroy
pub const PERMANENT_SUBSCRIPTIONS: usize = 4;

/// What [`SubscriptionSet::release`] handed back to the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReleaseReport {
    pub permanent: usize,
    pub commit: usize,
}

impl ReleaseReport {
    pub fn total(&self) -> usize {
        self.permanent + self.commit
    }
}

#[derive(Debug)]
pub struct SubscriptionSet {
    map: SubscriptionToken,
    unmap: SubscriptionToken,
    destroy: SubscriptionToken,
    request_configure: SubscriptionToken,
    commit: Option<SubscriptionToken>,
}

impl SubscriptionSet {
    /// Attach the permanent listeners for `view` on `surface`
    pub fn attach(bus: &mut SignalBus, surface: SurfaceId, view: ViewId) -> Self {
        let source = SignalSource::XSurface(surface);
        Self {
            map: bus.connect(source, Signal::Map, view),
            unmap: bus.connect(source, Signal::Unmap, view),
            destroy: bus.connect(source, Signal::Destroy, view),
            request_configure: bus.connect(source, Signal::RequestConfigure, view),
            commit: None,
        }
    }

    /// Start listening to commits on the surface bound at map
    pub fn attach_commit(&mut self, bus: &mut SignalBus, surface: WlSurfaceId, view: ViewId) {
        assert!(
            self.commit.is_none(),
            "{} already holds a commit subscription",
            view
        );
        self.commit = Some(bus.connect(SignalSource::WlSurface(surface), Signal::Commit, view));
    }

    /// Stop listening to commits. Holding no commit subscription here is a
    /// sequencing defect.
    pub fn detach_commit(&mut self, bus: &mut SignalBus) {
        let Some(token) = self.commit.take() else {
            panic!("commit subscription removed while not attached");
        };
        bus.disconnect(token);
    }

    pub fn has_commit(&self) -> bool {
        self.commit.is_some()
    }

    /// Surface the commit listener is attached to
    pub fn commit_source(&self) -> Option<SignalSource> {
        self.commit.as_ref().map(SubscriptionToken::source)
    }

    /// Subscriptions currently held, permanent ones included
    pub fn count(&self) -> usize {
        PERMANENT_SUBSCRIPTIONS + usize::from(self.commit.is_some())
    }

    /// Detach everything, consuming the set
    pub fn release(self, bus: &mut SignalBus) -> ReleaseReport {
        let Self {
            map,
            unmap,
            destroy,
            request_configure,
            commit,
        } = self;

        let mut report = ReleaseReport::default();
        for token in [map, unmap, destroy, request_configure] {
            bus.disconnect(token);
            report.permanent += 1;
        }
        if let Some(token) = commit {
            bus.disconnect(token);
            report.commit += 1;
        }
        report
    }
}
