//! Panel enumeration
//!
//! A panel is one rendered content region owned by the host UI; each panel
//! becomes exactly one page of the output document. The pipeline never
//! mutates panels, it only observes them for the duration of one export.

/// Source of the ordered panel sequence for one export call.
///
/// Implementations wrap whatever the host uses to hold its rendered panels
/// (a widget container, a framebuffer list, ...). `panels` must return a
/// finite, ordered, fully materialized snapshot taken at call time; the
/// pipeline holds no reference to the source afterwards.
///
/// Returning `None` signals "not ready yet" (e.g. the container is not
/// attached or has not rendered). The pipeline treats that as a benign
/// short-circuit, not a hard failure.
pub trait PanelSource {
    /// The host's panel handle type.
    type Panel;

    /// Snapshot the current panels in document order, or `None` if the
    /// source is not ready. Purely observational; no side effects.
    fn panels(&self) -> Option<Vec<Self::Panel>>;
}

/// A ready-made source over an owned list of panels.
///
/// Useful for hosts that already collected their panels, and for tests.
/// Cloning the panels per snapshot keeps the source reusable across calls.
#[derive(Debug, Clone, Default)]
pub struct VecPanelSource<P> {
    panels: Vec<P>,
}

impl<P> VecPanelSource<P> {
    pub fn new(panels: Vec<P>) -> Self {
        Self { panels }
    }
}

impl<P: Clone> PanelSource for VecPanelSource<P> {
    type Panel = P;

    fn panels(&self) -> Option<Vec<P>> {
        Some(self.panels.clone())
    }
}
