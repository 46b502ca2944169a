use crate::api::types::{Dials, SurfaceSize};

/// Control events the host pushes into the field.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// The label changed. Blank text falls back to the default label.
    SetText(String),
    SetDials(Dials),
    /// Advisory "generating" flag from the UI; never read by physics.
    SetGenerating(bool),
    /// The output surface was resized. Forces a resample.
    Resize(SurfaceSize),
    /// The host font set finished loading; glyph sampling may start.
    FontsReady,
}

/// Pending control events.
/// The host pushes between frames; the driver drains once at the start of each update.
pub struct ControlQueue {
    events: Vec<ControlEvent>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.events.push(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_in_order() {
        let mut q = ControlQueue::new();
        q.push(ControlEvent::SetText("আলো".into()));
        q.push(ControlEvent::FontsReady);
        let events = q.drain();
        assert_eq!(
            events,
            vec![ControlEvent::SetText("আলো".into()), ControlEvent::FontsReady]
        );
        assert!(q.drain().is_empty());
    }

    #[test]
    fn events_pushed_after_a_drain_wait_for_the_next() {
        let mut q = ControlQueue::default();
        q.push(ControlEvent::SetDials(Dials::new(20, 50, 10)));
        assert_eq!(q.drain(), vec![ControlEvent::SetDials(Dials::new(20, 50, 10))]);
        q.push(ControlEvent::Resize(SurfaceSize::new(320, 180, 2.0)));
        assert_eq!(q.drain(), vec![ControlEvent::Resize(SurfaceSize::new(320, 180, 2.0))]);
    }
}
