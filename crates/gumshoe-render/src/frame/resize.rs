use winit::event::WindowEvent;

use crate::events::{self, EventBus, EventData};

/// Maps a winit window event to a `window-resized` payload.
///
/// Returns `None` for events that do not change the window size.
/// `ScaleFactorChanged` carries no final size, so its payload is empty.
pub fn translate_resize(event: &WindowEvent) -> Option<EventData> {
    match event {
        WindowEvent::Resized(size) => Some(EventData::Size {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::ScaleFactorChanged { .. } => Some(EventData::None),
        _ => None,
    }
}

/// Emits `window-resized` on `bus` for resize-like window events.
///
/// Returns whether anything was emitted.
pub fn forward_window_event(bus: &EventBus, event: &WindowEvent) -> bool {
    match translate_resize(event) {
        Some(data) => {
            bus.emit(events::WINDOW_RESIZED, data);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use winit::dpi::PhysicalSize;

    #[test]
    fn resized_carries_physical_size() {
        let ev = WindowEvent::Resized(PhysicalSize::new(1024, 768));
        assert_eq!(translate_resize(&ev), Some(EventData::Size { width: 1024, height: 768 }));
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = bus.on(events::WINDOW_RESIZED, move |_| h.set(h.get() + 1));

        assert!(!forward_window_event(&bus, &WindowEvent::Focused(true)));
        assert!(!forward_window_event(&bus, &WindowEvent::CloseRequested));
        assert!(forward_window_event(&bus, &WindowEvent::Resized(PhysicalSize::new(1, 1))));
        assert_eq!(hits.get(), 1);
    }
}
