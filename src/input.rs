use glam::Vec2;
use winit::{
    event::MouseScrollDelta,
    keyboard::{Key, NamedKey},
};

use crate::showcase::{ScrollDelta, ShowcaseAction};

/// Latest pointer position in normalized device-like coordinates, both axes
/// in [-1, 1] with +y pointing down the screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerState {
    normalized: Vec2,
}

impl PointerState {
    pub fn normalized(&self) -> Vec2 {
        self.normalized
    }

    /// Samples a cursor position given in pixels. Degenerate viewports keep
    /// the previous sample.
    pub fn on_cursor_moved(&mut self, position: Vec2, viewport: Vec2) {
        if let Some(normalized) = normalize_pointer(position, viewport) {
            self.normalized = normalized;
        } else {
            log::trace!("Ignoring pointer sample {position} for viewport {viewport}");
        }
    }
}

pub fn normalize_pointer(position: Vec2, viewport: Vec2) -> Option<Vec2> {
    if !(viewport.x > 0.0 && viewport.y > 0.0) || !viewport.is_finite() {
        return None;
    }

    let normalized = position / viewport * 2.0 - Vec2::ONE;

    normalized
        .is_finite()
        .then(|| normalized.clamp(Vec2::NEG_ONE, Vec2::ONE))
}

/// Digit keys pick customizer options, navigation keys scroll the page.
pub fn key_action(key: &Key) -> Option<ShowcaseAction> {
    match key {
        Key::Character(text) => {
            let digit = text.as_str().parse::<usize>().ok()?;
            (1..=9)
                .contains(&digit)
                .then(|| ShowcaseAction::SelectOption(digit - 1))
        }
        Key::Named(named) => {
            let delta = match named {
                NamedKey::ArrowDown => ScrollDelta::Lines(1.0),
                NamedKey::ArrowUp => ScrollDelta::Lines(-1.0),
                NamedKey::PageDown | NamedKey::Space => ScrollDelta::Pages(1.0),
                NamedKey::PageUp => ScrollDelta::Pages(-1.0),
                NamedKey::Home => ScrollDelta::Top,
                NamedKey::End => ScrollDelta::Bottom,
                _ => return None,
            };
            Some(ShowcaseAction::Scroll(delta))
        }
        _ => None,
    }
}

/// Wheel deltas are positive when scrolling up, page scroll grows downwards.
pub fn wheel_action(delta: MouseScrollDelta, scale_factor: f64) -> ShowcaseAction {
    let delta = match delta {
        MouseScrollDelta::LineDelta(_, lines) => ScrollDelta::Lines(-lines),
        MouseScrollDelta::PixelDelta(position) => {
            ScrollDelta::Pixels((-position.y / scale_factor.max(f64::EPSILON)) as f32)
        }
    };
    ShowcaseAction::Scroll(delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_and_center_map_to_unit_range() {
        let viewport = Vec2::new(1920.0, 1080.0);

        assert_eq!(normalize_pointer(Vec2::ZERO, viewport), Some(Vec2::NEG_ONE));
        assert_eq!(normalize_pointer(viewport, viewport), Some(Vec2::ONE));
        assert_eq!(normalize_pointer(viewport * 0.5, viewport), Some(Vec2::ZERO));
    }

    #[test]
    fn samples_inside_viewport_stay_in_range() {
        let viewport = Vec2::new(1280.0, 720.0);

        for x in (0..=1280).step_by(37) {
            for y in (0..=720).step_by(29) {
                let p = normalize_pointer(Vec2::new(x as f32, y as f32), viewport).unwrap();
                assert!((-1.0..=1.0).contains(&p.x));
                assert!((-1.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn positions_outside_viewport_are_clamped() {
        let viewport = Vec2::new(100.0, 100.0);
        let p = normalize_pointer(Vec2::new(-50.0, 300.0), viewport).unwrap();
        assert_eq!(p, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn zero_viewport_keeps_last_good_sample() {
        let mut pointer = PointerState::default();
        pointer.on_cursor_moved(Vec2::new(75.0, 25.0), Vec2::new(100.0, 100.0));
        pointer.on_cursor_moved(Vec2::new(10.0, 10.0), Vec2::new(0.0, 100.0));
        pointer.on_cursor_moved(Vec2::new(10.0, 10.0), Vec2::new(f32::NAN, 100.0));

        assert_eq!(pointer.normalized(), Vec2::new(0.5, -0.5));
    }

    #[test]
    fn digits_select_options() {
        assert_eq!(
            key_action(&Key::Character("1".into())),
            Some(ShowcaseAction::SelectOption(0))
        );
        assert_eq!(
            key_action(&Key::Character("4".into())),
            Some(ShowcaseAction::SelectOption(3))
        );
        assert_eq!(key_action(&Key::Character("0".into())), None);
        assert_eq!(key_action(&Key::Character("q".into())), None);
    }

    #[test]
    fn navigation_keys_scroll() {
        assert_eq!(
            key_action(&Key::Named(NamedKey::PageDown)),
            Some(ShowcaseAction::Scroll(ScrollDelta::Pages(1.0)))
        );
        assert_eq!(
            key_action(&Key::Named(NamedKey::Home)),
            Some(ShowcaseAction::Scroll(ScrollDelta::Top))
        );
        assert_eq!(key_action(&Key::Named(NamedKey::Escape)), None);
    }

    #[test]
    fn wheel_up_scrolls_towards_the_top() {
        assert_eq!(
            wheel_action(MouseScrollDelta::LineDelta(0.0, 2.0), 1.0),
            ShowcaseAction::Scroll(ScrollDelta::Lines(-2.0))
        );
        assert_eq!(
            wheel_action(
                MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, -60.0)),
                2.0
            ),
            ShowcaseAction::Scroll(ScrollDelta::Pixels(30.0))
        );
    }
}
