use glam::Vec2;

use crate::{
    camera::Camera,
    chair::{build_chair, ChairHandles, DEFAULT_UPHOLSTERY},
    config::ShowcaseConfig,
    customizer::Customizer,
    input::PointerState,
    material_manager::MaterialManager,
    motion::{ChairMotion, FrameContext},
    page::Page,
    scene_graph::Scene,
    tween::{Ease, Tween},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDelta {
    Lines(f32),
    /// Logical pixels.
    Pixels(f32),
    Pages(f32),
    Top,
    Bottom,
}

/// Everything the window and the overlay can ask the showcase to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowcaseAction {
    SelectOption(usize),
    SelectColor(String),
    Scroll(ScrollDelta),
    CtaHovered(bool),
    /// Jumps to the customizer section.
    CtaPressed,
}

pub struct ShowcaseState {
    pub config: ShowcaseConfig,
    pub camera: Camera,
    pub scene: Scene,
    pub materials: MaterialManager,
    pub chair: ChairHandles,
    pub pointer: PointerState,
    pub page: Page,
    pub motion: ChairMotion,
    pub customizer: Customizer,
    cta_scale: Tween,
    clock: f32,
}

impl ShowcaseState {
    /// `viewport` is the window's inner size in logical pixels.
    pub fn new(config: ShowcaseConfig, viewport: Vec2) -> Self {
        let camera = Camera::from_config(&config.camera);
        let customizer = Customizer::new(&config.customizer);

        let mut scene = Scene::new();
        let mut materials = MaterialManager::new();
        let chair = build_chair(
            &mut scene,
            &mut materials,
            customizer.active_color().unwrap_or(DEFAULT_UPHOLSTERY),
        );

        let page = Page::new(viewport, config.page.clone());
        let motion = ChairMotion::new(&config.motion);
        let cta_scale = Tween::settled(1.0, config.page.cta_hover_duration, Ease::Power1Out);

        log::info!(
            "Showcase ready: {} objects, {} color options",
            scene.objects.len(),
            customizer.options().len()
        );

        Self {
            config,
            camera,
            scene,
            materials,
            chair,
            pointer: PointerState::default(),
            page,
            motion,
            customizer,
            cta_scale,
            clock: 0.0,
        }
    }

    /// Seconds of simulated time since startup.
    pub fn elapsed(&self) -> f32 {
        self.clock
    }

    pub fn cta_scale(&self) -> f32 {
        self.cta_scale.value()
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.page.resize(viewport);
    }

    /// Cursor position and viewport in the same (physical) pixel space.
    pub fn on_cursor_moved(&mut self, position: Vec2, viewport: Vec2) {
        self.pointer.on_cursor_moved(position, viewport);
    }

    pub fn handle(&mut self, action: ShowcaseAction) {
        match action {
            ShowcaseAction::SelectOption(index) => {
                if let Err(err) = self.customizer.select(
                    index,
                    &self.chair,
                    &mut self.materials,
                    &mut self.motion,
                ) {
                    log::warn!("{:#}", err);
                }
            }
            ShowcaseAction::SelectColor(value) => {
                if let Err(err) = self.customizer.select_value(
                    &value,
                    &self.chair,
                    &mut self.materials,
                    &mut self.motion,
                ) {
                    log::warn!("{:#}", err);
                }
            }
            ShowcaseAction::Scroll(delta) => self.scroll(delta),
            ShowcaseAction::CtaHovered(hovered) => {
                let target = if hovered {
                    self.config.page.cta_hover_scale
                } else {
                    1.0
                };
                self.cta_scale.retarget(target);
            }
            ShowcaseAction::CtaPressed => {
                let top = self.page.layout().customizer.top;
                self.page.scroll_to(top);
            }
        }
    }

    fn scroll(&mut self, delta: ScrollDelta) {
        match delta {
            ScrollDelta::Lines(lines) => self.page.scroll_lines(lines),
            ScrollDelta::Pixels(pixels) => self.page.scroll_by(pixels),
            ScrollDelta::Pages(pages) => self.page.scroll_pages(pages),
            ScrollDelta::Top => self.page.scroll_to(0.0),
            ScrollDelta::Bottom => self.page.scroll_to(f32::MAX),
        }
    }

    /// Advances every animation by `dt` seconds and writes the resolved pose
    /// to the chair group.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock += dt;

        self.page.tick(dt);
        self.cta_scale.tick(dt);

        let pose = self.motion.resolve(&FrameContext {
            pointer: self.pointer.normalized(),
            scroll_progress: self.page.hero_progress(),
            elapsed: self.clock,
            dt,
        });

        self.scene
            .set_object_transform(self.chair.group, pose.position, pose.quat(), pose.scale);
    }
}
