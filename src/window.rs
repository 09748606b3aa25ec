use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::ShowcaseConfig,
    engine, input,
    rendering::renderer::Renderer,
    showcase::ShowcaseState,
};

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

struct App {
    config: ShowcaseConfig,
    renderer: Option<Renderer>,
    state: Option<ShowcaseState>,
    imgui: Option<ImguiState>,
    last_frame: Instant,
}

impl App {
    fn new(config: ShowcaseConfig) -> Self {
        Self {
            config,
            renderer: None,
            state: None,
            imgui: None,
            last_frame: Instant::now(),
        }
    }

    fn setup_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 16.0 * window.scale_factor() as f32;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);
        context.io_mut().font_global_scale = 1.0 / window.scale_factor() as f32;

        // Page layout is fixed, nothing to persist
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let mut imgui = Self::setup_imgui(&window);

        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
        let mut state =
            ShowcaseState::new(self.config.clone(), Vec2::new(logical.width, logical.height));

        let mut renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &state,
            &mut imgui.context,
        ))?;
        renderer.load_models(&mut state);

        self.imgui = Some(imgui);
        self.state = Some(state);
        self.renderer = Some(renderer);
        self.last_frame = Instant::now();

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("Failed to start: {:#}", err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(renderer), Some(state), Some(imgui)) = (
            self.renderer.as_mut(),
            self.state.as_mut(),
            self.imgui.as_mut(),
        ) else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(*new_size);

                let logical = new_size.to_logical::<f32>(renderer.window.scale_factor());
                state.resize(Vec2::new(logical.width, logical.height));
            }
            WindowEvent::CursorMoved { position, .. } => {
                let size = renderer.window.inner_size();
                state.on_cursor_moved(
                    Vec2::new(position.x as f32, position.y as f32),
                    Vec2::new(size.width as f32, size.height as f32),
                );
            }
            WindowEvent::MouseWheel { delta, .. } => {
                state.handle(input::wheel_action(*delta, renderer.window.scale_factor()));
            }
            WindowEvent::KeyboardInput { event: key, .. } if key.state == ElementState::Pressed => {
                if let Some(action) = input::key_action(&key.logical_key) {
                    state.handle(action);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now - self.last_frame;
                self.last_frame = now;
                imgui.context.io_mut().update_delta_time(delta_time);

                renderer.window.request_redraw();

                if let Err(err) = imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                {
                    log::error!("Failed to prepare Imgui frame: {}", err);
                    return;
                }

                let ui = imgui.context.new_frame();
                engine::update(state, ui, delta_time.as_secs_f32());
                imgui.platform.prepare_render(ui, &renderer.window);

                match renderer.render(state, &mut imgui.context) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Surface timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected surface error: {:?}", other);
                    }
                }
            }
            _ => (),
        }

        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            &renderer.window,
            &Event::WindowEvent { window_id, event },
        );
    }
}

pub fn run(config: ShowcaseConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
