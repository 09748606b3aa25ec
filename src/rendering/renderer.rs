use std::sync::Arc;

use anyhow::Context;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    config::RenderConfig,
    rendering::{
        global_uniform::GlobalUniformState,
        imgui_renderer::ImguiRendererState,
        instance::gather_instances,
        passes::{
            background_pass::{BackgroundPass, BackgroundPassTextureViews},
            chair_pass::{ChairPass, ChairPassTextureViews},
            pass::Pass,
        },
        render_common::{surface_configuration, RenderCommon},
        render_model::{render_model_instances, RenderModel},
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    showcase::ShowcaseState,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    render_config: RenderConfig,
    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,
    render_models: Arena<RenderModel>,

    camera_uniform: CameraUniform,

    shader_loader: ShaderLoader,

    background_pass: BackgroundPass,
    chair_pass: ChairPass,
    imgui_renderer: ImguiRendererState,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        state: &ShowcaseState,
        imgui: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();
        let render_config = state.config.render.clone();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_config = surface_configuration(&surface, &adapter, size, render_config.vsync)?;
        surface.configure(&device, &surface_config);

        let mut camera_uniform = CameraUniform::default();
        camera_uniform.update(size, &state.camera);
        let camera_uniform_buffer = camera_uniform.create_buffer(&device);

        let common = Arc::new(RenderCommon::new(
            &device,
            surface_config.format,
            &render_config,
            size,
            camera_uniform_buffer,
        ));

        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");

        let mut cache_builder = PipelineCacheBuilder::new();

        let mut background_pass =
            BackgroundPass::create(&device, common.clone(), &mut cache_builder)?;
        background_pass.set_clear_color(render_config.background().to_wgpu());
        let chair_pass = ChairPass::create(&device, common.clone(), &mut cache_builder)?;

        let shader_loader =
            ShaderLoader::new(device.clone(), cache_builder, render_config.watch_shaders)?;

        let imgui_renderer = ImguiRendererState::new(&device, &queue, surface_config.format, imgui);

        Ok(Self {
            window,
            size,
            surface,
            surface_config,
            device,
            queue,
            render_config,
            common,
            depth_texture,
            render_models: Arena::new(),
            camera_uniform,
            shader_loader,
            background_pass,
            chair_pass,
            imgui_renderer,
        })
    }

    pub fn load_models(&mut self, state: &mut ShowcaseState) {
        for (_id, scene_model) in state.scene.models.iter_mut() {
            let render_model = RenderModel::from_model(&self.device, &scene_model.model);
            scene_model.render_model = Some(self.render_models.alloc(render_model));

            log::debug!(
                "Uploaded model {} with {} triangles",
                scene_model.name(),
                scene_model.model.triangle_count()
            );
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture.resize(&self.device, new_size);
    }

    pub fn render(
        &mut self,
        state: &ShowcaseState,
        imgui: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        self.camera_uniform.update(self.size, &state.camera);
        self.camera_uniform
            .update_buffer(&self.queue, &self.common.camera_uniform_buffer);
        self.common.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(&self.render_config, self.size, state.elapsed()),
        );

        gather_instances(&state.scene, &state.materials, &mut self.render_models);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let pipeline_cache = &self.shader_loader.cache;

        self.background_pass.render(
            &BackgroundPassTextureViews {
                color: view.clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| render_pass.draw(0..3, 0..1),
        );

        self.chair_pass.render(
            &ChairPassTextureViews {
                color: view.clone(),
                depth: self.depth_texture.view().clone(),
            },
            &mut encoder,
            pipeline_cache,
            |render_pass| {
                for (_id, render_model) in self.render_models.iter() {
                    if !render_model.instances.should_render() {
                        continue;
                    }

                    render_model_instances(render_pass, &self.queue, render_model);
                }
            },
        );

        self.imgui_renderer
            .render(&view, imgui, &self.device, &self.queue, &mut encoder);

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
