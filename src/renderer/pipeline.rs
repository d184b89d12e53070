//! wgpu sprite pipeline

use glam::Vec2;

use super::scene::SpriteDraw;
use super::texture::{self, SpriteTexture};
use super::vertex::{Vertex, build_batches};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::sim::{Sprite, SpriteSizes};

/// Initial vertex capacity, enough for a full ground plus a busy battlefield
const INITIAL_VERTEX_CAPACITY: usize = 6 * 256;

/// Main render state
pub struct Renderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    /// Indexed by `Sprite::index`, empty until `load_sprites`
    textures: Vec<SpriteTexture>,
    vertex_buffer: wgpu::Buffer,
    /// Capacity of `vertex_buffer` in vertices
    vertex_capacity: usize,
    /// Surface size in pixels
    pub size: (u32, u32),
}

impl Renderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tank-crates-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| Error::Graphics(format!("device request failed: {e}")))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::debug!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| Error::Graphics("surface is incompatible with the adapter".into()))?;
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let texture_layout = texture::bind_group_layout(&device);
        let sampler = texture::sprite_sampler(&device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Rotated quads flip winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            texture_layout,
            sampler,
            textures: Vec::new(),
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            size: (width, height),
        })
    }

    /// Decode and upload every sprite from the asset directory.
    ///
    /// Returns the pixel sizes the simulation lays things out with.
    pub fn load_sprites(&mut self, settings: &Settings) -> Result<SpriteSizes> {
        let mut textures = Vec::with_capacity(Sprite::ALL.len());
        for sprite in Sprite::ALL {
            let path = settings.asset_path(sprite.file_name());
            let img = texture::load_rgba(&path)?;
            log::debug!("Loaded {} ({}x{})", path.display(), img.width(), img.height());
            textures.push(SpriteTexture::from_image(
                &self.device,
                &self.queue,
                &self.texture_layout,
                &self.sampler,
                &img,
                sprite.file_name(),
            ));
        }

        let sizes = SpriteSizes::from_fn(|sprite| textures[sprite.index()].size);
        self.textures = textures;
        log::info!(
            "Loaded {} textures from {}",
            self.textures.len(),
            settings.asset_dir.display()
        );
        Ok(sizes)
    }

    /// Drop all sprite textures. Must happen before the window goes away.
    pub fn unload_textures(&mut self) {
        if !self.textures.is_empty() {
            log::debug!("Unloading {} textures", self.textures.len());
        }
        self.textures.clear();
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reapply the current configuration after the surface was lost
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame. `viewport` is the size the draw coordinates are in.
    pub fn draw(
        &mut self,
        draws: &[SpriteDraw],
        viewport: Vec2,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let batches = if self.textures.is_empty() {
            Vec::new()
        } else {
            let sizes = SpriteSizes::from_fn(|sprite| self.textures[sprite.index()].size);
            let (vertices, batches) = build_batches(draws, &sizes, viewport);
            if vertices.len() > self.vertex_capacity {
                self.vertex_capacity = vertices.len().next_power_of_two();
                self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
            }
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            batches
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            for batch in &batches {
                let texture = &self.textures[batch.sprite.index()];
                render_pass.set_bind_group(0, &texture.bind_group, &[]);
                render_pass.draw(batch.vertices.clone(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (std::mem::size_of::<Vertex>() * capacity) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type DrawFn =
        fn(&mut Renderer, &[SpriteDraw], Vec2) -> std::result::Result<(), wgpu::SurfaceError>;

    #[test]
    fn test_draw_reports_surface_errors() {
        // Frame errors stay wgpu's own so the caller can reconfigure on loss
        let draw: DrawFn = Renderer::draw;
        let _ = draw;
    }

    #[test]
    fn test_initial_vertex_buffer_holds_whole_quads() {
        assert_eq!(INITIAL_VERTEX_CAPACITY % 6, 0);
    }
}
