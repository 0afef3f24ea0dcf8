//! wgpu backend for the windowed runner.
//!
//! The field draws into a [`DrawList`]; [`GpuState::render`] turns the
//! recorded commands into two kinds of instances (soft discs and lines) and
//! draws them in recorded order, one instanced draw per run of same-kind
//! commands.

mod shaders;

use std::ops::Range;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::color::Color;
use crate::error::GpuError;
use crate::surface::{DrawCommand, DrawList};

/// Initial size of each instance buffer in bytes.
const INITIAL_INSTANCE_BYTES: u64 = 16 * 1024;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ScreenUniforms {
    size: [f32; 2],
    _pad: [f32; 2],
}

impl ScreenUniforms {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: [width as f32, height as f32],
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct DiscInstance {
    center: [f32; 2],
    radius: f32,
    color: [f32; 4],
}

impl DiscInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct LineInstance {
    from: [f32; 2],
    to: [f32; 2],
    color: [f32; 4],
    width: f32,
}

impl LineInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4, 3 => Float32];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// A run of consecutive same-kind commands, as an instance range.
#[derive(Debug, Clone, PartialEq)]
enum Batch {
    Discs(Range<u32>),
    Lines(Range<u32>),
}

/// One frame's instances, split by kind but keeping draw order.
#[derive(Debug, Default)]
struct FrameData {
    discs: Vec<DiscInstance>,
    lines: Vec<LineInstance>,
    batches: Vec<Batch>,
}

impl FrameData {
    fn from_commands(commands: &[DrawCommand]) -> Self {
        let mut frame = Self::default();
        for command in commands {
            match *command {
                // The render pass always starts from a cleared target.
                DrawCommand::Clear => {}
                DrawCommand::Disc {
                    center,
                    radius,
                    color,
                    alpha,
                } => {
                    let index = frame.discs.len() as u32;
                    frame.discs.push(DiscInstance {
                        center: center.to_array(),
                        radius,
                        color: color.with_alpha(alpha),
                    });
                    match frame.batches.last_mut() {
                        Some(Batch::Discs(range)) => range.end = index + 1,
                        _ => frame.batches.push(Batch::Discs(index..index + 1)),
                    }
                }
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    alpha,
                    width,
                } => {
                    let index = frame.lines.len() as u32;
                    frame.lines.push(LineInstance {
                        from: from.to_array(),
                        to: to.to_array(),
                        color: color.with_alpha(alpha),
                        width,
                    });
                    match frame.batches.last_mut() {
                        Some(Batch::Lines(range)) => range.end = index + 1,
                        _ => frame.batches.push(Batch::Lines(index..index + 1)),
                    }
                }
            }
        }
        frame
    }
}

/// Vertex buffer that grows to fit each frame's instances.
struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: u64,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            buffer: create_instance_buffer(device, label, INITIAL_INSTANCE_BYTES),
            capacity: INITIAL_INSTANCE_BYTES,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let needed = bytes.len() as u64;
        if needed > self.capacity {
            self.capacity = needed.next_power_of_two();
            self.buffer = create_instance_buffer(device, self.label, self.capacity);
            log::debug!("{} grown to {} bytes", self.label, self.capacity);
        }
        queue.write_buffer(&self.buffer, 0, bytes);
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    disc_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    disc_buffer: InstanceBuffer,
    line_buffer: InstanceBuffer,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, background: Color) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Palette colors are sRGB values, so write them as-is to a
        // non-sRGB target when one exists.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::UnsupportedSurface)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
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

        let uniforms = ScreenUniforms::new(config.width, config.height);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Screen Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Screen Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Field Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let disc_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            "Disc",
            shaders::DISC_SHADER,
            DiscInstance::layout(),
            surface_format,
        );
        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            "Line",
            shaders::LINE_SHADER,
            LineInstance::layout(),
            surface_format,
        );

        let disc_buffer = InstanceBuffer::new(&device, "Disc Instance Buffer");
        let line_buffer = InstanceBuffer::new(&device, "Line Instance Buffer");

        log::info!(
            "gpu ready: {} ({:?}), {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            disc_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            disc_buffer,
            line_buffer,
            clear_color: wgpu::Color {
                r: background.r as f64,
                g: background.g as f64,
                b: background.b as f64,
                a: 1.0,
            },
        })
    }

    /// Reconfigure for a new window size. Zero sizes are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            let uniforms = ScreenUniforms::new(new_size.width, new_size.height);
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Present everything recorded in `list`.
    pub fn render(&mut self, list: &DrawList) -> Result<(), wgpu::SurfaceError> {
        let frame = FrameData::from_commands(list.commands());
        self.disc_buffer
            .upload(&self.device, &self.queue, bytemuck::cast_slice(&frame.discs));
        self.line_buffer
            .upload(&self.device, &self.queue, bytemuck::cast_slice(&frame.lines));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            for batch in &frame.batches {
                match batch {
                    Batch::Discs(range) => {
                        render_pass.set_pipeline(&self.disc_pipeline);
                        render_pass.set_vertex_buffer(0, self.disc_buffer.buffer.slice(..));
                        render_pass.draw(0..6, range.clone());
                    }
                    Batch::Lines(range) => {
                        render_pass.set_pipeline(&self.line_pipeline);
                        render_pass.set_vertex_buffer(0, self.line_buffer.buffer.slice(..));
                        render_pass.draw(0..6, range.clone());
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    label: &str,
    source: &str,
    instance_layout: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} Shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} Pipeline")),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
