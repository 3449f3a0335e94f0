use crate::shaders;
use bytemuck::{Pod, Zeroable};
use gallery_assets::DecodedImage;
use gallery_kernel::Gallery;
use gallery_render::{PlaneInstance, plane_instances};
use glam::Mat4;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PlaneUniformData {
    model: [[f32; 4]; 4],
    plane_sizes: [f32; 2],
    image_sizes: [f32; 2],
    viewport_sizes: [f32; 2],
    _pad: [f32; 2],
}

impl From<&PlaneInstance> for PlaneUniformData {
    fn from(plane: &PlaneInstance) -> Self {
        Self {
            model: plane.model.to_cols_array_2d(),
            plane_sizes: plane.uniforms.plane_sizes.to_array(),
            image_sizes: plane.uniforms.image_sizes.to_array(),
            viewport_sizes: plane.uniforms.viewport_sizes.to_array(),
            _pad: [0.0; 2],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    uv: [f32; 2],
}

/// Unit quad centred on the origin, scaled per plane by its model matrix.
fn quad_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        Vertex { position: [-p,  p, 0.0], uv: [0.0, 0.0] },
        Vertex { position: [-p, -p, 0.0], uv: [0.0, 1.0] },
        Vertex { position: [ p, -p, 0.0], uv: [1.0, 1.0] },
        Vertex { position: [ p,  p, 0.0], uv: [1.0, 0.0] },
    ];
    let indices: Vec<u16> = vec![0, 1, 2, 2, 3, 0];
    (vertices, indices)
}

/// Per-plane GPU resources.
struct PlaneSlot {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu-based gallery renderer.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    plane_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    blank_view: wgpu::TextureView,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    planes: Vec<PlaneSlot>,
    max_texture_dimension: u32,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        plane_count: usize,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let plane_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("plane_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&camera_layout, &plane_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("plane_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PLANE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plane_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (quad_verts, quad_indices) = quad_mesh();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&quad_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let index_count = quad_indices.len() as u32;

        // Planes render blank until their image arrives.
        let blank_view = Self::create_texture_view(device, queue, 1, 1, &[48, 48, 52, 255]);

        let mut renderer = Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            plane_layout,
            sampler,
            blank_view,
            vertex_buffer,
            index_buffer,
            index_count,
            planes: Vec::with_capacity(plane_count),
            max_texture_dimension: device.limits().max_texture_dimension_2d,
        };
        for index in 0..plane_count {
            let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("plane_uniform_buffer"),
                size: std::mem::size_of::<PlaneUniformData>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group =
                renderer.create_plane_bind_group(device, &uniform_buffer, &renderer.blank_view);
            tracing::trace!(index, "plane slot created");
            renderer.planes.push(PlaneSlot {
                uniform_buffer,
                bind_group,
            });
        }
        renderer
    }

    /// Upload a decoded image and bind it to its plane. Returns `false` and
    /// leaves the plane blank if the image cannot become a texture.
    pub fn upload_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
    ) -> bool {
        if image.index >= self.planes.len() {
            tracing::warn!(index = image.index, "image for unknown plane ignored");
            return false;
        }
        if !texture_fits(image, self.max_texture_dimension) {
            tracing::warn!(
                index = image.index,
                width = image.width,
                height = image.height,
                max = self.max_texture_dimension,
                "image does not fit a texture, plane left blank"
            );
            return false;
        }
        let view = Self::create_texture_view(device, queue, image.width, image.height, &image.pixels);
        let bind_group =
            self.create_plane_bind_group(device, &self.planes[image.index].uniform_buffer, &view);
        self.planes[image.index].bind_group = bind_group;
        tracing::debug!(
            index = image.index,
            width = image.width,
            height = image.height,
            "plane texture uploaded"
        );
        true
    }

    /// Render one frame of the gallery's committed state.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        gallery: &Gallery,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view_proj: gallery.camera().view_projection().to_cols_array_2d(),
            }),
        );

        let planes = plane_instances(gallery);
        for (plane, slot) in planes.iter().zip(&self.planes) {
            queue.write_buffer(
                &slot.uniform_buffer,
                0,
                bytemuck::bytes_of(&PlaneUniformData::from(plane)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gallery_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.06,
                            g: 0.06,
                            b: 0.07,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (plane, slot) in planes.iter().zip(&self.planes) {
                if !plane.visible {
                    continue;
                }
                pass.set_bind_group(1, &slot.bind_group, &[]);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_plane_bind_group(
        &self,
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        texture: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane_bind_group"),
            layout: &self.plane_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn create_texture_view(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> wgpu::TextureView {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("plane_texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        texture.create_view(&Default::default())
    }
}

/// Non-empty, within the device's 2D texture limit, and backed by exactly
/// `width * height` RGBA8 pixels.
fn texture_fits(image: &DecodedImage, max_dimension: u32) -> bool {
    let (width, height) = (image.width, image.height);
    width > 0
        && height > 0
        && width <= max_dimension
        && height <= max_dimension
        && image.pixels.len() as u64 == u64::from(width) * u64::from(height) * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> DecodedImage {
        DecodedImage {
            index: 0,
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    #[test]
    fn texture_limit_is_enforced_per_side() {
        assert!(texture_fits(&image(64, 32), 64));
        assert!(!texture_fits(&image(100, 60), 64));
        assert!(!texture_fits(&image(60, 100), 64));
    }

    #[test]
    fn mismatched_pixel_buffer_is_rejected() {
        let mut short = image(4, 4);
        short.pixels.truncate(10);
        assert!(!texture_fits(&short, 8192));
        assert!(!texture_fits(&image(0, 4), 8192));
    }

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<PlaneUniformData>(), 64 + 4 * 8);
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
    }
}
