/// WGSL shader for textured gallery planes.
///
/// The fragment stage crops the image to the plane's aspect ratio (cover
/// fit). While `image_sizes` is zero the blank texture is sampled as-is.
pub const PLANE_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

struct Plane {
    model: mat4x4<f32>,
    plane_sizes: vec2<f32>,
    image_sizes: vec2<f32>,
    viewport_sizes: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

@group(1) @binding(0)
var<uniform> plane: Plane;
@group(1) @binding(1)
var t_map: texture_2d<f32>;
@group(1) @binding(2)
var s_map: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_x: f32,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = plane.model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world_pos;
    out.uv = vertex.uv;
    out.world_x = world_pos.x;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var uv = in.uv;
    if (plane.image_sizes.x > 0.0 && plane.image_sizes.y > 0.0) {
        let plane_ratio = plane.plane_sizes.x / plane.plane_sizes.y;
        let image_ratio = plane.image_sizes.x / plane.image_sizes.y;
        let ratio = vec2<f32>(
            min(plane_ratio / image_ratio, 1.0),
            min(image_ratio / plane_ratio, 1.0),
        );
        uv = vec2<f32>(
            in.uv.x * ratio.x + (1.0 - ratio.x) * 0.5,
            in.uv.y * ratio.y + (1.0 - ratio.y) * 0.5,
        );
    }
    let color = textureSample(t_map, s_map, uv);

    // Dim planes as they approach the horizontal edge of the view.
    let half_view = max(plane.viewport_sizes.x * 0.5, 0.0001);
    let edge = clamp(abs(in.world_x) / half_view, 0.0, 1.0);
    let shade = 1.0 - 0.35 * smoothstep(0.6, 1.0, edge);
    return vec4<f32>(color.rgb * shade, color.a);
}
"#;
