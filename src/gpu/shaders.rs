//! WGSL for the two instanced pipelines.
//!
//! Both shaders work in surface pixels with the origin at the top-left and
//! y pointing down, and convert to clip space in the vertex stage.

/// Soft discs: one quad per instance, alpha falling linearly from the
/// center to zero at the rim.
pub const DISC_SHADER: &str = r#"
struct Screen {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> screen: Screen;

struct DiscIn {
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = p / screen.size * 2.0 - 1.0;
    return vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
}

fn corner(index: u32) -> vec2<f32> {
    switch index {
        case 0u: { return vec2<f32>(-1.0, -1.0); }
        case 1u: { return vec2<f32>(1.0, -1.0); }
        case 2u: { return vec2<f32>(-1.0, 1.0); }
        case 3u: { return vec2<f32>(1.0, -1.0); }
        case 4u: { return vec2<f32>(1.0, 1.0); }
        default: { return vec2<f32>(-1.0, 1.0); }
    }
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, disc: DiscIn) -> VertexOutput {
    var out: VertexOutput;
    let uv = corner(vertex_index);
    out.clip_position = to_clip(disc.center + uv * disc.radius);
    out.uv = uv;
    out.color = disc.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.uv);
    if d > 1.0 {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * (1.0 - d));
}
"#;

/// Lines: one quad per instance, expanded sideways by half the width.
pub const LINE_SHADER: &str = r#"
struct Screen {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> screen: Screen;

struct LineIn {
    @location(0) p0: vec2<f32>,
    @location(1) p1: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = p / screen.size * 2.0 - 1.0;
    return vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
}

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, seg: LineIn) -> VertexOutput {
    var out: VertexOutput;

    let delta = seg.p1 - seg.p0;
    var perp = vec2<f32>(0.0, 0.0);
    if length(delta) > 0.0001 {
        let dir = normalize(delta);
        perp = vec2<f32>(-dir.y, dir.x) * (seg.width * 0.5);
    }

    var pos: vec2<f32>;
    switch vertex_index {
        case 0u: { pos = seg.p0 - perp; }
        case 1u: { pos = seg.p0 + perp; }
        case 2u: { pos = seg.p1 - perp; }
        case 3u: { pos = seg.p0 + perp; }
        case 4u: { pos = seg.p1 - perp; }
        default: { pos = seg.p1 + perp; }
    }

    out.clip_position = to_clip(pos);
    out.color = seg.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_wgsl(source: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| format!("{e:?}"))?;
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| format!("{e:?}"))?;
        Ok(())
    }

    #[test]
    fn test_disc_shader_valid() {
        validate_wgsl(DISC_SHADER).unwrap();
    }

    #[test]
    fn test_line_shader_valid() {
        validate_wgsl(LINE_SHADER).unwrap();
    }
}
