//! SkSL sources for the runtime-shader stages.
//!
//! Both shaders read the upstream filter output through the `image` child.
//! SkSL only allows constant loop bounds, so the blur samples a fixed number of
//! taps spread over three standard deviations.

/// Child shader name bound to the filter input.
pub const INPUT_CHILD: &str = "image";
/// Child shader of the progressive blur holding a brush-defined intensity.
pub const INTENSITY_CHILD: &str = "u_intensity";

/// One directional gaussian pass whose sigma follows an intensity gradient.
///
/// `u_kind` selects the gradient: 0 linear from `u_from` to `u_to`, 1 radial
/// around `u_from` with radius `u_to.x`, 2 the alpha of the `u_intensity`
/// child. `u_easing` uses the order of `Easing::shader_index`.
pub const PROGRESSIVE_BLUR: &str = r#"
uniform shader image;
uniform shader u_intensity;
uniform float u_sigma;
uniform float2 u_direction;
uniform float u_kind;
uniform float2 u_from;
uniform float2 u_to;
uniform float u_start;
uniform float u_end;
uniform float u_easing;

float ease(float t) {
    if (u_easing < 0.5) {
        return t;
    } else if (u_easing < 1.5) {
        return t * t * t;
    } else if (u_easing < 2.5) {
        float r = 1.0 - t;
        return 1.0 - r * r * r;
    }
    return t * t * (3.0 - 2.0 * t);
}

float gradient_t(float2 p) {
    if (u_kind < 0.5) {
        float2 axis = u_to - u_from;
        float len2 = max(dot(axis, axis), 0.0001);
        return clamp(dot(p - u_from, axis) / len2, 0.0, 1.0);
    }
    if (u_kind < 1.5) {
        return clamp(length(p - u_from) / max(u_to.x, 0.0001), 0.0, 1.0);
    }
    return clamp(u_intensity.eval(p).a, 0.0, 1.0);
}

half4 main(float2 pos) {
    float intensity = mix(u_start, u_end, ease(gradient_t(pos)));
    float sigma = u_sigma * intensity;
    if (sigma < 0.5) {
        return image.eval(pos);
    }

    half4 sum = half4(0.0);
    float total = 0.0;
    for (int i = -16; i <= 16; i++) {
        float k = float(i) * (3.0 / 16.0);
        float w = exp(-0.5 * k * k);
        sum += image.eval(pos + u_direction * (k * sigma)) * w;
        total += w;
    }
    return sum / total;
}
"#;

/// Refraction along the inner edge of a rounded rect covering `u_size`.
///
/// Samples are pulled inwards along the surface normal inside a band `u_depth`
/// pixels wide, with a rim highlight that is brighter on upward-facing edges.
pub const LIQUID_GLASS: &str = r#"
uniform shader image;
uniform float2 u_size;
uniform float u_corner_radius;
uniform float u_depth;
uniform float u_refraction;
uniform float u_specular;
uniform float4 u_tint;

float sd_rounded_rect(float2 p, float2 half_size, float r) {
    float2 q = abs(p) - half_size + r;
    return length(max(q, 0.0)) + min(max(q.x, q.y), 0.0) - r;
}

half4 main(float2 pos) {
    float2 half_size = u_size * 0.5;
    float2 p = pos - half_size;
    float r = min(u_corner_radius, min(half_size.x, half_size.y));
    float d = sd_rounded_rect(p, half_size, r);
    if (d > 0.0) {
        return image.eval(pos);
    }

    float dx = sd_rounded_rect(p + float2(0.5, 0.0), half_size, r) - d;
    float dy = sd_rounded_rect(p + float2(0.0, 0.5), half_size, r) - d;
    float2 g = float2(dx, dy);
    float2 normal = length(g) < 0.001 ? float2(0.0, -1.0) : normalize(g);

    float edge = 1.0 - smoothstep(0.0, max(u_depth, 0.001), -d);
    float2 offset = -normal * (edge * edge) * u_refraction * u_depth;
    half4 color = image.eval(pos + offset);

    float rim = edge * edge * edge * u_specular * (0.5 + 0.5 * max(-normal.y, 0.0));
    color.rgb += (color.a - color.rgb) * half(rim);
    color.rgb = mix(color.rgb, half3(u_tint.rgb) * color.a, half(u_tint.a));
    return color;
}
"#;
