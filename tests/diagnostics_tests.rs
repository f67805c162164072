//! Diagnostics Tests
//!
//! Tests for:
//! - CacheReport: template dump, per-program summary lines, total count
//! - Read-only guarantee: reporting never touches last-used timestamps
//! - DiagnosticsScope: enabled only when the logger listens on its target

mod common;

use std::time::{Duration, Instant};

use common::MockGl;
use gl_shader_cache::renderer::pipeline::shader_gen::{FRAGMENT_SHADER, VERTEX_SHADER};
use gl_shader_cache::{
    GlRenderer, ProgramCache, ShaderCacheSettings, ShaderRequirements, TextureVariant,
};
use log::LevelFilter;

fn init_logger() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_module("gl-shader-generator", LevelFilter::Debug)
        .try_init();
}

fn key(variant: TextureVariant, green_tint: bool) -> ShaderRequirements {
    ShaderRequirements::new(variant, green_tint)
}

// ============================================================================
// Report content
// ============================================================================

#[test]
fn report_dumps_templates_verbatim() {
    let gl = MockGl::new();
    let cache = ProgramCache::<MockGl>::new(ShaderCacheSettings::default());

    let text = cache.report(&gl, Instant::now()).to_string();

    assert!(text.starts_with("Vertex shader body:\n---"));
    assert!(text.contains(VERTEX_SHADER));
    assert!(text.contains("Fragment shader body:\n"));
    assert!(text.contains(FRAGMENT_SHADER));
    assert!(text.contains("Cached GLSL programs:\n    id: (used secs ago) description +/-flags\n"));
    assert!(text.ends_with("Total: 0 programs.\n"));
}

#[test]
fn report_lists_every_program_with_age() {
    let gl = MockGl::new();
    let mut cache = ProgramCache::<MockGl>::new(ShaderCacheSettings::default());
    let t0 = Instant::now();

    let rgba = cache
        .lookup_or_create_at(&gl, &key(TextureVariant::Rgba, false), t0)
        .unwrap()
        .program();
    let solid = cache
        .lookup_or_create_at(
            &gl,
            &key(TextureVariant::Solid, true),
            t0 + Duration::from_secs(2),
        )
        .unwrap()
        .program();

    let now = t0 + Duration::from_millis(2500);
    let text = cache.report(&gl, now).to_string();

    let summary: Vec<_> = text
        .lines()
        .skip_while(|line| !line.starts_with("Cached GLSL programs:"))
        .skip(2)
        .collect();
    assert_eq!(
        summary,
        vec![
            format!("{solid:>6}: (0.5) SHADER_VARIANT_SOLID +green"),
            format!("{rgba:>6}: (2.5) SHADER_VARIANT_RGBA -green"),
            "Total: 2 programs.".to_owned(),
        ]
    );
}

#[test]
fn report_total_matches_live_entries() {
    let gl = MockGl::new();
    let mut cache = ProgramCache::<MockGl>::new(ShaderCacheSettings::default());
    for req in ShaderRequirements::all() {
        cache.lookup_or_create(&gl, &req).unwrap();
    }
    cache.destroy(&gl, &key(TextureVariant::None, false));
    cache.destroy(&gl, &key(TextureVariant::External, true));

    let text = cache.report(&gl, Instant::now()).to_string();

    assert_eq!(cache.len(), 16);
    assert!(text.ends_with(&format!("Total: {} programs.\n", cache.len())));
    assert!(!text.contains("SHADER_VARIANT_NONE -green"));
    assert!(text.contains("SHADER_VARIANT_NONE +green"));
}

#[test]
fn report_never_touches_last_used() {
    init_logger();
    let gl = MockGl::new();
    let mut cache = ProgramCache::<MockGl>::new(ShaderCacheSettings::default());
    let t0 = Instant::now();
    for req in ShaderRequirements::all() {
        cache.lookup_or_create_at(&gl, &req, t0).unwrap();
    }
    let before: Vec<_> = cache.iter().map(|e| (*e.requirements(), e.last_used())).collect();

    let _ = cache.report(&gl, t0 + Duration::from_secs(60)).to_string();
    let mut sink = String::new();
    cache.write_report(&gl, &mut sink).unwrap();
    cache.log_report(&gl);

    let after: Vec<_> = cache.iter().map(|e| (*e.requirements(), e.last_used())).collect();
    assert_eq!(before, after);
    assert_eq!(gl.state().link_calls, 18);
}

#[test]
fn renderer_writes_report_to_subscriber() {
    let gl = MockGl::new();
    let mut renderer = GlRenderer::new(gl.clone(), ShaderCacheSettings::default());
    let program = renderer
        .get_program(&key(TextureVariant::PlanarYuv3Plane, false))
        .unwrap()
        .program();
    let last_used = renderer
        .program_cache()
        .get(&key(TextureVariant::PlanarYuv3Plane, false))
        .unwrap()
        .last_used();

    let mut out = String::new();
    renderer
        .write_shader_report_at(&mut out, last_used + Duration::from_secs(3))
        .unwrap();

    assert!(out.contains(&format!("{program:>6}: (3.0) SHADER_VARIANT_Y_U_V -green\n")));
    assert!(out.ends_with("Total: 1 programs.\n"));
}

// ============================================================================
// Scope
// ============================================================================

#[test]
fn scope_carries_configured_name() {
    let settings = ShaderCacheSettings {
        scope_name: "compositor-shaders",
        scope_description: "Test scope.",
        ..Default::default()
    };
    let cache = ProgramCache::<MockGl>::new(settings);

    assert_eq!(cache.scope().name(), "compositor-shaders");
    assert_eq!(cache.scope().description(), "Test scope.");
}

#[test]
fn scope_enabled_only_for_listened_target() {
    init_logger();

    let listened = ProgramCache::<MockGl>::new(ShaderCacheSettings::default());
    let quiet = ProgramCache::<MockGl>::new(ShaderCacheSettings {
        scope_name: "nobody-listens-here",
        ..Default::default()
    });

    assert!(listened.scope().is_enabled());
    assert!(!quiet.scope().is_enabled());
}
