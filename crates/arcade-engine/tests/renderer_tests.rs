//! Tessellation tests for the debug renderer.
//!
//! These run the pure CPU half of the renderer over real engine frames. No
//! GPU context is required.

#[cfg(feature = "renderer")]
mod tests {
    use arcade_engine::prelude::*;
    use arcade_engine::render::{tessellate, Camera2D, Vertex};

    struct Scene;

    impl Game for Scene {
        fn capabilities(&self) -> Capabilities {
            Capabilities::RENDER | Capabilities::CLICK
        }

        fn render(&self, surface: &mut dyn Surface) {
            surface.fill_rect(Rect::new(0.0, 0.0, 100.0, 50.0), Color::RED);
            surface.fill_text("Level 1", 10.0, 10.0, &TextStyle::new(Color::WHITE, 20.0));
            surface.save();
            surface.translate(200.0, 100.0);
            surface.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::GOLD);
            surface.restore();
        }

        fn handle_click(&mut self, ctx: &mut GameContext<'_>, x: f64, y: f64) {
            ctx.emit_particle(x, y, ParticleSpec::default());
        }
    }

    fn scene(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
        Box::new(Scene)
    }

    fn bounds(vertices: &[Vertex]) -> (f32, f32, f32, f32) {
        vertices.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), v| {
                (
                    x0.min(v.position[0]),
                    y0.min(v.position[1]),
                    x1.max(v.position[0]),
                    y1.max(v.position[1]),
                )
            },
        )
    }

    #[test]
    fn engine_frame_tessellates_to_quads() {
        let mut engine = Engine::new(EngineConfig::default(), NullSink);
        engine.start_game(scene, "Scene");
        let mut list = DrawList::new();
        engine.tick(0.0, &mut list);

        let frame = tessellate(list.commands());
        assert_eq!(frame.clear, Some(Color::SKY));
        // Two rects, text skipped.
        assert_eq!(frame.vertices.len(), 12);
        assert_eq!(bounds(&frame.vertices[..6]), (0.0, 0.0, 100.0, 50.0));
        assert_eq!(bounds(&frame.vertices[6..]), (200.0, 100.0, 210.0, 110.0));
    }

    #[test]
    fn particles_render_translucent() {
        let mut engine = Engine::new(EngineConfig::default(), NullSink);
        engine.start_game(scene, "Scene");
        engine.handle_event(&DeviceEvent::PointerDown { x: 50.0, y: 50.0 });
        let mut list = DrawList::new();
        engine.tick(0.0, &mut list);

        let frame = tessellate(list.commands());
        assert_eq!(frame.vertices.len(), 18);
        let particle = &frame.vertices[12..];
        assert!(particle.iter().all(|v| v.color[3] < 1.0 && v.color[3] > 0.9));
    }

    #[test]
    fn default_camera_matches_default_surface() {
        let camera = Camera2D::default();
        let config = EngineConfig::default();
        assert_eq!(camera.width as f64, config.width);
        assert_eq!(camera.height as f64, config.height);
    }
}
