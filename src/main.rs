use skia_gl_glue::{
    gl::{self, Gl},
    skia::{Canvas, Color, Paint},
    App, WindowSettings,
};
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;

struct Demo {
    size: PhysicalSize<u32>,
}
impl App for Demo {
    fn draw_gl(&mut self, gl: &Gl) {
        unsafe {
            gl.ClearColor(0.125, 0.125, 0.16, 1.);
            gl.Clear(gl::COLOR_BUFFER_BIT);
        }
    }
    fn draw(&mut self, canvas: &mut Canvas) {
        let mut paint = Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(Color::CYAN);

        let center = (self.size.width as f32 / 2., self.size.height as f32 / 2.);
        let radius = self.size.width.min(self.size.height) as f32 / 4.;
        canvas.draw_circle(center, radius, &paint);
    }
    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
    }
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    skia_gl_glue::run(
        WindowSettings::default().with_title("skia-gl-glue demo"),
        Demo {
            size: PhysicalSize::new(0, 0),
        },
    )
}
