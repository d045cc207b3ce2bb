//! The part of Skia this crate works with, gathered in one place.

pub use skia_safe::{
    gpu::{
        gl::{Format as GlFormat, FramebufferInfo, Interface},
        BackendRenderTarget, DirectContext, SurfaceOrigin,
    },
    Bitmap, Canvas, Color, ColorSpace, ColorType, Data, Font, Image, Matrix, Paint, Pixmap, Rect,
    Shader, Surface, Typeface,
};

/// Every GPU backend state flag set. Passed to Skia after foreign GL code has
/// touched the context, so that none of Skia's cached state is trusted.
pub const ALL_BACKEND_STATE: u32 = 0xffff_ffff;

/// A GPU context caching backend state that foreign GL code can invalidate.
pub trait BackendStateCache {
    fn invalidate_backend_state(&mut self, flags: u32);
}

impl BackendStateCache for DirectContext {
    fn invalidate_backend_state(&mut self, flags: u32) {
        self.reset(Some(flags));
    }
}

/// Marks all of `context`'s cached GPU state dirty.
pub fn reset_backend_state<C>(context: &mut C)
where
    C: BackendStateCache + ?Sized,
{
    context.invalidate_backend_state(ALL_BACKEND_STATE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_backend_state_has_every_bit_set() {
        assert_eq!(ALL_BACKEND_STATE, u32::MAX);
        assert_eq!(ALL_BACKEND_STATE.count_ones(), u32::BITS);
    }

    #[derive(Default)]
    struct RecordingCache {
        invalidated: Vec<u32>,
    }
    impl BackendStateCache for RecordingCache {
        fn invalidate_backend_state(&mut self, flags: u32) {
            self.invalidated.push(flags);
        }
    }

    #[test]
    fn reset_invalidates_every_backend_flag() {
        let mut cache = RecordingCache::default();
        reset_backend_state(&mut cache);
        reset_backend_state(&mut cache);

        assert_eq!(cache.invalidated, vec![u32::MAX, u32::MAX]);
    }

    #[test]
    fn raster_surface_draws_through_reexports() {
        let mut surface = Surface::new_raster_n32_premul((16, 16)).unwrap();
        {
            let canvas = surface.canvas();
            canvas.clear(Color::WHITE);

            let mut paint = Paint::default();
            paint.set_color(Color::RED);
            canvas.draw_rect(Rect::from_xywh(4., 4., 8., 8.), &paint);
        }

        let image = surface.image_snapshot();
        let pixmap = image.peek_pixels().unwrap();
        assert_eq!(pixmap.get_color((8, 8)), Color::RED);
        assert_eq!(pixmap.get_color((0, 0)), Color::WHITE);
    }
}
