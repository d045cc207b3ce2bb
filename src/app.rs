use crate::{
    error::Result,
    gl::{self, Gl},
    settings::WindowSettings,
    skia::Canvas,
    window::GlWindow,
};
use winit::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopWindowTarget},
};

#[allow(unused_variables)]
pub trait App: 'static {
    /// Raw GL pass, run before Skia draws the frame. Clears to transparent
    /// unless overridden.
    fn draw_gl(&mut self, gl: &Gl) {
        unsafe {
            gl.ClearColor(0., 0., 0., 0.);
            gl.Clear(gl::COLOR_BUFFER_BIT);
        }
    }
    fn draw(&mut self, canvas: &mut Canvas);
    fn resize(&mut self, size: PhysicalSize<u32>) {}
    /// Returning `false` keeps the window open.
    fn close_requested(&mut self) -> bool {
        true
    }
}

/// Opens one window and drives `app` until it is closed.
pub fn run<T: App>(settings: WindowSettings, app: T) -> ! {
    let runtime = Application::new(settings, app);
    runtime.start(EventLoopBuilder::new().build())
}

struct Application<T> {
    settings: WindowSettings,
    window: Option<GlWindow>,
    app: T,
}
impl<T: App> Application<T> {
    fn new(settings: WindowSettings, app: T) -> Self {
        Self {
            settings,
            window: None,
            app,
        }
    }
    fn resume(
        &mut self,
        window_target: &EventLoopWindowTarget<()>,
        control_flow: &mut ControlFlow,
    ) {
        if self.window.is_some() {
            return;
        }

        match GlWindow::new(window_target, &self.settings) {
            Ok(window) => {
                self.app.resize(window.winit_window().inner_size());
                window.winit_window().request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                tracing::error!(%err, "cannot create window");
                control_flow.set_exit_with_code(1);
            }
        }
    }
    fn window_event(&mut self, event: WindowEvent, control_flow: &mut ControlFlow) {
        let Some(window) = &mut self.window else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                if let Err(err) = window.resize(size) {
                    tracing::error!(%err, "cannot resize window");
                    control_flow.set_exit_with_code(1);
                    return;
                }
                self.app.resize(size);
                window.winit_window().request_redraw();
            }
            WindowEvent::CloseRequested => {
                if self.app.close_requested() {
                    self.window = None;
                    control_flow.set_exit();
                }
            }
            _ => (),
        }
    }
    fn draw(&mut self, control_flow: &mut ControlFlow) {
        let Some(window) = &mut self.window else {
            return;
        };

        if let Err(err) = draw_frame(window, &mut self.app) {
            tracing::error!(%err, "cannot draw frame");
            control_flow.set_exit_with_code(1);
        }
    }
    fn start(mut self, event_loop: EventLoop<()>) -> ! {
        event_loop.run(move |event, window_target, control_flow| {
            control_flow.set_wait();
            match event {
                Event::Resumed => self.resume(window_target, control_flow),
                Event::WindowEvent { event, .. } => self.window_event(event, control_flow),
                Event::RedrawRequested(_) => self.draw(control_flow),
                _ => (),
            }
        })
    }
}

fn draw_frame<T: App>(window: &mut GlWindow, app: &mut T) -> Result<()> {
    window.with_raw_gl(|gl| app.draw_gl(gl))?;
    window.draw(|canvas| app.draw(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use std::{
        cell::RefCell,
        ffi::{c_void, CStr},
        ptr,
    };

    thread_local! {
        static CALLS: RefCell<Vec<String>> = RefCell::new(Vec::new());
    }

    extern "system" fn clear_color(r: f32, g: f32, b: f32, a: f32) {
        CALLS.with(|calls| calls.borrow_mut().push(format!("ClearColor({r}, {g}, {b}, {a})")));
    }
    extern "system" fn clear(mask: u32) {
        CALLS.with(|calls| calls.borrow_mut().push(format!("Clear({mask:#x})")));
    }

    struct Blank;
    impl App for Blank {
        fn draw(&mut self, _canvas: &mut Canvas) {}
    }

    #[test]
    fn default_gl_pass_clears_to_transparent() {
        let gl = loader::load_gl(&|name: &CStr| -> *const c_void {
            match name.to_bytes() {
                b"glClearColor" => clear_color as *const c_void,
                b"glClear" => clear as *const c_void,
                _ => ptr::null(),
            }
        });

        Blank.draw_gl(&gl);

        let calls = CALLS.with(|calls| calls.take());
        assert_eq!(
            calls,
            vec![
                "ClearColor(0, 0, 0, 0)".to_owned(),
                format!("Clear({:#x})", gl::COLOR_BUFFER_BIT),
            ]
        );
    }
}
