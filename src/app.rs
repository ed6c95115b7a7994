//! Application event loop.
//!
//! Wires winit events to the scene: pointer movement drives hover and the
//! orbit controller, resize reconfigures the surface, every redraw advances
//! the scene and renders it, and closing the window disposes the scene
//! graph before the loop exits. Everything runs single-threaded on the
//! winit loop; the only async is GPU context creation, blocked on via tokio
//! natively and resolved through the event-loop proxy on the web.

use std::{iter, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{context::Context, scene::PlanetScene};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// GPU context, scene and surface status, bundled once init has finished.
pub struct AppState {
    pub(crate) ctx: Context,
    scene: PlanetScene,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = match Context::new(window).await {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };
        let scene = PlanetScene::new(&ctx);
        Self {
            ctx,
            scene,
            is_surface_configured: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = crate::scene::material::Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // keep the per-frame callback coming
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
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
                        load: wgpu::LoadOp::Clear(self.ctx.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.scene
                .draw(&self.ctx.camera.bind_group, &mut render_pass);
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub(crate) enum AppEvent {
    Initialized(AppState),
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: winit::event_loop::EventLoopProxy<AppEvent>,
    state: Option<AppState>,
    last_time: Instant,
    cursor: Option<PhysicalPosition<f64>>,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            last_time: Instant::now(),
            cursor: None,
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("orbview");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self.async_runtime.block_on(AppState::new(window));
            self.state = Some(state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = AppState::new(window).await;
                assert!(proxy.send_event(AppEvent::Initialized(state)).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(mut state) => {
                // Trigger a resize and redraw now that we are initialized
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                state.scene.destroy();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                if state.ctx.camera.controller.dragging {
                    if let Some(previous) = self.cursor {
                        let dx = (position.x - previous.x) as f32;
                        let dy = (position.y - previous.y) as f32;
                        state.ctx.camera.controller.handle_drag(dx, dy);
                    }
                }
                self.cursor = Some(position);
                state.scene.on_pointer_move(&state.ctx, position);
            }
            WindowEvent::MouseInput { state: button_state, button, .. } => {
                if let MouseButton::Left = button {
                    state.ctx.camera.controller.dragging =
                        button_state == ElementState::Pressed;
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                let dt_seconds = dt.as_secs_f32();

                // Damped orbit, then the camera uniform
                let camera = &mut state.ctx.camera;
                camera.controller.update(&mut camera.camera, dt_seconds);
                camera
                    .uniform
                    .update_view_proj(&camera.camera, &state.ctx.projection);
                state.ctx.queue.write_buffer(
                    &camera.buffer,
                    0,
                    bytemuck::cast_slice(&[camera.uniform]),
                );

                state.scene.update(&state.ctx, dt_seconds);

                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop);
    event_loop.run_app(&mut app)?;

    Ok(())
}

/// Browser entry point: boots the scene onto the page's canvas element.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    if let Err(e) = run() {
        log::error!("failed to start orbview: {}", e);
    }
}
