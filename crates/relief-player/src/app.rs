//! Relief application implementing winit ApplicationHandler
//!
//! One tick per redraw: input → controller → capture/terrain → draw.

use crate::hud::{self, HudFrame};
use relief_audio::SoundtrackPlayer;
use relief_core::{ReliefConfig, ReliefError, Result, RoomBoundary};
use relief_physics::{ControllerInput, MouseMode, PlayerController};
use relief_render::{load_decal_image, Camera, GpuTerrainBackend, RenderContext, RoomRenderer};
use relief_runtime::{CaptureSchedule, FramePacer, GameClock, InputState, LiveControls};
use relief_terrain::{HeightfieldGenerator, TerrainResourceManager};
use relief_video::FrameSource;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

pub struct ReliefApp {
    config: ReliefConfig,
    source: Box<dyn FrameSource>,
    soundtrack: SoundtrackPlayer,

    // Systems
    clock: GameClock,
    pacer: FramePacer,
    schedule: CaptureSchedule,
    input: InputState,
    controls: LiveControls,
    controller: PlayerController,
    camera: Camera,

    // Rendering
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    room_renderer: Option<RoomRenderer>,
    terrain: Option<TerrainResourceManager<GpuTerrainBackend>>,

    // Overlay
    egui_ctx: egui::Context,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,

    /// Mouse mode the window cursor currently reflects
    applied_mouse_mode: Option<MouseMode>,
    /// Error that ended the session, reported once the loop returns
    fatal: Option<ReliefError>,
}

impl ReliefApp {
    pub fn new(
        config: ReliefConfig,
        source: Box<dyn FrameSource>,
        soundtrack: SoundtrackPlayer,
    ) -> Self {
        let room = RoomBoundary::from_frame(
            config.terrain.image_width as f32,
            config.terrain.image_height as f32,
        );
        let pacer = match source.native_fps() {
            Some(fps) => FramePacer::with_fps(fps),
            None => FramePacer::unpaced(),
        };

        Self {
            schedule: CaptureSchedule::new(config.capture.interval_secs),
            controls: LiveControls::new(config.terrain.max_height),
            controller: PlayerController::new(config.player.clone(), room),
            camera: Camera::with_fov(config.window.fov),
            clock: GameClock::new(),
            input: InputState::new(),
            pacer,
            config,
            source,
            soundtrack,
            window: None,
            render_context: None,
            room_renderer: None,
            terrain: None,
            egui_ctx: egui::Context::default(),
            egui_winit: None,
            egui_renderer: None,
            applied_mouse_mode: None,
            fatal: None,
        }
    }

    /// The error that ended the session, if it did not end normally
    pub fn take_fatal(&mut self) -> Option<ReliefError> {
        self.fatal.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| ReliefError::RenderError(format!("failed to create window: {}", e)))?,
        );
        self.window = Some(window.clone());

        let render_context = pollster::block_on(RenderContext::new(window.clone()))?;
        self.camera.aspect = render_context.aspect_ratio();

        let generator = HeightfieldGenerator::new(&self.config.terrain);
        let decal = load_decal_image(
            self.config.decal.texture.as_deref().map(Path::new),
            self.config.decal.checker_tiles,
        )?;
        let room_renderer = RoomRenderer::new(
            &render_context,
            self.controller.room(),
            generator.layout(),
            &decal,
            self.config.decal.subdivisions,
        );

        let backend = GpuTerrainBackend::new(
            Arc::clone(&render_context.device),
            Arc::clone(&render_context.queue),
            room_renderer.texture_layout(),
        );
        self.terrain = Some(TerrainResourceManager::new(generator, backend));

        self.egui_winit = Some(egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        ));
        self.egui_renderer = Some(egui_wgpu::Renderer::new(
            &render_context.device,
            render_context.config.format,
            None,
            1,
            false,
        ));

        self.render_context = Some(render_context);
        self.room_renderer = Some(room_renderer);

        self.sync_cursor();
        Ok(())
    }

    /// Make the window cursor match the controller's mouse mode
    fn sync_cursor(&mut self) {
        let mode = self.controller.mouse_mode;
        if self.applied_mouse_mode == Some(mode) {
            return;
        }
        let Some(window) = &self.window else {
            return;
        };

        if mode.is_captured() {
            // Try confined first, then locked
            if let Err(e) = window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            {
                log::warn!("Could not grab cursor: {}", e);
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("Could not release cursor: {}", e);
            }
            window.set_cursor_visible(true);
        }
        self.applied_mouse_mode = Some(mode);
    }

    fn tick(&mut self) -> Result<()> {
        self.clock.tick();
        let dt = self.clock.delta_time as f32;

        let input = ControllerInput::from_input_state(&self.input);
        self.controller.update(&input, &self.controls, dt);
        self.sync_cursor();
        self.camera
            .update_first_person(self.controller.position, self.controller.target());

        let captured = if self.schedule.should_capture(self.clock.total_time) {
            self.capture()
        } else {
            Ok(())
        };

        self.input.end_frame();
        captured
    }

    /// Pull the next frame and rebuild the terrain from it
    fn capture(&mut self) -> Result<()> {
        let frame = self
            .source
            .read()?
            .ok_or_else(|| ReliefError::StreamEnded(self.source.describe()))?;

        self.soundtrack.start();

        if let Some(terrain) = &mut self.terrain {
            if let Err(e) = terrain.advance(&frame, self.controls.max_height) {
                log::warn!("Terrain update failed, keeping previous snapshot: {}", e);
            }
        }
        Ok(())
    }

    /// Next surface texture; a lost or outdated surface is reconfigured and the frame skipped
    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        let context = self.render_context.as_mut()?;
        match context.surface.get_current_texture() {
            Ok(output) => Some(output),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                context.reconfigure();
                None
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                None
            }
        }
    }

    fn render(&mut self) {
        let Some(output) = self.acquire_frame() else {
            return;
        };
        let (Some(context), Some(renderer)) = (&self.render_context, &self.room_renderer) else {
            return;
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Room Encoder"),
            });

        let terrain = self
            .terrain
            .as_ref()
            .and_then(|t| t.current())
            .map(|snapshot| &snapshot.resources);
        renderer.render(
            &context.queue,
            &mut encoder,
            &view,
            &context.depth_view,
            &self.camera,
            terrain,
        );

        self.render_hud(&mut encoder, &view);

        if let Some(context) = &self.render_context {
            context.queue.submit(std::iter::once(encoder.finish()));
        }
        output.present();
    }

    fn render_hud(&mut self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let (Some(window), Some(context), Some(egui_winit), Some(egui_renderer)) = (
            &self.window,
            &self.render_context,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        ) else {
            return;
        };

        let frame = HudFrame {
            fps: self.clock.fps(),
            video_fps: self.source.native_fps(),
            forward: self.controller.forward(),
            right: self.controller.right(),
        };
        let controls = &mut self.controls;

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| hud::show(ctx, &frame, controls));

        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(&context.device, &context.queue, *id, image_delta);
        }
        egui_renderer.update_buffers(
            &context.device,
            &context.queue,
            encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }
    }

    /// Release GPU resources and stop audio. Called once when the loop ends.
    fn shutdown(&mut self) {
        if let Some(mut terrain) = self.terrain.take() {
            terrain.shutdown();
        }
        if let Some(renderer) = self.room_renderer.take() {
            renderer.destroy();
        }
        self.soundtrack.stop();
    }

    fn end_session(&mut self, event_loop: &ActiveEventLoop, error: Option<ReliefError>) {
        if let Some(e) = &error {
            log::error!("Session ended: {}", e);
        }
        if self.fatal.is_none() {
            self.fatal = error;
        }
        self.shutdown();
        event_loop.exit();
    }
}

impl ApplicationHandler for ReliefApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                self.end_session(event_loop, Some(e));
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui see the event first so the slider and toggle work
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let _ = egui_winit.on_window_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.end_session(event_loop, None);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.camera.aspect = context.aspect_ratio();
                }
            }

            WindowEvent::Focused(false) => {
                self.input.release_all();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            self.input.process_key_down(key_code);
                            if self.input.is_action_just_pressed("quit") {
                                self.end_session(event_loop, None);
                                return;
                            }
                        }
                        ElementState::Released => {
                            self.input.process_key_up(key_code);
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                // Nothing left to drive once the session has shut down
                if self.room_renderer.is_none() {
                    return;
                }
                self.pacer.mark_tick(Instant::now());
                if let Err(e) = self.tick() {
                    if e.is_fatal_stream() {
                        self.end_session(event_loop, Some(e));
                        return;
                    }
                    log::warn!("Tick error: {}", e);
                }
                self.render();
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if !self.controller.mouse_mode.is_captured() {
            return;
        }

        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.process_mouse_raw_delta(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        if self.pacer.is_due(Instant::now()) {
            window.request_redraw();
        }
        match self.pacer.next_tick() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Poll),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
