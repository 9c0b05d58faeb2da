use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::EngineConfig;
use crate::platform::{PlatformWindow, SurfaceHandle};

use super::surface::{self, SurfaceErrorAction};
use super::{Color, Renderer};

/// Initialization parameters for the GPU renderer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Explicit present mode. When `None` (or unsupported) the mode follows
    /// `WindowConfig::vsync`.
    pub present_mode: Option<wgpu::PresentMode>,

    /// Optional alpha mode preference for the surface.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: None,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// wgpu objects bound to one window surface.
struct Gpu {
    // Kept alive for the surface; never used after creation.
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: (u32, u32),
}

impl Gpu {
    async fn new(
        target: Arc<dyn SurfaceHandle>,
        size: (u32, u32),
        init: &GpuInit,
        vsync: bool,
    ) -> Result<Self> {
        anyhow::ensure!(size.0 > 0 && size.1 > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // An `Arc` target makes the surface 'static; the window outlives it
        // because the renderer shuts down before the window.
        let surface = instance
            .create_surface(target)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cadence device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, init.prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0,
            height: size.1,
            present_mode: surface::choose_present_mode(&caps, init.present_mode, vsync),
            alpha_mode: surface::choose_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        log::info!(
            "gpu ready: {} ({:?}), {:?}, {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.format,
            config.present_mode
        );

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// wgpu refuses 0x0 surfaces (minimized windows); configuration is
    /// deferred until the size is non-zero again.
    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn present(&mut self, clear: Color) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Ok(());
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                return match surface::map_surface_error(&err) {
                    SurfaceErrorAction::Reconfigured => {
                        self.surface.configure(&self.device, &self.config);
                        Ok(())
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::debug!("skipping frame: {err}");
                        Ok(())
                    }
                    SurfaceErrorAction::Fatal => Err(anyhow::Error::new(err).context("surface lost for good")),
                };
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("cadence frame encoder"),
            });

        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cadence clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Clear-and-present renderer on wgpu.
///
/// Needs a window that exposes a native surface handle; headless windows are
/// rejected during init.
#[derive(Default)]
pub struct GpuRenderer {
    init: GpuInit,
    gpu: Option<Gpu>,
}

impl GpuRenderer {
    pub fn new(init: GpuInit) -> Self {
        Self { init, gpu: None }
    }

    pub fn is_ready(&self) -> bool {
        self.gpu.is_some()
    }
}

impl Renderer for GpuRenderer {
    fn init(&mut self, window: &dyn PlatformWindow, config: &EngineConfig) -> Result<()> {
        anyhow::ensure!(self.gpu.is_none(), "renderer already initialized");

        let target = window
            .surface_handle()
            .context("window backend exposes no native surface")?;

        let gpu = pollster::block_on(Gpu::new(target, window.size(), &self.init, config.window.vsync))?;
        self.gpu = Some(gpu);
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.gpu.take().is_some() {
            log::debug!("gpu released");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(width, height);
        }
    }

    fn present(&mut self, clear: Color) -> Result<()> {
        match self.gpu.as_mut() {
            Some(gpu) => gpu.present(clear),
            None => anyhow::bail!("renderer not initialized"),
        }
    }
}
