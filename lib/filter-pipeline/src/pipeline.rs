use crate::{
    FilterDescriptor, ImageSource, LoadTicket, LoadedImage, ParameterState, PipelineError,
    RenderError, RenderedImage, SourceImage, parameters::engine_value,
};
use filter_engine::{FilterKind, ImageFilterEngine, ParameterKey, RasterEngine};
use log::{debug, warn};

/// Applies the selected filter with the current parameter values to the
/// current source image.
///
/// All state is owned here and mutated only through the methods below, from
/// a single logical flow of control.
pub struct FilterPipeline<E: ImageFilterEngine = RasterEngine> {
    engine: E,
    descriptor: FilterDescriptor,
    parameters: ParameterState,
    source: Option<SourceImage>,
    rendered: Option<RenderedImage>,
    last_error: Option<PipelineError>,
    load_generation: u64,
    render_on_scale_change: bool,
}

impl FilterPipeline<RasterEngine> {
    pub fn new() -> Self {
        Self::with_engine(RasterEngine::new())
    }
}

impl Default for FilterPipeline<RasterEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ImageFilterEngine> FilterPipeline<E> {
    /// Starts with the default filter selected and no source image.
    pub fn with_engine(engine: E) -> Self {
        let descriptor = FilterDescriptor::describe(&engine, FilterKind::default());

        Self {
            parameters: ParameterState::new(descriptor.supported()),
            engine,
            descriptor,
            source: None,
            rendered: None,
            last_error: None,
            load_generation: 0,
            render_on_scale_change: false,
        }
    }

    /// Whether moving the Scale slider re-renders. Off by default: only
    /// Intensity and Radius changes render on their own.
    pub fn with_render_on_scale_change(mut self, enabled: bool) -> Self {
        self.render_on_scale_change = enabled;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn describe(&self, kind: FilterKind) -> FilterDescriptor {
        FilterDescriptor::describe(&self.engine, kind)
    }

    pub fn descriptor(&self) -> &FilterDescriptor {
        &self.descriptor
    }

    pub fn parameters(&self) -> &ParameterState {
        &self.parameters
    }

    pub fn is_applicable(&self, key: ParameterKey) -> bool {
        self.parameters.is_applicable(key)
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn rendered_image(&self) -> Option<&RenderedImage> {
        self.rendered.as_ref()
    }

    pub fn last_error(&self) -> Option<&PipelineError> {
        self.last_error.as_ref()
    }

    /// A different filter can be picked once there is something on screen.
    pub fn can_change_filter(&self) -> bool {
        self.rendered.is_some()
    }

    /// Replaces the active filter and recomputes which parameters apply.
    /// Drops the rendered image and the last error; call
    /// [`FilterPipeline::render`] afterwards.
    pub fn select_filter(&mut self, descriptor: FilterDescriptor) {
        debug!(
            "select filter {} supporting {:?}",
            descriptor.name(),
            descriptor.supported()
        );

        self.parameters.refresh_applicable(descriptor.supported());
        self.descriptor = descriptor;
        self.rendered = None;
        self.last_error = None;
    }

    pub fn select_kind(&mut self, kind: FilterKind) -> FilterDescriptor {
        let descriptor = self.describe(kind);
        self.select_filter(descriptor);
        descriptor
    }

    pub fn set_source_image(&mut self, image: SourceImage) {
        debug!("source image {:?}", image.dimensions());
        self.source = Some(image);
    }

    /// Updates one slider value, clamped into `[0, 1]`, and returns the stored
    /// value. NaN is ignored and returns `None`.
    ///
    /// Intensity and Radius re-render when they apply to the current filter.
    /// Scale only does so with [`FilterPipeline::with_render_on_scale_change`].
    pub fn set_parameter(&mut self, key: ParameterKey, value: f32) -> Option<f32> {
        let Some(stored) = self.parameters.set(key, value) else {
            warn!("ignoring non-numeric {key} value");
            return None;
        };

        if !self.parameters.is_applicable(key) {
            debug!("{key} does not apply to {}", self.descriptor.name());
        } else if self.triggers_render(key) {
            self.render();
        }

        Some(stored)
    }

    fn triggers_render(&self, key: ParameterKey) -> bool {
        match key {
            ParameterKey::Intensity | ParameterKey::Radius => true,
            ParameterKey::Scale => self.render_on_scale_change,
        }
    }

    /// Renders the current state. On failure the previous image is cleared and
    /// `None` is returned; [`FilterPipeline::last_error`] tells why.
    pub fn render(&mut self) -> Option<&RenderedImage> {
        self.try_render().ok()
    }

    pub fn try_render(&mut self) -> Result<&RenderedImage, &PipelineError> {
        match self.render_graph() {
            Ok(image) => {
                debug!(
                    "rendered {} at {:?}",
                    self.descriptor.name(),
                    image.dimensions()
                );
                self.last_error = None;
                Ok(&*self.rendered.insert(RenderedImage::new(image, self.descriptor.kind())))
            }
            Err(e) => {
                match e {
                    RenderError::NoSource => debug!("nothing to render yet"),
                    _ => warn!("render {} failed: {e}", self.descriptor.name()),
                }
                self.rendered = None;
                Err(&*self.last_error.insert(e.into()))
            }
        }
    }

    /// Builds the filter graph the next render would use.
    pub fn build_graph(&self) -> Result<E::Graph, RenderError> {
        let source = self.source.as_ref().ok_or(RenderError::NoSource)?;

        let mut graph = self.engine.instantiate(self.descriptor.kind());
        self.engine.bind_source(&mut graph, source.shared());

        let accepted = self.engine.supported_keys(&graph);
        for key in ParameterKey::ALL {
            if !self.parameters.is_applicable(key) || !accepted.contains(key) {
                continue;
            }

            let value = engine_value(key, self.parameters.value(key));
            self.engine.bind(&mut graph, key, value)?;
        }

        Ok(graph)
    }

    fn render_graph(&self) -> Result<image::RgbaImage, RenderError> {
        let graph = self.build_graph()?;
        self.engine
            .render(&graph)
            .ok_or(RenderError::NoOutput(self.descriptor.kind()))
    }

    /// Starts a new load; any ticket issued before this one becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket::new(self.load_generation)
    }

    /// Installs a finished load and renders it. Returns whether an image is
    /// now on screen. Results from stale tickets are dropped untouched.
    pub fn accept_loaded(&mut self, loaded: LoadedImage) -> bool {
        if loaded.generation != self.load_generation {
            debug!(
                "dropping stale load {} (current {})",
                loaded.generation, self.load_generation
            );
            return false;
        }

        match loaded.result {
            Ok(image) => {
                self.set_source_image(image);
                self.render().is_some()
            }
            Err(e) => {
                warn!("image load failed: {e}");
                self.rendered = None;
                self.last_error = Some(e);
                false
            }
        }
    }

    /// Loads from `source`, then renders. Returns whether an image is now on
    /// screen.
    pub async fn load_from<S: ImageSource + ?Sized>(&mut self, source: &S) -> bool {
        let ticket = self.begin_load();
        let loaded = ticket.load(source).await;
        self.accept_loaded(loaded)
    }
}
