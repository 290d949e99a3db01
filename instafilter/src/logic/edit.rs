use crate::{cli::Args, config::Config};
use anyhow::{Context, Result, bail};
use filter_pipeline::{
    FileSource, FilterDescriptor, FilterKind, FilterPipeline, ParameterKey, RasterEngine,
};
use log::info;
use std::path::Path;

/// Filter and slider values for one edit, from the config file with
/// command-line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSettings {
    pub kind: FilterKind,
    pub intensity: f32,
    pub radius: f32,
    pub scale: f32,
    pub render_on_scale_change: bool,
}

impl EditSettings {
    pub fn resolve(config: &Config, args: &Args) -> Result<Self> {
        let kind = match args.filter {
            Some(kind) => kind,
            None => config
                .filter
                .default
                .parse()
                .with_context(|| format!("invalid default filter `{}`", config.filter.default))?,
        };

        Ok(Self {
            kind,
            intensity: args.intensity.unwrap_or(config.filter.intensity),
            radius: args.radius.unwrap_or(config.filter.radius),
            scale: args.scale.unwrap_or(config.filter.scale),
            render_on_scale_change: config.pipeline.render_on_scale_change,
        })
    }

    fn values(&self) -> [(ParameterKey, f32); 3] {
        [
            (ParameterKey::Intensity, self.intensity),
            (ParameterKey::Radius, self.radius),
            (ParameterKey::Scale, self.scale),
        ]
    }
}

/// Loads `input` into a pipeline configured from `settings` and renders it.
/// Fails when no filtered image could be produced.
pub async fn edit(input: &Path, settings: &EditSettings) -> Result<FilterPipeline> {
    let mut pipeline =
        FilterPipeline::new().with_render_on_scale_change(settings.render_on_scale_change);

    pipeline.select_kind(settings.kind);
    for (key, value) in settings.values() {
        pipeline.set_parameter(key, value);
    }

    info!("applying {} to {}", settings.kind, input.display());

    if pipeline.load_from(&FileSource::new(input)).await {
        return Ok(pipeline);
    }

    match pipeline.last_error() {
        Some(e) => bail!("{}: {e}", input.display()),
        None => bail!("{}: no image produced", input.display()),
    }
}

/// One line per filter: slug, display name and the controls it uses.
pub fn filter_listing() -> String {
    let engine = RasterEngine::new();

    FilterKind::all()
        .iter()
        .map(|&kind| {
            let descriptor = FilterDescriptor::describe(&engine, kind);
            let controls = descriptor
                .supported()
                .iter()
                .map(|key| key.name())
                .collect::<Vec<_>>()
                .join(", ");

            format!("{:<18} {:<18} {controls}\n", kind.slug(), kind.name())
        })
        .collect()
}
