use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use weekend_tracer::{
    cli::{init_logger, Args},
    output, renderer,
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let config = args.render_config();
    let (world, camera) = args.scene(&config);
    info!("Scene {:?} has {} spheres", args.scene, world.len());

    let progress_bar = ProgressBar::new(config.image_height as u64).with_style(
        ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} scanlines")?,
    );
    let image = renderer::render(&config, &camera, &world, progress_bar)?;

    output::save(&image, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}
