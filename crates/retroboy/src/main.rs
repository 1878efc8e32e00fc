use anyhow::{Context, Result};
use retroboy::{RunConfig, DEFAULT_FRAMES};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next() else {
        eprintln!(
            "No ROM path provided.\n\
             Usage: retroboy <rom-path> [frames]\n\
             for example: retroboy path/to/your.gb 600"
        );
        std::process::exit(1);
    };
    let frames = match args.next() {
        Some(frames) => frames
            .parse()
            .with_context(|| format!("invalid frame count '{frames}'"))?,
        None => DEFAULT_FRAMES,
    };

    log::info!("Loading ROM path: '{}'", rom_path);
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM file '{rom_path}'"))?;

    let config = RunConfig::builder().frames(frames).build();
    let report = retroboy::run(&config, &rom)?;
    println!("{report}");
    Ok(())
}
