use std::path::PathBuf;

use dotmatrix_core::{GameBoy, SCREEN_HEIGHT, SCREEN_WIDTH};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rom_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("Usage: frame_dump <rom_path> <out_rgb24_path> [frames]");
        std::process::exit(2);
    });
    let out_path: PathBuf = args.next().map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("Usage: frame_dump <rom_path> <out_rgb24_path> [frames]");
        std::process::exit(2);
    });
    let frames: u32 = args
        .next()
        .unwrap_or_else(|| "120".to_string())
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Invalid frame count; expected an integer.");
            std::process::exit(2);
        });

    let rom = std::fs::read(&rom_path).unwrap_or_else(|err| {
        eprintln!("Failed to read ROM '{}': {err}", rom_path.display());
        std::process::exit(1);
    });

    let mut gb = GameBoy::new();
    if let Err(err) = gb.load_cartridge(&rom) {
        eprintln!("Failed to load ROM '{}': {err}", rom_path.display());
        std::process::exit(1);
    }

    for _ in 0..frames {
        if let Err(fault) = gb.run_until_frame() {
            eprintln!("Emulation stopped: {fault}");
            std::process::exit(1);
        }
    }

    // Expand the 2-bit shades to DMG-style grayscale RGB.
    let mut buffer = Vec::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    for &shade in gb.framebuffer() {
        let level = match shade {
            0 => 0xFF,
            1 => 0xAA,
            2 => 0x55,
            _ => 0x00,
        };
        buffer.extend_from_slice(&[level, level, level]);
    }

    std::fs::write(&out_path, &buffer).unwrap_or_else(|err| {
        eprintln!("Failed to write '{}': {err}", out_path.display());
        std::process::exit(1);
    });

    println!(
        "Wrote {} bytes ({}x{} rgb24) after {} frames to '{}'",
        buffer.len(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        frames,
        out_path.display()
    );
}
