//! ppmview — a minimal ASCII PPM (P3) image viewer

mod app;
mod ppm;

use app::{PpmViewerApp, WINDOW_HEIGHT, WINDOW_WIDTH};
use eframe::NativeOptions;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "ppmview".to_string());
    let path = match (args.next(), args.next()) {
        (Some(path), None) => PathBuf::from(path),
        _ => {
            eprintln!("Usage: {} <ppm-image-file>", program);
            return ExitCode::FAILURE;
        }
    };

    // Decode before any window appears; a bad file never opens one.
    let image = match ppm::decode(&path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
        .with_resizable(true)
        .with_title("PPM Viewer");

    let options = NativeOptions {
        viewport,
        centered: true,
        vsync: true,
        hardware_acceleration: eframe::HardwareAcceleration::Required,
        ..Default::default()
    };

    match eframe::run_native(
        "PPM Viewer",
        options,
        Box::new(move |cc| Box::new(PpmViewerApp::new(cc, image))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("display error: {}", e);
            ExitCode::FAILURE
        }
    }
}
