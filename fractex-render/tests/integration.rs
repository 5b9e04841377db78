use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use fractex_core::{FractalKind, Viewport};
use fractex_render::{HostShell, Raster, RenderPhase, RenderScheduler, Rgb, Session};

/// A shell that stores pixels and counts every callback.
struct RecordingShell {
    raster: Raster,
    writes: Box<[AtomicU32]>,
    row_notifications: AtomicUsize,
    full_notifications: AtomicUsize,
    input_enabled: AtomicBool,
}

impl RecordingShell {
    fn new(size: u32) -> Self {
        let len = (size * size) as usize;
        Self {
            raster: Raster::new(size),
            writes: (0..len).map(|_| AtomicU32::new(0)).collect(),
            row_notifications: AtomicUsize::new(0),
            full_notifications: AtomicUsize::new(0),
            input_enabled: AtomicBool::new(true),
        }
    }

    fn write_counts(&self) -> Vec<u32> {
        self.writes.iter().map(|w| w.load(Ordering::Relaxed)).collect()
    }
}

impl HostShell for RecordingShell {
    fn write_pixel(&self, x: u32, y: u32, color: Rgb) {
        let size = self.raster.size();
        self.writes[(y * size + x) as usize].fetch_add(1, Ordering::Relaxed);
        self.raster.set_pixel(x, y, color);
    }

    fn notify_region_ready(&self, _x: u32, _y: u32, _width: u32, height: u32) {
        if height == 1 {
            self.row_notifications.fetch_add(1, Ordering::Relaxed);
        } else {
            self.full_notifications.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.store(enabled, Ordering::Relaxed);
    }
}

fn render_to_raster(kind: FractalKind, viewport: Viewport, extent: u32) -> Vec<Rgb> {
    let scheduler = RenderScheduler::new(0).unwrap();
    let raster = Arc::new(Raster::new(extent));
    let pass = scheduler
        .start_render_pass(kind, viewport, extent, raster.clone())
        .unwrap();
    pass.wait();
    raster.snapshot()
}

#[test]
fn four_by_four_mandelbrot_regression() {
    let pixels = render_to_raster(
        FractalKind::Mandelbrot,
        Viewport::new(-2.0, -1.5, 3.0, 3.0).unwrap(),
        4,
    );
    let expected: Vec<Rgb> = [
        0x3B00FF, 0x4200FF, 0x4200FF, 0x4200FF, //
        0x3B00FF, 0x4A00FF, 0x6100FF, 0x5900FF, //
        0x3B00FF, 0x000000, 0x000000, 0x000000, //
        0x3B00FF, 0x4A00FF, 0x6100FF, 0x5900FF,
    ]
    .into_iter()
    .map(Rgb)
    .collect();
    assert_eq!(pixels, expected);
}

#[test]
fn every_pixel_written_exactly_once() {
    let extent = 48;
    let scheduler = RenderScheduler::new(4).unwrap();
    let shell = Arc::new(RecordingShell::new(extent));
    let pass = scheduler
        .start_render_pass(
            FractalKind::Tricorn,
            FractalKind::Tricorn.initial_range(),
            extent,
            shell.clone(),
        )
        .unwrap();
    pass.wait();

    assert_eq!(pass.rows_remaining(), 0);
    assert_eq!(pass.published_rows(), extent);
    assert_eq!(pass.discarded_rows(), 0);
    assert!(shell.write_counts().iter().all(|&n| n == 1));
    assert_eq!(shell.row_notifications.load(Ordering::Relaxed), extent as usize);
    assert_eq!(shell.full_notifications.load(Ordering::Relaxed), 1);
    assert!(shell.input_enabled.load(Ordering::Relaxed));
    assert_eq!(scheduler.phase(), RenderPhase::Idle);
}

#[test]
fn identical_inputs_give_identical_rasters() {
    for kind in FractalKind::ALL {
        let vp = kind.initial_range();
        assert_eq!(
            render_to_raster(kind, vp, 40),
            render_to_raster(kind, vp, 40),
            "{kind} render must be deterministic"
        );
    }
}

#[test]
fn superseded_pass_leaves_no_trace() {
    let extent = 96;
    // One worker so the stale pass's rows queue ahead of the new pass's rows.
    let scheduler = RenderScheduler::new(1).unwrap();
    let shell = Arc::new(RecordingShell::new(extent));

    // Inside the main cardioid: every pixel is bounded and costs the full cap.
    let slow = Viewport::new(-0.3, -0.1, 0.2, 0.2).unwrap();
    let stale = scheduler
        .start_render_pass(FractalKind::Mandelbrot, slow, extent, shell.clone())
        .unwrap();

    let fresh_vp = FractalKind::BurningShip.initial_range();
    let fresh = scheduler
        .start_render_pass(FractalKind::BurningShip, fresh_vp, extent, shell.clone())
        .unwrap();

    stale.wait();
    fresh.wait();

    assert!(!stale.is_current());
    assert!(fresh.is_current());
    assert_eq!(stale.rows_remaining(), 0);
    assert_eq!(stale.published_rows() + stale.discarded_rows(), extent);
    assert!(stale.discarded_rows() > 0, "queued rows of the old pass must be dropped");
    assert_eq!(fresh.published_rows(), extent);

    assert_eq!(
        shell.raster.snapshot(),
        render_to_raster(FractalKind::BurningShip, fresh_vp, extent),
        "final raster must match a clean render of the newer pass"
    );
    assert!(shell.input_enabled.load(Ordering::Relaxed));
    assert_eq!(shell.full_notifications.load(Ordering::Relaxed), 1);
}

#[test]
fn input_is_disabled_while_rendering() {
    let extent = 128;
    let scheduler = RenderScheduler::new(1).unwrap();
    let shell = Arc::new(RecordingShell::new(extent));
    let slow = Viewport::new(-0.3, -0.1, 0.2, 0.2).unwrap();
    let pass = scheduler
        .start_render_pass(FractalKind::Mandelbrot, slow, extent, shell.clone())
        .unwrap();

    if !pass.is_complete() {
        // The flag is only re-enabled by the completing row, under the gate.
        let enabled = shell.input_enabled.load(Ordering::Relaxed);
        assert!(!enabled || pass.rows_remaining() == 0);
    }
    pass.wait();
    assert!(shell.input_enabled.load(Ordering::Relaxed));
}

#[test]
fn session_end_to_end() {
    let extent = 64;
    let raster = Arc::new(Raster::new(extent));
    let scheduler = RenderScheduler::new(0).unwrap();
    let mut session =
        Session::new(extent, FractalKind::Mandelbrot, 0.5, scheduler, raster.clone()).unwrap();

    session.render().unwrap().wait();
    let initial = raster.snapshot();
    assert!(initial.iter().any(|&c| c != Rgb::BACKGROUND));
    assert!(initial.iter().any(|&c| c == Rgb::BACKGROUND));

    session
        .recenter_and_zoom(16, 32)
        .unwrap()
        .expect("idle session accepts zoom")
        .wait();
    assert_ne!(raster.snapshot(), initial);

    session.reset().unwrap().wait();
    assert_eq!(raster.snapshot(), initial);

    session.select_function(FractalKind::Tricorn).unwrap().wait();
    assert_eq!(
        raster.snapshot(),
        render_to_raster(FractalKind::Tricorn, FractalKind::Tricorn.initial_range(), extent)
    );
}

#[test]
fn rgba_export_bytes_match_raster() {
    let pixels = render_to_raster(
        FractalKind::Mandelbrot,
        FractalKind::Mandelbrot.initial_range(),
        4,
    );
    let raster = Raster::new(4);
    for (i, &c) in pixels.iter().enumerate() {
        raster.write_pixel(i as u32 % 4, i as u32 / 4, c);
    }
    let bytes = raster.to_rgba_bytes();
    assert_eq!(bytes.len(), 4 * 4 * 4);
    assert_eq!(&bytes[0..4], &[0x3B, 0x00, 0xFF, 255]);
    assert_eq!(&bytes[9 * 4..10 * 4], &[0, 0, 0, 255]);
}
