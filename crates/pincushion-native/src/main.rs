use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use instant::Instant;

use pincushion_core::{
    ControllerConfig, DistortionParams, FrameClock, GesturePhase, PinchController, PointerEvent,
    Tick,
};

// Host surface: a square image view, normalized by its height.
const VIEW_HEIGHT_PX: f32 = 600.0;
const FRAME: Duration = Duration::from_micros(16_667); // ~60 Hz
const DRAG_FRAMES: u32 = 30;
const MAX_SETTLE_FRAMES: u32 = 600;

/// Scripted drag: touch down near the middle, swipe right and down, flick left.
fn scripted_drag() -> Vec<PointerEvent> {
    let start = Vec2::new(300.0, 300.0);
    let end = Vec2::new(420.0, 360.0);
    let mut events = vec![PointerEvent::Began { position: start }];
    for i in 1..=DRAG_FRAMES {
        let t = i as f32 / DRAG_FRAMES as f32;
        events.push(PointerEvent::Changed {
            position: start.lerp(end, t),
        });
    }
    events.push(PointerEvent::Ended {
        velocity: Vec2::new(-900.0, 120.0),
    });
    events
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = Rc::new(RefCell::new(DistortionParams::default()));
    let mut controller = PinchController::new(ControllerConfig::default())?;
    controller.attach(Rc::clone(&params));

    let mut clock = FrameClock::new();
    let mut now = Instant::now();
    clock.advance(now);

    // One pointer event per frame, then let the springs settle.
    let mut frame_index = 0u32;
    for event in scripted_drag() {
        controller.handle(event, VIEW_HEIGHT_PX);
        now += FRAME;
        clock.drive(now, &mut [&mut controller as &mut dyn Tick])?;
        log_frame(frame_index, controller.phase(), &params.borrow());
        frame_index += 1;
    }

    for _ in 0..MAX_SETTLE_FRAMES {
        if controller.phase() == GesturePhase::Idle {
            break;
        }
        now += FRAME;
        clock.drive(now, &mut [&mut controller as &mut dyn Tick])?;
        log_frame(frame_index, controller.phase(), &params.borrow());
        frame_index += 1;
    }

    let uniforms = params.borrow().uniforms();
    log::info!(
        "done after {} frames: phase={:?} uniforms={:?} ({} bytes)",
        frame_index,
        controller.phase(),
        uniforms,
        uniforms.as_bytes().len()
    );
    Ok(())
}

fn log_frame(index: u32, phase: GesturePhase, params: &DistortionParams) {
    log::info!(
        "[frame {:>3}] {:?} center=({:.3},{:.3}) magnitude={:.3}",
        index,
        phase,
        params.center.x,
        params.center.y,
        params.magnitude
    );
}
