#![no_main]

use codec::{BamLoader, Controller, Decoder, Limits, RenderMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_input_bytes: 1 << 20,
        max_frame_pixels: 1 << 16,
        ..Limits::default()
    };
    let Ok(decoder) = BamLoader::new().with_limits(limits).load(data.to_vec()) else {
        return;
    };

    // Rendering a loaded resource must never panic, whatever the tables say.
    for index in 0..decoder.frame_count().min(32) {
        let _ = decoder.render_frame(index);
    }
    let mut controller = Controller::new(&decoder);
    controller.set_mode(RenderMode::Shared);
    controller.set_max_canvas_pixels(1 << 16);
    let _ = controller.cycle_get_frame();
    controller.set_mirrored(true);
    let _ = controller.cycle_get_frame();
});
