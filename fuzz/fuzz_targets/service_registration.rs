#![no_main]

use latchkey::Container;
use libfuzzer_sys::fuzz_target;

// Interleaves registrations, bindings, tags, and transient flags driven by
// the fuzz input, then checks that the container answers queries without
// panicking and that `has` agrees with `get`'s NotFound outcome for every
// identifier the interleaving could have touched.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let container = Container::new();

    for chunk in data.chunks(3) {
        let op = chunk[0] % 5;
        let a = format!("id-{}", chunk.get(1).copied().unwrap_or(0) % 16);
        let b = format!("id-{}", chunk.get(2).copied().unwrap_or(0) % 16);

        match op {
            0 => container.set_value(a, u64::from(chunk[0])),
            1 => container.set_factory(a, |_| "made".to_string()),
            2 => container.bind(a, b),
            3 => container.tag(&a, [b]),
            _ => container.transient(a),
        }
    }

    for i in 0..16 {
        let id = format!("id-{}", i);
        let available = container.has(&id);
        match container.get(&id) {
            Ok(_) => assert!(available),
            Err(e) if e.is_not_found() => assert!(!available),
            // Structural failures (binding loops) still count as present.
            Err(_) => assert!(available),
        }
    }
});
