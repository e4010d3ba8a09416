#![no_main]

use latchkey::{argument, Container, DescriptorTable, ParameterSpec, TypeDescriptor};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct Leaf;
struct Node {
    #[allow(dead_code)]
    leaf: Arc<Leaf>,
}

// Exercises the resolution engine across its precedence chain: cache hits,
// bindings, factories, auto-wiring with parameters, and failure paths.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let pattern = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let register = pattern % 2 == 0;

    let mut types = DescriptorTable::new();
    types.declare("Leaf", TypeDescriptor::new(|_| Leaf));
    types.declare(
        "Node",
        TypeDescriptor::new(|args| Node {
            leaf: argument::<Leaf>(args, 0).expect("leaf"),
        })
        .param(ParameterSpec::service("leaf", "Leaf")),
    );

    let container = Container::with_introspector(types);
    if register {
        container.set_value("config", 7u64);
        container.bind("alias", "config");
        container.tag("config", ["boot"]);
    }

    match (pattern >> 1) % 6 {
        0 => {
            let result = container.get("config");
            assert_eq!(result.is_ok(), register);
        }
        1 => {
            let result = container.get("alias");
            assert_eq!(result.is_ok(), register);
        }
        2 => {
            // Auto-wire is always available; repeated gets keep identity.
            let a = container.get("Node").unwrap();
            let b = container.get("Node").unwrap();
            assert!(Arc::ptr_eq(&a, &b));
        }
        3 => {
            let tagged = container.get_tagged("boot").unwrap();
            assert_eq!(tagged.len(), usize::from(register));
        }
        4 => {
            assert!(container.get("nope").unwrap_err().is_not_found());
        }
        _ => {
            container.reset();
            assert_eq!(container.has("config"), register);
        }
    }
});
