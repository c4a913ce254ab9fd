#![no_main]

use layered_di::{ContainerBuilder, Definitions, DiError};
use libfuzzer_sys::fuzz_target;

const NODES: usize = 8;

// Byte i lists the dependencies of node i as a bitmask. Arbitrary graphs
// include cycles; resolution must either succeed or report a cycle whose
// path starts and ends at the same node.
fuzz_target!(|data: &[u8]| {
    let mut defs = Definitions::new();
    for (i, mask) in data.iter().copied().take(NODES).enumerate() {
        defs.factory(format!("node{}", i), move |ctx| {
            let mut sum = 1u64;
            for dep in 0..NODES {
                if mask & (1 << dep) != 0 {
                    match ctx.try_get(&format!("node{}", dep))? {
                        Some(value) => sum += value.downcast_ref::<u64>().copied().unwrap_or(0),
                        None => continue,
                    }
                }
            }
            Ok(sum)
        });
    }

    let mut builder = ContainerBuilder::new();
    builder.add_provider(defs).unwrap();
    let container = builder.build();

    for i in 0..NODES {
        let id = format!("node{}", i);
        match container.get(&id) {
            Ok(_) => assert!(container.is_resolved(&id)),
            Err(DiError::CycleDetected(path)) => {
                assert!(path.len() >= 2);
                assert_eq!(path.first(), path.last());
                assert!(!container.is_resolved(&id));
            }
            Err(DiError::NotFound(_)) => assert!(!container.has(&id)),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
});
