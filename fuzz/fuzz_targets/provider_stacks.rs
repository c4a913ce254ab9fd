#![no_main]

use layered_di::{ContainerBuilder, Definitions, DiError};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const ENTRIES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

// Each byte pair adds one definition: which entry, and how it treats the
// previous definition. Every 8 definitions start a new provider.
fuzz_target!(|data: &[u8]| {
    let mut builder = ContainerBuilder::new();
    let mut defs = Definitions::new();
    let mut pending = 0usize;

    for pair in data.chunks_exact(2).take(64) {
        let id = ENTRIES[(pair[0] % 4) as usize];
        let arg = u64::from(pair[1]);

        if defs.ids().any(|existing| existing == id) || pending == 8 {
            builder.add_provider(std::mem::take(&mut defs)).unwrap();
            pending = 0;
        }

        match pair[0] >> 2 & 3 {
            0 => {
                defs.value(id, arg);
            }
            1 => {
                defs.extend(id, move |_, previous| Ok(*previous.get_as::<u64>()? + arg));
            }
            2 => {
                defs.extend(id, move |_, previous| match previous.try_get_as::<u64>()? {
                    Some(v) => Ok(*v ^ arg),
                    None => Ok(arg),
                });
            }
            _ => {
                defs.raw(id, |_, previous| previous.get());
            }
        }
        pending += 1;
    }
    builder.add_provider(defs).unwrap();
    let container = builder.build();

    for id in ENTRIES {
        let first = container.get(id);
        let second = container.get(id);
        match (first, second) {
            (Ok(a), Ok(b)) => assert!(Arc::ptr_eq(&a, &b)),
            (Err(DiError::NotFound(_)), Err(DiError::NotFound(_))) => assert!(!container.has(id)),
            (Err(DiError::NoPrevious(_)), Err(DiError::NoPrevious(_))) => {
                assert!(!container.is_resolved(id))
            }
            (a, b) => panic!("inconsistent results for {}: {:?} / {:?}", id, a.is_ok(), b.is_ok()),
        }
    }
});
